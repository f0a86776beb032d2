//! CLI entry point for scholar-ingest.
//!
//! Writes the rendered report to stdout; logs go to stderr.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use scholar_core::config::{self as settings, DEFAULT_FILE_PREFIX};
use scholar_graph::{GraphClient, GraphConfig, GraphStore, MemoryGraph};

use scholar_ingest::config::IngestConfig;
use scholar_ingest::fetch::{FileSource, OpenAlexSource, WorkSource};
use scholar_ingest::pipeline::run_pipeline;
use scholar_ingest::report::ReportFormat;

#[derive(Parser)]
#[command(name = "scholar-ingest")]
#[command(about = "Load OpenAlex works into a Neo4j property graph and report on it")]
struct Cli {
    /// Read works from a saved OpenAlex response instead of the API.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Use an in-memory graph instead of Neo4j.
    #[arg(long)]
    dry_run: bool,

    /// Do not wipe the graph before ingesting.
    #[arg(long)]
    keep_existing: bool,

    /// Report output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Rows per ranked report section.
    #[arg(long)]
    top: Option<usize>,

    /// Number of works to request from OpenAlex.
    #[arg(long)]
    per_page: Option<u32>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    /// Config file prefix (default: scholar).
    #[arg(short, long, default_value = DEFAULT_FILE_PREFIX)]
    config: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let logger = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if cli.log_json {
        logger.json().init();
    } else {
        logger.init();
    }

    let cfg = settings::load(&cli.config)?;
    let mut ingest_config: IngestConfig = settings::section(&cfg, "ingest")?;
    apply_overrides(&cli, &mut ingest_config);

    let source: Box<dyn WorkSource> = match &cli.input {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(OpenAlexSource::new(ingest_config.openalex.clone())?),
    };

    let rendered = if cli.dry_run {
        tracing::info!("Dry run: using in-memory graph");
        let graph = MemoryGraph::new();
        ingest(&graph, source.as_ref(), &ingest_config, cli.format).await?
    } else {
        let graph_config: GraphConfig = settings::section(&cfg, "neo4j")?;
        let graph = GraphClient::connect(&graph_config).await?;
        if ingest_config.ensure_constraints {
            graph.ensure_constraints().await?;
        }
        ingest(&graph, source.as_ref(), &ingest_config, cli.format).await?
    };

    print!("{rendered}");
    Ok(())
}

async fn ingest<S: GraphStore>(
    store: &S,
    source: &dyn WorkSource,
    config: &IngestConfig,
    format: ReportFormat,
) -> anyhow::Result<String> {
    let outcome = run_pipeline(store, source, config).await?;
    tracing::info!(
        works = outcome.summary.works,
        skipped = outcome.summary.skipped,
        "Ingest complete"
    );
    Ok(format.render(&outcome.report)?)
}

fn apply_overrides(cli: &Cli, config: &mut IngestConfig) {
    if cli.keep_existing {
        config.clear_before_ingest = false;
    }
    if let Some(top) = cli.top {
        config.top_n = top;
    }
    if let Some(per_page) = cli.per_page {
        config.openalex.per_page = per_page;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_config_untouched() {
        let cli = Cli::parse_from(["scholar-ingest"]);
        let mut config = IngestConfig::default();
        apply_overrides(&cli, &mut config);

        assert!(config.clear_before_ingest);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.openalex.per_page, 20);
        assert_eq!(cli.format, ReportFormat::Text);
        assert_eq!(cli.config, DEFAULT_FILE_PREFIX);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "scholar-ingest",
            "--keep-existing",
            "--top",
            "10",
            "--per-page",
            "50",
            "--format",
            "json",
        ]);
        let mut config = IngestConfig::default();
        apply_overrides(&cli, &mut config);

        assert!(!config.clear_before_ingest);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.openalex.per_page, 50);
        assert_eq!(cli.format, ReportFormat::Json);
    }
}
