//! Aggregate report over the ingested graph, and its renderers.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use scholar_graph::{AuthorWorkCount, CoAuthorship, GraphError, GraphStore, LabelCount};

use crate::error::Result;

/// Result rows of the post-ingest aggregate queries.
#[derive(Debug, Clone, Serialize)]
pub struct GraphReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub node_counts: Vec<LabelCount>,
    pub top_authors: Vec<AuthorWorkCount>,
    pub collaborations: Vec<CoAuthorship>,
}

/// Run the aggregate queries. `top_n` bounds both ranked sections.
pub async fn build_report<S>(
    store: &S,
    run_id: Uuid,
    top_n: usize,
) -> std::result::Result<GraphReport, GraphError>
where
    S: GraphStore + ?Sized,
{
    let node_counts = store.node_counts().await?;
    let top_authors = store.top_authors(top_n).await?;
    let collaborations = store.top_collaborations(top_n).await?;

    Ok(GraphReport {
        run_id,
        generated_at: Utc::now(),
        node_counts,
        top_authors,
        collaborations,
    })
}

/// Output format for a rendered report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human-readable sections.
    #[default]
    Text,
    /// Pretty-printed JSON document.
    Json,
}

impl ReportFormat {
    /// Render the report. The output always ends with a single newline.
    pub fn render(&self, report: &GraphReport) -> Result<String> {
        match self {
            Self::Text => Ok(render_text(report)?),
            Self::Json => {
                let mut json = serde_json::to_string_pretty(report)?;
                json.push('\n');
                Ok(json)
            }
        }
    }
}

fn render_text(report: &GraphReport) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();

    writeln!(out, "Node counts:")?;
    if report.node_counts.is_empty() {
        writeln!(out, "(graph is empty)")?;
    }
    for row in &report.node_counts {
        writeln!(out, "{}: {}", row.label, row.count)?;
    }

    writeln!(out, "\nTop authors:")?;
    for row in &report.top_authors {
        let noun = if row.works == 1 { "paper" } else { "papers" };
        writeln!(out, "{}: {} {noun}", row.name, row.works)?;
    }

    writeln!(out, "\nCollaborations:")?;
    for row in &report.collaborations {
        writeln!(
            out,
            "{} & {}: {}",
            row.first_name, row.second_name, row.shared_works
        )?;
    }

    Ok(out)
}
