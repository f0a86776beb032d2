//! One-shot batch: wipe → fetch → upsert → report.
//!
//! Strictly sequential. A store failure at any step aborts the run; an
//! empty fetch is a successful no-op.

use tracing::Instrument;
use uuid::Uuid;

use scholar_graph::GraphStore;

use crate::config::IngestConfig;
use crate::error::Result;
use crate::fetch::WorkSource;
use crate::report::{build_report, GraphReport};
use crate::upsert::{upsert_all, IngestSummary};

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub summary: IngestSummary,
    pub report: GraphReport,
}

/// Execute a single ingest run against `store`.
pub async fn run_pipeline<S, W>(
    store: &S,
    source: &W,
    config: &IngestConfig,
) -> Result<PipelineOutcome>
where
    S: GraphStore + ?Sized,
    W: WorkSource + ?Sized,
{
    let run_id = Uuid::new_v4();
    run(store, source, config, run_id)
        .instrument(tracing::info_span!("ingest", %run_id))
        .await
}

async fn run<S, W>(
    store: &S,
    source: &W,
    config: &IngestConfig,
    run_id: Uuid,
) -> Result<PipelineOutcome>
where
    S: GraphStore + ?Sized,
    W: WorkSource + ?Sized,
{
    if config.clear_before_ingest {
        store.delete_all().await?;
        tracing::info!("Graph cleared");
    }

    let records = source.fetch_works().await?;
    if records.is_empty() {
        tracing::warn!("No works to ingest");
    }

    let summary = upsert_all(store, &records, &config.limits).await?;
    let report = build_report(store, run_id, config.top_n).await?;

    Ok(PipelineOutcome { summary, report })
}
