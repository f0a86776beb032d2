//! Configuration for the scholar-ingest pipeline.

use serde::Deserialize;

use crate::upsert::FanOutLimits;

/// Top-level ingest configuration.
///
/// Loaded from `scholar.toml` `[ingest]` section or
/// `SCHOLAR_INGEST__` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// OpenAlex query parameters.
    #[serde(default)]
    pub openalex: OpenAlexConfig,

    /// Per-work fan-out bounds.
    #[serde(default)]
    pub limits: FanOutLimits,

    /// Number of rows in each ranked report section.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Wipe the graph before ingesting.
    #[serde(default = "default_true")]
    pub clear_before_ingest: bool,

    /// Create uniqueness constraints on `id` before ingesting (Neo4j only).
    #[serde(default = "default_true")]
    pub ensure_constraints: bool,
}

/// Parameters of the `/works` request.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAlexConfig {
    /// API root (default: "https://api.openalex.org").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `filter` query parameter.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Number of works requested (single page).
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Value of the `sort` query parameter.
    #[serde(default = "default_sort")]
    pub sort: String,

    /// Contact address for the polite pool.
    #[serde(default)]
    pub mailto: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openalex.org".to_string()
}

/// Computer science works published after 2022.
fn default_filter() -> String {
    "concepts.id:C41008148,publication_year:>2022".to_string()
}

fn default_per_page() -> u32 {
    20
}

fn default_sort() -> String {
    "cited_by_count:desc".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_top_n() -> usize {
    5
}

fn default_true() -> bool {
    true
}

impl Default for OpenAlexConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            filter: default_filter(),
            per_page: default_per_page(),
            sort: default_sort(),
            mailto: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            openalex: OpenAlexConfig::default(),
            limits: FanOutLimits::default(),
            top_n: default_top_n(),
            clear_before_ingest: true,
            ensure_constraints: true,
        }
    }
}
