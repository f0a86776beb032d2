//! Work record sources: the OpenAlex API and saved response files.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use scholar_core::record::parse_works;
use scholar_core::WorkRecord;

use crate::config::OpenAlexConfig;
use crate::error::{IngestError, Result};

/// A finite, ordered source of raw work records.
#[async_trait]
pub trait WorkSource: Send + Sync {
    async fn fetch_works(&self) -> Result<Vec<WorkRecord>>;
}

/// Fetches a single page of works from the OpenAlex `/works` endpoint.
///
/// Any request failure is logged and reported as an empty batch, never as
/// an error: an empty fetch is a valid, trivial input for the pipeline.
pub struct OpenAlexSource {
    client: Client,
    config: OpenAlexConfig,
}

impl OpenAlexSource {
    pub fn new(config: OpenAlexConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("scholar-ingest/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    /// Endpoint URL for the works listing.
    pub fn works_url(&self) -> String {
        format!("{}/works", self.config.base_url.trim_end_matches('/'))
    }

    /// Query parameters sent with the works request.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("filter", self.config.filter.clone()),
            ("per-page", self.config.per_page.to_string()),
            ("sort", self.config.sort.clone()),
        ];
        if let Some(mailto) = &self.config.mailto {
            params.push(("mailto", mailto.clone()));
        }
        params
    }

    async fn try_fetch(&self) -> Result<Vec<WorkRecord>> {
        let url = self.works_url();
        let response = self
            .client
            .get(&url)
            .query(&self.query_params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        Ok(parse_works(&body)?)
    }
}

#[async_trait]
impl WorkSource for OpenAlexSource {
    async fn fetch_works(&self) -> Result<Vec<WorkRecord>> {
        tracing::info!(
            url = %self.works_url(),
            per_page = self.config.per_page,
            "Fetching works from OpenAlex"
        );
        match self.try_fetch().await {
            Ok(works) => {
                tracing::info!(count = works.len(), "Fetched works");
                Ok(works)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching works, continuing with an empty batch");
                Ok(Vec::new())
            }
        }
    }
}

/// Reads works from a saved OpenAlex response (envelope or bare array).
///
/// Unlike the API source, read and parse failures are errors.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WorkSource for FileSource {
    async fn fetch_works(&self) -> Result<Vec<WorkRecord>> {
        let payload = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| IngestError::ReadInput {
                path: self.path.display().to_string(),
                source,
            })?;
        let works = parse_works(&payload)?;
        tracing::info!(
            path = %self.path.display(),
            count = works.len(),
            "Loaded works from file"
        );
        Ok(works)
    }
}

/// A fixed in-memory batch of records.
pub struct StaticSource {
    works: Vec<WorkRecord>,
}

impl StaticSource {
    pub fn new(works: Vec<WorkRecord>) -> Self {
        Self { works }
    }
}

#[async_trait]
impl WorkSource for StaticSource {
    async fn fetch_works(&self) -> Result<Vec<WorkRecord>> {
        Ok(self.works.clone())
    }
}
