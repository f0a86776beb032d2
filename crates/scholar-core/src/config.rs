//! Configuration management for scholar-graph.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (SCHOLAR_ prefix, `__` section separator,
//!    e.g. `SCHOLAR_NEO4J__URI`)
//! 2. Config file (`scholar.toml` unless another prefix is given)
//! 3. Defaults declared on each section type

use serde::de::DeserializeOwned;

use crate::error::ScholarError;

/// Default config file prefix, resolved by the `config` crate to
/// `scholar.toml`, `scholar.yaml`, etc.
pub const DEFAULT_FILE_PREFIX: &str = "scholar";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SCHOLAR";

/// Build the layered configuration from an optional file and the environment.
pub fn load(file_prefix: &str) -> Result<config::Config, ScholarError> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    Ok(cfg)
}

/// Deserialize one section, falling back to its defaults when absent.
///
/// A section that is present but malformed is an error rather than a
/// silent fallback.
pub fn section<T>(cfg: &config::Config, key: &str) -> Result<T, ScholarError>
where
    T: DeserializeOwned + Default,
{
    match cfg.get::<T>(key) {
        Ok(value) => Ok(value),
        Err(config::ConfigError::NotFound(_)) => {
            tracing::debug!(section = key, "Config section absent, using defaults");
            Ok(T::default())
        }
        Err(e) => Err(e.into()),
    }
}
