//! scholar-ingest: OpenAlex works into a property graph.
//!
//! Fetches a bounded batch of work records, upserts each one as a
//! de-duplicated fragment of Work, Author, Institution, and Concept nodes,
//! then runs a handful of read-only aggregate queries over the result.

pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub mod upsert;
