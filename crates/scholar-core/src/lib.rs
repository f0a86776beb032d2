//! scholar-core: Shared types, configuration, and error handling for scholar-graph.
//!
//! This crate provides the foundational types used across all components:
//! - Raw work records as delivered by the research-metadata API
//! - Node types (Work, Author, Institution, Concept) for the property graph
//! - Relationship types (AUTHORED, AFFILIATED_WITH, COVERS)
//! - Layered configuration loading
//! - Common error types

pub mod config;
pub mod error;
pub mod record;
pub mod types;

pub use error::ScholarError;
pub use record::{AuthorshipRecord, EntityRecord, WorkRecord};
pub use types::{Author, Concept, Edge, EdgeType, Institution, Node, NodeLabel, Work};
