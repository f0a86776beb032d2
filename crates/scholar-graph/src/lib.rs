//! scholar-graph — graph store boundary for the scholarly property graph.
//!
//! This crate is the single mutation point for the graph. All writes use
//! MERGE (upsert) semantics keyed on the external identifier, so replaying
//! the same records never creates duplicate nodes or relationships.

pub mod client;
pub mod memory;
pub mod mutations;
pub mod queries;
pub mod store;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use memory::MemoryGraph;
pub use queries::{AuthorWorkCount, CoAuthorship, LabelCount};
pub use store::GraphStore;
