//! The graph store seam shared by the Neo4j client and the in-memory graph.

use async_trait::async_trait;

use scholar_core::{Edge, Node};

use crate::client::{GraphClient, GraphError};
use crate::queries::{AuthorWorkCount, CoAuthorship, LabelCount};

/// Merge primitives plus the read-only aggregates run after a batch.
///
/// Both merge primitives are idempotent: repeating an identical call leaves
/// the graph unchanged.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Create the node if no node with its label and id exists, otherwise
    /// overwrite its attributes.
    async fn merge_node(&self, node: &Node) -> Result<(), GraphError>;

    /// Create the relationship if absent. A no-op when either endpoint is
    /// missing.
    async fn merge_edge(&self, edge: &Edge) -> Result<(), GraphError>;

    /// Delete every node and relationship.
    async fn delete_all(&self) -> Result<(), GraphError>;

    /// Node count per label, ordered by label.
    async fn node_counts(&self) -> Result<Vec<LabelCount>, GraphError>;

    /// Authors ranked by number of authored works.
    async fn top_authors(&self, limit: usize) -> Result<Vec<AuthorWorkCount>, GraphError>;

    /// Unordered author pairs ranked by number of shared works.
    async fn top_collaborations(&self, limit: usize) -> Result<Vec<CoAuthorship>, GraphError>;
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn merge_node(&self, node: &Node) -> Result<(), GraphError> {
        self.upsert_node(node).await
    }

    async fn merge_edge(&self, edge: &Edge) -> Result<(), GraphError> {
        self.upsert_edge(edge).await
    }

    async fn delete_all(&self) -> Result<(), GraphError> {
        self.clear().await
    }

    async fn node_counts(&self) -> Result<Vec<LabelCount>, GraphError> {
        self.count_nodes_by_label().await
    }

    async fn top_authors(&self, limit: usize) -> Result<Vec<AuthorWorkCount>, GraphError> {
        self.authors_by_work_count(limit).await
    }

    async fn top_collaborations(&self, limit: usize) -> Result<Vec<CoAuthorship>, GraphError> {
        self.co_author_pairs(limit).await
    }
}
