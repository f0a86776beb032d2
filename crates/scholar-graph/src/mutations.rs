//! Write operations for the property graph.
//!
//! All mutations use MERGE (upsert) semantics to handle idempotent
//! re-ingestion. Nodes are identified by (label, id); relationships by
//! (type, source id, target id).

use neo4rs::query;

use scholar_core::{Author, Concept, Edge, Institution, Node, NodeLabel, Work};

use crate::client::{GraphClient, GraphError};

impl GraphClient {
    // ── Node Upserts ─────────────────────────────────────────────

    /// Upsert any node type into the graph.
    pub async fn upsert_node(&self, node: &Node) -> Result<(), GraphError> {
        match node {
            Node::Work(w) => self.upsert_work(w).await,
            Node::Author(Author { id, name }) => {
                self.upsert_named(NodeLabel::Author, id, name).await
            }
            Node::Institution(Institution { id, name }) => {
                self.upsert_named(NodeLabel::Institution, id, name).await
            }
            Node::Concept(Concept { id, name }) => {
                self.upsert_named(NodeLabel::Concept, id, name).await
            }
        }
    }

    /// Upsert a Work node. An absent year removes the property.
    pub async fn upsert_work(&self, work: &Work) -> Result<(), GraphError> {
        let q = query(
            "MERGE (n:Work {id: $id})
             SET n.title = $title, n.year = $year, n.citations = $citations",
        )
        .param("id", work.id.clone())
        .param("title", work.title.clone())
        .param("year", work.year)
        .param("citations", work.citations);

        self.run(q).await
    }

    /// Upsert an Author, Institution, or Concept node.
    async fn upsert_named(&self, label: NodeLabel, id: &str, name: &str) -> Result<(), GraphError> {
        let cypher = format!(
            "MERGE (n:{label} {{id: $id}})
             SET n.name = $name"
        );

        let q = query(&cypher)
            .param("id", id.to_string())
            .param("name", name.to_string());

        self.run(q).await
    }

    // ── Edge Upserts ─────────────────────────────────────────────

    /// Upsert a relationship between two existing nodes.
    ///
    /// Endpoints are matched by their schema labels, so a missing endpoint
    /// makes this a no-op rather than creating a placeholder node.
    pub async fn upsert_edge(&self, edge: &Edge) -> Result<(), GraphError> {
        let source = edge.edge_type.source_label();
        let target = edge.edge_type.target_label();
        let rel_type = edge.edge_type.as_cypher();
        let cypher = format!(
            "MATCH (a:{source} {{id: $source_id}})
             MATCH (b:{target} {{id: $target_id}})
             MERGE (a)-[:{rel_type}]->(b)"
        );

        let q = query(&cypher)
            .param("source_id", edge.source_id.clone())
            .param("target_id", edge.target_id.clone());

        self.run(q).await
    }

    // ── Schema & Maintenance ─────────────────────────────────────

    /// Create a uniqueness constraint on `id` for every node label.
    pub async fn ensure_constraints(&self) -> Result<(), GraphError> {
        for label in NodeLabel::ALL {
            let name = format!("{}_id_unique", label.as_str().to_lowercase());
            let cypher = format!(
                "CREATE CONSTRAINT {name} IF NOT EXISTS
                 FOR (n:{label}) REQUIRE n.id IS UNIQUE"
            );
            self.run(query(&cypher)).await?;
        }
        tracing::debug!("Uniqueness constraints ensured");
        Ok(())
    }

    /// Delete every node and relationship in the database.
    pub async fn clear(&self) -> Result<(), GraphError> {
        self.run(query("MATCH (n) DETACH DELETE n")).await
    }
}
