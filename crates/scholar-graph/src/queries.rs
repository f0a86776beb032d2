//! Read-only aggregate queries over the property graph.
//!
//! Aggregation is keyed by author id; names are carried along for
//! presentation only, so distinct authors sharing a name stay distinct.

use neo4rs::query;
use serde::{Deserialize, Serialize};

use scholar_core::{EdgeType, NodeLabel};

use crate::client::{GraphClient, GraphError};

/// Number of nodes carrying a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

/// An author and the number of works they authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorWorkCount {
    pub author_id: String,
    pub name: String,
    pub works: i64,
}

/// An unordered pair of authors and the number of works they share.
///
/// The pair is stored ordered by (name, id), so each pair appears once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoAuthorship {
    pub first_id: String,
    pub first_name: String,
    pub second_id: String,
    pub second_name: String,
    pub shared_works: i64,
}

impl GraphClient {
    /// Count nodes grouped by their first label.
    pub async fn count_nodes_by_label(&self) -> Result<Vec<LabelCount>, GraphError> {
        let q = query(
            "MATCH (n)
             RETURN labels(n)[0] AS label, count(n) AS count
             ORDER BY label",
        );

        let rows = self.query_rows(q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let label: String = row.get("label").map_err(|e| {
                GraphError::Serialization(format!("Failed to read label count: {e}"))
            })?;
            results.push(LabelCount {
                label,
                count: row.get::<i64>("count").unwrap_or(0),
            });
        }
        Ok(results)
    }

    /// Authors ranked by authored works, ties broken by name then id.
    pub async fn authors_by_work_count(
        &self,
        limit: usize,
    ) -> Result<Vec<AuthorWorkCount>, GraphError> {
        let q = query(
            "MATCH (a:Author)-[:AUTHORED]->(w:Work)
             RETURN a.id AS author_id, a.name AS name, count(DISTINCT w) AS works
             ORDER BY works DESC, name, author_id
             LIMIT $limit",
        )
        .param("limit", limit as i64);

        let rows = self.query_rows(q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let author_id: String = row.get("author_id").map_err(|e| {
                GraphError::Serialization(format!("Failed to read author id: {e}"))
            })?;
            results.push(AuthorWorkCount {
                author_id,
                name: row.get("name").unwrap_or_default(),
                works: row.get::<i64>("works").unwrap_or(0),
            });
        }
        Ok(results)
    }

    /// Co-author pairs ranked by shared works.
    pub async fn co_author_pairs(&self, limit: usize) -> Result<Vec<CoAuthorship>, GraphError> {
        let q = query(
            "MATCH (a1:Author)-[:AUTHORED]->(w:Work)<-[:AUTHORED]-(a2:Author)
             WHERE a1.name < a2.name OR (a1.name = a2.name AND a1.id < a2.id)
             RETURN a1.id AS first_id, a1.name AS first_name,
                    a2.id AS second_id, a2.name AS second_name,
                    count(DISTINCT w) AS shared_works
             ORDER BY shared_works DESC, first_name, first_id, second_name, second_id
             LIMIT $limit",
        )
        .param("limit", limit as i64);

        let rows = self.query_rows(q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let first_id: String = row.get("first_id").map_err(|e| {
                GraphError::Serialization(format!("Failed to read co-author pair: {e}"))
            })?;
            let second_id: String = row.get("second_id").map_err(|e| {
                GraphError::Serialization(format!("Failed to read co-author pair: {e}"))
            })?;
            results.push(CoAuthorship {
                first_id,
                first_name: row.get("first_name").unwrap_or_default(),
                second_id,
                second_name: row.get("second_name").unwrap_or_default(),
                shared_works: row.get::<i64>("shared_works").unwrap_or(0),
            });
        }
        Ok(results)
    }

    /// Count nodes carrying a single label.
    pub async fn count_nodes(&self, label: NodeLabel) -> Result<i64, GraphError> {
        let cypher = format!("MATCH (n:{label}) RETURN count(n) AS cnt");

        match self.query_one(query(&cypher)).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0)),
            None => Ok(0),
        }
    }

    /// Count relationships of a single type.
    pub async fn count_edges(&self, edge_type: EdgeType) -> Result<i64, GraphError> {
        let rel_type = edge_type.as_cypher();
        let cypher = format!("MATCH ()-[r:{rel_type}]->() RETURN count(r) AS cnt");

        match self.query_one(query(&cypher)).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0)),
            None => Ok(0),
        }
    }
}
