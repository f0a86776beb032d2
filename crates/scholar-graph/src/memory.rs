//! In-memory graph store.
//!
//! Mirrors the Neo4j client's MERGE and aggregate semantics without a
//! server. Used for dry runs and tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use scholar_core::{Edge, EdgeType, Node, NodeLabel};

use crate::client::GraphError;
use crate::queries::{AuthorWorkCount, CoAuthorship, LabelCount};
use crate::store::GraphStore;

#[derive(Debug, Default)]
struct State {
    nodes: BTreeMap<(NodeLabel, String), Node>,
    edges: BTreeSet<Edge>,
}

/// A property graph held in process memory.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    state: Mutex<State>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a node by label and id.
    pub fn node(&self, label: NodeLabel, id: &str) -> Option<Node> {
        self.state().nodes.get(&(label, id.to_string())).cloned()
    }

    pub fn node_count(&self, label: NodeLabel) -> usize {
        self.state()
            .nodes
            .keys()
            .filter(|(l, _)| *l == label)
            .count()
    }

    pub fn total_nodes(&self) -> usize {
        self.state().nodes.len()
    }

    pub fn edge_count(&self, edge_type: EdgeType) -> usize {
        self.state()
            .edges
            .iter()
            .filter(|e| e.edge_type == edge_type)
            .count()
    }

    pub fn total_edges(&self) -> usize {
        self.state().edges.len()
    }

    pub fn has_edge(&self, edge: &Edge) -> bool {
        self.state().edges.contains(edge)
    }

    /// All relationships of a type, ordered by (source id, target id).
    pub fn edges(&self, edge_type: EdgeType) -> Vec<Edge> {
        self.state()
            .edges
            .iter()
            .filter(|e| e.edge_type == edge_type)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl GraphStore for MemoryGraph {
    async fn merge_node(&self, node: &Node) -> Result<(), GraphError> {
        self.state()
            .nodes
            .insert((node.label(), node.id().to_string()), node.clone());
        Ok(())
    }

    async fn merge_edge(&self, edge: &Edge) -> Result<(), GraphError> {
        let mut state = self.state();
        let source = (edge.edge_type.source_label(), edge.source_id.clone());
        let target = (edge.edge_type.target_label(), edge.target_id.clone());
        if !state.nodes.contains_key(&source) || !state.nodes.contains_key(&target) {
            tracing::debug!(
                edge_type = %edge.edge_type,
                source_id = %edge.source_id,
                target_id = %edge.target_id,
                "Endpoint missing, relationship not merged"
            );
            return Ok(());
        }
        state.edges.insert(edge.clone());
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), GraphError> {
        let mut state = self.state();
        state.nodes.clear();
        state.edges.clear();
        Ok(())
    }

    async fn node_counts(&self) -> Result<Vec<LabelCount>, GraphError> {
        let state = self.state();
        let mut counts: BTreeMap<&'static str, i64> = BTreeMap::new();
        for (label, _) in state.nodes.keys() {
            *counts.entry(label.as_str()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(label, count)| LabelCount {
                label: label.to_string(),
                count,
            })
            .collect())
    }

    async fn top_authors(&self, limit: usize) -> Result<Vec<AuthorWorkCount>, GraphError> {
        let state = self.state();
        let mut works: HashMap<&str, i64> = HashMap::new();
        // Edges are a set, so each (author, work) pair is counted once.
        for edge in state.edges.iter().filter(|e| e.edge_type == EdgeType::Authored) {
            *works.entry(edge.source_id.as_str()).or_default() += 1;
        }

        let mut rows: Vec<AuthorWorkCount> = works
            .into_iter()
            .map(|(author_id, works)| AuthorWorkCount {
                author_id: author_id.to_string(),
                name: author_name(&state, author_id),
                works,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.works
                .cmp(&a.works)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.author_id.cmp(&b.author_id))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    async fn top_collaborations(&self, limit: usize) -> Result<Vec<CoAuthorship>, GraphError> {
        let state = self.state();
        let mut authors_by_work: BTreeMap<&str, Vec<(String, &str)>> = BTreeMap::new();
        for edge in state.edges.iter().filter(|e| e.edge_type == EdgeType::Authored) {
            let author_id = edge.source_id.as_str();
            authors_by_work
                .entry(edge.target_id.as_str())
                .or_default()
                .push((author_name(&state, author_id), author_id));
        }

        let mut shared: BTreeMap<((String, &str), (String, &str)), i64> = BTreeMap::new();
        for authors in authors_by_work.values_mut() {
            authors.sort();
            for (i, first) in authors.iter().enumerate() {
                for second in &authors[i + 1..] {
                    *shared.entry((first.clone(), second.clone())).or_default() += 1;
                }
            }
        }

        let mut rows: Vec<CoAuthorship> = shared
            .into_iter()
            .map(|(((first_name, first_id), (second_name, second_id)), shared_works)| {
                CoAuthorship {
                    first_id: first_id.to_string(),
                    first_name,
                    second_id: second_id.to_string(),
                    second_name,
                    shared_works,
                }
            })
            .collect();
        // Stable sort keeps the (first, second) key order among equal counts.
        rows.sort_by(|a, b| b.shared_works.cmp(&a.shared_works));
        rows.truncate(limit);
        Ok(rows)
    }
}

fn author_name(state: &State, author_id: &str) -> String {
    state
        .nodes
        .get(&(NodeLabel::Author, author_id.to_string()))
        .map(|n| n.name().to_string())
        .unwrap_or_default()
}
