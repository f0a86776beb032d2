//! Graph schema types for the scholarly property graph.
//!
//! Every node is identified by the external identifier string supplied by
//! the source record. Relationships carry no properties; a relationship is
//! identified by its type and its ordered pair of endpoint ids.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Title stored on a Work whose record carries none.
pub const DEFAULT_TITLE: &str = "No title";

/// Name stored on an Author, Institution, or Concept whose record carries none.
pub const UNKNOWN_NAME: &str = "Unknown";

// ── Labels ────────────────────────────────────────────────────────

/// Node label in the property graph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeLabel {
    Work,
    Author,
    Institution,
    Concept,
}

impl NodeLabel {
    pub const ALL: [NodeLabel; 4] = [
        NodeLabel::Work,
        NodeLabel::Author,
        NodeLabel::Institution,
        NodeLabel::Concept,
    ];

    /// The label as it appears in Cypher.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Author => "Author",
            Self::Institution => "Institution",
            Self::Concept => "Concept",
        }
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Node Types ────────────────────────────────────────────────────

/// A scholarly work (paper).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Work {
    pub id: String,
    pub title: String,
    pub year: Option<i64>,
    pub citations: i64,
}

/// An author of one or more works.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub name: String,
}

/// An institution an author is affiliated with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Institution {
    pub id: String,
    pub name: String,
}

/// A topical concept covered by a work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Concept {
    pub id: String,
    pub name: String,
}

/// Polymorphic node enum for heterogeneous graph operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "label")]
pub enum Node {
    Work(Work),
    Author(Author),
    Institution(Institution),
    Concept(Concept),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Work(n) => &n.id,
            Node::Author(n) => &n.id,
            Node::Institution(n) => &n.id,
            Node::Concept(n) => &n.id,
        }
    }

    pub fn label(&self) -> NodeLabel {
        match self {
            Node::Work(_) => NodeLabel::Work,
            Node::Author(_) => NodeLabel::Author,
            Node::Institution(_) => NodeLabel::Institution,
            Node::Concept(_) => NodeLabel::Concept,
        }
    }

    /// Display name for presentation. Works use their title.
    pub fn name(&self) -> &str {
        match self {
            Node::Work(n) => &n.title,
            Node::Author(n) => &n.name,
            Node::Institution(n) => &n.name,
            Node::Concept(n) => &n.name,
        }
    }
}

// ── Edge Types ────────────────────────────────────────────────────

/// Relationship type in the property graph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    /// Author → Work
    Authored,
    /// Author → Institution
    AffiliatedWith,
    /// Work → Concept
    Covers,
}

impl EdgeType {
    /// The relationship type as it appears in Cypher.
    pub fn as_cypher(&self) -> &'static str {
        match self {
            Self::Authored => "AUTHORED",
            Self::AffiliatedWith => "AFFILIATED_WITH",
            Self::Covers => "COVERS",
        }
    }

    pub fn source_label(&self) -> NodeLabel {
        match self {
            Self::Authored | Self::AffiliatedWith => NodeLabel::Author,
            Self::Covers => NodeLabel::Work,
        }
    }

    pub fn target_label(&self) -> NodeLabel {
        match self {
            Self::Authored => NodeLabel::Work,
            Self::AffiliatedWith => NodeLabel::Institution,
            Self::Covers => NodeLabel::Concept,
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_cypher())
    }
}

/// A directed relationship between two nodes, keyed by type and endpoint ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub edge_type: EdgeType,
    pub source_id: String,
    pub target_id: String,
}

impl Edge {
    pub fn new(edge_type: EdgeType, source_id: &str, target_id: &str) -> Self {
        Self {
            edge_type,
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
        }
    }

    pub fn authored(author_id: &str, work_id: &str) -> Self {
        Self::new(EdgeType::Authored, author_id, work_id)
    }

    pub fn affiliated_with(author_id: &str, institution_id: &str) -> Self {
        Self::new(EdgeType::AffiliatedWith, author_id, institution_id)
    }

    pub fn covers(work_id: &str, concept_id: &str) -> Self {
        Self::new(EdgeType::Covers, work_id, concept_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_endpoints_follow_schema() {
        assert_eq!(EdgeType::Authored.source_label(), NodeLabel::Author);
        assert_eq!(EdgeType::Authored.target_label(), NodeLabel::Work);
        assert_eq!(EdgeType::AffiliatedWith.target_label(), NodeLabel::Institution);
        assert_eq!(EdgeType::Covers.source_label(), NodeLabel::Work);
        assert_eq!(EdgeType::Covers.target_label(), NodeLabel::Concept);
    }

    #[test]
    fn test_edge_type_serde_matches_cypher() {
        for et in [EdgeType::Authored, EdgeType::AffiliatedWith, EdgeType::Covers] {
            let json = serde_json::to_string(&et).unwrap();
            assert_eq!(json, format!("\"{}\"", et.as_cypher()));
        }
    }

    #[test]
    fn test_node_accessors() {
        let node = Node::Author(Author {
            id: "A1".to_string(),
            name: "Alice".to_string(),
        });
        assert_eq!(node.id(), "A1");
        assert_eq!(node.label(), NodeLabel::Author);
        assert_eq!(node.name(), "Alice");
        assert_eq!(node.label().to_string(), "Author");
    }
}
