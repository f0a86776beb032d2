//! Graph upsert engine: raw work records into de-duplicated graph fragments.
//!
//! A record is first planned into an ordered list of merges, then applied
//! to the store one merge at a time. Sub-entities without an identity key
//! are skipped; lists are truncated to the fan-out bounds in input order.

use serde::Deserialize;

use scholar_core::types::{DEFAULT_TITLE, UNKNOWN_NAME};
use scholar_core::{Author, Concept, Edge, EntityRecord, Institution, Node, Work, WorkRecord};
use scholar_graph::{GraphError, GraphStore};

/// Per-work caps on how many related sub-entities are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FanOutLimits {
    pub authorships: usize,
    pub institutions_per_authorship: usize,
    pub concepts: usize,
}

impl Default for FanOutLimits {
    fn default() -> Self {
        Self {
            authorships: 5,
            institutions_per_authorship: 2,
            concepts: 3,
        }
    }
}

/// A single merge against the graph store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Merge {
    Node(Node),
    Edge(Edge),
}

/// The normalized graph fragment of one work record, in merge order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkFragment {
    pub work_id: String,
    pub merges: Vec<Merge>,
}

impl WorkFragment {
    /// Plan the merges for a record. Returns `None` when the record has no id.
    pub fn from_record(record: &WorkRecord, limits: &FanOutLimits) -> Option<Self> {
        let work_id = record.key()?.to_string();
        let mut merges = vec![Merge::Node(Node::Work(Work {
            id: work_id.clone(),
            title: record
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            year: record.publication_year,
            citations: record.cited_by_count.unwrap_or(0),
        }))];

        for authorship in record.authorships.iter().take(limits.authorships) {
            let Some((author_id, name)) = authorship.author.as_ref().and_then(entity_parts) else {
                continue;
            };
            merges.push(Merge::Node(Node::Author(Author {
                id: author_id.clone(),
                name,
            })));
            merges.push(Merge::Edge(Edge::authored(&author_id, &work_id)));

            let institutions = authorship
                .institutions
                .iter()
                .take(limits.institutions_per_authorship)
                .filter_map(entity_parts);
            for (institution_id, name) in institutions {
                merges.push(Merge::Node(Node::Institution(Institution {
                    id: institution_id.clone(),
                    name,
                })));
                merges.push(Merge::Edge(Edge::affiliated_with(&author_id, &institution_id)));
            }
        }

        let concepts = record
            .concepts
            .iter()
            .take(limits.concepts)
            .filter_map(entity_parts);
        for (concept_id, name) in concepts {
            merges.push(Merge::Node(Node::Concept(Concept {
                id: concept_id.clone(),
                name,
            })));
            merges.push(Merge::Edge(Edge::covers(&work_id, &concept_id)));
        }

        Some(Self { work_id, merges })
    }

    pub fn node_count(&self) -> usize {
        self.merges
            .iter()
            .filter(|m| matches!(m, Merge::Node(_)))
            .count()
    }

    pub fn edge_count(&self) -> usize {
        self.merges.len() - self.node_count()
    }
}

/// Identity key and display name of a nested entity, if it has a key.
fn entity_parts(entity: &EntityRecord) -> Option<(String, String)> {
    let id = entity.key()?.to_string();
    let name = entity
        .display_name
        .clone()
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());
    Some((id, name))
}

/// Counters for one batch pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub works: usize,
    pub skipped: usize,
    pub node_merges: usize,
    pub edge_merges: usize,
}

/// Apply a planned fragment to the store, in order, stopping at the first failure.
pub async fn apply_fragment<S>(store: &S, fragment: &WorkFragment) -> Result<(), GraphError>
where
    S: GraphStore + ?Sized,
{
    for merge in &fragment.merges {
        match merge {
            Merge::Node(node) => store.merge_node(node).await?,
            Merge::Edge(edge) => store.merge_edge(edge).await?,
        }
    }
    Ok(())
}

/// Upsert one work record and its authors, institutions, and concepts.
///
/// Returns the applied fragment, or `None` when the record has no id and
/// nothing was written.
pub async fn upsert_work<S>(
    store: &S,
    record: &WorkRecord,
    limits: &FanOutLimits,
) -> Result<Option<WorkFragment>, GraphError>
where
    S: GraphStore + ?Sized,
{
    let Some(fragment) = WorkFragment::from_record(record, limits) else {
        tracing::warn!("Work record has no id, skipping");
        return Ok(None);
    };

    if let Err(e) = apply_fragment(store, &fragment).await {
        tracing::error!(work_id = %fragment.work_id, error = %e, "Upsert failed");
        return Err(e);
    }

    tracing::debug!(
        work_id = %fragment.work_id,
        nodes = fragment.node_count(),
        edges = fragment.edge_count(),
        "Work upserted"
    );
    Ok(Some(fragment))
}

/// Upsert every record in input order. The first store failure aborts the batch.
pub async fn upsert_all<S>(
    store: &S,
    records: &[WorkRecord],
    limits: &FanOutLimits,
) -> Result<IngestSummary, GraphError>
where
    S: GraphStore + ?Sized,
{
    let mut summary = IngestSummary::default();

    for (index, record) in records.iter().enumerate() {
        match upsert_work(store, record, limits).await {
            Ok(Some(fragment)) => {
                summary.works += 1;
                summary.node_merges += fragment.node_count();
                summary.edge_merges += fragment.edge_count();
            }
            Ok(None) => summary.skipped += 1,
            Err(e) => {
                tracing::error!(index, "Aborting batch");
                return Err(e);
            }
        }
    }

    tracing::info!(
        works = summary.works,
        skipped = summary.skipped,
        node_merges = summary.node_merges,
        edge_merges = summary.edge_merges,
        "Batch upsert complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(value: Value) -> WorkRecord {
        serde_json::from_value(value).unwrap()
    }

    fn plan(value: Value) -> WorkFragment {
        WorkFragment::from_record(&record(value), &FanOutLimits::default()).unwrap()
    }

    fn node_ids(fragment: &WorkFragment) -> Vec<String> {
        fragment
            .merges
            .iter()
            .filter_map(|m| match m {
                Merge::Node(n) => Some(format!("{}:{}", n.label(), n.id())),
                Merge::Edge(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_defaults_for_bare_record() {
        let fragment = plan(json!({"id": "W1"}));
        assert_eq!(
            fragment.merges,
            vec![Merge::Node(Node::Work(Work {
                id: "W1".to_string(),
                title: "No title".to_string(),
                year: None,
                citations: 0,
            }))]
        );
    }

    #[test]
    fn test_record_without_id_is_not_planned() {
        let rec = record(json!({"title": "Orphan", "authorships": [{"author": {"id": "A1"}}]}));
        assert!(WorkFragment::from_record(&rec, &FanOutLimits::default()).is_none());
    }

    #[test]
    fn test_merge_order_follows_record() {
        let fragment = plan(json!({
            "id": "W1",
            "authorships": [{
                "author": {"id": "A1", "display_name": "Alice"},
                "institutions": [{"id": "I1", "display_name": "MIT"}]
            }],
            "concepts": [{"id": "C1", "display_name": "AI"}]
        }));

        let expected = vec![
            Merge::Node(Node::Work(Work {
                id: "W1".to_string(),
                title: "No title".to_string(),
                year: None,
                citations: 0,
            })),
            Merge::Node(Node::Author(Author {
                id: "A1".to_string(),
                name: "Alice".to_string(),
            })),
            Merge::Edge(Edge::authored("A1", "W1")),
            Merge::Node(Node::Institution(Institution {
                id: "I1".to_string(),
                name: "MIT".to_string(),
            })),
            Merge::Edge(Edge::affiliated_with("A1", "I1")),
            Merge::Node(Node::Concept(Concept {
                id: "C1".to_string(),
                name: "AI".to_string(),
            })),
            Merge::Edge(Edge::covers("W1", "C1")),
        ];
        assert_eq!(fragment.merges, expected);
        assert_eq!(fragment.node_count(), 4);
        assert_eq!(fragment.edge_count(), 3);
    }

    #[test]
    fn test_fan_out_takes_first_n_in_input_order() {
        let authorships: Vec<Value> = (1..=8)
            .map(|i| json!({"author": {"id": format!("A{i}")}}))
            .collect();
        let concepts: Vec<Value> = (1..=6).map(|i| json!({"id": format!("C{i}")})).collect();
        let fragment = plan(json!({"id": "W1", "authorships": authorships, "concepts": concepts}));

        assert_eq!(
            node_ids(&fragment),
            vec![
                "Work:W1",
                "Author:A1",
                "Author:A2",
                "Author:A3",
                "Author:A4",
                "Author:A5",
                "Concept:C1",
                "Concept:C2",
                "Concept:C3",
            ]
        );
    }

    #[test]
    fn test_keyless_entries_count_toward_bound() {
        let fragment = plan(json!({
            "id": "W1",
            "authorships": [
                {"author": {"display_name": "No Id"}},
                {"author": null},
                {},
                {"author": {"id": ""}},
                {"author": {"id": "A5"}},
                {"author": {"id": "A6"}}
            ],
            "concepts": [{"display_name": "X"}, {"id": "C2"}, {"id": "C3"}, {"id": "C4"}]
        }));
        assert_eq!(
            node_ids(&fragment),
            vec!["Work:W1", "Author:A5", "Concept:C2", "Concept:C3"]
        );
    }

    #[test]
    fn test_institutions_bounded_and_scoped_to_keyed_author() {
        let fragment = plan(json!({
            "id": "W1",
            "authorships": [
                {
                    "author": {"display_name": "Anonymous"},
                    "institutions": [{"id": "I0"}]
                },
                {
                    "author": {"id": "A1"},
                    "institutions": [{"id": "I1"}, {"display_name": "No Id"}, {"id": "I3"}, {"id": "I4"}]
                }
            ]
        }));
        assert_eq!(node_ids(&fragment), vec!["Work:W1", "Author:A1", "Institution:I1"]);
        assert!(fragment
            .merges
            .contains(&Merge::Edge(Edge::affiliated_with("A1", "I1"))));
    }

    #[test]
    fn test_missing_names_default_to_unknown() {
        let fragment = plan(json!({
            "id": "W1",
            "authorships": [{"author": {"id": "A1"}, "institutions": [{"id": "I1"}]}],
            "concepts": [{"id": "C1", "display_name": null}]
        }));
        let names: Vec<&str> = fragment
            .merges
            .iter()
            .filter_map(|m| match m {
                Merge::Node(n @ (Node::Author(_) | Node::Institution(_) | Node::Concept(_))) => {
                    Some(n.name())
                }
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["Unknown", "Unknown", "Unknown"]);
    }

    #[test]
    fn test_custom_limits() {
        let limits = FanOutLimits {
            authorships: 1,
            institutions_per_authorship: 0,
            concepts: 0,
        };
        let rec = record(json!({
            "id": "W1",
            "authorships": [
                {"author": {"id": "A1"}, "institutions": [{"id": "I1"}]},
                {"author": {"id": "A2"}}
            ],
            "concepts": [{"id": "C1"}]
        }));
        let fragment = WorkFragment::from_record(&rec, &limits).unwrap();
        assert_eq!(node_ids(&fragment), vec!["Work:W1", "Author:A1"]);
    }
}
