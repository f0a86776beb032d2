//! Raw work records as delivered by the research-metadata API.
//!
//! Every field is optional and independently absent-tolerant. A field of the
//! wrong JSON type reads as absent. A malformed element of a list reads as an
//! empty element, so it keeps its position (and counts toward any fan-out
//! bound) but carries no identity key.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ScholarError;

/// One work as returned by the `/works` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub publication_year: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub cited_by_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub authorships: Vec<AuthorshipRecord>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub concepts: Vec<EntityRecord>,
}

/// Join structure linking a work to one author and that author's institutions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthorshipRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<EntityRecord>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub institutions: Vec<EntityRecord>,
}

/// Nested author, institution, or concept reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EntityRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: Option<String>,
}

impl WorkRecord {
    /// The identity key, if present and non-empty.
    pub fn key(&self) -> Option<&str> {
        non_empty(&self.id)
    }
}

impl EntityRecord {
    /// The identity key, if present and non-empty.
    pub fn key(&self) -> Option<&str> {
        non_empty(&self.id)
    }
}

fn non_empty(id: &Option<String>) -> Option<&str> {
    id.as_deref().filter(|s| !s.is_empty())
}

/// Envelope of a `/works` response page.
#[derive(Debug, Deserialize)]
struct WorksPage {
    #[serde(default, deserialize_with = "lenient_seq")]
    results: Vec<WorkRecord>,
}

/// Parse a works payload: either a `{"results": [...]}` response envelope or
/// a bare JSON array of work records.
pub fn parse_works(payload: &str) -> Result<Vec<WorkRecord>, ScholarError> {
    let value: Value = serde_json::from_str(payload)?;
    match value {
        Value::Object(_) => {
            let page: WorksPage = serde_json::from_value(value)?;
            Ok(page.results)
        }
        Value::Array(items) => Ok(items.into_iter().map(from_value_or_default).collect()),
        other => Err(ScholarError::Payload(format!(
            "expected an object or an array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Lenient deserializers ────────────────────────────────────────

fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_seq<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Option::<Value>::deserialize(de)? {
        Some(Value::Array(items)) => Ok(items.into_iter().map(from_value_or_default).collect()),
        _ => Ok(Vec::new()),
    }
}

fn from_value_or_default<T: DeserializeOwned + Default>(value: Value) -> T {
    serde_json::from_value(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> WorkRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_record() {
        let rec = record(json!({
            "id": "W1",
            "title": "Paper A",
            "publication_year": 2023,
            "cited_by_count": 10,
            "authorships": [{
                "author": {"id": "A1", "display_name": "Alice"},
                "institutions": [{"id": "I1", "display_name": "MIT"}]
            }],
            "concepts": [{"id": "C1", "display_name": "AI"}]
        }));

        assert_eq!(rec.key(), Some("W1"));
        assert_eq!(rec.title.as_deref(), Some("Paper A"));
        assert_eq!(rec.publication_year, Some(2023));
        assert_eq!(rec.cited_by_count, Some(10));
        assert_eq!(rec.authorships.len(), 1);
        let author = rec.authorships[0].author.as_ref().unwrap();
        assert_eq!(author.key(), Some("A1"));
        assert_eq!(rec.authorships[0].institutions[0].key(), Some("I1"));
        assert_eq!(rec.concepts[0].display_name.as_deref(), Some("AI"));
    }

    #[test]
    fn test_minimal_record() {
        let rec = record(json!({"id": "W1"}));
        assert_eq!(rec.key(), Some("W1"));
        assert!(rec.title.is_none());
        assert!(rec.publication_year.is_none());
        assert!(rec.cited_by_count.is_none());
        assert!(rec.authorships.is_empty());
        assert!(rec.concepts.is_empty());
    }

    #[test]
    fn test_null_and_mistyped_fields_read_as_absent() {
        let rec = record(json!({
            "id": "W1",
            "title": null,
            "publication_year": "2023",
            "cited_by_count": {"total": 3},
            "authorships": null,
            "concepts": "none"
        }));
        assert!(rec.title.is_none());
        assert!(rec.publication_year.is_none());
        assert!(rec.cited_by_count.is_none());
        assert!(rec.authorships.is_empty());
        assert!(rec.concepts.is_empty());
    }

    #[test]
    fn test_malformed_list_elements_keep_their_position() {
        let rec = record(json!({
            "id": "W1",
            "authorships": [null, 42, {"author": {"id": "A1"}}],
            "concepts": [[], {"id": "C1"}]
        }));
        assert_eq!(rec.authorships.len(), 3);
        assert!(rec.authorships[0].author.is_none());
        assert!(rec.authorships[1].author.is_none());
        assert_eq!(
            rec.authorships[2].author.as_ref().and_then(|a| a.key()),
            Some("A1")
        );
        assert_eq!(rec.concepts.len(), 2);
        assert!(rec.concepts[0].key().is_none());
    }

    #[test]
    fn test_empty_id_is_missing() {
        let rec = record(json!({"id": "", "concepts": [{"id": "", "display_name": "X"}]}));
        assert!(rec.key().is_none());
        assert!(rec.concepts[0].key().is_none());
    }

    #[test]
    fn test_parse_works_envelope() {
        let payload = r#"{"meta": {"count": 2}, "results": [{"id": "W1"}, {"id": "W2"}]}"#;
        let works = parse_works(payload).unwrap();
        assert_eq!(works.len(), 2);
        assert_eq!(works[1].key(), Some("W2"));
    }

    #[test]
    fn test_parse_works_bare_array() {
        let works = parse_works(r#"[{"id": "W1"}, "garbage"]"#).unwrap();
        assert_eq!(works.len(), 2);
        assert!(works[1].key().is_none());
    }

    #[test]
    fn test_parse_works_envelope_without_results() {
        let works = parse_works(r#"{"error": "rate limited"}"#).unwrap();
        assert!(works.is_empty());
    }

    #[test]
    fn test_parse_works_rejects_scalars() {
        assert!(matches!(parse_works("42"), Err(ScholarError::Payload(_))));
        assert!(matches!(
            parse_works("not json"),
            Err(ScholarError::Serialization(_))
        ));
    }
}
