use crate::index::IndexDefinition;
use crate::types::DocumentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A generated test record.
///
/// Field names serialize in camelCase (`fullName`, `hasFlag`) so queries
/// address them the same way regardless of how the document was loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub seq: u64,
    pub full_name: String,
    pub address: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub has_flag: bool,
}

impl Document {
    /// Whether a document at `seq` carries the flag.
    pub fn flag_for(seq: u64) -> bool {
        seq % 3 == 0
    }

    pub fn first_name(&self) -> &str {
        self.full_name
            .split_whitespace()
            .next()
            .unwrap_or(&self.full_name)
    }

    /// Index definition matching what dynamic mapping would infer for this
    /// shape, pinned to one shard so default ordering follows insertion.
    pub fn index_definition() -> IndexDefinition {
        let text_with_keyword = json!({
            "type": "text",
            "fields": {"keyword": {"type": "keyword", "ignore_above": 256}}
        });

        IndexDefinition {
            settings: Some(json!({"number_of_shards": 1, "number_of_replicas": 0})),
            mappings: Some(json!({
                "properties": {
                    "id": {"type": "keyword"},
                    "seq": {"type": "long"},
                    "fullName": text_with_keyword,
                    "address": text_with_keyword,
                    "content": {"type": "text"},
                    "timestamp": {"type": "date"},
                    "hasFlag": {"type": "boolean"}
                }
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Document {
        Document {
            id: "7839e7a9-ea50-465b-a346-beddd48be2c8".to_string(),
            seq: 3,
            full_name: "Kim Scott".to_string(),
            address: "12 Harbor Lane, Springfield".to_string(),
            content: "Elasticsearch: cool. bonsai cool text to analyze and search.".to_string(),
            timestamp: Utc.with_ymd_and_hms(2023, 5, 17, 8, 30, 0).unwrap(),
            has_flag: true,
        }
    }

    #[test]
    fn test_document_serializes_camel_case() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["fullName"], "Kim Scott");
        assert_eq!(value["hasFlag"], true);
        assert_eq!(value["seq"], 3);
        assert_eq!(value["timestamp"], "2023-05-17T08:30:00Z");
        assert!(value.get("full_name").is_none());
    }

    #[test]
    fn test_document_roundtrips_through_source() {
        let doc = sample();
        let back: Document = serde_json::from_value(serde_json::to_value(&doc).unwrap()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_flag_every_third_seq() {
        assert!(Document::flag_for(0));
        assert!(!Document::flag_for(1));
        assert!(!Document::flag_for(2));
        assert!(Document::flag_for(3));
    }

    #[test]
    fn test_first_name() {
        assert_eq!(sample().first_name(), "Kim");
    }

    #[test]
    fn test_index_definition_has_keyword_subfield() {
        let def = Document::index_definition();
        let mappings = def.mappings.unwrap();
        assert_eq!(
            mappings["properties"]["fullName"]["fields"]["keyword"]["type"],
            "keyword"
        );
        assert_eq!(mappings["properties"]["seq"]["type"], "long");
        assert_eq!(def.settings.unwrap()["number_of_shards"], 1);
    }
}
