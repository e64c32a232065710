use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Index identifier, a plain string like `"test_index_2"`.
pub type IndexName = String;
/// The `_id` the service stores a document under.
pub type DocumentId = String;

/// Response to administrative calls that only acknowledge (delete index).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcknowledgedResponse {
    pub acknowledged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIndexResponse {
    pub acknowledged: bool,
    #[serde(default)]
    pub shards_acknowledged: bool,
    pub index: IndexName,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardStats {
    pub total: u32,
    pub successful: u32,
    #[serde(default)]
    pub failed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    #[serde(rename = "_shards")]
    pub shards: ShardStats,
}

/// Outcome of a single-document write as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    Created,
    Updated,
    Noop,
    Other,
}

impl WriteResult {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "created" => WriteResult::Created,
            "updated" => WriteResult::Updated,
            "noop" => WriteResult::Noop,
            _ => WriteResult::Other,
        }
    }

    /// Only `created` and `updated` count as a successful index call.
    pub fn is_success(self) -> bool {
        matches!(self, WriteResult::Created | WriteResult::Updated)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    #[serde(rename = "_index")]
    pub index: IndexName,
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(rename = "_version", default)]
    pub version: u64,
    pub result: String,
    #[serde(rename = "_shards", default)]
    pub shards: Option<ShardStats>,
}

impl IndexResponse {
    pub fn write_result(&self) -> WriteResult {
        WriteResult::parse(&self.result)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse<T> {
    #[serde(rename = "_index")]
    pub index: IndexName,
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub found: bool,
    #[serde(rename = "_version", default)]
    pub version: Option<u64>,
    #[serde(rename = "_source", default = "Option::default")]
    pub source: Option<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalHitsRelation {
    Eq,
    Gte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalHits {
    pub value: u64,
    pub relation: TotalHitsRelation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hit<T> {
    #[serde(rename = "_index")]
    pub index: IndexName,
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default = "Option::default")]
    pub source: Option<T>,
    #[serde(default)]
    pub sort: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitsMetadata<T> {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default = "Vec::new")]
    pub hits: Vec<Hit<T>>,
}

/// One bucket of a terms, date histogram or range aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(default)]
    pub key: Value,
    #[serde(default)]
    pub key_as_string: Option<String>,
    pub doc_count: u64,
    #[serde(default)]
    pub from: Option<f64>,
    #[serde(default)]
    pub to: Option<f64>,
}

impl Bucket {
    /// Human-readable key: `key_as_string` when present (booleans, dates),
    /// otherwise the raw key.
    pub fn label(&self) -> String {
        if let Some(s) = &self.key_as_string {
            return s.clone();
        }
        match &self.key {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Result of one named aggregation. Bucket aggregations fill `buckets`,
/// metric aggregations (min/max) fill `value`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationResult {
    #[serde(default)]
    pub buckets: Vec<Bucket>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub value_as_string: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub timed_out: bool,
    pub hits: HitsMetadata<T>,
    #[serde(default)]
    pub aggregations: IndexMap<String, AggregationResult>,
}

impl<T> SearchResponse<T> {
    pub fn total(&self) -> Option<u64> {
        self.hits.total.map(|t| t.value)
    }

    pub fn sources(&self) -> impl Iterator<Item = &T> {
        self.hits.hits.iter().filter_map(|h| h.source.as_ref())
    }

    pub fn buckets(&self, name: &str) -> Option<&[Bucket]> {
        self.aggregations.get(name).map(|a| a.buckets.as_slice())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterInfo {
    #[serde(default)]
    pub name: String,
    pub cluster_name: String,
    pub version: VersionInfo,
}

/// Error object carried in non-2xx bodies and in failed bulk items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorCause {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkItemResult {
    #[serde(rename = "_index", default)]
    pub index: IndexName,
    #[serde(rename = "_id", default)]
    pub id: Option<DocumentId>,
    pub status: u16,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<ErrorCause>,
}

impl BulkItemResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub took: u64,
    pub errors: bool,
    /// Each item is keyed by its action (`index`, `create`, ...).
    pub items: Vec<IndexMap<String, BulkItemResult>>,
}

impl BulkResponse {
    pub fn results(&self) -> impl Iterator<Item = &BulkItemResult> {
        self.items.iter().filter_map(|item| item.values().next())
    }
}
