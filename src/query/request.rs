use super::{Aggregation, Query};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sort {
    ByField { field: String, order: SortOrder },
    ByRelevance,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Sort::ByField {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Sort::ByField {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Sort::ByField { field, order } => {
                let order = match order {
                    SortOrder::Asc => "asc",
                    SortOrder::Desc => "desc",
                };
                json!({field.as_str(): {"order": order}})
            }
            Sort::ByRelevance => json!("_score"),
        }
    }
}

/// Body of a `_search` call. Aggregations keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub query: Option<Query>,
    pub aggs: IndexMap<String, Aggregation>,
    pub size: Option<u64>,
    pub from: Option<u64>,
    pub sort: Vec<Sort>,
    /// `Some(true)` asks for an exact total instead of the default 10k cap.
    pub track_total_hits: Option<bool>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    pub fn aggregate(mut self, name: impl Into<String>, agg: Aggregation) -> Self {
        self.aggs.insert(name.into(), agg);
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Number of hits to skip before the returned page.
    pub fn offset(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn track_total_hits(mut self, exact: bool) -> Self {
        self.track_total_hits = Some(exact);
        self
    }

    /// Aggregation-only search: no hits returned.
    pub fn aggregations_only(self) -> Self {
        self.size(0)
    }

    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        if let Some(query) = &self.query {
            body.insert("query".to_string(), query.to_json());
        }
        if !self.aggs.is_empty() {
            let aggs: Map<String, Value> = self
                .aggs
                .iter()
                .map(|(name, agg)| (name.clone(), agg.to_json()))
                .collect();
            body.insert("aggs".to_string(), Value::Object(aggs));
        }
        if let Some(size) = self.size {
            body.insert("size".to_string(), json!(size));
        }
        if let Some(from) = self.from {
            body.insert("from".to_string(), json!(from));
        }
        if !self.sort.is_empty() {
            body.insert(
                "sort".to_string(),
                Value::Array(self.sort.iter().map(Sort::to_json).collect()),
            );
        }
        if let Some(exact) = self.track_total_hits {
            body.insert("track_total_hits".to_string(), json!(exact));
        }
        Value::Object(body)
    }
}
