//! Typed builders for the cluster's query DSL.
//!
//! These types only serialize requests; matching, scoring and aggregation
//! all happen on the cluster.

pub mod aggregation;
pub mod request;

pub use aggregation::{AggRange, Aggregation, CalendarInterval};
pub use request::{SearchRequest, Sort, SortOrder};

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fuzziness {
    /// Edit distance chosen from the term length by the cluster.
    Auto,
    Edits(u8),
}

impl Fuzziness {
    fn to_json(self) -> Value {
        match self {
            Fuzziness::Auto => json!("AUTO"),
            Fuzziness::Edits(n) => json!(n),
        }
    }
}

/// Inclusive/exclusive bounds for a `range` query. Values stay JSON so the
/// same type serves numeric and date fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeBounds {
    pub gt: Option<Value>,
    pub gte: Option<Value>,
    pub lt: Option<Value>,
    pub lte: Option<Value>,
    /// Date format of the bound values, e.g. `yyyy-MM-dd`.
    pub format: Option<String>,
}

impl RangeBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gt(mut self, v: impl Into<Value>) -> Self {
        self.gt = Some(v.into());
        self
    }

    pub fn gte(mut self, v: impl Into<Value>) -> Self {
        self.gte = Some(v.into());
        self
    }

    pub fn lt(mut self, v: impl Into<Value>) -> Self {
        self.lt = Some(v.into());
        self
    }

    pub fn lte(mut self, v: impl Into<Value>) -> Self {
        self.lte = Some(v.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        let bounds = [
            ("gt", &self.gt),
            ("gte", &self.gte),
            ("lt", &self.lt),
            ("lte", &self.lte),
        ];
        for (name, bound) in bounds {
            if let Some(v) = bound {
                map.insert(name.to_string(), v.clone());
            }
        }
        if let Some(format) = &self.format {
            map.insert("format".to_string(), Value::String(format.clone()));
        }
        Value::Object(map)
    }
}

/// `bool` compound query.
///
/// `must` clauses are all required; `should` clauses only boost relevance,
/// except that with no `must`/`filter` clause at least one of them has to
/// match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub must: Vec<Query>,
    pub should: Vec<Query>,
    pub filter: Vec<Query>,
    pub must_not: Vec<Query>,
    pub minimum_should_match: Option<u32>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, q: Query) -> Self {
        self.must.push(q);
        self
    }

    pub fn should(mut self, q: Query) -> Self {
        self.should.push(q);
        self
    }

    pub fn filter(mut self, q: Query) -> Self {
        self.filter.push(q);
        self
    }

    pub fn must_not(mut self, q: Query) -> Self {
        self.must_not.push(q);
        self
    }

    pub fn minimum_should_match(mut self, n: u32) -> Self {
        self.minimum_should_match = Some(n);
        self
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        let clauses = [
            ("must", &self.must),
            ("should", &self.should),
            ("filter", &self.filter),
            ("must_not", &self.must_not),
        ];
        for (name, queries) in clauses {
            if !queries.is_empty() {
                map.insert(
                    name.to_string(),
                    Value::Array(queries.iter().map(Query::to_json).collect()),
                );
            }
        }
        if let Some(n) = self.minimum_should_match {
            map.insert("minimum_should_match".to_string(), json!(n));
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    MatchAll,
    /// Full-text match; the text is analyzed like the field.
    Match { field: String, text: String },
    /// Exact, unanalyzed value (use the `.keyword` sub-field for text).
    Term { field: String, value: Value },
    Range { field: String, bounds: RangeBounds },
    Prefix { field: String, prefix: String },
    /// Term match tolerating edits (typos).
    Fuzzy {
        field: String,
        value: String,
        fuzziness: Fuzziness,
    },
    Bool(BoolQuery),
}

impl Query {
    pub fn match_all() -> Self {
        Query::MatchAll
    }

    pub fn text(field: impl Into<String>, text: impl Into<String>) -> Self {
        Query::Match {
            field: field.into(),
            text: text.into(),
        }
    }

    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn range(field: impl Into<String>, bounds: RangeBounds) -> Self {
        Query::Range {
            field: field.into(),
            bounds,
        }
    }

    pub fn prefix(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Query::Prefix {
            field: field.into(),
            prefix: prefix.into(),
        }
    }

    pub fn fuzzy(field: impl Into<String>, value: impl Into<String>) -> Self {
        Query::Fuzzy {
            field: field.into(),
            value: value.into(),
            fuzziness: Fuzziness::Auto,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Query::MatchAll => json!({"match_all": {}}),
            Query::Match { field, text } => json!({"match": {field.as_str(): text}}),
            Query::Term { field, value } => json!({"term": {field.as_str(): value}}),
            Query::Range { field, bounds } => {
                json!({"range": {field.as_str(): bounds.to_json()}})
            }
            Query::Prefix { field, prefix } => json!({"prefix": {field.as_str(): prefix}}),
            Query::Fuzzy {
                field,
                value,
                fuzziness,
            } => json!({
                "fuzzy": {field.as_str(): {"value": value, "fuzziness": fuzziness.to_json()}}
            }),
            Query::Bool(b) => json!({"bool": b.to_json()}),
        }
    }
}

impl From<BoolQuery> for Query {
    fn from(b: BoolQuery) -> Self {
        Query::Bool(b)
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_queries() {
        assert_eq!(Query::match_all().to_json(), json!({"match_all": {}}));
        assert_eq!(
            Query::text("content", "Magazine").to_json(),
            json!({"match": {"content": "Magazine"}})
        );
        assert_eq!(
            Query::term("fullName.keyword", "Thomas Johnson").to_json(),
            json!({"term": {"fullName.keyword": "Thomas Johnson"}})
        );
        assert_eq!(
            Query::prefix("fullName.keyword", "Thomas").to_json(),
            json!({"prefix": {"fullName.keyword": "Thomas"}})
        );
        assert_eq!(
            Query::fuzzy("content", "magazin").to_json(),
            json!({"fuzzy": {"content": {"value": "magazin", "fuzziness": "AUTO"}}})
        );
    }

    #[test]
    fn test_date_range_carries_format() {
        let q = Query::range(
            "timestamp",
            RangeBounds::new()
                .format("yyyy-MM-dd")
                .gte("2022-01-01")
                .lte("2022-12-31"),
        );
        assert_eq!(
            q.to_json(),
            json!({"range": {"timestamp": {
                "gte": "2022-01-01", "lte": "2022-12-31", "format": "yyyy-MM-dd"
            }}})
        );
    }

    #[test]
    fn test_bool_omits_empty_clauses() {
        let q: Query = BoolQuery::new()
            .must(Query::term("fullName.keyword", "Brian Schinner"))
            .must(Query::range("seq", RangeBounds::new().gte(0).lte(500)))
            .into();
        let json = q.to_json();
        assert_eq!(json["bool"]["must"].as_array().unwrap().len(), 2);
        assert_eq!(json["bool"]["must"][1]["range"]["seq"]["lte"], 500);
        assert!(json["bool"].get("should").is_none());
        assert!(json["bool"].get("minimum_should_match").is_none());
    }

    #[test]
    fn test_should_with_minimum_match() {
        let q = Query::Bool(
            BoolQuery::new()
                .should(Query::text("fullName", "Thomas"))
                .should(Query::range("seq", RangeBounds::new().gte(0).lte(30)))
                .minimum_should_match(1),
        );
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["bool"]["should"][0]["match"]["fullName"], "Thomas");
        assert_eq!(json["bool"]["minimum_should_match"], 1);
    }

    #[test]
    fn test_fixed_fuzziness() {
        let q = Query::Fuzzy {
            field: "content".into(),
            value: "magzine".into(),
            fuzziness: Fuzziness::Edits(2),
        };
        assert_eq!(q.to_json()["fuzzy"]["content"]["fuzziness"], 2);
    }
}
