use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarInterval {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl CalendarInterval {
    pub fn as_str(self) -> &'static str {
        match self {
            CalendarInterval::Minute => "minute",
            CalendarInterval::Hour => "hour",
            CalendarInterval::Day => "day",
            CalendarInterval::Week => "week",
            CalendarInterval::Month => "month",
            CalendarInterval::Quarter => "quarter",
            CalendarInterval::Year => "year",
        }
    }
}

/// One bucket boundary of a range aggregation: `from` inclusive, `to`
/// exclusive, either end open.
#[derive(Debug, Clone, PartialEq)]
pub struct AggRange {
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub key: Option<String>,
}

impl AggRange {
    pub fn between(from: f64, to: f64) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            key: None,
        }
    }

    pub fn at_least(from: f64) -> Self {
        Self {
            from: Some(from),
            to: None,
            key: None,
        }
    }

    pub fn below(to: f64) -> Self {
        Self {
            from: None,
            to: Some(to),
            key: None,
        }
    }

    pub fn keyed(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Whether `value` falls in this range.
    pub fn contains(&self, value: f64) -> bool {
        self.from.map_or(true, |f| value >= f) && self.to.map_or(true, |t| value < t)
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        if let Some(from) = self.from {
            map.insert("from".to_string(), json!(from));
        }
        if let Some(to) = self.to {
            map.insert("to".to_string(), json!(to));
        }
        if let Some(key) = &self.key {
            map.insert("key".to_string(), json!(key));
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    /// One bucket per distinct value, largest buckets first.
    Terms { field: String, size: Option<u32> },
    DateHistogram {
        field: String,
        interval: CalendarInterval,
        format: Option<String>,
        min_doc_count: Option<u64>,
    },
    Range { field: String, ranges: Vec<AggRange> },
    Min { field: String },
    Max { field: String },
}

impl Aggregation {
    pub fn terms(field: impl Into<String>) -> Self {
        Aggregation::Terms {
            field: field.into(),
            size: None,
        }
    }

    pub fn terms_sized(field: impl Into<String>, size: u32) -> Self {
        Aggregation::Terms {
            field: field.into(),
            size: Some(size),
        }
    }

    pub fn date_histogram(field: impl Into<String>, interval: CalendarInterval) -> Self {
        Aggregation::DateHistogram {
            field: field.into(),
            interval,
            format: None,
            min_doc_count: None,
        }
    }

    /// Monthly histogram labelled `yyyy-MM`, keeping empty months.
    pub fn monthly(field: impl Into<String>) -> Self {
        Aggregation::DateHistogram {
            field: field.into(),
            interval: CalendarInterval::Month,
            format: Some("yyyy-MM".to_string()),
            min_doc_count: Some(0),
        }
    }

    pub fn range(field: impl Into<String>, ranges: Vec<AggRange>) -> Self {
        Aggregation::Range {
            field: field.into(),
            ranges,
        }
    }

    pub fn min(field: impl Into<String>) -> Self {
        Aggregation::Min {
            field: field.into(),
        }
    }

    pub fn max(field: impl Into<String>) -> Self {
        Aggregation::Max {
            field: field.into(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Aggregation::Terms { field, size } => {
                let mut body = Map::new();
                body.insert("field".to_string(), json!(field));
                if let Some(size) = size {
                    body.insert("size".to_string(), json!(size));
                }
                json!({"terms": body})
            }
            Aggregation::DateHistogram {
                field,
                interval,
                format,
                min_doc_count,
            } => {
                let mut body = Map::new();
                body.insert("field".to_string(), json!(field));
                body.insert("calendar_interval".to_string(), json!(interval.as_str()));
                if let Some(format) = format {
                    body.insert("format".to_string(), json!(format));
                }
                if let Some(n) = min_doc_count {
                    body.insert("min_doc_count".to_string(), json!(n));
                }
                json!({"date_histogram": body})
            }
            Aggregation::Range { field, ranges } => json!({
                "range": {
                    "field": field,
                    "ranges": ranges.iter().map(AggRange::to_json).collect::<Vec<_>>(),
                }
            }),
            Aggregation::Min { field } => json!({"min": {"field": field}}),
            Aggregation::Max { field } => json!({"max": {"field": field}}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_on_index_metadata() {
        let agg = Aggregation::terms_sized("_index", 2);
        assert_eq!(
            agg.to_json(),
            json!({"terms": {"field": "_index", "size": 2}})
        );
        assert_eq!(
            Aggregation::terms("hasFlag").to_json(),
            json!({"terms": {"field": "hasFlag"}})
        );
    }

    #[test]
    fn test_monthly_histogram() {
        assert_eq!(
            Aggregation::monthly("timestamp").to_json(),
            json!({"date_histogram": {
                "field": "timestamp",
                "calendar_interval": "month",
                "format": "yyyy-MM",
                "min_doc_count": 0
            }})
        );
    }

    #[test]
    fn test_range_with_open_upper_bound() {
        let agg = Aggregation::range(
            "seq",
            vec![
                AggRange::between(0.0, 200.0),
                AggRange::between(200.0, 600.0),
                AggRange::at_least(600.0),
            ],
        );
        let json = agg.to_json();
        let ranges = json["range"]["ranges"].as_array().unwrap();
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[0], json!({"from": 0.0, "to": 200.0}));
        assert_eq!(ranges[2], json!({"from": 600.0}));
    }

    #[test]
    fn test_range_contains_is_half_open() {
        let r = AggRange::between(200.0, 600.0);
        assert!(r.contains(200.0));
        assert!(r.contains(599.0));
        assert!(!r.contains(600.0));
        assert!(AggRange::below(10.0).contains(-5.0));
        assert!(AggRange::at_least(600.0).contains(1e9));
    }
}
