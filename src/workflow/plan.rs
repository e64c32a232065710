use crate::client::SearchClient;
use crate::dataset::DatasetProfile;
use crate::document::Document;
use crate::error::{EsflowError, Result};
use crate::query::{AggRange, Aggregation, BoolQuery, Query, RangeBounds, SearchRequest, Sort};
use crate::types::SearchResponse;
use crate::verify;
use chrono::Duration;

const PAGE_SIZE: u64 = 20;
const DATE_FORMAT: &str = "yyyy-MM-dd";

/// What a check's response must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum Expect {
    TotalHits(u64),
    HitsLen(usize),
    FirstSeq(u64),
    SomeHits,
    NonEmptyBuckets(String),
    BucketCount(String, usize),
    /// Labels and counts, in response order.
    BucketEntries(String, Vec<(String, u64)>),
    BucketCounts(String, Vec<u64>),
}

impl Expect {
    fn check(&self, response: &SearchResponse<Document>) -> Result<()> {
        match self {
            Expect::TotalHits(n) => verify::total_hits(response, *n),
            Expect::HitsLen(n) => verify::hits_len(response, *n),
            Expect::FirstSeq(seq) => verify::first_seq(response, *seq),
            Expect::SomeHits => verify::some_hits(response),
            Expect::NonEmptyBuckets(name) => verify::buckets(response, name).map(|_| ()),
            Expect::BucketCount(name, n) => verify::bucket_count(response, name, *n),
            Expect::BucketEntries(name, entries) => {
                verify::bucket_entries(response, name, entries)
            }
            Expect::BucketCounts(name, counts) => verify::bucket_counts(response, name, counts),
        }
    }
}

/// One search and the expectations on its response.
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub name: String,
    pub indices: Vec<String>,
    pub request: SearchRequest,
    pub expect: Vec<Expect>,
}

impl Check {
    pub fn new(name: impl Into<String>, index: &str, request: SearchRequest) -> Self {
        Self {
            name: name.into(),
            indices: vec![index.to_string()],
            request,
            expect: Vec::new(),
        }
    }

    pub fn expect(mut self, expect: Expect) -> Self {
        self.expect.push(expect);
        self
    }

    /// Run the search and evaluate every expectation in order.
    pub async fn run(&self, client: &SearchClient) -> Result<()> {
        let indices: Vec<&str> = self.indices.iter().map(String::as_str).collect();
        let response = client.search::<Document>(&indices, &self.request).await?;
        for expect in &self.expect {
            expect.check(&response).map_err(|e| match e {
                EsflowError::Assertion(msg) => {
                    EsflowError::Assertion(format!("check '{}': {}", self.name, msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

/// Names of the checks that passed, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub passed: Vec<String>,
}

impl RunReport {
    pub fn len(&self) -> usize {
        self.passed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passed.is_empty()
    }

    pub(crate) fn pass(&mut self, name: impl Into<String>) {
        self.passed.push(name.into());
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPlan {
    checks: Vec<Check>,
}

impl QueryPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Searches covering paging, full-text, term-level and aggregation
    /// behavior of `index`, with expectations derived from `profile`.
    pub fn standard(index: &str, profile: &DatasetProfile) -> Self {
        let total = profile.total;
        let anchor = &profile.anchor;
        let word = probe_word(&anchor.content);
        let first_name = anchor.first_name().to_string();
        let day = anchor.timestamp.date_naive();

        let mut plan = Self::new().push(
            Check::new(
                "match_all_total",
                index,
                SearchRequest::new()
                    .query(Query::match_all())
                    .size(0)
                    .track_total_hits(true),
            )
            .expect(Expect::TotalHits(total)),
        );

        let mut first_page = Check::new("first_page", index, page(0))
            .expect(Expect::TotalHits(total))
            .expect(Expect::HitsLen(total.min(PAGE_SIZE) as usize));
        if total > 0 {
            first_page = first_page.expect(Expect::FirstSeq(0));
        }
        plan = plan.push(first_page);

        if total > PAGE_SIZE {
            plan = plan.push(
                Check::new("second_page", index, page(PAGE_SIZE))
                    .expect(Expect::HitsLen((total - PAGE_SIZE).min(PAGE_SIZE) as usize))
                    .expect(Expect::FirstSeq(PAGE_SIZE)),
            );
        }

        let searches = [
            ("match_content", Query::text("content", word.clone())),
            (
                "bool_must",
                BoolQuery::new()
                    .must(Query::term("fullName.keyword", anchor.full_name.clone()))
                    .must(Query::range("seq", RangeBounds::new().gte(0).lte(500)))
                    .into(),
            ),
            (
                "bool_should_seq",
                BoolQuery::new()
                    .should(Query::text("fullName", first_name.clone()))
                    .should(Query::range("seq", RangeBounds::new().gte(0).lte(30)))
                    .minimum_should_match(1)
                    .into(),
            ),
            (
                "bool_should_date",
                BoolQuery::new()
                    .should(Query::text("fullName", first_name.clone()))
                    .should(Query::range(
                        "timestamp",
                        RangeBounds::new()
                            .format(DATE_FORMAT)
                            .gte(day.format("%Y-%m-%d").to_string())
                            .lt((day + Duration::days(1)).format("%Y-%m-%d").to_string()),
                    ))
                    .minimum_should_match(1)
                    .into(),
            ),
            (
                "prefix_name",
                Query::prefix("fullName.keyword", first_name.clone()),
            ),
            ("fuzzy_content", Query::fuzzy("content", typo_of(&word))),
        ];
        for (name, query) in searches {
            plan = plan.push(
                Check::new(name, index, SearchRequest::new().query(query)).expect(Expect::SomeHits),
            );
        }

        let flags = ranked_entries(vec![
            ("false".to_string(), profile.unflagged()),
            ("true".to_string(), profile.flagged),
        ]);
        plan = plan.push(
            Check::new(
                "flag_terms",
                index,
                SearchRequest::new()
                    .aggregate("group_by_flag", Aggregation::terms("hasFlag"))
                    .aggregations_only(),
            )
            .expect(Expect::BucketEntries("group_by_flag".into(), flags)),
        );

        let months = Check::new(
            "monthly_histogram",
            index,
            SearchRequest::new()
                .aggregate("group_by_month", Aggregation::monthly("timestamp"))
                .aggregations_only(),
        );
        plan = plan.push(match profile.month_span {
            Some(n) => months.expect(Expect::BucketCount("group_by_month".into(), n as usize)),
            None => months.expect(Expect::NonEmptyBuckets("group_by_month".into())),
        });

        let ranges = seq_ranges();
        let expected: Vec<u64> = ranges.iter().map(|r| profile.seq_range_count(r)).collect();
        plan.push(
            Check::new(
                "seq_ranges",
                index,
                SearchRequest::new()
                    .aggregate("seq_ranges", Aggregation::range("seq", ranges))
                    .aggregations_only(),
            )
            .expect(Expect::BucketCounts("seq_ranges".into(), expected)),
        )
    }

    /// Run every check in order, stopping at the first failure.
    pub async fn run(&self, client: &SearchClient) -> Result<RunReport> {
        let mut report = RunReport::default();
        for check in &self.checks {
            if let Err(e) = check.run(client).await {
                tracing::warn!(check = %check.name, error = %e, "check failed");
                return Err(e);
            }
            tracing::debug!(check = %check.name, "check passed");
            report.pass(check.name.clone());
        }
        Ok(report)
    }
}

/// Terms aggregation on `_index` across `populations`: one bucket per
/// non-empty index, largest first, with exact counts.
pub fn index_populations(populations: &[(&str, u64)]) -> Check {
    let indices: Vec<String> = populations.iter().map(|(i, _)| i.to_string()).collect();
    let expected = ranked_entries(
        populations
            .iter()
            .map(|(index, n)| (index.to_string(), *n))
            .collect(),
    );
    let request = SearchRequest::new()
        .aggregate(
            "indexes",
            Aggregation::terms_sized("_index", populations.len().max(1) as u32),
        )
        .aggregations_only();
    Check {
        name: "index_populations".into(),
        indices,
        request,
        expect: vec![Expect::BucketEntries("indexes".into(), expected)],
    }
}

/// Terms buckets as the cluster orders them: count descending, then key
/// ascending. Empty buckets are never returned.
fn ranked_entries(mut entries: Vec<(String, u64)>) -> Vec<(String, u64)> {
    entries.retain(|(_, n)| *n > 0);
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

fn page(from: u64) -> SearchRequest {
    SearchRequest::new()
        .query(Query::match_all())
        .size(PAGE_SIZE)
        .offset(from)
        .sort(Sort::asc("seq"))
        .track_total_hits(true)
}

fn seq_ranges() -> Vec<AggRange> {
    vec![
        AggRange::between(0.0, 200.0),
        AggRange::between(200.0, 600.0),
        AggRange::at_least(600.0),
    ]
}

/// First word of at least four letters, lowercased; falls back to the
/// whole trimmed text.
fn probe_word(content: &str) -> String {
    content
        .split(|c: char| !c.is_alphanumeric())
        .find(|w| w.chars().count() >= 4)
        .unwrap_or(content.trim())
        .to_lowercase()
}

/// `word` minus its last character: one edit away.
fn typo_of(word: &str) -> String {
    let mut chars: Vec<char> = word.chars().collect();
    if chars.len() > 1 {
        chars.pop();
    }
    chars.into_iter().collect()
}
