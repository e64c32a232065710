//! End-to-end runs: reset an index, fill it with a generated dataset, and
//! check that searches and aggregations see exactly that dataset.

pub mod plan;

pub use plan::{index_populations, Check, Expect, QueryPlan, RunReport};

use crate::client::SearchClient;
use crate::dataset::{DatasetGenerator, DatasetProfile};
use crate::document::Document;
use crate::error::{EsflowError, Result};
use crate::index::{Ensured, IndexDefinition, IndexLifecycle, ResetPolicy};
use crate::loader::{LoadMode, Loader};
use crate::query::{Aggregation, Query, SearchRequest};
use crate::verify;
use chrono::{DateTime, Datelike, SubsecRound, Utc};

/// Id of the document written by [`Workflow::basic_commands`].
pub const BASIC_DOCUMENT_ID: &str = "7839e7a9-ea50-465b-a346-beddd48be2c8";

/// The fixed payload of [`Workflow::basic_commands`].
pub fn basic_document(now: DateTime<Utc>) -> Document {
    Document {
        id: BASIC_DOCUMENT_ID.to_string(),
        seq: 0,
        full_name: "Kim Scott".to_string(),
        address: "1 Main Street, Springfield, IL 62701".to_string(),
        content: "Elasticsearch: cool. bonsai cool text to analyze and search.".to_string(),
        timestamp: now.trunc_subsecs(3),
        has_flag: Document::flag_for(0),
    }
}

#[derive(Clone)]
pub struct Workflow {
    client: SearchClient,
    lifecycle: IndexLifecycle,
    loader: Loader,
    index: String,
    generator: DatasetGenerator,
    mode: LoadMode,
    policy: ResetPolicy,
}

impl Workflow {
    /// Bulk-loading, index-recreating workflow using [`Document`]'s index
    /// definition.
    pub fn new(client: SearchClient, index: impl Into<String>, generator: DatasetGenerator) -> Self {
        Self {
            lifecycle: IndexLifecycle::new(client.clone())
                .with_definition(Document::index_definition()),
            loader: Loader::new(client.clone()),
            client,
            index: index.into(),
            generator,
            mode: LoadMode::default(),
            policy: ResetPolicy::default(),
        }
    }

    pub fn with_load_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_definition(mut self, definition: IndexDefinition) -> Self {
        self.lifecycle = self.lifecycle.with_definition(definition);
        self
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn client(&self) -> &SearchClient {
        &self.client
    }

    /// Get the index into a known state and return what it should contain.
    ///
    /// A freshly created index is populated and refreshed. An index kept by
    /// [`ResetPolicy::KeepExisting`] is not written to; its profile is read
    /// back from the cluster instead.
    pub async fn prepare(&self) -> Result<DatasetProfile> {
        let ensured = self.lifecycle.ensure(&self.index, self.policy).await?;
        if ensured == Ensured::AlreadyPresent {
            return DatasetProfile::from_index(&self.client, &self.index).await;
        }

        let dataset = self.generator.generate();
        let profile = dataset.profile().ok_or_else(|| {
            EsflowError::Config("dataset must contain at least one document".into())
        })?;

        let written = self
            .loader
            .load(&self.index, dataset.documents(), self.mode)
            .await?;
        let refreshed = self.client.refresh(&self.index).await?;
        verify::shards_ok(&refreshed.shards)?;

        tracing::info!(
            index = %self.index,
            documents = written,
            mode = ?self.mode,
            "dataset loaded"
        );
        Ok(profile)
    }

    /// Run the standard query plan against `profile`.
    pub async fn verify(&self, profile: &DatasetProfile) -> Result<RunReport> {
        let report = QueryPlan::standard(&self.index, profile)
            .run(&self.client)
            .await?;
        tracing::info!(index = %self.index, checks = report.len(), "verification passed");
        Ok(report)
    }

    pub async fn run(&self) -> Result<RunReport> {
        let profile = self.prepare().await?;
        self.verify(&profile).await
    }

    /// Single-document walk: clean index, index one fixed document, read it
    /// back, refresh, and expect exactly one match.
    pub async fn basic_commands(&self) -> Result<RunReport> {
        let mut report = RunReport::default();

        self.lifecycle.ensure_clean(&self.index).await?;
        report.pass("ensure_clean");

        let doc = basic_document(Utc::now());
        self.loader.index_one(&self.index, &doc.id, &doc).await?;
        report.pass("index_document");

        let fetched = self
            .client
            .get_document::<Document>(&self.index, &doc.id)
            .await?;
        verify::found(&fetched)?;
        if fetched.source.as_ref() != Some(&doc) {
            return Err(EsflowError::assertion(format!(
                "document {} read back differs from what was written",
                doc.id
            )));
        }
        report.pass("get_document");

        let refreshed = self.client.refresh(&self.index).await?;
        verify::shards_ok(&refreshed.shards)?;
        report.pass("refresh");

        let total = Check::new(
            "match_all_total",
            &self.index,
            SearchRequest::new()
                .query(Query::match_all())
                .size(0)
                .track_total_hits(true),
        )
        .expect(Expect::TotalHits(1));
        total.run(&self.client).await?;
        report.pass(total.name);

        tracing::info!(index = %self.index, "basic commands passed");
        Ok(report)
    }
}

impl DatasetProfile {
    /// Reconstruct a profile from an index that was loaded earlier.
    pub async fn from_index(client: &SearchClient, index: &str) -> Result<Self> {
        let total = client.count(index, None).await?;
        if total == 0 {
            return Err(EsflowError::assertion(format!(
                "kept index '{}' holds no documents",
                index
            )));
        }
        let flagged = client
            .count(index, Some(&Query::term("hasFlag", true)))
            .await?;

        let anchor_request = SearchRequest::new().query(Query::term("seq", 0)).size(1);
        let response = client
            .search::<Document>(&[index], &anchor_request)
            .await?;
        let anchor = response.sources().next().cloned().ok_or_else(|| {
            EsflowError::assertion(format!("kept index '{}' has no seq 0 document", index))
        })?;

        let bounds_request = SearchRequest::new()
            .aggregate("oldest", Aggregation::min("timestamp"))
            .aggregate("newest", Aggregation::max("timestamp"))
            .aggregations_only();
        let bounds = client.search::<Document>(&[index], &bounds_request).await?;
        let value = |name: &str| bounds.aggregations.get(name).and_then(|a| a.value);
        let month_span = match (value("oldest"), value("newest")) {
            (Some(oldest), Some(newest)) => months_between(oldest, newest),
            _ => None,
        };

        tracing::info!(index, total, flagged, ?month_span, "profile read from kept index");
        Ok(Self {
            total,
            flagged,
            anchor,
            month_span,
        })
    }
}

/// Months between two epoch-millisecond instants, inclusive.
pub(crate) fn months_between(oldest_ms: f64, newest_ms: f64) -> Option<u32> {
    let oldest = DateTime::<Utc>::from_timestamp_millis(oldest_ms as i64)?;
    let newest = DateTime::<Utc>::from_timestamp_millis(newest_ms as i64)?;
    let months = |t: DateTime<Utc>| t.year() as i64 * 12 + t.month0() as i64;
    u32::try_from(months(newest) - months(oldest) + 1).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_months_between() {
        // 2024-01-22 and 2026-10-17
        assert_eq!(months_between(1_705_881_600_000.0, 1_792_195_200_000.0), Some(34));
        assert_eq!(months_between(1_705_881_600_000.0, 1_705_881_600_000.0), Some(1));
        assert_eq!(months_between(1_792_195_200_000.0, 1_705_881_600_000.0), None);
    }

    #[test]
    fn test_basic_document_is_flagged_anchor() {
        let doc = basic_document(Utc::now());
        assert_eq!(doc.id, BASIC_DOCUMENT_ID);
        assert_eq!(doc.seq, 0);
        assert!(doc.has_flag);
        assert_eq!(doc.first_name(), "Kim");
    }
}
