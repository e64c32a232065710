//! Write generated documents into an index, one at a time or as one bulk
//! request. Loading never refreshes; callers refresh before asserting on
//! search results.

use crate::client::{BulkRequest, Refresh, SearchClient};
use crate::document::Document;
use crate::error::{EsflowError, Result};
use crate::types::{BulkResponse, WriteResult};
use crate::verify;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// One index call per document.
    Single,
    /// The whole batch in one `_bulk` call.
    #[default]
    Bulk,
}

/// Tally of a single-document load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub created: usize,
    pub updated: usize,
}

impl LoadReport {
    pub fn total(&self) -> usize {
        self.created + self.updated
    }

    fn record(&mut self, result: WriteResult) {
        match result {
            WriteResult::Created => self.created += 1,
            WriteResult::Updated => self.updated += 1,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    /// Position of the operation in the submitted batch.
    pub position: usize,
    pub id: Option<String>,
    pub status: u16,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSummary {
    pub succeeded: usize,
    pub failed: Vec<BulkFailure>,
}

impl BulkSummary {
    pub fn from_response(response: &BulkResponse) -> Self {
        let mut summary = BulkSummary::default();
        for (position, item) in response.results().enumerate() {
            if item.is_success() {
                summary.succeeded += 1;
                continue;
            }
            let reason = match &item.error {
                Some(cause) => match &cause.reason {
                    Some(reason) => format!("{}: {}", cause.error_type, reason),
                    None => cause.error_type.clone(),
                },
                None => format!("status {}", item.status),
            };
            summary.failed.push(BulkFailure {
                position,
                id: item.id.clone(),
                status: item.status,
                reason,
            });
        }
        summary
    }

    pub fn is_complete(&self, expected: usize) -> bool {
        self.failed.is_empty() && self.succeeded == expected
    }

    /// Every one of `expected` operations succeeded, or a
    /// [`EsflowError::BulkPartialFailure`] describing the shortfall.
    pub fn ensure_complete(&self, expected: usize) -> Result<()> {
        if self.is_complete(expected) {
            return Ok(());
        }
        let first_reason = match self.failed.first() {
            Some(f) => match &f.id {
                Some(id) => format!("document {}: {}", id, f.reason),
                None => f.reason.clone(),
            },
            None => "response reported fewer items than submitted".to_string(),
        };
        Err(EsflowError::BulkPartialFailure {
            expected,
            succeeded: self.succeeded,
            failed: self.failed.len(),
            first_reason,
        })
    }
}

#[derive(Clone)]
pub struct Loader {
    client: SearchClient,
}

impl Loader {
    pub fn new(client: SearchClient) -> Self {
        Self { client }
    }

    /// Index one payload under `id`; anything but `created`/`updated` fails.
    pub async fn index_one<T: Serialize>(
        &self,
        index: &str,
        id: &str,
        payload: &T,
    ) -> Result<WriteResult> {
        let response = self
            .client
            .index_document(index, id, payload, Refresh::False)
            .await?;
        verify::write_result(id, &response)
    }

    /// Index `documents` one request at a time, in order, stopping at the
    /// first failure.
    pub async fn load_single(&self, index: &str, documents: &[Document]) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        for doc in documents {
            let result = self.index_one(index, &doc.id, doc).await?;
            report.record(result);
        }
        tracing::info!(
            index,
            created = report.created,
            updated = report.updated,
            "single-document load finished"
        );
        Ok(report)
    }

    /// Submit `documents` as one bulk request and summarize the per-item
    /// outcomes without judging them.
    pub async fn submit_bulk(
        &self,
        index: &str,
        documents: &[Document],
        refresh: Refresh,
    ) -> Result<BulkSummary> {
        let request = BulkRequest::from_documents(index, documents)?;
        let response = self.client.bulk(&request, refresh).await?;
        let summary = BulkSummary::from_response(&response);
        if response.errors || !summary.failed.is_empty() {
            tracing::warn!(
                index,
                failed = summary.failed.len(),
                "bulk request reported item errors"
            );
        }
        Ok(summary)
    }

    /// Bulk-load `documents`, requiring every item to succeed.
    pub async fn load_bulk(&self, index: &str, documents: &[Document]) -> Result<BulkSummary> {
        let summary = self.submit_bulk(index, documents, Refresh::False).await?;
        summary.ensure_complete(documents.len())?;
        tracing::info!(index, succeeded = summary.succeeded, "bulk load finished");
        Ok(summary)
    }

    /// Load `documents` in `mode`, returning how many were written.
    pub async fn load(&self, index: &str, documents: &[Document], mode: LoadMode) -> Result<usize> {
        match mode {
            LoadMode::Single => Ok(self.load_single(index, documents).await?.total()),
            LoadMode::Bulk => Ok(self.load_bulk(index, documents).await?.succeeded),
        }
    }
}
