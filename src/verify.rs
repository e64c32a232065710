//! Predicates over cluster responses. Most return an
//! [`EsflowError::Assertion`] that states what was expected and what came
//! back; acknowledgement and write checks use their own variants.

use crate::document::Document;
use crate::error::{EsflowError, Result};
use crate::types::{
    Bucket, CreateIndexResponse, GetResponse, IndexResponse, SearchResponse, ShardStats,
    WriteResult,
};

/// Fails with [`EsflowError::Unacknowledged`] naming `operation` and `index`.
pub fn acknowledged(operation: &str, index: &str, acknowledged: bool) -> Result<()> {
    if acknowledged {
        Ok(())
    } else {
        Err(EsflowError::Unacknowledged {
            operation: operation.to_string(),
            index: index.to_string(),
        })
    }
}

pub fn index_created(response: &CreateIndexResponse, expected: &str) -> Result<()> {
    acknowledged("create", expected, response.acknowledged)?;
    if response.index != expected {
        return Err(EsflowError::assertion(format!(
            "created index is named '{}', expected '{}'",
            response.index, expected
        )));
    }
    Ok(())
}

/// `created` or `updated` for document `id`, anything else is
/// [`EsflowError::UnexpectedWriteResult`].
pub fn write_result(id: &str, response: &IndexResponse) -> Result<WriteResult> {
    let result = response.write_result();
    if result.is_success() {
        Ok(result)
    } else {
        Err(EsflowError::UnexpectedWriteResult {
            id: id.to_string(),
            result: response.result.clone(),
        })
    }
}

pub fn found<T>(response: &GetResponse<T>) -> Result<()> {
    if response.found && response.source.is_some() {
        Ok(())
    } else {
        Err(EsflowError::assertion(format!(
            "expected document {} in '{}' to be found",
            response.id, response.index
        )))
    }
}

pub fn shards_ok(shards: &ShardStats) -> Result<()> {
    if shards.failed == 0 && shards.successful > 0 {
        Ok(())
    } else {
        Err(EsflowError::assertion(format!(
            "expected all shards to succeed, got {}/{} with {} failed",
            shards.successful, shards.total, shards.failed
        )))
    }
}

pub fn total_hits<T>(response: &SearchResponse<T>, expected: u64) -> Result<()> {
    match response.total() {
        Some(total) if total == expected => Ok(()),
        Some(total) => Err(EsflowError::assertion(format!(
            "expected {} total hits, got {}",
            expected, total
        ))),
        None => Err(EsflowError::assertion(format!(
            "expected {} total hits, response carried no total",
            expected
        ))),
    }
}

pub fn hits_len<T>(response: &SearchResponse<T>, expected: usize) -> Result<()> {
    let got = response.hits.hits.len();
    if got == expected {
        Ok(())
    } else {
        Err(EsflowError::assertion(format!(
            "expected {} hits in page, got {}",
            expected, got
        )))
    }
}

pub fn first_seq(response: &SearchResponse<Document>, expected: u64) -> Result<()> {
    match response.sources().next() {
        Some(doc) if doc.seq == expected => Ok(()),
        Some(doc) => Err(EsflowError::assertion(format!(
            "expected first hit to have seq {}, got {}",
            expected, doc.seq
        ))),
        None => Err(EsflowError::assertion(format!(
            "expected first hit to have seq {}, got no hits",
            expected
        ))),
    }
}

pub fn some_hits<T>(response: &SearchResponse<T>) -> Result<()> {
    if response.hits.hits.is_empty() {
        Err(EsflowError::assertion(format!(
            "expected at least one hit, got none (total {:?})",
            response.total()
        )))
    } else {
        Ok(())
    }
}

/// Buckets of aggregation `name`, failing when it is missing or empty.
pub fn buckets<'a, T>(response: &'a SearchResponse<T>, name: &str) -> Result<&'a [Bucket]> {
    match response.buckets(name) {
        Some(buckets) if !buckets.is_empty() => Ok(buckets),
        Some(_) => Err(EsflowError::assertion(format!(
            "expected buckets in aggregation '{}', got none",
            name
        ))),
        None => Err(EsflowError::assertion(format!(
            "aggregation '{}' missing from response",
            name
        ))),
    }
}

pub fn bucket_count<T>(response: &SearchResponse<T>, name: &str, expected: usize) -> Result<()> {
    let got = buckets(response, name)?.len();
    if got == expected {
        Ok(())
    } else {
        Err(EsflowError::assertion(format!(
            "expected {} buckets in '{}', got {}",
            expected, name, got
        )))
    }
}

/// Bucket labels and counts, in order.
pub fn bucket_entries<T>(
    response: &SearchResponse<T>,
    name: &str,
    expected: &[(String, u64)],
) -> Result<()> {
    let got: Vec<(String, u64)> = buckets(response, name)?
        .iter()
        .map(|b| (b.label(), b.doc_count))
        .collect();
    if got == expected {
        Ok(())
    } else {
        Err(EsflowError::assertion(format!(
            "expected buckets {:?} in '{}', got {:?}",
            expected, name, got
        )))
    }
}

/// Bucket counts only, in order. Unlike [`buckets`], an empty list is
/// acceptable when nothing is expected.
pub fn bucket_counts<T>(response: &SearchResponse<T>, name: &str, expected: &[u64]) -> Result<()> {
    let got: Vec<u64> = response
        .buckets(name)
        .ok_or_else(|| {
            EsflowError::assertion(format!("aggregation '{}' missing from response", name))
        })?
        .iter()
        .map(|b| b.doc_count)
        .collect();
    if got == expected {
        Ok(())
    } else {
        Err(EsflowError::assertion(format!(
            "expected bucket counts {:?} in '{}', got {:?}",
            expected, name, got
        )))
    }
}
