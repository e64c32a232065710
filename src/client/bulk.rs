use super::{read_json, Refresh, RequestBody, SearchClient};
use crate::document::Document;
use crate::error::Result;
use crate::types::BulkResponse;
use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    /// Create or overwrite.
    Index,
    /// Fail the item if the id already exists.
    Create,
}

impl BulkAction {
    fn as_str(self) -> &'static str {
        match self {
            BulkAction::Index => "index",
            BulkAction::Create => "create",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BulkOperation {
    pub action: BulkAction,
    pub index: String,
    pub id: Option<String>,
    pub source: Value,
}

impl BulkOperation {
    fn action_line(&self) -> Value {
        let mut meta = Map::new();
        meta.insert("_index".to_string(), Value::String(self.index.clone()));
        if let Some(id) = &self.id {
            meta.insert("_id".to_string(), Value::String(id.clone()));
        }
        let mut line = Map::new();
        line.insert(self.action.as_str().to_string(), Value::Object(meta));
        Value::Object(line)
    }
}

/// An ordered batch of writes submitted as one `_bulk` request.
#[derive(Debug, Clone, Default)]
pub struct BulkRequest {
    operations: Vec<BulkOperation>,
}

impl BulkRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// One `index` operation per document, keyed by the document's own id.
    pub fn from_documents(index: &str, documents: &[Document]) -> Result<Self> {
        let mut request = Self::new();
        for doc in documents {
            request.push(BulkAction::Index, index, Some(doc.id.as_str()), doc)?;
        }
        Ok(request)
    }

    pub fn push<T: Serialize>(
        &mut self,
        action: BulkAction,
        index: &str,
        id: Option<&str>,
        source: &T,
    ) -> Result<&mut Self> {
        self.operations.push(BulkOperation {
            action,
            index: index.to_string(),
            id: id.map(str::to_string),
            source: serde_json::to_value(source)?,
        });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn operations(&self) -> &[BulkOperation] {
        &self.operations
    }

    /// NDJSON body: action line then source line per operation, and a
    /// trailing newline after the last line.
    pub fn to_ndjson(&self) -> Result<String> {
        let mut body = String::new();
        for op in &self.operations {
            body.push_str(&serde_json::to_string(&op.action_line())?);
            body.push('\n');
            body.push_str(&serde_json::to_string(&op.source)?);
            body.push('\n');
        }
        Ok(body)
    }
}

impl SearchClient {
    /// Submit `request` as a single `_bulk` call. An empty request is
    /// answered locally without contacting the cluster.
    pub async fn bulk(&self, request: &BulkRequest, refresh: Refresh) -> Result<BulkResponse> {
        if request.is_empty() {
            return Ok(BulkResponse {
                took: 0,
                errors: false,
                items: Vec::new(),
            });
        }

        let mut query = Vec::new();
        if let Some(param) = refresh.as_param() {
            query.push(("refresh", param.to_string()));
        }

        let body = request.to_ndjson()?;
        tracing::debug!(
            operations = request.len(),
            bytes = body.len(),
            "submitting bulk request"
        );
        let response = self
            .execute(Method::POST, &["_bulk"], &query, RequestBody::Ndjson(body))
            .await?;
        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ndjson_two_lines_per_operation_with_trailing_newline() {
        let mut request = BulkRequest::new();
        request
            .push(
                BulkAction::Index,
                "test_index_2",
                Some("doc-1"),
                &json!({"seq": 0}),
            )
            .unwrap();
        request
            .push(BulkAction::Create, "test_index_2", None, &json!({"seq": 1}))
            .unwrap();

        let body = request.to_ndjson().unwrap();
        assert!(body.ends_with('\n'));
        let lines: Vec<&str> = body.trim_end_matches('\n').split('\n').collect();
        assert_eq!(lines.len(), 4);

        let first_action: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first_action["index"]["_index"], "test_index_2");
        assert_eq!(first_action["index"]["_id"], "doc-1");
        assert_eq!(lines[1], r#"{"seq":0}"#);

        let second_action: Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(second_action["create"]["_index"], "test_index_2");
        assert!(second_action["create"].get("_id").is_none());
    }

    #[test]
    fn test_empty_request_serializes_to_nothing() {
        let request = BulkRequest::new();
        assert!(request.is_empty());
        assert_eq!(request.to_ndjson().unwrap(), "");
    }
}
