use super::{read_json, RequestBody, SearchClient};
use crate::error::Result;
use crate::index::IndexDefinition;
use crate::types::{AcknowledgedResponse, CreateIndexResponse, RefreshResponse};
use indexmap::IndexMap;
use reqwest::{Method, StatusCode};
use serde_json::Value;

impl SearchClient {
    /// `HEAD /{index}`: 200 means present, 404 absent.
    pub async fn index_exists(&self, index: &str) -> Result<bool> {
        let response = self
            .execute(Method::HEAD, &[index], &[], RequestBody::Empty)
            .await?;
        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            s => Err(super::api_error(s, &[])),
        }
    }

    /// Index metadata keyed by index name. A missing index yields an empty
    /// map instead of an error.
    pub async fn get_index(&self, index: &str) -> Result<IndexMap<String, Value>> {
        let response = self
            .execute(
                Method::GET,
                &[index],
                &[("ignore_unavailable", "true".to_string())],
                RequestBody::Empty,
            )
            .await?;
        read_json(response).await
    }

    pub async fn create_index(
        &self,
        index: &str,
        definition: Option<&IndexDefinition>,
    ) -> Result<CreateIndexResponse> {
        let body = match definition {
            Some(def) if !def.is_empty() => RequestBody::Json(def.to_json()),
            _ => RequestBody::Empty,
        };
        let response = self.execute(Method::PUT, &[index], &[], body).await?;
        let created: CreateIndexResponse = read_json(response).await?;
        tracing::debug!(
            index,
            acknowledged = created.acknowledged,
            shards_acknowledged = created.shards_acknowledged,
            "create index"
        );
        Ok(created)
    }

    pub async fn delete_index(&self, index: &str) -> Result<AcknowledgedResponse> {
        let response = self
            .execute(Method::DELETE, &[index], &[], RequestBody::Empty)
            .await?;
        read_json(response).await
    }

    /// Make every write acknowledged so far visible to search.
    pub async fn refresh(&self, index: &str) -> Result<RefreshResponse> {
        let response = self
            .execute(Method::POST, &[index, "_refresh"], &[], RequestBody::Empty)
            .await?;
        read_json(response).await
    }
}
