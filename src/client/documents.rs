use super::{api_error, decode, read_json, Refresh, RequestBody, SearchClient};
use crate::error::Result;
use crate::query::Query;
use crate::types::{CountResponse, GetResponse, IndexResponse};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

impl SearchClient {
    /// Index `document` under `id`, overwriting any previous version.
    pub async fn index_document<T: Serialize>(
        &self,
        index: &str,
        id: &str,
        document: &T,
        refresh: Refresh,
    ) -> Result<IndexResponse> {
        let body = serde_json::to_value(document)?;
        let mut query = Vec::new();
        if let Some(param) = refresh.as_param() {
            query.push(("refresh", param.to_string()));
        }
        let response = self
            .execute(
                Method::PUT,
                &[index, "_doc", id],
                &query,
                RequestBody::Json(body),
            )
            .await?;
        read_json(response).await
    }

    /// Fetch a document by id. A missing document is `found: false`, not an
    /// error; a missing index still is.
    pub async fn get_document<T: DeserializeOwned>(
        &self,
        index: &str,
        id: &str,
    ) -> Result<GetResponse<T>> {
        let response = self
            .execute(Method::GET, &[index, "_doc", id], &[], RequestBody::Empty)
            .await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status == StatusCode::NOT_FOUND {
            let body: Value = decode(&bytes)?;
            if body.get("found").is_some() {
                return Ok(serde_json::from_value(body)?);
            }
        }
        if !status.is_success() {
            return Err(api_error(status, &bytes));
        }
        decode(&bytes)
    }

    /// Number of documents in `index`, optionally restricted by `query`.
    pub async fn count(&self, index: &str, query: Option<&Query>) -> Result<u64> {
        let body = match query {
            Some(q) => RequestBody::Json(json!({ "query": q.to_json() })),
            None => RequestBody::Empty,
        };
        let response = self
            .execute(Method::POST, &[index, "_count"], &[], body)
            .await?;
        let counted: CountResponse = read_json(response).await?;
        Ok(counted.count)
    }
}
