use super::{read_json, RequestBody, SearchClient};
use crate::error::{EsflowError, Result};
use crate::query::SearchRequest;
use crate::types::SearchResponse;
use reqwest::Method;
use serde::de::DeserializeOwned;

impl SearchClient {
    /// Run `request` against one or more indices. Searching is a pure read.
    pub async fn search<T: DeserializeOwned>(
        &self,
        indices: &[&str],
        request: &SearchRequest,
    ) -> Result<SearchResponse<T>> {
        if indices.is_empty() {
            return Err(EsflowError::Config(
                "search needs at least one index".into(),
            ));
        }
        let target = indices.join(",");
        let response = self
            .execute(
                Method::POST,
                &[target.as_str(), "_search"],
                &[],
                RequestBody::Json(request.to_json()),
            )
            .await?;
        read_json(response).await
    }
}
