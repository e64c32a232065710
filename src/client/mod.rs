//! HTTP handle to an Elasticsearch-compatible cluster.
//!
//! Every operation is one request awaited to completion. Requests rotate
//! through the configured hosts; a failed request is reported, never
//! retried on another host.

mod bulk;
mod documents;
mod indices;
mod search;

pub use bulk::{BulkAction, BulkOperation, BulkRequest};

use crate::config::{redacted, ClientConfig};
use crate::error::{EsflowError, Result};
use crate::types::{ClusterInfo, ErrorCause};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Whether a write should make itself visible to search before returning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Refresh {
    /// Leave visibility to the cluster's refresh interval.
    #[default]
    False,
    /// Force a refresh of the affected shards.
    True,
    /// Block until the next scheduled refresh has made the write visible.
    WaitFor,
}

impl Refresh {
    fn as_param(self) -> Option<&'static str> {
        match self {
            Refresh::False => None,
            Refresh::True => Some("true"),
            Refresh::WaitFor => Some("wait_for"),
        }
    }
}

pub(crate) enum RequestBody {
    Empty,
    Json(Value),
    Ndjson(String),
}

#[derive(Clone)]
pub struct SearchClient {
    hosts: Arc<Vec<Url>>,
    http: reqwest::Client,
    cursor: Arc<AtomicUsize>,
}

impl SearchClient {
    /// Build a client from `config`. No request is sent here; an unreachable
    /// host only surfaces on the first call.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        if config.hosts.is_empty() {
            return Err(EsflowError::Config("at least one host is required".into()));
        }

        let hosts = config
            .hosts
            .iter()
            .map(|h| parse_host(h))
            .collect::<Result<Vec<_>>>()?;

        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let mut value = HeaderValue::from_str(&api_key.header_value())
                .map_err(|_| EsflowError::Config("API key is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        if !config.verify_certs {
            tracing::warn!("TLS certificate verification disabled");
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(!config.verify_certs)
            .default_headers(headers)
            .build()?;

        tracing::info!(
            hosts = hosts.len(),
            timeout_secs = config.request_timeout.as_secs(),
            api_key = config.api_key.is_some(),
            "Search client configured"
        );

        Ok(Self {
            hosts: Arc::new(hosts),
            http,
            cursor: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::connect(ClientConfig::from_env()?)
    }

    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(Url::as_str)
    }

    /// `true` when the cluster answers `HEAD /` with a 2xx status, `false` for
    /// any other status. An unreachable host is an error.
    pub async fn ping(&self) -> Result<bool> {
        let response = self
            .execute(Method::HEAD, &[], &[], RequestBody::Empty)
            .await?;
        Ok(response.status().is_success())
    }

    pub async fn info(&self) -> Result<ClusterInfo> {
        let response = self
            .execute(Method::GET, &[], &[], RequestBody::Empty)
            .await?;
        read_json(response).await
    }

    fn next_host(&self) -> &Url {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % self.hosts.len();
        &self.hosts[i]
    }

    fn url_for(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.next_host().clone();
        if url.cannot_be_a_base() {
            return Err(EsflowError::Config(format!(
                "host {} cannot carry a path",
                redacted(&url)
            )));
        }
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    pub(crate) async fn execute(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: RequestBody,
    ) -> Result<reqwest::Response> {
        let url = self.url_for(segments)?;
        let mut request = self.http.request(method.clone(), url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Ndjson(lines) => request
                .header(CONTENT_TYPE, "application/x-ndjson")
                .body(lines),
        };

        let response = request.send().await.map_err(|mut e| {
            if let Some(failed) = e.url_mut() {
                *failed = redacted(failed);
            }
            let err = EsflowError::from(e);
            tracing::warn!(%method, url = %redacted(&url), error = %err, "request failed");
            err
        })?;

        tracing::debug!(
            %method,
            path = url.path(),
            status = response.status().as_u16(),
            "request completed"
        );
        Ok(response)
    }
}

fn parse_host(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| EsflowError::Config(format!("Invalid host: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(EsflowError::Config(format!(
            "Unsupported scheme '{}' in host '{}'",
            other,
            redacted(&url)
        ))),
    }
}

/// Decode a 2xx body, or turn a non-2xx response into [`EsflowError::Api`].
pub(crate) async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
        return Err(api_error(status, &bytes));
    }
    decode(&bytes)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(EsflowError::MalformedResponse("empty response body".into()));
    }
    serde_json::from_slice(bytes).map_err(|e| EsflowError::MalformedResponse(e.to_string()))
}

/// Error bodies look like `{"error": {"type", "reason"}, "status"}`; older
/// clusters and proxies may send a bare string or nothing at all.
pub(crate) fn api_error(status: StatusCode, bytes: &[u8]) -> EsflowError {
    let parsed: Option<Value> = serde_json::from_slice(bytes).ok();
    let (error_type, reason) = match parsed.as_ref().and_then(|v| v.get("error")) {
        Some(Value::String(s)) => ("error".to_string(), s.clone()),
        Some(obj @ Value::Object(_)) => match serde_json::from_value::<ErrorCause>(obj.clone()) {
            Ok(cause) => (cause.error_type, cause.reason.unwrap_or_default()),
            Err(_) => ("error".to_string(), obj.to_string()),
        },
        _ => (
            "http_status".to_string(),
            String::from_utf8_lossy(bytes).trim().to_string(),
        ),
    };
    EsflowError::Api {
        status,
        error_type,
        reason,
    }
}
