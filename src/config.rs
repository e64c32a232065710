use crate::error::{EsflowError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Url;
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "http://localhost:9200";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60 * 10);

/// Credentials sent as `Authorization: ApiKey <encoded>`.
///
/// The service hands out keys either pre-encoded or as an `id` plus `api_key`
/// pair; both forms are accepted.
#[derive(Clone, PartialEq, Eq)]
pub enum ApiKey {
    Encoded(String),
    Pair { id: String, key: String },
}

impl ApiKey {
    /// Parse `id:key` as a pair, anything else as an encoded key.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(EsflowError::Config("API key is empty".into()));
        }
        match raw.split_once(':') {
            Some((id, key)) if !id.is_empty() && !key.is_empty() => Ok(ApiKey::Pair {
                id: id.to_string(),
                key: key.to_string(),
            }),
            Some(_) => Err(EsflowError::Config(format!(
                "API key pair must look like <id>:<key>, got '{}'",
                raw
            ))),
            None => Ok(ApiKey::Encoded(raw.to_string())),
        }
    }

    pub fn encoded(&self) -> String {
        match self {
            ApiKey::Encoded(encoded) => encoded.clone(),
            ApiKey::Pair { id, key } => STANDARD.encode(format!("{}:{}", id, key)),
        }
    }

    pub fn header_value(&self) -> String {
        format!("ApiKey {}", self.encoded())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiKey::Encoded(_) => f.write_str("ApiKey::Encoded(***)"),
            ApiKey::Pair { id, .. } => write!(f, "ApiKey::Pair {{ id: {:?}, key: *** }}", id),
        }
    }
}

/// Connection settings for [`crate::SearchClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub hosts: Vec<String>,
    pub api_key: Option<ApiKey>,
    /// Set to `false` only for trusted local clusters with self-signed certificates.
    pub verify_certs: bool,
    pub request_timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hosts: Vec<String> = self.hosts.iter().map(|h| redact_host(h)).collect();
        f.debug_struct("ClientConfig")
            .field("hosts", &hosts)
            .field("api_key", &self.api_key)
            .field("verify_certs", &self.verify_certs)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hosts: vec![DEFAULT_HOST.to_string()],
            api_key: None,
            verify_certs: true,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            hosts: vec![host.into()],
            ..Default::default()
        }
    }

    /// Load connection settings from environment variables.
    ///
    /// Optional: ELASTICSEARCH_HOST (comma-separated, defaults to localhost:9200)
    /// Optional: ELASTICSEARCH_API_KEY (encoded key or `id:key`)
    /// Optional: ELASTICSEARCH_VERIFY_CERTS (true/false/1/0, defaults to true)
    /// Optional: ELASTICSEARCH_REQUEST_TIMEOUT_SECS (defaults to 600)
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("ELASTICSEARCH_HOST") {
            let hosts = parse_hosts(&raw);
            if hosts.is_empty() {
                return Err(EsflowError::Config(
                    "ELASTICSEARCH_HOST is set but lists no hosts".into(),
                ));
            }
            config.hosts = hosts;
        }

        if let Ok(raw) = env::var("ELASTICSEARCH_API_KEY") {
            if !raw.trim().is_empty() {
                config.api_key = Some(ApiKey::parse(&raw)?);
            }
        }

        if let Ok(raw) = env::var("ELASTICSEARCH_VERIFY_CERTS") {
            config.verify_certs = parse_bool(&raw).ok_or_else(|| {
                EsflowError::Config(format!("Invalid ELASTICSEARCH_VERIFY_CERTS: {}", raw))
            })?;
        }

        if let Ok(raw) = env::var("ELASTICSEARCH_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                EsflowError::Config(format!(
                    "Invalid ELASTICSEARCH_REQUEST_TIMEOUT_SECS: {}",
                    raw
                ))
            })?;
            if secs == 0 {
                return Err(EsflowError::Config(
                    "ELASTICSEARCH_REQUEST_TIMEOUT_SECS must be positive".into(),
                ));
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn with_verify_certs(mut self, verify_certs: bool) -> Self {
        self.verify_certs = verify_certs;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// `url` with any password masked, for logs and debug output.
pub(crate) fn redacted(url: &Url) -> Url {
    let mut url = url.clone();
    if url.password().is_some() {
        let _ = url.set_password(Some("***"));
    }
    url
}

fn redact_host(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => redacted(&url).to_string(),
        Err(_) => raw.to_string(),
    }
}

fn parse_hosts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(|h| h.trim_end_matches('/').to_string())
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
