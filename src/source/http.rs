//! Blocking HTTP implementation of [`WindowSource`]
//!
//! Speaks the `_search` wire shape: counts come from `hits.total` of a
//! zero-size search, pages come from `hits.hits`. There is deliberately
//! no retry, backoff, or rate limiting here; a failed round-trip is the
//! caller's problem, surfaced at the pull that triggered it.

use super::WindowSource;
use crate::error::{Error, Result};
use crate::query::QuerySpec;
use crate::types::{JsonObject, JsonValue, FROM_FIELD, SIZE_FIELD};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP search source
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// Base URL of the search service
    pub base_url: String,
    /// Index (collection) to search
    pub index: String,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            index: String::new(),
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("windowed-cursor/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpSourceConfig {
    /// Create a new config builder
    pub fn builder() -> HttpSourceConfigBuilder {
        HttpSourceConfigBuilder::default()
    }
}

/// Builder for HTTP source config
#[derive(Default)]
pub struct HttpSourceConfigBuilder {
    config: HttpSourceConfig,
}

impl HttpSourceConfigBuilder {
    /// Set the base URL of the search service
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the index to search
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.config.index = index.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the source
    pub fn build(self) -> Result<HttpSearchSource> {
        HttpSearchSource::with_config(self.config)
    }
}

/// Blocking `_search` client implementing [`WindowSource`]
pub struct HttpSearchSource {
    client: Client,
    config: HttpSourceConfig,
    search_url: String,
}

impl HttpSearchSource {
    /// Create a source builder
    pub fn builder() -> HttpSourceConfigBuilder {
        HttpSourceConfigBuilder::default()
    }

    /// Create a source from a config
    pub fn with_config(config: HttpSourceConfig) -> Result<Self> {
        if config.index.is_empty() {
            return Err(Error::invalid_query("index must not be empty"));
        }

        // Validates the base URL up front so a typo fails at construction,
        // not on the first fetch.
        let base = url::Url::parse(&config.base_url)?;
        let search_url = format!(
            "{}/{}/_search",
            base.as_str().trim_end_matches('/'),
            config.index.trim_matches('/')
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            search_url,
        })
    }

    /// The resolved `_search` endpoint URL
    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// POST a body to the `_search` endpoint and parse the response JSON.
    fn execute(&self, body: &JsonObject) -> Result<JsonValue> {
        let mut request = self.client.post(&self.search_url).json(body);
        for (key, value) in &self.config.default_headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request.send()?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(classify_rejection(status, &text, body));
        }

        let parsed: JsonValue = response.json()?;
        Ok(parsed)
    }
}

impl WindowSource for HttpSearchSource {
    fn count(&self, query: &QuerySpec) -> Result<u64> {
        // Zero-size search: the count rides along in hits.total. A
        // caller-supplied size is left alone, matching what the query
        // would report when actually fetched.
        let mut body = query.body().clone();
        body.entry(SIZE_FIELD.to_string()).or_insert(json!(0));

        let response = self.execute(&body)?;
        let total = extract_total(&response)?;
        debug!(total, url = %self.search_url, "count query");
        Ok(total)
    }

    fn search(&self, body: &JsonObject) -> Result<Vec<JsonValue>> {
        let response = self.execute(body)?;
        let hits = extract_hits(response)?;
        debug!(hits = hits.len(), url = %self.search_url, "windowed query");
        Ok(hits)
    }
}

impl std::fmt::Debug for HttpSearchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSearchSource")
            .field("config", &self.config)
            .field("search_url", &self.search_url)
            .finish_non_exhaustive()
    }
}

/// Map a non-2xx response to an error, naming the window-ceiling
/// rejection when the service reports one.
fn classify_rejection(status: StatusCode, text: &str, body: &JsonObject) -> Error {
    if text.contains("Result window is too large") || text.contains("max_result_window") {
        let from = body.get(FROM_FIELD).and_then(JsonValue::as_u64).unwrap_or(0);
        let size = body.get(SIZE_FIELD).and_then(JsonValue::as_u64).unwrap_or(0);
        return Error::window_ceiling(from, size, first_line(text));
    }
    Error::http_status(status.as_u16(), text)
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

/// Read `hits.total`, accepting both the bare-integer and the
/// `{ "value": n, "relation": .. }` response shapes.
fn extract_total(response: &JsonValue) -> Result<u64> {
    let total = response
        .pointer("/hits/total")
        .ok_or_else(|| Error::response("missing hits.total"))?;

    match total {
        JsonValue::Number(n) => n
            .as_u64()
            .ok_or_else(|| Error::response(format!("hits.total is not a count: {n}"))),
        JsonValue::Object(map) => map
            .get("value")
            .and_then(JsonValue::as_u64)
            .ok_or_else(|| Error::response("hits.total.value is not a count")),
        other => Err(Error::response(format!(
            "hits.total has unexpected shape: {other}"
        ))),
    }
}

/// Read the `hits.hits` page out of a search response.
fn extract_hits(mut response: JsonValue) -> Result<Vec<JsonValue>> {
    match response.pointer_mut("/hits/hits") {
        Some(JsonValue::Array(hits)) => Ok(std::mem::take(hits)),
        Some(other) => Err(Error::response(format!(
            "hits.hits is not an array: {other}"
        ))),
        None => Err(Error::response("missing hits.hits")),
    }
}
