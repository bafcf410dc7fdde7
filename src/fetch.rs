//! HTTP request helper shared by every endpoint

use log::{debug, warn};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, RequestBuilder, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            client,
            url: url.to_string(),
            method,
            headers,
            query_params: Vec::new(),
            body: None,
        }
    }

    /// Add bearer token authentication to the request
    pub fn bearer_auth(mut self, token: &str) -> Self {
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(value) => {
                self.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => warn!("Bearer token contains characters not allowed in a header"),
        }
        self
    }

    /// Append a query parameter
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query_params.push((key.to_string(), value.into()));
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    fn build(&self) -> Result<RequestBuilder> {
        let mut url = Url::parse(&self.url)?;
        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                pairs.append_pair(key, value);
            }
        }

        let mut req = self.client.request(self.method.clone(), url.as_str());
        req = req.headers(self.headers.clone());
        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }
        Ok(req)
    }

    /// Send the request; any non-2xx status becomes [`Error::Api`].
    pub async fn send(&self) -> Result<Response> {
        debug!("{} {}", self.method, self.url);
        let response = self.build()?.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(status, &text);
        debug!("{} {} failed: {}", self.method, self.url, message);
        Err(Error::api(status.as_u16(), message))
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T> {
        let response = self.send().await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Execute the request and ignore whatever body comes back
    pub async fn execute_unit(&self) -> Result<()> {
        self.send().await.map(|_| ())
    }
}

/// Extracts a human readable message from an error response body.
///
/// Tries `detail`, `message` and `error` in that order. A string value is
/// used as-is, any other value is rendered as JSON. A JSON body without
/// those keys is rendered whole; an empty or non-JSON body falls back to
/// the raw text, then to `"{status}: {reason}"`.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = || {
        format!(
            "{}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        )
    };

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return fallback();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => {
            let picked = ["detail", "message", "error"]
                .iter()
                .find_map(|key| match map.get(*key) {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) if s.is_empty() => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => Some(other.to_string()),
                });
            picked.unwrap_or_else(|| Value::Object(map).to_string())
        }
        Ok(Value::String(s)) if !s.is_empty() => s,
        Ok(Value::Null) => fallback(),
        Ok(other) => other.to_string(),
        Err(_) => trimmed.to_string(),
    }
}
