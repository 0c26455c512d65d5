//! Origin API client
//!
//! The external places API whose responses get cached. Results are returned
//! as raw JSON; nothing downstream interprets their shape.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

// == Origin Error ==
#[derive(Error, Debug)]
pub enum OriginError {
    /// Network failure or non-2xx HTTP status
    #[error("origin request failed: {0}")]
    Request(String),

    /// The origin answered but reported an error status
    #[error("origin returned {status}: {message}")]
    Status { status: String, message: String },

    /// The place does not exist upstream
    #[error("place not found: {0}")]
    NotFound(String),

    /// The body was not the expected JSON
    #[error("origin response could not be parsed: {0}")]
    Parse(String),
}

/// Source of fresh place data.
#[async_trait]
pub trait Origin: Send + Sync {
    /// Full details for one place.
    async fn place_details(&self, place_id: &str) -> Result<Value, OriginError>;

    /// Places matching a free-text query.
    async fn text_search(&self, query: &str) -> Result<Value, OriginError>;
}

/// Configuration for [`GooglePlacesOrigin`].
#[derive(Debug, Clone)]
pub struct PlacesApiConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Defaults to `"https://maps.googleapis.com/maps/api"`
    pub base_url: String,
}

impl PlacesApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
        }
    }

    /// Set a custom base URL (useful for testing with a mock server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Google Places web service client.
pub struct GooglePlacesOrigin {
    config: PlacesApiConfig,
    client: reqwest::Client,
}

impl GooglePlacesOrigin {
    pub fn new(config: PlacesApiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, OriginError> {
        let response = self
            .client
            .get(format!("{}/{}", self.config.base_url, path))
            .query(params)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| OriginError::Request(format!("Places request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(OriginError::Request(format!(
                "Places API error ({status}): {text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| OriginError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Origin for GooglePlacesOrigin {
    async fn place_details(&self, place_id: &str) -> Result<Value, OriginError> {
        let body = self
            .fetch("place/details/json", &[("place_id", place_id)])
            .await?;
        unwrap_body(body, "result", place_id)
    }

    async fn text_search(&self, query: &str) -> Result<Value, OriginError> {
        let body = self
            .fetch("place/textsearch/json", &[("query", query)])
            .await?;
        unwrap_body(body, "results", query)
    }
}

/// Checks the Places `status` field and pulls out the payload field.
///
/// `ZERO_RESULTS` is a valid, empty answer; `NOT_FOUND` and `INVALID_REQUEST`
/// for a details call mean the place does not exist.
fn unwrap_body(mut body: Value, field: &str, subject: &str) -> Result<Value, OriginError> {
    let status = body
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("OK")
        .to_string();

    match status.as_str() {
        "OK" => body
            .get_mut(field)
            .map(Value::take)
            .ok_or_else(|| OriginError::Parse(format!("response has no {field}"))),
        "ZERO_RESULTS" => Ok(Value::Array(Vec::new())),
        "NOT_FOUND" => Err(OriginError::NotFound(subject.to_string())),
        _ => {
            let message = body
                .get("error_message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Err(OriginError::Status { status, message })
        }
    }
}
