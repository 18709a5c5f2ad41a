use std::time::Duration;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use reqwest::Client;
use log::{debug, error};

use crate::errors::ProviderError;
use super::TranslationBackend;

/// LibreTranslate client
#[derive(Debug)]
pub struct LibreTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the server, without the `/translate` path
    base_url: String,
    /// API key, sent only when non-empty
    api_key: String,
}

/// Body of a `POST /translate` request
#[derive(Debug, Serialize)]
pub struct LibreTranslateRequest {
    /// Text to translate
    q: String,

    /// Source language code, or "auto"
    source: String,

    /// Target language code
    target: String,

    /// Input format, always plain text for subtitles
    format: String,

    /// API key for servers that require one
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

impl LibreTranslateRequest {
    /// Create a new plain-text translation request
    pub fn new(text: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            q: text.into(),
            source: source.into(),
            target: target.into(),
            format: "text".to_string(),
            api_key: None,
        }
    }

    /// Attach an API key; empty keys are not sent
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = if api_key.is_empty() { None } else { Some(api_key) };
        self
    }
}

impl LibreTranslate {
    /// Create a new LibreTranslate client
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Full URL of the translate endpoint
    pub fn translate_url(&self) -> String {
        format!("{}/translate", self.base_url.trim_end_matches('/'))
    }

    /// Interpret a `/translate` response.
    ///
    /// Accepts `{"translatedText": ...}` or a non-empty array whose first
    /// element has that shape.
    pub fn parse_response(status_code: u16, body: &str) -> Result<String, ProviderError> {
        if !(200..300).contains(&status_code) {
            return Err(ProviderError::ApiError {
                status_code,
                message: body.to_string(),
            });
        }

        let value: Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("{}: {}", e, body)))?;

        Self::extract_text(&value)
            .ok_or_else(|| ProviderError::UnexpectedResponse(value.to_string()))
    }

    /// Extract the translated text from a decoded response
    pub fn extract_text(response: &Value) -> Option<String> {
        let item = match response {
            Value::Array(items) => items.first()?,
            other => other,
        };

        item.get("translatedText")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[async_trait]
impl TranslationBackend for LibreTranslate {
    fn name(&self) -> &'static str {
        "LibreTranslate"
    }

    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let url = self.translate_url();
        let request = LibreTranslateRequest::new(text, source_language, target_language)
            .api_key(self.api_key.as_str());

        debug!("POST {} ({} chars, {} -> {})", url, text.len(), source_language, target_language);

        let response = self.client.post(&url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("LibreTranslate API error ({}): {}", status, body);
        }

        Self::parse_response(status.as_u16(), &body)
    }
}
