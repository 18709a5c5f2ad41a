use async_trait::async_trait;
use serde_json::Value;
use reqwest::Client;
use url::Url;
use log::{debug, error};

use crate::errors::ProviderError;
use super::TranslationBackend;

/// Google Translate client using the public web endpoint (`client=gtx`).
///
/// No client-side timeout is configured; requests inherit the defaults of
/// the HTTP client.
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Base URL, e.g. `https://translate.googleapis.com`
    base_url: String,
}

impl GoogleTranslate {
    /// Create a new Google Translate client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Build the request URL for one translation
    pub fn request_url(&self, text: &str, source_language: &str, target_language: &str) -> Result<Url, ProviderError> {
        let endpoint = format!("{}/translate_a/single", self.base_url.trim_end_matches('/'));
        Url::parse_with_params(
            &endpoint,
            &[
                ("client", "gtx"),
                ("sl", source_language),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| ProviderError::RequestFailed(format!("Invalid Google Translate URL {}: {}", endpoint, e)))
    }

    /// Interpret a response.
    ///
    /// The body is a nested array whose first element lists translated
    /// sentences; the translation is the concatenation of their first fields.
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
        let parts: Vec<&str> = response.get(0)?
            .as_array()?
            .iter()
            .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
            .collect();

        // Transliteration rows carry null in the first field
        if parts.is_empty() {
            return None;
        }
        Some(parts.concat())
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslate {
    fn name(&self) -> &'static str {
        "Google Translate"
    }

    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let url = self.request_url(text, source_language, target_language)?;
        debug!("GET {} ({} chars)", url.path(), text.len());

        let response = self.client.get(url)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("Google Translate error ({}): {}", status, body);
        }

        Self::parse_response(status.as_u16(), &body)
    }
}
