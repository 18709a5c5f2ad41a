use std::time::Duration;
use async_trait::async_trait;
use serde_json::Value;
use reqwest::{Client, header};
use log::{debug, error};

use crate::app_config::ApiTier;
use crate::errors::ProviderError;
use super::TranslationBackend;

/// Translate endpoint of the DeepL API Free plan
pub const FREE_API_URL: &str = "https://api-free.deepl.com/v2/translate";

/// Translate endpoint of the DeepL API Pro plan
pub const PAID_API_URL: &str = "https://api.deepl.com/v2/translate";

/// DeepL client for interacting with the DeepL API
#[derive(Debug)]
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Full URL of the translate endpoint
    endpoint: String,
}

impl DeepL {
    /// Create a client for the API host of the given tier
    pub fn new(api_key: impl Into<String>, tier: ApiTier, timeout_secs: u64) -> Self {
        Self::with_endpoint(api_key, Self::endpoint_for(tier), timeout_secs)
    }

    /// Create a client posting to an explicit translate URL
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Translate URL for an account tier
    pub fn endpoint_for(tier: ApiTier) -> &'static str {
        match tier {
            ApiTier::Free => FREE_API_URL,
            ApiTier::Paid => PAID_API_URL,
        }
    }

    /// URL this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Form fields of a translate request. DeepL detects the source language.
    pub fn form_fields(text: &str, target_language: &str) -> [(&'static str, String); 2] {
        [
            ("text", text.to_string()),
            ("target_lang", target_language.to_uppercase()),
        ]
    }

    /// Interpret a translate response, `{"translations": [{"text": ...}, ...]}`
    pub fn parse_response(status_code: u16, body: &str) -> Result<String, ProviderError> {
        if !(200..300).contains(&status_code) {
            return Err(ProviderError::ApiError {
                status_code,
                message: body.to_string(),
            });
        }

        let value: Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("{}: {}", e, body)))?;

        value.pointer("/translations/0/text")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::UnexpectedResponse(value.to_string()))
    }
}

#[async_trait]
impl TranslationBackend for DeepL {
    fn name(&self) -> &'static str {
        "DeepL"
    }

    async fn translate(
        &self,
        text: &str,
        _source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        debug!("POST {} ({} chars, -> {})", self.endpoint, text.len(), target_language.to_uppercase());

        let response = self.client.post(&self.endpoint)
            .header(header::AUTHORIZATION, format!("DeepL-Auth-Key {}", self.api_key))
            .form(&Self::form_fields(text, target_language))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("DeepL API error ({}): {}", status, body);
        }

        Self::parse_response(status.as_u16(), &body)
    }
}
