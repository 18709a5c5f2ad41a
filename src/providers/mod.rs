/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported backends:
 * - LibreTranslate: JSON POST to a (possibly self-hosted) LibreTranslate server
 * - DeepL: form POST to the DeepL free or paid API
 * - Google: the public Google Translate web endpoint (`google` feature)
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

pub mod libretranslate;
pub mod deepl;
#[cfg(feature = "google")]
pub mod google;

use deepl::DeepL;
use libretranslate::LibreTranslate;
#[cfg(feature = "google")]
use google::GoogleTranslate;

/// Common trait for all translation backends
///
/// Every backend takes plain text plus language codes and returns plain
/// translated text. Credentials and endpoints live in the implementing
/// struct, so callers can swap backends without touching anything else.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Human readable backend name, used in logs
    fn name(&self) -> &'static str;

    /// Translate `text` from `source_language` to `target_language`
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or the backend failure
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;
}

/// The closed set of backends, one of which is selected per run
#[derive(Debug)]
pub enum Backend {
    LibreTranslate(LibreTranslate),
    DeepL(DeepL),
    #[cfg(feature = "google")]
    Google(GoogleTranslate),
}

impl Backend {
    /// Build the backend selected in the configuration.
    ///
    /// Returns `ProviderError::Unavailable` when the selected backend was not
    /// compiled into this build, before any request is attempted.
    pub fn from_config(config: &TranslationConfig) -> Result<Self, ProviderError> {
        let provider = config.provider;
        if !provider.is_available() {
            return Err(ProviderError::Unavailable(format!(
                "{} support is not compiled into this build (enable the `{}` feature)",
                provider.display_name(),
                provider.to_lowercase_string()
            )));
        }

        match provider {
            TranslationProvider::LibreTranslate => Ok(Self::LibreTranslate(LibreTranslate::new(
                config.get_endpoint(),
                config.get_api_key(),
                config.get_timeout_secs(),
            ))),
            TranslationProvider::DeepL => {
                let api_key = config.get_api_key();
                let timeout_secs = config.get_timeout_secs();
                let endpoint = config
                    .get_active_provider_config()
                    .map(|p| p.endpoint.clone())
                    .unwrap_or_default();

                let client = if endpoint.is_empty() {
                    DeepL::new(api_key, config.get_tier(), timeout_secs)
                } else {
                    DeepL::with_endpoint(api_key, endpoint, timeout_secs)
                };
                Ok(Self::DeepL(client))
            }
            TranslationProvider::Google => Self::google(config),
        }
    }

    #[cfg(feature = "google")]
    fn google(config: &TranslationConfig) -> Result<Self, ProviderError> {
        Ok(Self::Google(GoogleTranslate::new(config.get_endpoint())))
    }

    #[cfg(not(feature = "google"))]
    fn google(_config: &TranslationConfig) -> Result<Self, ProviderError> {
        Err(ProviderError::Unavailable(
            "Google Translate support is not compiled into this build".to_string(),
        ))
    }

    /// Which provider this backend talks to
    pub fn kind(&self) -> TranslationProvider {
        match self {
            Self::LibreTranslate(_) => TranslationProvider::LibreTranslate,
            Self::DeepL(_) => TranslationProvider::DeepL,
            #[cfg(feature = "google")]
            Self::Google(_) => TranslationProvider::Google,
        }
    }
}

#[async_trait]
impl TranslationBackend for Backend {
    fn name(&self) -> &'static str {
        match self {
            Self::LibreTranslate(client) => client.name(),
            Self::DeepL(client) => client.name(),
            #[cfg(feature = "google")]
            Self::Google(client) => client.name(),
        }
    }

    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        match self {
            Self::LibreTranslate(client) => client.translate(text, source_language, target_language).await,
            Self::DeepL(client) => client.translate(text, source_language, target_language).await,
            #[cfg(feature = "google")]
            Self::Google(client) => client.translate(text, source_language, target_language).await,
        }
    }
}
