/*!
 * Error types for the subtran application.
 *
 * This module contains custom error types for the three stages of a run
 * (decode, translate, encode) plus backend selection,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when sending the request fails (connection, timeout, TLS)
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when the response body is not valid JSON
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself (non-2xx status)
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Raw response body
        message: String,
    },

    /// Valid JSON that does not have the shape the backend promises
    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),

    /// The selected backend was not compiled into this build
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        Self::RequestFailed(error.to_string())
    }
}

/// Errors that can occur while reading or writing subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Input file unreadable or not valid UTF-8
    #[error("Failed to decode subtitle file {path}: {reason}")]
    Decode {
        path: PathBuf,
        reason: String,
    },

    /// Output destination unwritable
    #[error("Failed to encode subtitle file {path}: {reason}")]
    Encode {
        path: PathBuf,
        reason: String,
    },
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// A single block could not be translated; the run stops here
    #[error("Failed to translate block {index}: {source}")]
    Block {
        /// Index line of the failing block, verbatim
        index: String,
        #[source]
        source: ProviderError,
    },
}

/// Main application error type, naming the stage a run failed in
#[derive(Error, Debug)]
pub enum AppError {
    /// Backend selection or transport failure outside the block loop
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle decoding or encoding
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),
}
