//! Error types shared across the crate.

use thiserror::Error;

use crate::ai::AiError;

/// The one user-facing message for every acquisition failure. Internal detail
/// stays in logs; shells show this copy and let the user re-submit.
pub const ACQUIRE_FAILED_MESSAGE: &str =
    "Failed to get recipes. The AI might be busy, or the image could not be processed. Please try again.";

/// A recipe payload that decoded as JSON but does not conform to the
/// collection shape. The path pinpoints the violated field, e.g.
/// `recipes[2].ingredients[0].inFridge`.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("expected a JSON array of recipes")]
    NotAnArray,

    #[error("recipe collection is empty")]
    EmptyCollection,

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("field {path} has the wrong type (expected {expected})")]
    WrongType { path: String, expected: &'static str },

    #[error("field {path} must not be empty")]
    EmptyField { path: String },

    #[error("field {path} has invalid value: {value}")]
    InvalidValue { path: String, value: String },
}

/// Errors from preparing a photo for acquisition.
#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("malformed data URI")]
    MalformedDataUri,

    #[error("data URI is not base64-encoded")]
    NotBase64Encoded,

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("could not detect image format")]
    UnknownFormat,

    #[error("unsupported image format: {0} (allowed: JPEG, PNG, GIF, WebP)")]
    UnsupportedFormat(String),

    #[error("image too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
}

/// Outcome of a failed acquisition attempt. The three categories collapse to a
/// single user-facing message but stay distinguishable for diagnostics.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// The inference capability was unreachable or returned an error.
    #[error("AI request failed: {0}")]
    Service(#[from] AiError),

    /// The response text was not decodable as JSON.
    #[error("response was not decodable as JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response decoded but failed schema validation.
    #[error("response failed recipe validation: {0}")]
    Invalid(#[from] ValidateError),
}

impl AcquireError {
    /// Message to show the user, identical for all categories.
    pub fn user_message(&self) -> &'static str {
        ACQUIRE_FAILED_MESSAGE
    }

    /// Short category label for logs.
    pub fn category(&self) -> &'static str {
        match self {
            AcquireError::Service(_) => "service",
            AcquireError::Decode(_) => "decode",
            AcquireError::Invalid(_) => "validation",
        }
    }
}
