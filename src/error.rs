use thiserror::Error;

use crate::classifier::{self, ErrorKind};

/// Errors raised while setting up the analyzer (config, catalog, server).
///
/// Request handling never surfaces these; a request always ends in an
/// [`AnalysisResult`](crate::AnalysisResult).
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Configuration could not be loaded or deserialized
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Reading the catalog file or binding the listener failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fallback catalog is not valid JSON
    #[error("Failed to parse catalog: {0}")]
    CatalogFormat(#[from] serde_json::Error),

    /// Fallback catalog parsed but violates its invariants
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Provider name in config does not match a known client
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

/// The uploaded payload is not something we can send to a provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No image data provided")]
    MissingImage,

    #[error("Invalid image format: expected a data:image/ URI")]
    InvalidFormat,

    #[error("Image data URI has no payload")]
    EmptyPayload,

    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

/// Provider text did not contain a usable recipe array.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Could not find a JSON array in response")]
    NoArray,

    #[error("JSON array in response is not terminated")]
    Unterminated,

    #[error("Invalid JSON array: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Array element {0} is not an object")]
    NotAnObject(usize),

    #[error("Response contained an empty recipe array")]
    Empty,
}

const BODY_PREVIEW_CHARS: usize = 200;

/// A single failed provider attempt.
#[derive(Error, Debug, Clone)]
#[error("{provider} {kind}{}: {}", status_suffix(.status), preview(.body))]
pub struct ProviderError {
    pub provider: String,
    pub kind: ErrorKind,
    /// HTTP status, when the provider answered at all
    pub status: Option<u16>,
    /// Raw response body or transport error text, kept for diagnostics
    pub body: String,
}

impl ProviderError {
    pub fn new(provider: &str, kind: ErrorKind, status: Option<u16>, body: impl Into<String>) -> Self {
        ProviderError {
            provider: provider.to_string(),
            kind,
            status,
            body: body.into(),
        }
    }

    /// Non-2xx answer; the kind comes from the classifier.
    pub fn from_response(provider: &str, status: u16, body: String) -> Self {
        let kind = classifier::classify(status, &body);
        Self::new(provider, kind, Some(status), body)
    }

    /// The request never produced a readable response.
    pub fn transport(provider: &str, err: &reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        Self::new(provider, classifier::classify_transport(err), status, err.to_string())
    }

    /// 2xx answer without the expected completion payload.
    pub fn invalid_response(provider: &str, status: Option<u16>, detail: impl Into<String>) -> Self {
        Self::new(provider, ErrorKind::InvalidResponse, status, detail)
    }

    pub fn from_parse(provider: &str, err: &ParseError) -> Self {
        Self::invalid_response(provider, None, err.to_string())
    }

    pub fn timed_out(provider: &str) -> Self {
        Self::new(provider, ErrorKind::Unavailable, None, "request timed out")
    }

    /// The provider was skipped because the request budget ran out first.
    pub fn deadline_exceeded(provider: &str) -> Self {
        Self::new(
            provider,
            ErrorKind::Unavailable,
            None,
            format!("request deadline exceeded before {} was contacted", provider),
        )
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" ({})", code),
        None => String::new(),
    }
}

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(BODY_PREVIEW_CHARS).collect();
    format!("{}...", cut)
}
