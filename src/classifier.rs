//! Maps raw provider failures onto a small set of error kinds.
//!
//! The rules are heuristics over provider error formats, so they live here
//! as pure functions rather than inside each client.

use std::fmt;

/// Why a provider attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credential rejected (401/403)
    Unauthorized,
    /// Throttled or out of quota
    RateLimited,
    /// Server error, network failure or timeout
    Unavailable,
    /// Provider answered but not with a usable completion
    InvalidResponse,
}

impl ErrorKind {
    /// Whether the chain should move on to the next provider.
    ///
    /// Every kind is retriable at the chain level for now.
    pub fn is_retriable(&self) -> bool {
        match self {
            ErrorKind::Unauthorized
            | ErrorKind::RateLimited
            | ErrorKind::Unavailable
            | ErrorKind::InvalidResponse => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::RateLimited => "rate limited",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::InvalidResponse => "invalid response",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phrases providers put in error bodies when throttling or out of quota.
/// OpenAI uses `rate_limit_exceeded` / `insufficient_quota`, Google uses
/// `RESOURCE_EXHAUSTED`.
const RATE_LIMIT_MARKERS: &[&str] = &[
    "rate_limit",
    "rate limit",
    "insufficient_quota",
    "quota",
    "resource_exhausted",
];

/// Classify an HTTP answer from a provider.
///
/// Precedence: auth, then rate limit (status or body marker), then server
/// errors. A 2xx status only reaches here when the payload was missing its
/// completion, which makes it an invalid response.
pub fn classify(status: u16, body: &str) -> ErrorKind {
    if status == 401 || status == 403 {
        return ErrorKind::Unauthorized;
    }
    if status == 429 || has_rate_limit_marker(body) {
        return ErrorKind::RateLimited;
    }
    if status >= 500 {
        return ErrorKind::Unavailable;
    }
    if (200..300).contains(&status) {
        return ErrorKind::InvalidResponse;
    }
    ErrorKind::Unavailable
}

/// Classify a failure where no HTTP answer could be read.
pub fn classify_transport(err: &reqwest::Error) -> ErrorKind {
    match err.status() {
        Some(status) => classify(status.as_u16(), ""),
        None => ErrorKind::Unavailable,
    }
}

fn has_rate_limit_marker(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    RATE_LIMIT_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses() {
        assert_eq!(classify(401, ""), ErrorKind::Unauthorized);
        assert_eq!(classify(403, "forbidden"), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_auth_takes_precedence_over_quota_marker() {
        let body = r#"{"error":{"code":"insufficient_quota"}}"#;
        assert_eq!(classify(401, body), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_rate_limit_status() {
        assert_eq!(classify(429, ""), ErrorKind::RateLimited);
    }

    #[test]
    fn test_rate_limit_body_markers() {
        let openai = r#"{"error":{"type":"insufficient_quota","message":"You exceeded your current quota"}}"#;
        assert_eq!(classify(400, openai), ErrorKind::RateLimited);

        let google = r#"{"error":{"status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(classify(503, google), ErrorKind::RateLimited);

        assert_eq!(
            classify(500, "Rate limit reached for gpt-4o"),
            ErrorKind::RateLimited
        );
    }

    #[test]
    fn test_server_errors_are_unavailable() {
        assert_eq!(classify(500, "internal"), ErrorKind::Unavailable);
        assert_eq!(classify(502, ""), ErrorKind::Unavailable);
        assert_eq!(classify(503, "overloaded"), ErrorKind::Unavailable);
    }

    #[test]
    fn test_success_status_without_payload_is_invalid_response() {
        assert_eq!(classify(200, "{}"), ErrorKind::InvalidResponse);
    }

    #[test]
    fn test_other_client_errors_are_unavailable() {
        assert_eq!(classify(400, "bad request"), ErrorKind::Unavailable);
        assert_eq!(classify(404, "model not found"), ErrorKind::Unavailable);
    }

    #[test]
    fn test_all_kinds_are_retriable() {
        for kind in [
            ErrorKind::Unauthorized,
            ErrorKind::RateLimited,
            ErrorKind::Unavailable,
            ErrorKind::InvalidResponse,
        ] {
            assert!(kind.is_retriable());
        }
    }
}
