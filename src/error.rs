//! Error types for the match acquisition and statistics pipeline.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// The main error type for all pipeline operations.
#[derive(Error, Debug)]
pub enum TrendsError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// The requested resource does not exist upstream (HTTP 404).
    #[error("Not found: {path}")]
    NotFound {
        /// Request path that returned 404
        path: String,
    },

    /// The upstream refused the request (HTTP 401/403).
    ///
    /// Usually signals a bad API key or a wrong routing host rather than load.
    #[error("Request rejected with HTTP {status}: {path}")]
    Rejected {
        /// Response status (401 or 403)
        status: u16,
        /// Request path
        path: String,
    },

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded, retry after {retry_after_ms:?}ms")]
    RateLimited {
        /// Upstream-suggested wait time in milliseconds
        retry_after_ms: Option<u64>,
    },

    /// Upstream server error (HTTP 5xx)
    #[error("Upstream server error: HTTP {status}")]
    Server {
        /// Response status
        status: u16,
    },

    /// Any other non-success status; not retried.
    #[error("Unexpected HTTP status {status}: {path}")]
    UnexpectedStatus {
        /// Response status
        status: u16,
        /// Request path
        path: String,
    },

    /// Request timeout
    #[error("Request timed out")]
    Timeout,

    /// A retryable failure persisted past the attempt ceiling.
    #[error("Giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// The failure observed on the final attempt
        last: Box<TrendsError>,
    },

    /// Too few matches resolved to the queried player to build statistics.
    #[error("Insufficient sample: {resolved} matches resolved, {required} required")]
    InsufficientSample {
        /// Matches that contained the player
        resolved: usize,
        /// Minimum required
        required: usize,
    },

    /// The match timeline could not be fetched.
    #[error("Timeline unavailable for match {match_id}")]
    TimelineUnavailable {
        /// Match identifier
        match_id: String,
    },

    /// Invalid configuration (unknown region, missing key, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl TrendsError {
    /// Classify a non-success HTTP status into an error.
    ///
    /// `retry_after` is the parsed `Retry-After` value, if the response carried one.
    pub fn from_status(status: StatusCode, path: &str, retry_after: Option<Duration>) -> Self {
        match status.as_u16() {
            404 => Self::NotFound {
                path: path.to_string(),
            },
            code @ (401 | 403) => Self::Rejected {
                status: code,
                path: path.to_string(),
            },
            429 => Self::RateLimited {
                retry_after_ms: retry_after.map(|d| d.as_millis() as u64),
            },
            code if status.is_server_error() => Self::Server { status: code },
            code => Self::UnexpectedStatus {
                status: code,
                path: path.to_string(),
            },
        }
    }

    /// Whether another attempt may succeed.
    ///
    /// Rate limiting, server errors and transport-level failures are transient;
    /// everything else is terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Server { .. } | Self::Timeout => true,
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::HttpMiddleware(reqwest_middleware::Error::Reqwest(e)) => {
                e.is_timeout() || e.is_connect() || e.is_request()
            }
            _ => false,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the upstream rejected the credentials or routing.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Short label used in drop logs.
    pub fn drop_reason(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not found",
            Self::Rejected { .. } => "rejected",
            Self::RetriesExhausted { .. } => "max retries",
            Self::Json(_) | Self::InvalidResponse(_) => "invalid body",
            Self::UnexpectedStatus { .. } => "unexpected status",
            _ => "transport",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let err = TrendsError::from_status(StatusCode::NOT_FOUND, "/m/1", None);
        assert!(err.is_not_found());
        assert!(!err.is_retryable());

        let err = TrendsError::from_status(StatusCode::FORBIDDEN, "/m/1", None);
        assert!(err.is_rejected());
        assert!(!err.is_retryable());

        let err = TrendsError::from_status(StatusCode::UNAUTHORIZED, "/m/1", None);
        assert!(err.is_rejected());

        let err = TrendsError::from_status(
            StatusCode::TOO_MANY_REQUESTS,
            "/m/1",
            Some(Duration::from_secs(2)),
        );
        assert!(err.is_retryable());
        assert!(matches!(
            err,
            TrendsError::RateLimited {
                retry_after_ms: Some(2000)
            }
        ));

        let err = TrendsError::from_status(StatusCode::BAD_GATEWAY, "/m/1", None);
        assert!(matches!(err, TrendsError::Server { status: 502 }));
        assert!(err.is_retryable());

        let err = TrendsError::from_status(StatusCode::BAD_REQUEST, "/m/1", None);
        assert!(matches!(err, TrendsError::UnexpectedStatus { status: 400, .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let error = TrendsError::InsufficientSample {
            resolved: 3,
            required: 5,
        };
        assert_eq!(
            error.to_string(),
            "Insufficient sample: 3 matches resolved, 5 required"
        );
    }
}
