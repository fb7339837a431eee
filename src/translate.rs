//! Translation of failed upstream attempts into stable, user-facing errors.
//!
//! The messages produced here are matched by substring further up the stack,
//! so their text must not drift.

use std::fmt;

use reqwest::StatusCode;

use crate::{MetricsError, RetryConfig};

/// One failed attempt, classified for the retry loop.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttemptFailure {
    /// Whether another attempt may be made within budget.
    pub retryable: bool,
    /// Upstream status code, absent when no response was received.
    pub status: Option<u16>,
    /// Canonical reason phrase for `status`, empty when unknown.
    pub status_text: String,
    /// Raw message describing the failure.
    pub message: String,
    /// URL the attempt was made against.
    pub url: String,
}

impl AttemptFailure {
    /// A transport failure with no response. Always retryable.
    pub fn network(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            retryable: true,
            status: None,
            status_text: String::new(),
            message: message.into(),
            url: url.into(),
        }
    }

    /// A response with a non-success status, classified against `config`.
    pub fn status(status: StatusCode, url: impl Into<String>, config: &RetryConfig) -> Self {
        let code = status.as_u16();
        Self {
            retryable: config.is_retryable_status(code),
            status: Some(code),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            message: format!("Request failed with status code {code}"),
            url: url.into(),
        }
    }

    /// Converts the failure into its translated error.
    pub fn translate(self) -> MetricsError {
        match self.status {
            None => MetricsError::Network {
                message: self.message,
            },
            Some(status) => MetricsError::Http(HttpFailure {
                status,
                status_text: self.status_text,
                url: self.url,
            }),
        }
    }
}

/// Non-success upstream response. `Display` yields the translated message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HttpFailure {
    pub status: u16,
    pub status_text: String,
    pub url: String,
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            404 => write!(f, "Resource not found (404): {}", self.url),
            429 => f.write_str("Too many requests (429). Please try again later."),
            500 => f.write_str(
                "Internal server error (500). The external service is experiencing issues.",
            ),
            502 => f.write_str(
                "Bad gateway (502). The external service is temporarily unavailable.",
            ),
            503 => f.write_str(
                "Service unavailable (503). The external service is temporarily down.",
            ),
            504 => f.write_str(
                "Gateway timeout (504). The external service took too long to respond.",
            ),
            status => write!(f, "HTTP error {status}: {}", self.status_text),
        }
    }
}
