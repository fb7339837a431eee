use crate::translate::HttpFailure;

/// Error type returned by this crate.
#[derive(Clone, Debug, thiserror::Error)]
pub enum MetricsError {
    /// No response was received from upstream (connect failure, timeout, ...).
    #[error("Network error: {message}")]
    Network { message: String },
    /// Upstream answered with a non-success status.
    #[error("{0}")]
    Http(HttpFailure),
    /// Upstream payload could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// The request could not be built, e.g. a malformed URL.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Any failure of the books source, re-wrapped with context.
    #[error("{}", books_fetch_message(.message))]
    BooksFetch {
        /// Message of the wrapped failure, kept verbatim.
        message: String,
        /// Upstream status carried by the wrapped failure, if any.
        status: Option<u16>,
    },
    /// Environment configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl MetricsError {
    /// Wraps a failure raised while fetching books.
    pub fn books_fetch(inner: &MetricsError) -> Self {
        Self::BooksFetch {
            message: inner.to_string(),
            status: inner.status_code(),
        }
    }

    /// Upstream HTTP status behind this error, looking through wrappers.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http(failure) => Some(failure.status),
            Self::BooksFetch { status, .. } => *status,
            _ => None,
        }
    }
}

fn books_fetch_message(message: &str) -> String {
    if message.is_empty() {
        "Failed to fetch books from external service".to_owned()
    } else {
        format!("Failed to fetch books: {message}")
    }
}
