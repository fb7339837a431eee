use std::fmt;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{BooksSource, ErrorResponse, MetricsError, MetricsResponse, MetricsService};

/// Substring of an error message, the status it maps to, and the public error text.
///
/// Checked in order; the first match wins.
const STATUS_RULES: [(&str, StatusCode, &str); 5] = [
    (
        "Resource not found (404)",
        StatusCode::NOT_FOUND,
        "Books data not found",
    ),
    (
        "Too many requests (429)",
        StatusCode::TOO_MANY_REQUESTS,
        "Rate limit exceeded. Please try again later.",
    ),
    (
        "Service unavailable (503)",
        StatusCode::SERVICE_UNAVAILABLE,
        "Books service temporarily unavailable",
    ),
    (
        "Gateway timeout (504)",
        StatusCode::GATEWAY_TIMEOUT,
        "Books service timeout",
    ),
    (
        "Bad gateway (502)",
        StatusCode::BAD_GATEWAY,
        "Books service temporarily unavailable",
    ),
];

const INTERNAL_ERROR: &str = "Internal server error";

/// Maps an error to the HTTP status and public message returned to clients.
///
/// Matching is done on the message text.
// TODO: switch to `MetricsError::status_code` once clients no longer depend
// on message-based mapping.
pub fn map_error(err: &MetricsError) -> (StatusCode, &'static str) {
    let message = err.to_string();
    STATUS_RULES
        .iter()
        .find(|(needle, _, _)| message.contains(needle))
        .map(|(_, status, public)| (*status, *public))
        .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR))
}

/// Outcome of a metrics request, ready to be written to the client.
#[derive(Clone, Debug, PartialEq)]
pub enum MetricsReply {
    Ok(MetricsResponse),
    Failed {
        status: StatusCode,
        body: ErrorResponse,
    },
}

impl MetricsReply {
    /// Error-shaped reply with zeroed metrics.
    pub fn failed(status: StatusCode, public: &str) -> Self {
        Self::Failed {
            status,
            body: ErrorResponse {
                error: public.to_owned(),
                metrics: MetricsResponse::empty(),
            },
        }
    }

    /// Reply for failures outside the upstream error taxonomy.
    pub fn internal_error() -> Self {
        Self::failed(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Ok(_) => StatusCode::OK,
            Self::Failed { status, .. } => *status,
        }
    }
}

impl IntoResponse for MetricsReply {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(metrics) => (StatusCode::OK, Json(metrics)).into_response(),
            Self::Failed { status, body } => (status, Json(body)).into_response(),
        }
    }
}

/// Fetches books and computes metrics for one request.
#[derive(Clone)]
pub struct MetricsResponder {
    source: Arc<dyn BooksSource>,
    service: MetricsService,
}

impl fmt::Debug for MetricsResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsResponder")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl MetricsResponder {
    pub fn new(source: Arc<dyn BooksSource>) -> Self {
        Self::with_service(source, MetricsService::default())
    }

    pub fn with_service(source: Arc<dyn BooksSource>, service: MetricsService) -> Self {
        Self { source, service }
    }

    /// Raw upstream messages never reach the reply; they are only logged.
    pub async fn respond(&self, author: Option<&str>) -> MetricsReply {
        match self.source.get_books().await {
            Ok(books) => MetricsReply::Ok(self.service.generate_metrics(&books, author)),
            Err(err) => {
                tracing::error!(error = %err, "error in metrics route");
                let (status, public) = map_error(&err);
                MetricsReply::failed(status, public)
            }
        }
    }
}
