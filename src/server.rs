use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::{HealthResponse, MetricsReply, MetricsResponder};

#[derive(Debug, Default, Deserialize)]
pub struct MetricsQuery {
    pub author: Option<String>,
}

/// Builds the HTTP router: `GET /metrics` and `GET /health`, open to any origin.
pub fn router(responder: MetricsResponder) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(responder)
}

/// A query string that does not parse gets the error-shaped 500 reply.
async fn metrics(
    State(responder): State<MetricsResponder>,
    query: Result<Query<MetricsQuery>, QueryRejection>,
) -> MetricsReply {
    match query {
        Ok(Query(query)) => responder.respond(query.author.as_deref()).await,
        Err(rejection) => {
            tracing::error!(error = %rejection.body_text(), "invalid metrics query");
            MetricsReply::internal_error()
        }
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_owned(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
