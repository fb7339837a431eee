use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    options::DEFAULT_REQUEST_TIMEOUT, translate::AttemptFailure, MetricsError, Result,
    RetryConfig,
};

/// Details of a failed attempt that is about to be retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryEvent<'a> {
    /// 1-based number of the attempt that just failed.
    pub attempt: u32,
    /// Attempt budget for the whole call.
    pub max_attempts: u32,
    /// Upstream status of the failed attempt, if a response was received.
    pub status: Option<u16>,
    /// Raw message of the failed attempt.
    pub message: &'a str,
    /// Backoff before the next attempt.
    pub delay: Duration,
}

/// Receives a notification before every retry.
pub trait RetryObserver: Send + Sync {
    fn on_retry(&self, event: &RetryEvent<'_>);
}

/// Reports retries as warn-level `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingRetryObserver;

impl RetryObserver for TracingRetryObserver {
    fn on_retry(&self, event: &RetryEvent<'_>) {
        tracing::warn!(
            attempt = event.attempt,
            max_attempts = event.max_attempts,
            status = event.status,
            "HTTP request failed (attempt {}/{}): {}. Retrying in {}ms...",
            event.attempt,
            event.max_attempts,
            event.message,
            event.delay.as_millis()
        );
    }
}

enum AttemptError {
    /// Classified transport or HTTP failure.
    Failed(AttemptFailure),
    /// Failure outside the transport/HTTP taxonomy; never retried or translated.
    Fatal(MetricsError),
}

/// GET client with bounded exponential backoff and error translation.
#[derive(Clone)]
pub struct RetryingFetcher {
    http: reqwest::Client,
    config: Arc<RetryConfig>,
    request_timeout: Duration,
    observer: Arc<dyn RetryObserver>,
}

impl fmt::Debug for RetryingFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryingFetcher")
            .field("config", &self.config)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl Default for RetryingFetcher {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl RetryingFetcher {
    /// Creates a fetcher that logs retries through `tracing`.
    pub fn new(config: impl Into<Arc<RetryConfig>>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config: config.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            observer: Arc::new(TracingRetryObserver),
        }
    }

    /// Replaces the retry observer.
    pub fn with_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replaces the underlying `reqwest` client.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Overrides the per-attempt timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Fetches `url` and decodes the JSON body as `T`.
    ///
    /// Makes at most `max_retries + 1` attempts. Statuses outside the
    /// configured retryable set fail on the first occurrence; an exhausted
    /// budget fails with the translation of the last attempt.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get_text(url).await?;
        serde_json::from_str::<T>(&body).map_err(|err| {
            MetricsError::Decode(format!("invalid JSON payload from {url}: {err}"))
        })
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let max_attempts = self.config.max_attempts();
        let mut attempt = 1u32;
        loop {
            let failure = match self.send_once(url).await {
                Ok(body) => return Ok(body),
                Err(AttemptError::Fatal(err)) => return Err(err),
                Err(AttemptError::Failed(failure)) => failure,
            };

            if !failure.retryable || attempt >= max_attempts {
                return Err(failure.translate());
            }

            let delay = self.config.delay_for(attempt);
            self.observer.on_retry(&RetryEvent {
                attempt,
                max_attempts,
                status: failure.status,
                message: &failure.message,
                delay,
            });
            sleep(delay).await;
            attempt += 1;
        }
    }

    async fn send_once(&self, url: &str) -> std::result::Result<String, AttemptError> {
        tracing::debug!(url, "sending upstream request");

        let response = self
            .http
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|err| classify_transport(err, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Failed(AttemptFailure::status(
                status,
                url,
                &self.config,
            )));
        }

        response
            .text()
            .await
            .map_err(|err| classify_transport(err, url))
    }
}

fn classify_transport(err: reqwest::Error, url: &str) -> AttemptError {
    if err.is_builder() {
        return AttemptError::Fatal(MetricsError::InvalidRequest(err.to_string()));
    }
    AttemptError::Failed(AttemptFailure::network(err.to_string(), url))
}
