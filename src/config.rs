use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    options::DEFAULT_REQUEST_TIMEOUT, BooksSource, HttpBooksSource, MetricsError, Result,
    RetryConfig, RetryingFetcher, StaticBooksSource, DEFAULT_BOOKS_URL,
};

/// Which [`BooksSource`] the server is wired to.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SourceKind {
    /// Live upstream over HTTP.
    #[default]
    Http,
    /// Fixed in-memory sample collection.
    Mock,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "mock" => Ok(Self::Mock),
            other => Err(format!("unknown books source '{other}', expected http or mock")),
        }
    }
}

/// Runtime configuration of the metrics server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub api_url: String,
    pub source: SourceKind,
    pub retry: RetryConfig,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            api_url: DEFAULT_BOOKS_URL.to_owned(),
            source: SourceKind::Http,
            retry: RetryConfig::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    ///
    /// Reads:
    /// - `PORT`, `API_URL`, `BOOKS_SOURCE` (`http` or `mock`)
    /// - `RETRY_MAX_RETRIES`, `RETRY_BASE_DELAY_MS`, `RETRY_MAX_DELAY_MS`
    /// - `REQUEST_TIMEOUT_MS`
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_delay_ms = parse_var(
            &read,
            "RETRY_BASE_DELAY_MS",
            millis(defaults.retry.base_delay),
        )?;
        let max_delay_ms =
            parse_var(&read, "RETRY_MAX_DELAY_MS", millis(defaults.retry.max_delay))?;
        let timeout_ms =
            parse_var(&read, "REQUEST_TIMEOUT_MS", millis(defaults.request_timeout))?;
        for (key, value) in [
            ("RETRY_BASE_DELAY_MS", base_delay_ms),
            ("RETRY_MAX_DELAY_MS", max_delay_ms),
            ("REQUEST_TIMEOUT_MS", timeout_ms),
        ] {
            if value == 0 {
                return Err(MetricsError::Config(format!("{key} must be greater than 0")));
            }
        }

        Ok(Self {
            port: parse_var(&read, "PORT", defaults.port)?,
            api_url: read("API_URL").unwrap_or(defaults.api_url),
            source: parse_var(&read, "BOOKS_SOURCE", defaults.source)?,
            retry: RetryConfig {
                max_retries: parse_var(&read, "RETRY_MAX_RETRIES", defaults.retry.max_retries)?,
                base_delay: Duration::from_millis(base_delay_ms),
                max_delay: Duration::from_millis(max_delay_ms),
                retryable_status_codes: defaults.retry.retryable_status_codes,
            },
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Builds the configured books source.
    pub fn books_source(&self) -> Arc<dyn BooksSource> {
        match self.source {
            SourceKind::Mock => Arc::new(StaticBooksSource::sample()),
            SourceKind::Http => {
                let fetcher = RetryingFetcher::new(self.retry.clone())
                    .with_request_timeout(self.request_timeout);
                Arc::new(HttpBooksSource::new(self.api_url.clone(), fetcher))
            }
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn parse_var<T, R>(read: &R, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    R: Fn(&str) -> Option<String>,
{
    match read(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|err| MetricsError::Config(format!("invalid {key} '{raw}': {err}"))),
    }
}
