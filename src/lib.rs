//! `books-metrics-http` serves aggregate statistics over a books endpoint.
//!
//! Books are fetched fresh on every request through [`RetryingFetcher`],
//! which retries transient failures with exponential backoff and translates
//! the final failure into a stable message. The metrics themselves are
//! computed by a [`MetricsCalculator`]:
//! - mean units sold
//! - cheapest book
//! - books written by a given author

mod books;
mod calculator;
mod config;
mod decode;
mod error;
mod fetcher;
mod options;
mod responder;
mod server;
mod types;
mod wire;

pub mod translate;

pub use books::{BooksSource, HttpBooksSource, StaticBooksSource, DEFAULT_BOOKS_URL};
pub use calculator::{BookCalculator, MetricsCalculator, MetricsService};
pub use config::{AppConfig, SourceKind};
pub use error::MetricsError;
pub use fetcher::{RetryEvent, RetryObserver, RetryingFetcher, TracingRetryObserver};
pub use options::{RetryConfig, DEFAULT_REQUEST_TIMEOUT};
pub use responder::{map_error, MetricsReply, MetricsResponder};
pub use server::{router, MetricsQuery};
pub use types::{Book, ErrorResponse, HealthResponse, MetricsResponse};

pub type Result<T> = std::result::Result<T, MetricsError>;
