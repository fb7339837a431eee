use async_trait::async_trait;

use crate::{decode::decode_books, wire, Book, MetricsError, Result, RetryingFetcher};

/// Default upstream books endpoint.
pub const DEFAULT_BOOKS_URL: &str = "https://6781684b85151f714b0aa5db.mockapi.io/api/v1/books";

/// Provides the book collection metrics are computed over.
#[async_trait]
pub trait BooksSource: Send + Sync {
    async fn get_books(&self) -> Result<Vec<Book>>;
}

/// Fetches books from an HTTP endpoint through a [`RetryingFetcher`].
#[derive(Clone, Debug)]
pub struct HttpBooksSource {
    fetcher: RetryingFetcher,
    url: String,
}

impl HttpBooksSource {
    pub fn new(url: impl Into<String>, fetcher: RetryingFetcher) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpBooksSource {
    fn default() -> Self {
        Self::new(DEFAULT_BOOKS_URL, RetryingFetcher::default())
    }
}

#[async_trait]
impl BooksSource for HttpBooksSource {
    /// Any failure is logged and re-raised as [`MetricsError::BooksFetch`],
    /// keeping the inner message as a substring.
    async fn get_books(&self) -> Result<Vec<Book>> {
        let fetched = self
            .fetcher
            .get::<Vec<wire::Book>>(&self.url)
            .await
            .and_then(decode_books);

        fetched.map_err(|err| {
            tracing::error!(url = %self.url, error = %err, "error fetching books");
            MetricsError::books_fetch(&err)
        })
    }
}

/// Serves a fixed in-memory collection.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticBooksSource {
    books: Vec<Book>,
}

impl StaticBooksSource {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// Three well-known programming books.
    pub fn sample() -> Self {
        Self::new(vec![
            Book::new(1, "Node.js Design Patterns", "Mario Casciaro", 5_000, 40.0),
            Book::new(2, "Clean Code", "Robert C. Martin", 15_000, 50.0),
            Book::new(3, "The Pragmatic Programmer", "Andrew Hunt", 13_000, 45.0),
        ])
    }
}

#[async_trait]
impl BooksSource for StaticBooksSource {
    async fn get_books(&self) -> Result<Vec<Book>> {
        Ok(self.books.clone())
    }
}
