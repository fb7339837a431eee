use std::fmt;
use std::sync::Arc;

use crate::{Book, MetricsResponse};

/// Pure statistics over an in-memory book collection.
pub trait MetricsCalculator: Send + Sync {
    /// Arithmetic mean of `units_sold`; `0` for an empty collection.
    fn mean_units_sold(&self, books: &[Book]) -> f64;

    /// Book with the lowest price, first occurrence winning ties.
    fn cheapest_book<'a>(&self, books: &'a [Book]) -> Option<&'a Book>;

    /// Books whose author matches `author` case-insensitively, in input order.
    fn books_by_author(&self, books: &[Book], author: &str) -> Vec<Book>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BookCalculator;

impl MetricsCalculator for BookCalculator {
    fn mean_units_sold(&self, books: &[Book]) -> f64 {
        if books.is_empty() {
            return 0.0;
        }
        let total: f64 = books.iter().map(|book| book.units_sold as f64).sum();
        total / books.len() as f64
    }

    fn cheapest_book<'a>(&self, books: &'a [Book]) -> Option<&'a Book> {
        books.iter().fold(None, |cheapest, book| match cheapest {
            Some(current) if book.price < current.price => Some(book),
            Some(current) => Some(current),
            None => Some(book),
        })
    }

    fn books_by_author(&self, books: &[Book], author: &str) -> Vec<Book> {
        let author = author.to_lowercase();
        books
            .iter()
            .filter(|book| book.author.to_lowercase() == author)
            .cloned()
            .collect()
    }
}

/// Builds a [`MetricsResponse`] from a calculator.
#[derive(Clone)]
pub struct MetricsService {
    calculator: Arc<dyn MetricsCalculator>,
}

impl fmt::Debug for MetricsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsService").finish_non_exhaustive()
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new(Arc::new(BookCalculator))
    }
}

impl MetricsService {
    pub fn new(calculator: Arc<dyn MetricsCalculator>) -> Self {
        Self { calculator }
    }

    /// An absent or empty `author` yields an empty author list, not every book.
    pub fn generate_metrics(&self, books: &[Book], author: Option<&str>) -> MetricsResponse {
        let books_written_by_author = match author {
            Some(author) if !author.is_empty() => self.calculator.books_by_author(books, author),
            _ => Vec::new(),
        };

        MetricsResponse {
            mean_units_sold: self.calculator.mean_units_sold(books),
            cheapest_book: self.calculator.cheapest_book(books).cloned(),
            books_written_by_author,
        }
    }
}
