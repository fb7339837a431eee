use serde::{Deserialize, Serialize, Serializer};

/// A book record as exposed by the metrics API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub author: String,
    pub units_sold: u64,
    #[serde(serialize_with = "serialize_number")]
    pub price: f64,
}

impl Book {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        author: impl Into<String>,
        units_sold: u64,
        price: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            author: author.into(),
            units_sold,
            price,
        }
    }
}

/// Aggregate statistics computed over one fetched book collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricsResponse {
    #[serde(serialize_with = "serialize_number")]
    pub mean_units_sold: f64,
    pub cheapest_book: Option<Book>,
    pub books_written_by_author: Vec<Book>,
}

impl MetricsResponse {
    /// Zeroed metrics, used alongside an error.
    pub fn empty() -> Self {
        Self {
            mean_units_sold: 0.0,
            cheapest_book: None,
            books_written_by_author: Vec::new(),
        }
    }
}

/// Body returned when metrics could not be computed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(flatten)]
    pub metrics: MetricsResponse,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Writes whole numbers as JSON integers (`200`, not `200.0`).
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    // 2^53: past this, f64 no longer represents every integer.
    const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() < EXACT_LIMIT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
