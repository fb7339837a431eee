use serde::Deserialize;

/// One book as returned by the upstream endpoint.
#[derive(Debug, Deserialize)]
pub struct Book {
    pub id: Id,
    pub name: String,
    pub author: String,
    pub units_sold: u64,
    pub price: f64,
}

/// Upstream ids arrive either as JSON numbers or as numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Integer(i64),
    Text(String),
}
