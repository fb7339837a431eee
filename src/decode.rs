use crate::{wire, Book, MetricsError};

pub(crate) fn decode_books(books: Vec<wire::Book>) -> Result<Vec<Book>, MetricsError> {
    books
        .into_iter()
        .enumerate()
        .map(|(index, book)| decode_book(book, index))
        .collect()
}

fn decode_book(book: wire::Book, index: usize) -> Result<Book, MetricsError> {
    Ok(Book {
        id: decode_id(book.id, index)?,
        name: book.name,
        author: book.author,
        units_sold: book.units_sold,
        price: book.price,
    })
}

fn decode_id(id: wire::Id, index: usize) -> Result<i64, MetricsError> {
    match id {
        wire::Id::Integer(value) => Ok(value),
        wire::Id::Text(value) => value.trim().parse::<i64>().map_err(|err| {
            MetricsError::Decode(format!(
                "invalid book id '{value}' at index {index}: {err}"
            ))
        }),
    }
}
