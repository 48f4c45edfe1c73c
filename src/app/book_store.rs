use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng as _;

use crate::app::error::{LookupOp, StoreError, ValidationError, WriteOp};
use crate::app::model::{Book, BookFields, BookFilter, BookInput, BookSummary};

pub const BOOK_ID_LEN: usize = 16;

const BOOK_ID_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

#[async_trait]
pub trait BookStore: Send + Sync {
    async fn add(&self, input: BookInput) -> Result<String, StoreError>;
    async fn list(&self, filter: &BookFilter) -> Vec<BookSummary>;
    async fn get(&self, book_id: &str) -> Result<Book, StoreError>;
    async fn update(&self, book_id: &str, input: BookInput) -> Result<Book, StoreError>;
    async fn delete(&self, book_id: &str) -> Result<(), StoreError>;
}

/// Process-lifetime book collection, kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    books: Mutex<Vec<Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn books(&self) -> MutexGuard<'_, Vec<Book>> {
        self.books.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn add(&self, input: BookInput) -> Result<String, StoreError> {
        let fields = validate(WriteOp::Add, input)?;

        let mut books = self.books();
        let book_id = loop {
            let candidate = generate_book_id();
            if !books.iter().any(|book| book.id == candidate) {
                break candidate;
            }
        };
        books.push(Book::new(book_id.clone(), fields, Utc::now()));

        if !books.iter().any(|book| book.id == book_id) {
            return Err(StoreError::AddFailed {
                detail: format!("book {book_id} missing after insert"),
            });
        }

        tracing::info!(book_id = %book_id, "book added");
        Ok(book_id)
    }

    async fn list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        self.books()
            .iter()
            .filter(|book| filter.matches(book))
            .map(Book::to_summary)
            .collect()
    }

    async fn get(&self, book_id: &str) -> Result<Book, StoreError> {
        self.books()
            .iter()
            .find(|book| book.id == book_id)
            .cloned()
            .ok_or(StoreError::not_found(LookupOp::Get))
    }

    async fn update(&self, book_id: &str, input: BookInput) -> Result<Book, StoreError> {
        let fields = validate(WriteOp::Update, input)?;

        let mut books = self.books();
        let book = books
            .iter_mut()
            .find(|book| book.id == book_id)
            .ok_or(StoreError::not_found(LookupOp::Update))?;
        book.apply(fields, Utc::now());

        tracing::info!(book_id = %book_id, "book updated");
        Ok(book.clone())
    }

    async fn delete(&self, book_id: &str) -> Result<(), StoreError> {
        let mut books = self.books();
        let index = books
            .iter()
            .position(|book| book.id == book_id)
            .ok_or(StoreError::not_found(LookupOp::Delete))?;
        books.remove(index);

        tracing::info!(book_id = %book_id, "book deleted");
        Ok(())
    }
}

fn validate(op: WriteOp, input: BookInput) -> Result<BookFields, StoreError> {
    let name = input
        .name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| StoreError::validation(op, ValidationError::MissingName))?;

    if input.read_page > input.page_count {
        return Err(StoreError::validation(
            op,
            ValidationError::ReadPageExceedsPageCount,
        ));
    }

    Ok(BookFields {
        name,
        year: input.year,
        author: input.author,
        summary: input.summary,
        publisher: input.publisher,
        page_count: input.page_count,
        read_page: input.read_page,
        reading: input.reading,
    })
}

fn generate_book_id() -> String {
    let mut rng = rand::thread_rng();
    (0..BOOK_ID_LEN)
        .map(|_| char::from(BOOK_ID_ALPHABET[rng.gen_range(0..BOOK_ID_ALPHABET.len())]))
        .collect()
}
