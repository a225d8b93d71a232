//! In-memory, insertion-ordered book store.

use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::models::{Book, BookFilter, BookPayload, BookSummary};

const ID_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("book name is required")]
    MissingName,

    #[error("readPage {read_page} exceeds pageCount {page_count}")]
    ReadPageExceedsPageCount { read_page: u32, page_count: u32 },

    #[error("book '{0}' not found")]
    NotFound(String),
}

/// The catalog. Lookups are linear scans; entries keep insertion order.
#[derive(Debug, Default)]
pub struct BookCatalog {
    books: Vec<Book>,
}

impl BookCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Validate and append a new book, returning its generated id.
    pub fn add(&mut self, payload: BookPayload) -> Result<String, CatalogError> {
        let name = validate(&payload)?;
        let now = OffsetDateTime::now_utc();
        let id = self.fresh_id();

        let book = Book::create(id.clone(), name, payload, now);
        self.books.push(book);

        tracing::info!(book_id = %id, total = self.books.len(), "book added");
        Ok(id)
    }

    /// Projections of every book matching `filter`, in insertion order.
    pub fn list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        self.books
            .iter()
            .filter(|book| filter.matches(book))
            .map(BookSummary::from)
            .collect()
    }

    pub fn get(&self, id: &str) -> Result<&Book, CatalogError> {
        self.books
            .iter()
            .find(|book| book.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Replace every mutable field of an existing book.
    pub fn update(&mut self, id: &str, payload: BookPayload) -> Result<(), CatalogError> {
        let index = self.position(id)?;
        let name = validate(&payload)?;

        self.books[index].apply(payload, name, OffsetDateTime::now_utc());

        tracing::info!(book_id = %id, "book updated");
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<Book, CatalogError> {
        let index = self.position(id)?;
        let removed = self.books.remove(index);

        tracing::info!(book_id = %id, total = self.books.len(), "book deleted");
        Ok(removed)
    }

    fn position(&self, id: &str) -> Result<usize, CatalogError> {
        self.books
            .iter()
            .position(|book| book.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    fn fresh_id(&self) -> String {
        loop {
            let uuid = Uuid::now_v7().simple().to_string();
            let candidate = uuid[uuid.len() - ID_LEN..].to_string();
            if self.position(&candidate).is_err() {
                return candidate;
            }
        }
    }
}

/// Name presence, then page consistency. Returns the accepted name.
fn validate(payload: &BookPayload) -> Result<String, CatalogError> {
    let name = match payload.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            tracing::debug!("rejecting book without a name");
            return Err(CatalogError::MissingName);
        }
    };

    // Pages are only comparable when both were supplied.
    if let (Some(read_page), Some(page_count)) = (payload.read_page, payload.page_count) {
        if read_page > page_count {
            tracing::debug!(
                read_page,
                page_count,
                "rejecting book with readPage past pageCount"
            );
            return Err(CatalogError::ReadPageExceedsPageCount {
                read_page,
                page_count,
            });
        }
    }

    Ok(name)
}
