use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A catalog entry as stored and returned by `GET /books/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Generated on creation, never changes
    pub id: String,
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    /// `None` when the client never supplied it
    pub page_count: Option<u32>,
    pub read_page: Option<u32>,
    /// Always `read_page == page_count`
    pub finished: bool,
    pub reading: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub inserted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Book {
    pub(crate) fn create(
        id: String,
        name: String,
        payload: BookPayload,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            name,
            year: payload.year.unwrap_or_default(),
            author: payload.author.unwrap_or_default(),
            summary: payload.summary.unwrap_or_default(),
            publisher: payload.publisher.unwrap_or_default(),
            page_count: payload.page_count,
            read_page: payload.read_page,
            finished: payload.read_page == payload.page_count,
            reading: payload.reading.unwrap_or_default(),
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every client-controlled field and recompute `finished`.
    pub(crate) fn apply(&mut self, payload: BookPayload, name: String, now: OffsetDateTime) {
        self.name = name;
        self.year = payload.year.unwrap_or_default();
        self.author = payload.author.unwrap_or_default();
        self.summary = payload.summary.unwrap_or_default();
        self.publisher = payload.publisher.unwrap_or_default();
        self.page_count = payload.page_count;
        self.read_page = payload.read_page;
        self.finished = payload.read_page == payload.page_count;
        self.reading = payload.reading.unwrap_or_default();
        self.updated_at = now;
    }
}

/// Request body for `POST /books` and `PUT /books/{id}`.
///
/// Only `name` is required. Missing or `null` fields fall back to their zero
/// value when stored, except the page fields, which stay absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookPayload {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: Option<u32>,
    pub read_page: Option<u32>,
    pub reading: Option<bool>,
}

/// List projection: the only fields `GET /books` exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: String,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Raw `GET /books` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub reading: Option<String>,
    pub finished: Option<String>,
}

/// Predicates applied by the catalog list operation; all present ones must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Lowercased needle for a case-insensitive substring match
    name: Option<String>,
    reading: Option<bool>,
    finished: Option<bool>,
}

impl BookFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, needle: impl AsRef<str>) -> Self {
        self.name = Some(needle.as_ref().to_lowercase());
        self
    }

    pub fn reading(mut self, reading: bool) -> Self {
        self.reading = Some(reading);
        self
    }

    pub fn finished(mut self, finished: bool) -> Self {
        self.finished = Some(finished);
        self
    }

    pub fn matches(&self, book: &Book) -> bool {
        if let Some(needle) = &self.name {
            if !book.name.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if self.reading.is_some_and(|reading| book.reading != reading) {
            return false;
        }
        if self.finished.is_some_and(|finished| book.finished != finished) {
            return false;
        }
        true
    }
}

impl From<ListQuery> for BookFilter {
    /// Flags read `"1"` as true and any other value as false; an empty name is ignored.
    fn from(query: ListQuery) -> Self {
        let mut filter = BookFilter::new();
        if let Some(name) = query.name.filter(|name| !name.is_empty()) {
            filter = filter.name(name);
        }
        if let Some(reading) = query.reading {
            filter = filter.reading(reading == "1");
        }
        if let Some(finished) = query.finished {
            filter = filter.finished(finished == "1");
        }
        filter
    }
}
