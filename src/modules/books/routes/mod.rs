//! `/books` handlers. Each catalog failure becomes a fixed, localized message.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_http::{ApiResponse, AppError, JsonBody};
use serde::Serialize;
use tokio::sync::RwLock;

use super::catalog::{BookCatalog, CatalogError};
use super::models::{Book, BookFilter, BookPayload, BookSummary, ListQuery};

/// The catalog as shared with handlers; writers hold the lock for the whole
/// read-modify-write.
pub type SharedCatalog = Arc<RwLock<BookCatalog>>;

const BOOK_ADDED: &str = "Buku berhasil ditambahkan";
const BOOK_UPDATED: &str = "Buku berhasil diperbarui";
const BOOK_DELETED: &str = "Buku berhasil dihapus";
const BOOK_NOT_FOUND: &str = "Buku tidak ditemukan";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCreated {
    pub book_id: String,
}

#[derive(Debug, Serialize)]
pub struct BookList {
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Serialize)]
pub struct BookDetail {
    pub book: Book,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Add,
    Update,
    Delete,
}

impl Action {
    fn failure_prefix(self) -> &'static str {
        match self {
            Action::Add => "Gagal menambahkan buku",
            Action::Update => "Gagal memperbarui buku",
            Action::Delete => "Buku gagal dihapus",
        }
    }

    fn reject(self, err: CatalogError) -> AppError {
        let prefix = self.failure_prefix();
        match err {
            CatalogError::NotFound(_) => {
                AppError::not_found(format!("{prefix}. Id tidak ditemukan"))
            }
            CatalogError::MissingName => {
                AppError::validation(format!("{prefix}. Mohon isi nama buku"))
            }
            CatalogError::ReadPageExceedsPageCount { .. } => AppError::validation(format!(
                "{prefix}. readPage tidak boleh lebih besar dari pageCount"
            )),
        }
    }
}

/// Routes for the books resource, bound to `catalog`.
pub fn router(catalog: SharedCatalog) -> Router {
    Router::new()
        .route("/books", get(list_books).post(add_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(catalog)
}

async fn add_book(
    State(catalog): State<SharedCatalog>,
    JsonBody(payload): JsonBody<BookPayload>,
) -> Result<(StatusCode, Json<ApiResponse<BookCreated>>), AppError> {
    let book_id = catalog
        .write()
        .await
        .add(payload)
        .map_err(|err| Action::Add.reject(err))?;

    let body = ApiResponse::success(BookCreated { book_id }).message(BOOK_ADDED);
    Ok((StatusCode::CREATED, Json(body)))
}

async fn list_books(
    State(catalog): State<SharedCatalog>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<BookList>>, AppError> {
    let Query(query) = query?;
    let filter = BookFilter::from(query);

    let books = catalog.read().await.list(&filter);
    tracing::debug!(matched = books.len(), ?filter, "listing books");

    Ok(Json(ApiResponse::success(BookList { books })))
}

async fn get_book(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<BookDetail>>, AppError> {
    let book = catalog
        .read()
        .await
        .get(&id)
        .cloned()
        .map_err(|_| AppError::not_found(BOOK_NOT_FOUND))?;

    Ok(Json(ApiResponse::success(BookDetail { book })))
}

async fn update_book(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<BookPayload>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    catalog
        .write()
        .await
        .update(&id, payload)
        .map_err(|err| Action::Update.reject(err))?;

    Ok(Json(ApiResponse::done(BOOK_UPDATED)))
}

async fn delete_book(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    catalog
        .write()
        .await
        .delete(&id)
        .map_err(|err| Action::Delete.reject(err))?;

    Ok(Json(ApiResponse::done(BOOK_DELETED)))
}
