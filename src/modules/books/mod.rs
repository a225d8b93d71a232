pub mod catalog;
pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use tokio::sync::RwLock;

use catalog::BookCatalog;
use routes::SharedCatalog;

/// Books module: owns the in-memory catalog for the life of the process
pub struct BooksModule {
    catalog: SharedCatalog,
}

impl BooksModule {
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(RwLock::new(BookCatalog::new())),
        }
    }

    /// Handle on the catalog served by this module's routes
    pub fn catalog(&self) -> SharedCatalog {
        self.catalog.clone()
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.catalog.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let fail = serde_json::json!({
            "application/json": {
                "schema": { "$ref": "#/components/schemas/FailResponse" }
            }
        });
        let payload = serde_json::json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/BookPayload" }
                }
            }
        });
        let id_param = serde_json::json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        });
        let query_param = |name: &str, description: &str| {
            serde_json::json!({
                "name": name,
                "in": "query",
                "required": false,
                "description": description,
                "schema": { "type": "string" }
            })
        };

        Some(serde_json::json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            query_param("name", "Case-insensitive substring of the book name"),
                            query_param("reading", "1 for books being read, 0 otherwise"),
                            query_param("finished", "1 for finished books, 0 otherwise")
                        ],
                        "responses": {
                            "200": {
                                "description": "Matching books as {id, name, publisher}",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/BookSummary" }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "requestBody": payload.clone(),
                        "responses": {
                            "201": { "description": "Book added; data.bookId holds the new id" },
                            "400": { "description": "Missing name or readPage > pageCount", "content": fail.clone() }
                        }
                    }
                },
                "/books/{id}": {
                    "get": {
                        "summary": "Fetch a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": {
                                "description": "The full book record under data.book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": { "description": "Unknown id", "content": fail.clone() }
                        }
                    },
                    "put": {
                        "summary": "Update a book",
                        "tags": ["Books"],
                        "parameters": [id_param.clone()],
                        "requestBody": payload,
                        "responses": {
                            "200": { "description": "Book updated" },
                            "400": { "description": "Missing name or readPage > pageCount", "content": fail.clone() },
                            "404": { "description": "Unknown id", "content": fail.clone() }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "200": { "description": "Book deleted" },
                            "404": { "description": "Unknown id", "content": fail }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "year": { "type": "integer" },
                            "author": { "type": "string" },
                            "summary": { "type": "string" },
                            "publisher": { "type": "string" },
                            "pageCount": { "type": ["integer", "null"], "minimum": 0 },
                            "readPage": { "type": ["integer", "null"], "minimum": 0 },
                            "finished": { "type": "boolean" },
                            "reading": { "type": "boolean" },
                            "insertedAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": [
                            "id", "name", "year", "author", "summary", "publisher", "pageCount",
                            "readPage", "finished", "reading", "insertedAt", "updatedAt"
                        ]
                    },
                    "BookPayload": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "year": { "type": "integer" },
                            "author": { "type": "string" },
                            "summary": { "type": "string" },
                            "publisher": { "type": "string" },
                            "pageCount": { "type": "integer", "minimum": 0 },
                            "readPage": { "type": "integer", "minimum": 0 },
                            "reading": { "type": "boolean" }
                        },
                        "required": ["name"]
                    },
                    "BookSummary": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "publisher": { "type": "string" }
                        },
                        "required": ["id", "name", "publisher"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let discarded = self.catalog.read().await.len();
        tracing::info!(module = self.name(), discarded, "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(BooksModule::new())
}
