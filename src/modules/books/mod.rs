pub mod models;
pub mod routes;
pub mod service;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{settings::CatalogSettings, InitCtx, Module};
use serde_json::json;

use service::CatalogService;
use store::BookStore;

/// Books module: the in-memory catalog and its HTTP surface
pub struct BooksModule {
    catalog: Arc<CatalogService>,
}

impl BooksModule {
    pub fn new(catalog: Arc<CatalogService>) -> Self {
        Self { catalog }
    }

    /// Build the module from settings, seeding the sample catalog when asked.
    pub fn from_settings(settings: &CatalogSettings) -> Self {
        let store = if settings.seed_sample_books {
            BookStore::with_sample_books()
        } else {
            BookStore::new()
        };
        Self::new(Arc::new(CatalogService::new(store)))
    }

    pub fn catalog(&self) -> &Arc<CatalogService> {
        &self.catalog
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
            books = self.catalog.book_count(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(Arc::clone(&self.catalog))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            books = self.catalog.book_count(),
            "books module stopped"
        );
        Ok(())
    }
}

fn json_content(schema: serde_json::Value) -> serde_json::Value {
    json!({ "application/json": { "schema": schema } })
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": json_content(json!({ "$ref": "#/components/schemas/ErrorResponse" }))
    })
}

fn query_param(name: &str, schema_type: &str, required: bool, description: &str) -> serde_json::Value {
    json!({
        "name": name,
        "in": "query",
        "required": required,
        "description": description,
        "schema": { "type": schema_type }
    })
}

fn id_param() -> serde_json::Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": "Book identifier",
        "schema": { "type": "integer", "format": "int64", "minimum": 1 }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let book_ref = json!({ "$ref": "#/components/schemas/Book" });

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "parameters": [
                        query_param("genre", "string", false, "Exact genre, case-insensitive"),
                        query_param("author", "string", false, "Author substring, case-insensitive"),
                        query_param("title", "string", false, "Title substring, case-insensitive"),
                        query_param("minPrice", "number", false, "Inclusive lower price bound"),
                        query_param("maxPrice", "number", false, "Inclusive upper price bound")
                    ],
                    "responses": {
                        "200": {
                            "description": "Matching books",
                            "content": json_content(json!({ "type": "array", "items": book_ref }))
                        },
                        "400": error_response("Malformed price bound")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": json_content(json!({ "$ref": "#/components/schemas/CreateBook" }))
                    },
                    "responses": {
                        "201": {
                            "description": "Created book",
                            "content": json_content(book_ref.clone())
                        },
                        "400": error_response("Malformed JSON body"),
                        "422": error_response("Missing or invalid fields")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            },
            "/discounted-price": {
                "get": {
                    "summary": "Total discounted price of a genre",
                    "tags": ["Books"],
                    "parameters": [
                        query_param("genre", "string", true, "Genre, case-insensitive"),
                        query_param("discount", "number", true, "Discount percentage between 0 and 100")
                    ],
                    "responses": {
                        "200": {
                            "description": "Discounted total",
                            "content": json_content(json!({ "$ref": "#/components/schemas/DiscountResult" }))
                        },
                        "400": error_response("Missing genre or discount out of range"),
                        "404": error_response("No books in genre")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [id_param()],
                    "responses": {
                        "200": { "description": "Book", "content": json_content(book_ref.clone()) },
                        "400": error_response("Invalid book ID"),
                        "404": error_response("Book not found")
                    }
                },
                "put": {
                    "summary": "Update some fields of a book",
                    "tags": ["Books"],
                    "parameters": [id_param()],
                    "requestBody": {
                        "required": true,
                        "content": json_content(json!({ "$ref": "#/components/schemas/UpdateBook" }))
                    },
                    "responses": {
                        "200": { "description": "Updated book", "content": json_content(book_ref.clone()) },
                        "400": error_response("Invalid book ID or malformed JSON body"),
                        "404": error_response("Book not found"),
                        "422": error_response("Invalid field values")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_param()],
                    "responses": {
                        "204": { "description": "Deleted" },
                        "400": error_response("Invalid book ID"),
                        "404": error_response("Book not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64", "description": "Identifier assigned at creation" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "genre": { "type": "string" },
                        "price": { "type": "number", "exclusiveMinimum": 0 }
                    },
                    "required": ["id", "title", "author", "genre", "price"]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "minLength": 1 },
                        "author": { "type": "string", "minLength": 1 },
                        "genre": { "type": "string", "minLength": 1 },
                        "price": { "type": "number", "exclusiveMinimum": 0 }
                    },
                    "required": ["title", "author", "genre", "price"]
                },
                "UpdateBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "minLength": 1 },
                        "author": { "type": "string", "minLength": 1 },
                        "genre": { "type": "string", "minLength": 1 },
                        "price": { "type": "number", "exclusiveMinimum": 0 }
                    }
                },
                "DiscountResult": {
                    "type": "object",
                    "properties": {
                        "genre": { "type": "string", "description": "Genre as requested" },
                        "discount_percentage": { "type": "number" },
                        "total_discounted_price": { "type": "number", "description": "Rounded to cents" }
                    },
                    "required": ["genre", "discount_percentage", "total_discounted_price"]
                }
            }
        }
    })
}
