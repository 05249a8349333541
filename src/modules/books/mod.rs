pub mod models;
pub mod resolver;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use bookshelf_db::{Book, Reviewer, Store};
use bookshelf_http::AppError;
use bookshelf_kernel::{InitCtx, Module};

use models::{AttachReviewer, CreateBook};

/// Books module: the catalog's main surface, including the token-resolved
/// item route and the reviewers sub-resource.
pub struct BooksModule {
    store: Arc<Store>,
}

impl BooksModule {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
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
        Router::new()
            .route("/", get(list_books).post(create_book))
            .route("/{token}", get(get_book))
            .route(
                "/{token}/reviewers",
                get(list_book_reviewers).post(attach_reviewer),
            )
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List all books with embedded author and publisher",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "List of books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {"$ref": "#/components/schemas/Book"}
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book referencing an existing author and publisher",
                        "tags": ["Books"],
                        "responses": {
                            "201": {"description": "Created"},
                            "409": {"description": "Duplicate ISBN"},
                            "422": {"description": "Unknown author or publisher reference"}
                        }
                    }
                },
                "/{token}": {
                    "get": {
                        "summary": "Fetch a book by ISBN or numeric id",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "token",
                            "in": "path",
                            "required": true,
                            "schema": {"type": "string"},
                            "description": "ISBN (tried first) or numeric identifier"
                        }],
                        "responses": {
                            "200": {"description": "The book"},
                            "404": {"description": "No book matches the token"}
                        }
                    }
                },
                "/{token}/reviewers": {
                    "get": {
                        "summary": "Reviewers of a book; empty array when there are none",
                        "tags": ["Books"],
                        "responses": {
                            "200": {"description": "Reviewer list"},
                            "404": {"description": "No book matches the token"}
                        }
                    },
                    "post": {
                        "summary": "Attach an existing reviewer to a book",
                        "tags": ["Books"],
                        "responses": {
                            "204": {"description": "Attached"},
                            "404": {"description": "No book matches the token"},
                            "422": {"description": "Unknown reviewer reference"}
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "integer"},
                            "isbn": {"type": "string"},
                            "title": {"type": "string"},
                            "description": {"type": "string", "nullable": true},
                            "author": {"type": "object"},
                            "publisher": {"type": "object"}
                        },
                        "required": ["id", "isbn", "title", "author", "publisher"]
                    }
                }
            }
        }))
    }
}

async fn list_books(State(store): State<Arc<Store>>) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(store.books().await?))
}

async fn create_book(
    State(store): State<Arc<Store>>,
    Json(body): Json<CreateBook>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = store.create_book(&body.into()).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn get_book(
    State(store): State<Arc<Store>>,
    Path(token): Path<String>,
) -> Result<Json<Book>, AppError> {
    let book = resolver::resolve(&store, &token).await?;
    Ok(Json(book))
}

async fn list_book_reviewers(
    State(store): State<Arc<Store>>,
    Path(token): Path<String>,
) -> Result<Json<Vec<Reviewer>>, AppError> {
    let book = resolver::resolve(&store, &token).await?;
    Ok(Json(store.reviewers_for_book(book.id).await?))
}

async fn attach_reviewer(
    State(store): State<Arc<Store>>,
    Path(token): Path<String>,
    Json(body): Json<AttachReviewer>,
) -> Result<StatusCode, AppError> {
    let book = resolver::resolve(&store, &token).await?;
    store
        .add_reviewer_to_book(book.id, body.reviewer_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
