pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use bookshelf_db::{Author, Book, Pageable, Store};
use bookshelf_http::AppError;
use bookshelf_kernel::Module;

use models::CreateAuthor;

/// Authors module: paged collection reads plus the derived author-to-books
/// view.
pub struct AuthorsModule {
    store: Arc<Store>,
}

impl AuthorsModule {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_authors).post(create_author))
            .route("/{id}", get(get_author))
            .route("/{id}/books", get(list_author_books))
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List authors with pagination and sorting",
                        "tags": ["Authors"],
                        "parameters": [
                            {"name": "page", "in": "query", "schema": {"type": "integer", "default": 0}},
                            {"name": "size", "in": "query", "schema": {"type": "integer", "default": 20}},
                            {"name": "sort", "in": "query", "schema": {"type": "string"},
                             "description": "field or field,desc"}
                        ],
                        "responses": {"200": {"description": "Page of authors"}}
                    },
                    "post": {
                        "summary": "Create an author",
                        "tags": ["Authors"],
                        "responses": {"201": {"description": "Created"}}
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Fetch an author by id",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {"description": "The author"},
                            "404": {"description": "Unknown author"}
                        }
                    }
                },
                "/{id}/books": {
                    "get": {
                        "summary": "Books written by an author",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {"description": "Book list"},
                            "404": {"description": "Unknown author"}
                        }
                    }
                }
            }
        }))
    }
}

async fn list_authors(
    State(store): State<Arc<Store>>,
    Query(page): Query<Pageable>,
) -> Result<Json<Vec<Author>>, AppError> {
    Ok(Json(store.list_authors(&page).await?))
}

async fn create_author(
    State(store): State<Arc<Store>>,
    Json(body): Json<CreateAuthor>,
) -> Result<(StatusCode, Json<Author>), AppError> {
    let author = store.create_author(&body.into()).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

async fn get_author(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
) -> Result<Json<Author>, AppError> {
    let author = store
        .author_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("no author with id {id}")))?;
    Ok(Json(author))
}

async fn list_author_books(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Book>>, AppError> {
    if store.author_by_id(id).await?.is_none() {
        return Err(AppError::not_found(format!("no author with id {id}")));
    }
    Ok(Json(store.books_by_author(id).await?))
}
