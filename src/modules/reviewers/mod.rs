use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use bookshelf_db::{Pageable, Reviewer, Store};
use bookshelf_http::AppError;
use bookshelf_kernel::Module;

/// Reviewers module. The reviewer entity is opaque (no attributes beyond
/// the system-assigned id), so creation takes no body.
pub struct ReviewersModule {
    store: Arc<Store>,
}

impl ReviewersModule {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for ReviewersModule {
    fn name(&self) -> &'static str {
        "reviewers"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_reviewers).post(create_reviewer))
            .route("/{id}", get(get_reviewer))
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List reviewers with pagination and sorting",
                        "tags": ["Reviewers"],
                        "parameters": [
                            {"name": "page", "in": "query", "schema": {"type": "integer", "default": 0}},
                            {"name": "size", "in": "query", "schema": {"type": "integer", "default": 20}},
                            {"name": "sort", "in": "query", "schema": {"type": "string"}}
                        ],
                        "responses": {"200": {"description": "Page of reviewers"}}
                    },
                    "post": {
                        "summary": "Create an (opaque) reviewer",
                        "tags": ["Reviewers"],
                        "responses": {"201": {"description": "Created"}}
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Fetch a reviewer by id",
                        "tags": ["Reviewers"],
                        "responses": {
                            "200": {"description": "The reviewer"},
                            "404": {"description": "Unknown reviewer"}
                        }
                    }
                }
            }
        }))
    }
}

async fn list_reviewers(
    State(store): State<Arc<Store>>,
    Query(page): Query<Pageable>,
) -> Result<Json<Vec<Reviewer>>, AppError> {
    Ok(Json(store.list_reviewers(&page).await?))
}

async fn create_reviewer(
    State(store): State<Arc<Store>>,
) -> Result<(StatusCode, Json<Reviewer>), AppError> {
    let reviewer = store.create_reviewer().await?;
    Ok((StatusCode::CREATED, Json(reviewer)))
}

async fn get_reviewer(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
) -> Result<Json<Reviewer>, AppError> {
    let reviewer = store
        .reviewer_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("no reviewer with id {id}")))?;
    Ok(Json(reviewer))
}
