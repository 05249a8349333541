pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use bookshelf_db::{Pageable, Publisher, Store};
use bookshelf_http::AppError;
use bookshelf_kernel::Module;

use models::CreatePublisher;

pub struct PublishersModule {
    store: Arc<Store>,
}

impl PublishersModule {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for PublishersModule {
    fn name(&self) -> &'static str {
        "publishers"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_publishers).post(create_publisher))
            .route("/{id}", get(get_publisher))
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List publishers with pagination and sorting",
                        "tags": ["Publishers"],
                        "parameters": [
                            {"name": "page", "in": "query", "schema": {"type": "integer", "default": 0}},
                            {"name": "size", "in": "query", "schema": {"type": "integer", "default": 20}},
                            {"name": "sort", "in": "query", "schema": {"type": "string"}}
                        ],
                        "responses": {"200": {"description": "Page of publishers"}}
                    },
                    "post": {
                        "summary": "Create a publisher",
                        "tags": ["Publishers"],
                        "responses": {"201": {"description": "Created"}}
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Fetch a publisher by id",
                        "tags": ["Publishers"],
                        "responses": {
                            "200": {"description": "The publisher"},
                            "404": {"description": "Unknown publisher"}
                        }
                    }
                }
            }
        }))
    }
}

async fn list_publishers(
    State(store): State<Arc<Store>>,
    Query(page): Query<Pageable>,
) -> Result<Json<Vec<Publisher>>, AppError> {
    Ok(Json(store.list_publishers(&page).await?))
}

async fn create_publisher(
    State(store): State<Arc<Store>>,
    Json(body): Json<CreatePublisher>,
) -> Result<(StatusCode, Json<Publisher>), AppError> {
    let publisher = store.create_publisher(&body.into()).await?;
    Ok((StatusCode::CREATED, Json(publisher)))
}

async fn get_publisher(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
) -> Result<Json<Publisher>, AppError> {
    let publisher = store
        .publisher_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("no publisher with id {id}")))?;
    Ok(Json(publisher))
}
