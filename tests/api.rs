//! End-to-end tests over the assembled router, mirroring how the service
//! is wired in `main` but backed by an in-memory store.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_app::{build_registry, seed};
use bookshelf_db::Store;
use bookshelf_kernel::settings::Settings;

async fn seeded_app() -> Router {
    let store = Arc::new(Store::connect("sqlite::memory:").await.expect("store"));
    seed::run(&store).await.expect("seed");

    let registry = build_registry(&store);
    bookshelf_http::build_router(&registry, &Settings::default())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn seeded_catalog_scenario() {
    let app = seeded_app().await;

    // Book by ISBN, with the publisher embedded as a full object.
    let (status, book) = get(&app, "/books/978-1-78528-415-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["title"], "Spring Boot Recipes");
    assert_eq!(book["publisher"]["name"], "Packt");
    assert_eq!(book["author"]["first_name"], "Alex");

    // Publisher item read.
    let (status, publisher) = get(&app, "/publishers/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(publisher["name"], "Packt");

    // Collection holds exactly the seeded book.
    let (status, books) = get(&app, "/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books.as_array().expect("array").len(), 1);
    assert_eq!(books[0]["isbn"], "978-1-78528-415-1");
}

#[tokio::test]
async fn isbn_and_numeric_id_resolve_the_same_book() {
    let app = seeded_app().await;

    let (status, by_isbn) = get(&app, "/books/978-1-78528-415-1").await;
    assert_eq!(status, StatusCode::OK);

    let id = by_isbn["id"].as_i64().expect("id");
    let (status, by_id) = get(&app, &format!("/books/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_id, by_isbn);
}

#[tokio::test]
async fn unresolvable_tokens_are_404() {
    let app = seeded_app().await;

    for token in ["978-0-00000-000-0", "999", "not-a-book"] {
        let (status, body) = get(&app, &format!("/books/{token}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "token {token}");
        assert_eq!(body["error"]["code"], "not_found");
    }
}

#[tokio::test]
async fn reviewer_sub_resource_round_trip() {
    let app = seeded_app().await;

    // No reviewers yet: empty array, success.
    let (status, reviewers) = get(&app, "/books/978-1-78528-415-1/reviewers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviewers, json!([]));

    // Create a reviewer and attach it via the ISBN token.
    let (status, reviewer) = post(&app, "/reviewers", json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    let reviewer_id = reviewer["id"].as_i64().expect("id");

    let (status, _) = post(
        &app,
        "/books/978-1-78528-415-1/reviewers",
        json!({"reviewer_id": reviewer_id}),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, reviewers) = get(&app, "/books/978-1-78528-415-1/reviewers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviewers, json!([{"id": reviewer_id}]));
}

#[tokio::test]
async fn dangling_references_do_not_partially_persist() {
    let app = seeded_app().await;

    let (status, body) = post(
        &app,
        "/books",
        json!({
            "isbn": "978-3-16-148410-0",
            "title": "Orphan",
            "author_id": 99,
            "publisher_id": 99
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    let (_, books) = get(&app, "/books").await;
    assert_eq!(books.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn duplicate_isbn_conflicts() {
    let app = seeded_app().await;

    let (status, body) = post(
        &app,
        "/books",
        json!({
            "isbn": "978-1-78528-415-1",
            "title": "Second Copy",
            "author_id": 1,
            "publisher_id": 1
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
async fn created_book_is_resolvable_by_its_new_isbn() {
    let app = seeded_app().await;

    let (status, book) = post(
        &app,
        "/books",
        json!({
            "isbn": "978-3-16-148410-0",
            "title": "Another Recipe Book",
            "description": "A follow-up",
            "author_id": 1,
            "publisher_id": 1
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["publisher"]["name"], "Packt");

    let (status, fetched) = get(&app, "/books/978-3-16-148410-0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, book);
}

#[tokio::test]
async fn author_listing_honors_paging_parameters() {
    let app = seeded_app().await;

    for (first, last) in [("Ada", "Lovelace"), ("Grace", "Hopper")] {
        let (status, _) = post(
            &app,
            "/authors",
            json!({"first_name": first, "last_name": last}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = get(&app, "/authors?page=0&size=2&sort=last_name,desc").await;
    assert_eq!(status, StatusCode::OK);
    let authors = page.as_array().expect("array");
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0]["last_name"], "Lovelace");

    let (status, page) = get(&app, "/authors?page=1&size=2&sort=last_name,desc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn author_books_view_embeds_one_direction_only() {
    let app = seeded_app().await;

    let (status, books) = get(&app, "/authors/1/books").await;
    assert_eq!(status, StatusCode::OK);
    let book = &books.as_array().expect("array")[0];

    // The book embeds its author, but that author carries no book list:
    // serialization walks the graph in one direction only.
    assert_eq!(book["author"]["last_name"], "Antonov");
    assert!(book["author"].get("books").is_none());
}

#[tokio::test]
async fn health_and_docs_endpoints_respond() {
    let app = seeded_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let (status, spec) = get(&app, "/docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(spec["paths"].get("/books").is_some());
    assert!(spec["paths"].get("/books/{token}").is_some());
}
