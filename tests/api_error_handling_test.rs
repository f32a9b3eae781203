use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use bookledger::api;
use bookledger::db;
use bookledger::models::{author, book, book_authors};
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test app over an in-memory database
async fn setup_test_app() -> (Router, DatabaseConnection) {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    (api::api_router(db.clone()), db)
}

async fn create_test_author(db: &DatabaseConnection, id: i32, name: &str) {
    let now = chrono::Utc::now().to_rfc3339();
    let author = author::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    };
    author::Entity::insert(author)
        .exec(db)
        .await
        .expect("Failed to create author");
}

async fn create_test_book(db: &DatabaseConnection, id: i32, title: &str, price: f64) {
    let now = chrono::Utc::now().to_rfc3339();
    let book = book::ActiveModel {
        id: Set(id),
        title: Set(title.to_string()),
        price: Set(price),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    };
    book::Entity::insert(book)
        .exec(db)
        .await
        .expect("Failed to create book");
}

async fn create_test_edge(db: &DatabaseConnection, book_id: i32, author_id: i32) {
    let edge = book_authors::ActiveModel {
        book_id: Set(book_id),
        author_id: Set(author_id),
    };
    book_authors::Entity::insert(edge)
        .exec(db)
        .await
        .expect("Failed to create association");
}

fn json_request(uri: &str, method: &str, payload: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_get_association_not_found() {
    let (app, _db) = setup_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/bookauthors/999/999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_association_id_mismatch() {
    let (app, db) = setup_test_app().await;
    create_test_author(&db, 1, "Orwell").await;
    create_test_book(&db, 10, "1984", 9.99).await;
    create_test_edge(&db, 10, 1).await;

    // Path id 99 vs body book_id 10: rejected even though the edge exists
    let payload = serde_json::json!({ "book_id": 10, "author_id": 1 });
    let response = app
        .oneshot(json_request("/bookauthors/99", "PUT", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_association_success_and_missing() {
    let (app, db) = setup_test_app().await;
    create_test_author(&db, 1, "Orwell").await;
    create_test_book(&db, 10, "1984", 9.99).await;
    create_test_edge(&db, 10, 1).await;

    let payload = serde_json::json!({ "book_id": 10, "author_id": 1 });
    let response = app
        .clone()
        .oneshot(json_request("/bookauthors/10", "PUT", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // No edge at all for book 11
    create_test_book(&db, 11, "Animal Farm", 7.50).await;
    let payload = serde_json::json!({ "book_id": 11, "author_id": 1 });
    let response = app
        .oneshot(json_request("/bookauthors/11", "PUT", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_association_conflicting_edge_is_fatal() {
    let (app, db) = setup_test_app().await;
    create_test_author(&db, 1, "Orwell").await;
    create_test_author(&db, 2, "Huxley").await;
    create_test_book(&db, 10, "1984", 9.99).await;
    create_test_edge(&db, 10, 1).await;

    // Book 10 has an edge, but not with author 2
    let payload = serde_json::json!({ "book_id": 10, "author_id": 2 });
    let response = app
        .oneshot(json_request("/bookauthors/10", "PUT", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_create_duplicate_association_conflict() {
    let (app, db) = setup_test_app().await;
    create_test_author(&db, 1, "Orwell").await;
    create_test_book(&db, 10, "1984", 9.99).await;

    let payload = serde_json::json!({ "book_id": 10, "author_id": 1 });

    let response = app
        .clone()
        .oneshot(json_request("/bookauthors", "POST", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request("/bookauthors", "POST", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_association_invalid_json() {
    let (app, _db) = setup_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/bookauthors")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();
    // Axum's Json extractor returns 400 for malformed JSON
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_association_twice() {
    let (app, db) = setup_test_app().await;
    create_test_author(&db, 1, "Orwell").await;
    create_test_book(&db, 10, "1984", 9.99).await;
    create_test_edge(&db, 10, 1).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/bookauthors/10/1")
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/bookauthors/10/1")
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_author_not_found() {
    let (app, _db) = setup_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/authors/999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_lists_return_ok() {
    let (app, _db) = setup_test_app().await;

    for uri in [
        "/authors",
        "/books",
        "/bookauthors",
        "/bookauthors/byauthor/42",
        "/bookauthors/bybook/42",
        "/bookauthors/bookswithauthors",
        "/bookauthors/authorswithbooks",
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "uri: {}", uri);

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body, serde_json::json!([]), "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_delete_book_with_edges_is_rejected() {
    let (app, db) = setup_test_app().await;
    create_test_author(&db, 1, "Orwell").await;
    create_test_book(&db, 10, "1984", 9.99).await;
    create_test_edge(&db, 10, 1).await;

    // No cascade: the store must reject deleting a book with live edges
    let response = app
        .oneshot(
            Request::builder()
                .uri("/books/10")
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_author_crud_roundtrip() {
    let (app, _db) = setup_test_app().await;

    let payload = serde_json::json!({ "name": "Ursula K. Le Guin" });
    let response = app
        .clone()
        .oneshot(json_request("/authors", "POST", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let created: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
    let id = created["id"].as_i64().expect("Expected author id");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/authors/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/authors/{}", id))
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
