use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::domain::DomainError;
use crate::services::association_service as service;

#[derive(Deserialize)]
pub struct AssociationRequest {
    pub book_id: i32,
    pub author_id: i32,
}

fn error_response(err: DomainError) -> Response {
    let status = match &err {
        DomainError::NotFound => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict => StatusCode::CONFLICT,
        DomainError::Database(msg) => {
            tracing::error!("association store failure: {}", msg);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

#[utoipa::path(
    get,
    path = "/api/bookauthors",
    responses(
        (status = 200, description = "All associations with book and author resolved")
    )
)]
pub async fn list_associations(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match service::list_associations(&db).await {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/bookauthors/{book_id}/{author_id}",
    params(
        ("book_id" = i32, Path, description = "Book half of the composite key"),
        ("author_id" = i32, Path, description = "Author half of the composite key")
    ),
    responses(
        (status = 200, description = "Association with book and author resolved"),
        (status = 404, description = "No association for this key pair")
    )
)]
pub async fn get_association(
    State(db): State<DatabaseConnection>,
    Path((book_id, author_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    match service::get_association(&db, book_id, author_id).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/bookauthors",
    responses(
        (status = 201, description = "Association created, Location header points at it"),
        (status = 409, description = "Composite key already exists"),
        (status = 500, description = "Referenced book or author does not exist")
    )
)]
pub async fn create_association(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<AssociationRequest>,
) -> impl IntoResponse {
    match service::create_association(&db, payload.book_id, payload.author_id).await {
        Ok(()) => {
            let location = format!("/api/bookauthors/{}/{}", payload.book_id, payload.author_id);
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(json!({
                    "book_id": payload.book_id,
                    "author_id": payload.author_id
                })),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    put,
    path = "/api/bookauthors/{id}",
    params(
        ("id" = i32, Path, description = "Book id, must match the body's book_id")
    ),
    responses(
        (status = 204, description = "Association replaced"),
        (status = 400, description = "Path id does not match the body's book_id"),
        (status = 404, description = "No association for this key pair")
    )
)]
pub async fn update_association(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<AssociationRequest>,
) -> impl IntoResponse {
    match service::update_association(&db, id, payload.book_id, payload.author_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/bookauthors/{book_id}/{author_id}",
    params(
        ("book_id" = i32, Path, description = "Book half of the composite key"),
        ("author_id" = i32, Path, description = "Author half of the composite key")
    ),
    responses(
        (status = 204, description = "Association removed"),
        (status = 404, description = "No association for this key pair")
    )
)]
pub async fn delete_association(
    State(db): State<DatabaseConnection>,
    Path((book_id, author_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    match service::delete_association(&db, book_id, author_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn books_by_author(
    State(db): State<DatabaseConnection>,
    Path(author_id): Path<i32>,
) -> impl IntoResponse {
    match service::list_books_by_author(&db, author_id).await {
        Ok(books) => (StatusCode::OK, Json(books)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn authors_by_book(
    State(db): State<DatabaseConnection>,
    Path(book_id): Path<i32>,
) -> impl IntoResponse {
    match service::list_authors_by_book(&db, book_id).await {
        Ok(authors) => (StatusCode::OK, Json(authors)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn books_with_authors(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match service::books_with_authors(&db).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn authors_with_books(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match service::authors_with_books(&db).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => error_response(e),
    }
}
