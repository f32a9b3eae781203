use crate::models::BookWithAuthors;
use crate::models::book::{self, Entity as Book};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::*;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct CreateBookRequest {
    title: String,
    price: f64,
}

#[derive(Deserialize)]
pub struct UpdateBookRequest {
    title: String,
    price: f64,
}

pub async fn list_books(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    let books = match Book::find().all(&db).await {
        Ok(books) => books,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let mut result = Vec::with_capacity(books.len());
    for b in books {
        let authors = b
            .find_related(crate::models::author::Entity)
            .all(&db)
            .await
            .unwrap_or_default();
        result.push(BookWithAuthors {
            id: b.id,
            title: b.title,
            price: b.price,
            authors,
        });
    }

    (StatusCode::OK, Json(result)).into_response()
}

pub async fn get_book(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let book = Book::find_by_id(id).one(&db).await.unwrap_or(None);
    match book {
        Some(book) => {
            let authors = book
                .find_related(crate::models::author::Entity)
                .all(&db)
                .await
                .unwrap_or_default();
            (
                StatusCode::OK,
                Json(BookWithAuthors {
                    id: book.id,
                    title: book.title,
                    price: book.price,
                    authors,
                }),
            )
                .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Book not found" })),
        )
            .into_response(),
    }
}

pub async fn create_book(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateBookRequest>,
) -> impl IntoResponse {
    let book = book::ActiveModel {
        title: Set(payload.title),
        price: Set(payload.price),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        updated_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    };

    match book.insert(&db).await {
        Ok(model) => (StatusCode::CREATED, Json(model)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

pub async fn update_book(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateBookRequest>,
) -> impl IntoResponse {
    let book = match Book::find_by_id(id).one(&db).await {
        Ok(Some(book)) => book,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Book not found" })),
            )
                .into_response();
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let mut active: book::ActiveModel = book.into();
    active.title = Set(payload.title);
    active.price = Set(payload.price);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    match active.update(&db).await {
        Ok(model) => (StatusCode::OK, Json(model)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

pub async fn delete_book(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let book = Book::find_by_id(id).one(&db).await.unwrap_or(None);
    match book {
        Some(book) => match book.delete(&db).await {
            Ok(_) => StatusCode::NO_CONTENT.into_response(),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response(),
        },
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Book not found" })),
        )
            .into_response(),
    }
}
