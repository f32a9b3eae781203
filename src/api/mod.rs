pub mod author;
pub mod book;
pub mod book_author;
pub mod health;

use axum::{
    Router,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;

pub fn api_router(db: DatabaseConnection) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Authors
        .route("/authors", get(author::list_authors))
        .route("/authors", post(author::create_author))
        .route("/authors/:id", get(author::get_author))
        .route("/authors/:id", axum::routing::delete(author::delete_author))
        // Books
        .route("/books", get(book::list_books))
        .route("/books", post(book::create_book))
        .route(
            "/books/:id",
            get(book::get_book)
                .put(book::update_book)
                .delete(book::delete_book),
        )
        // Book-author associations
        .route("/bookauthors", get(book_author::list_associations))
        .route("/bookauthors", post(book_author::create_association))
        .route(
            "/bookauthors/bookswithauthors",
            get(book_author::books_with_authors),
        )
        .route(
            "/bookauthors/authorswithbooks",
            get(book_author::authors_with_books),
        )
        .route(
            "/bookauthors/byauthor/:author_id",
            get(book_author::books_by_author),
        )
        .route(
            "/bookauthors/bybook/:book_id",
            get(book_author::authors_by_book),
        )
        .route("/bookauthors/:id", put(book_author::update_association))
        .route(
            "/bookauthors/:book_id/:author_id",
            get(book_author::get_association)
                .delete(book_author::delete_association),
        )
        .with_state(db)
}
