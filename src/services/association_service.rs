//! Association Service - Pure business logic without HTTP layer
//!
//! Owns all read/write operations on the Book-Author association: uniqueness
//! of the composite key, referential presence of both sides, and the
//! join-based read projections.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType, ModelTrait,
    PaginatorTrait, QueryFilter, QuerySelect, RelationTrait, Set,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::DomainError;
use crate::models::author::{self, Entity as AuthorEntity};
use crate::models::book::{self, Entity as BookEntity};
use crate::models::book_authors::{self, Entity as EdgeEntity};
use crate::models::{AssociationDetail, AuthorWithBooks, BookWithAuthors};

/// Flattened row of the books-join-authors projection, one row per edge
#[derive(Debug, Serialize, FromQueryResult)]
pub struct BookWithAuthorName {
    pub book_id: i32,
    pub title: String,
    pub price: f64,
    pub author_name: String,
}

/// Flattened row of the authors-join-books projection, one row per edge
#[derive(Debug, Serialize, FromQueryResult)]
pub struct AuthorWithBookTitle {
    pub author_id: i32,
    pub author_name: String,
    pub book_title: String,
    pub price: f64,
}

/// List every association edge with book and author resolved.
///
/// Related rows are batch-loaded in two queries rather than one per edge.
pub async fn list_associations(
    db: &DatabaseConnection,
) -> Result<Vec<AssociationDetail>, DomainError> {
    let edges = EdgeEntity::find().all(db).await?;

    let book_ids: Vec<i32> = edges.iter().map(|e| e.book_id).collect();
    let author_ids: Vec<i32> = edges.iter().map(|e| e.author_id).collect();

    let books: HashMap<i32, book::Model> = BookEntity::find()
        .filter(book::Column::Id.is_in(book_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();

    let authors: HashMap<i32, author::Model> = AuthorEntity::find()
        .filter(author::Column::Id.is_in(author_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    let mut result = Vec::with_capacity(edges.len());
    for edge in edges {
        // Both sides are guaranteed by the FK constraints
        let (Some(book), Some(author)) = (books.get(&edge.book_id), authors.get(&edge.author_id))
        else {
            continue;
        };
        result.push(AssociationDetail {
            book_id: edge.book_id,
            author_id: edge.author_id,
            book: book.clone(),
            author: author.clone(),
        });
    }

    Ok(result)
}

/// Get a single edge by its composite key, with book and author resolved
pub async fn get_association(
    db: &DatabaseConnection,
    book_id: i32,
    author_id: i32,
) -> Result<AssociationDetail, DomainError> {
    let edge = EdgeEntity::find_by_id((book_id, author_id))
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;

    let book = edge
        .find_related(BookEntity)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;
    let author = edge
        .find_related(AuthorEntity)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;

    Ok(AssociationDetail {
        book_id: edge.book_id,
        author_id: edge.author_id,
        book,
        author,
    })
}

/// Insert a new edge.
///
/// Duplicate detection is delegated to the store through a single conditional
/// insert, so there is no window between an existence check and the write.
/// A missing book or author surfaces as a foreign key failure from the store.
pub async fn create_association(
    db: &DatabaseConnection,
    book_id: i32,
    author_id: i32,
) -> Result<(), DomainError> {
    let edge = book_authors::ActiveModel {
        book_id: Set(book_id),
        author_id: Set(author_id),
    };

    let res = EdgeEntity::insert(edge)
        .on_conflict(
            OnConflict::columns([
                book_authors::Column::BookId,
                book_authors::Column::AuthorId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec(db)
        .await;

    match res {
        Ok(_) => Ok(()),
        Err(DbErr::RecordNotInserted) => Err(DomainError::Conflict),
        Err(e) => Err(e.into()),
    }
}

/// Replace the edge identified by the request body's key pair.
///
/// The path identifier must match the body's book_id. The author half of the
/// key is deliberately not cross-checked against the path, matching the
/// original endpoint contract.
pub async fn update_association(
    db: &DatabaseConnection,
    id: i32,
    book_id: i32,
    author_id: i32,
) -> Result<(), DomainError> {
    if id != book_id {
        return Err(DomainError::Validation(
            "path id does not match book_id".to_string(),
        ));
    }

    let res = EdgeEntity::update_many()
        .col_expr(book_authors::Column::AuthorId, Expr::value(author_id))
        .filter(book_authors::Column::BookId.eq(book_id))
        .filter(book_authors::Column::AuthorId.eq(author_id))
        .exec(db)
        .await?;

    if res.rows_affected == 0 {
        // Distinguish a vanished row from a conflicting concurrent write
        let remaining = EdgeEntity::find()
            .filter(book_authors::Column::BookId.eq(id))
            .count(db)
            .await?;
        if remaining == 0 {
            return Err(DomainError::NotFound);
        }
        return Err(DomainError::Database(format!(
            "conflicting update on book_authors for book {}",
            id
        )));
    }

    Ok(())
}

/// Delete the edge with the given composite key
pub async fn delete_association(
    db: &DatabaseConnection,
    book_id: i32,
    author_id: i32,
) -> Result<(), DomainError> {
    let res = EdgeEntity::delete_by_id((book_id, author_id)).exec(db).await?;

    if res.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }

    Ok(())
}

/// List all books linked to the given author, each with its authors resolved
pub async fn list_books_by_author(
    db: &DatabaseConnection,
    author_id: i32,
) -> Result<Vec<BookWithAuthors>, DomainError> {
    let edges = EdgeEntity::find()
        .filter(book_authors::Column::AuthorId.eq(author_id))
        .all(db)
        .await?;
    let book_ids: Vec<i32> = edges.iter().map(|e| e.book_id).collect();

    let books = BookEntity::find()
        .filter(book::Column::Id.is_in(book_ids))
        .all(db)
        .await?;

    let mut result = Vec::with_capacity(books.len());
    for b in books {
        let authors = b.find_related(AuthorEntity).all(db).await?;
        result.push(BookWithAuthors {
            id: b.id,
            title: b.title,
            price: b.price,
            authors,
        });
    }

    Ok(result)
}

/// List all authors linked to the given book, each with their books resolved
pub async fn list_authors_by_book(
    db: &DatabaseConnection,
    book_id: i32,
) -> Result<Vec<AuthorWithBooks>, DomainError> {
    let edges = EdgeEntity::find()
        .filter(book_authors::Column::BookId.eq(book_id))
        .all(db)
        .await?;
    let author_ids: Vec<i32> = edges.iter().map(|e| e.author_id).collect();

    let authors = AuthorEntity::find()
        .filter(author::Column::Id.is_in(author_ids))
        .all(db)
        .await?;

    let mut result = Vec::with_capacity(authors.len());
    for a in authors {
        let books = a.find_related(BookEntity).all(db).await?;
        result.push(AuthorWithBooks {
            id: a.id,
            name: a.name,
            books,
        });
    }

    Ok(result)
}

/// Three-way join projected into flat (book, author name) rows.
///
/// A book with N authors yields N rows.
pub async fn books_with_authors(
    db: &DatabaseConnection,
) -> Result<Vec<BookWithAuthorName>, DomainError> {
    let rows = EdgeEntity::find()
        .select_only()
        .column_as(book::Column::Id, "book_id")
        .column_as(book::Column::Title, "title")
        .column_as(book::Column::Price, "price")
        .column_as(author::Column::Name, "author_name")
        .join(JoinType::InnerJoin, book_authors::Relation::Book.def())
        .join(JoinType::InnerJoin, book_authors::Relation::Author.def())
        .into_model::<BookWithAuthorName>()
        .all(db)
        .await?;

    Ok(rows)
}

/// Symmetric flat projection of authors joined with their book titles
pub async fn authors_with_books(
    db: &DatabaseConnection,
) -> Result<Vec<AuthorWithBookTitle>, DomainError> {
    let rows = EdgeEntity::find()
        .select_only()
        .column_as(author::Column::Id, "author_id")
        .column_as(author::Column::Name, "author_name")
        .column_as(book::Column::Title, "book_title")
        .column_as(book::Column::Price, "price")
        .join(JoinType::InnerJoin, book_authors::Relation::Book.def())
        .join(JoinType::InnerJoin, book_authors::Relation::Author.def())
        .into_model::<AuthorWithBookTitle>()
        .all(db)
        .await?;

    Ok(rows)
}
