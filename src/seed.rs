use crate::models::{author, book, book_authors};
use sea_orm::*;

pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = chrono::Utc::now().to_rfc3339();

    // 1. Create Authors
    let authors = vec!["George Orwell", "Aldous Huxley", "Ray Bradbury"];
    let mut author_ids = Vec::new();

    for name in authors {
        let author = author::ActiveModel {
            name: Set(name.to_owned()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        let res = author::Entity::insert(author).exec(db).await?;
        author_ids.push(res.last_insert_id);
    }

    // 2. Create Books
    let books = vec![
        ("Nineteen Eighty-Four", 9.99),
        ("Brave New World", 11.50),
        ("Fahrenheit 451", 8.25),
    ];
    let mut book_ids = Vec::new();

    for (title, price) in books {
        let book = book::ActiveModel {
            title: Set(title.to_owned()),
            price: Set(price),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        let res = book::Entity::insert(book).exec(db).await?;
        book_ids.push(res.last_insert_id);
    }

    // 3. Link each book to its author
    for (book_id, author_id) in book_ids.iter().zip(author_ids.iter()) {
        let edge = book_authors::ActiveModel {
            book_id: Set(*book_id),
            author_id: Set(*author_id),
        };
        let _ = book_authors::Entity::insert(edge)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    book_authors::Column::BookId,
                    book_authors::Column::AuthorId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(db)
            .await;
    }

    Ok(())
}
