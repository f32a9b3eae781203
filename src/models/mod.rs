pub mod author;
pub mod book;
pub mod book_authors;

pub use author::AuthorWithBooks;
pub use book::BookWithAuthors;
pub use book_authors::AssociationDetail;
