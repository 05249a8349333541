use serde::Deserialize;

use bookshelf_db::NewBook;

/// Request model for creating a new book. Relations are foreign-key values
/// referencing already-persisted authors and publishers.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBook {
    pub isbn: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub author_id: i64,
    pub publisher_id: i64,
}

impl From<CreateBook> for NewBook {
    fn from(body: CreateBook) -> Self {
        Self {
            isbn: body.isbn,
            title: body.title,
            description: body.description,
            author_id: body.author_id,
            publisher_id: body.publisher_id,
        }
    }
}

/// Request model for attaching an existing reviewer to a book.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachReviewer {
    pub reviewer_id: i64,
}
