//! Token-to-book resolution for `/books/{token}` routes.
//!
//! A token is tried as an ISBN first; on a miss it is parsed as a numeric
//! identifier. The reverse direction always emits the ISBN, so a book
//! resolved by numeric id still round-trips through its canonical token.

use bookshelf_db::{Book, Store};
use bookshelf_http::AppError;

/// Resolve a path token into a book. A token that matches neither an ISBN
/// nor an existing numeric id is NotFound; an unparseable token is not a
/// distinct error.
pub async fn resolve(store: &Store, token: &str) -> Result<Book, AppError> {
    if let Some(book) = store.book_by_isbn(token).await? {
        return Ok(book);
    }

    if let Ok(id) = token.parse::<i64>() {
        if let Some(book) = store.book_by_id(id).await? {
            return Ok(book);
        }
    }

    Err(AppError::not_found(format!(
        "no book matches token '{token}'"
    )))
}

/// The canonical path token for a book.
pub fn print(book: &Book) -> &str {
    &book.isbn
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_db::{NewAuthor, NewBook, NewPublisher};
    use pretty_assertions::assert_eq;

    async fn seeded_store() -> (Store, Book) {
        let store = Store::connect("sqlite::memory:").await.expect("store");
        let author = store
            .create_author(&NewAuthor {
                first_name: "Alex".to_string(),
                last_name: "Antonov".to_string(),
            })
            .await
            .expect("author");
        let publisher = store
            .create_publisher(&NewPublisher {
                name: "Packt".to_string(),
            })
            .await
            .expect("publisher");
        let book = store
            .create_book(&NewBook {
                isbn: "978-1-78528-415-1".to_string(),
                title: "Spring Boot Recipes".to_string(),
                description: None,
                author_id: author.id,
                publisher_id: publisher.id,
            })
            .await
            .expect("book");
        (store, book)
    }

    #[tokio::test]
    async fn isbn_token_resolves() {
        let (store, book) = seeded_store().await;
        let resolved = resolve(&store, "978-1-78528-415-1").await.expect("book");
        assert_eq!(resolved, book);
    }

    #[tokio::test]
    async fn numeric_id_token_resolves() {
        let (store, book) = seeded_store().await;
        let resolved = resolve(&store, &book.id.to_string()).await.expect("book");
        assert_eq!(resolved, book);
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let (store, _) = seeded_store().await;
        for token in ["978-0-00000-000-0", "999", "not-a-book"] {
            let result = resolve(&store, token).await;
            assert!(
                matches!(result, Err(AppError::NotFound { .. })),
                "token {token} should not resolve"
            );
        }
    }

    #[tokio::test]
    async fn printed_token_is_always_the_isbn() {
        let (store, book) = seeded_store().await;

        // Resolve by numeric id; the emitted token must still be the ISBN,
        // and it must resolve back to the same book.
        let resolved = resolve(&store, &book.id.to_string()).await.expect("book");
        let token = print(&resolved);
        assert_eq!(token, "978-1-78528-415-1");

        let round_tripped = resolve(&store, token).await.expect("book");
        assert_eq!(round_tripped, book);
    }
}
