//! Startup seeding of the demo catalog.

use bookshelf_db::{NewAuthor, NewBook, NewPublisher, Store};

/// Insert the demo author, publisher, and book when the store is empty.
/// Logs the book count either way, so a fresh boot and a restart both
/// report the catalog size.
pub async fn run(store: &Store) -> anyhow::Result<()> {
    let existing = store.count_books().await?;
    tracing::info!(count = existing, "number of books at startup");

    if existing > 0 {
        return Ok(());
    }

    let author = store
        .create_author(&NewAuthor {
            first_name: "Alex".to_string(),
            last_name: "Antonov".to_string(),
        })
        .await?;
    let publisher = store
        .create_publisher(&NewPublisher {
            name: "Packt".to_string(),
        })
        .await?;
    let book = store
        .create_book(&NewBook {
            isbn: "978-1-78528-415-1".to_string(),
            title: "Spring Boot Recipes".to_string(),
            description: None,
            author_id: author.id,
            publisher_id: publisher.id,
        })
        .await?;

    tracing::info!(book = %book.title, isbn = %book.isbn, "seeded demo catalog");
    Ok(())
}
