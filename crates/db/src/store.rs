use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::{classify, StoreError};
use crate::types::{
    Author, Book, NewAuthor, NewBook, NewPublisher, Pageable, Publisher, Reviewer,
};

/// Columns of the joined book projection; author and publisher rows are
/// flattened with aliases and reassembled into nested objects.
const BOOK_SELECT: &str = "SELECT b.id, b.isbn, b.title, b.description, \
     a.id AS author_id, a.first_name AS author_first_name, a.last_name AS author_last_name, \
     p.id AS publisher_id, p.name AS publisher_name \
     FROM books b \
     JOIN authors a ON a.id = b.author_id \
     JOIN publishers p ON p.id = b.publisher_id";

const AUTHOR_SORT_COLUMNS: &[&str] = &["id", "first_name", "last_name"];
const PUBLISHER_SORT_COLUMNS: &[&str] = &["id", "name"];
const REVIEWER_SORT_COLUMNS: &[&str] = &["id"];

/// Flat row shape produced by [`BOOK_SELECT`].
#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    isbn: String,
    title: String,
    description: Option<String>,
    author_id: i64,
    author_first_name: String,
    author_last_name: String,
    publisher_id: i64,
    publisher_name: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            isbn: row.isbn,
            title: row.title,
            description: row.description,
            author: Author {
                id: row.author_id,
                first_name: row.author_first_name,
                last_name: row.author_last_name,
            },
            publisher: Publisher {
                id: row.publisher_id,
                name: row.publisher_name,
            },
        }
    }
}

/// Persistence gateway over a SQLite pool. Identifiers are assigned by the
/// store on first save and immutable afterwards; foreign keys are enforced
/// on every connection.
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open the pool, enable foreign-key enforcement, and run migrations.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` opens its own empty database, so a
        // multi-connection pool would scatter the data. Cap it at one.
        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new().max_connections(1)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options.connect_with(options).await?;
        sqlx::migrate!().run(&pool).await?;
        tracing::debug!(url, "store ready");

        Ok(Self { pool })
    }

    // --- authors ---

    pub async fn create_author(&self, new: &NewAuthor) -> Result<Author, StoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO authors (first_name, last_name) VALUES (?, ?) RETURNING id",
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        Ok(Author {
            id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
        })
    }

    pub async fn author_by_id(&self, id: i64) -> Result<Option<Author>, StoreError> {
        let author =
            sqlx::query_as::<_, Author>("SELECT id, first_name, last_name FROM authors WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(author)
    }

    pub async fn list_authors(&self, page: &Pageable) -> Result<Vec<Author>, StoreError> {
        let order = page.order_by(AUTHOR_SORT_COLUMNS, "id");
        let sql = format!(
            "SELECT id, first_name, last_name FROM authors ORDER BY {order} LIMIT ? OFFSET ?"
        );
        let authors = sqlx::query_as::<_, Author>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(authors)
    }

    pub async fn count_authors(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // --- publishers ---

    pub async fn create_publisher(&self, new: &NewPublisher) -> Result<Publisher, StoreError> {
        let id: i64 = sqlx::query_scalar("INSERT INTO publishers (name) VALUES (?) RETURNING id")
            .bind(&new.name)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;

        Ok(Publisher {
            id,
            name: new.name.clone(),
        })
    }

    pub async fn publisher_by_id(&self, id: i64) -> Result<Option<Publisher>, StoreError> {
        let publisher =
            sqlx::query_as::<_, Publisher>("SELECT id, name FROM publishers WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(publisher)
    }

    pub async fn list_publishers(&self, page: &Pageable) -> Result<Vec<Publisher>, StoreError> {
        let order = page.order_by(PUBLISHER_SORT_COLUMNS, "id");
        let sql = format!("SELECT id, name FROM publishers ORDER BY {order} LIMIT ? OFFSET ?");
        let publishers = sqlx::query_as::<_, Publisher>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(publishers)
    }

    pub async fn count_publishers(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM publishers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // --- reviewers ---

    pub async fn create_reviewer(&self) -> Result<Reviewer, StoreError> {
        let id: i64 = sqlx::query_scalar("INSERT INTO reviewers DEFAULT VALUES RETURNING id")
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        Ok(Reviewer { id })
    }

    pub async fn reviewer_by_id(&self, id: i64) -> Result<Option<Reviewer>, StoreError> {
        let reviewer = sqlx::query_as::<_, Reviewer>("SELECT id FROM reviewers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reviewer)
    }

    pub async fn list_reviewers(&self, page: &Pageable) -> Result<Vec<Reviewer>, StoreError> {
        let order = page.order_by(REVIEWER_SORT_COLUMNS, "id");
        let sql = format!("SELECT id FROM reviewers ORDER BY {order} LIMIT ? OFFSET ?");
        let reviewers = sqlx::query_as::<_, Reviewer>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(reviewers)
    }

    pub async fn count_reviewers(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviewers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // --- books ---

    /// Save a book. The author and publisher references must already be
    /// persisted; a dangling reference fails the single INSERT statement, so
    /// nothing is partially written.
    pub async fn create_book(&self, new: &NewBook) -> Result<Book, StoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO books (isbn, title, description, author_id, publisher_id) \
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&new.isbn)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.author_id)
        .bind(new.publisher_id)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        let sql = format!("{BOOK_SELECT} WHERE b.id = ?");
        let row = sqlx::query_as::<_, BookRow>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    pub async fn book_by_id(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let sql = format!("{BOOK_SELECT} WHERE b.id = ?");
        let row = sqlx::query_as::<_, BookRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Book::from))
    }

    pub async fn book_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        let sql = format!("{BOOK_SELECT} WHERE b.isbn = ?");
        let row = sqlx::query_as::<_, BookRow>(&sql)
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Book::from))
    }

    pub async fn books(&self) -> Result<Vec<Book>, StoreError> {
        let sql = format!("{BOOK_SELECT} ORDER BY b.id");
        let rows = sqlx::query_as::<_, BookRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    /// On-demand view of the Author→Books back-reference.
    pub async fn books_by_author(&self, author_id: i64) -> Result<Vec<Book>, StoreError> {
        let sql = format!("{BOOK_SELECT} WHERE b.author_id = ? ORDER BY b.id");
        let rows = sqlx::query_as::<_, BookRow>(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    pub async fn count_books(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // --- book/reviewer links ---

    /// A book with no reviewers yields an empty vec, not an error.
    pub async fn reviewers_for_book(&self, book_id: i64) -> Result<Vec<Reviewer>, StoreError> {
        let reviewers = sqlx::query_as::<_, Reviewer>(
            "SELECT r.id FROM reviewers r \
             JOIN books_reviewers_link l ON l.reviewer_id = r.id \
             WHERE l.book_id = ? ORDER BY r.id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviewers)
    }

    pub async fn add_reviewer_to_book(
        &self,
        book_id: i64,
        reviewer_id: i64,
    ) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO books_reviewers_link (book_id, reviewer_id) VALUES (?, ?)")
            .bind(book_id)
            .bind(reviewer_id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn memory_store() -> Store {
        Store::connect("sqlite::memory:")
            .await
            .expect("in-memory store")
    }

    async fn seed_book(store: &Store) -> Book {
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
        store
            .create_book(&NewBook {
                isbn: "978-1-78528-415-1".to_string(),
                title: "Spring Boot Recipes".to_string(),
                description: None,
                author_id: author.id,
                publisher_id: publisher.id,
            })
            .await
            .expect("book")
    }

    #[tokio::test]
    async fn save_assigns_identifier_and_embeds_relations() {
        let store = memory_store().await;
        let book = seed_book(&store).await;

        assert!(book.id > 0);
        assert_eq!(book.author.first_name, "Alex");
        assert_eq!(book.publisher.name, "Packt");
    }

    #[tokio::test]
    async fn book_found_by_id_and_by_isbn() {
        let store = memory_store().await;
        let book = seed_book(&store).await;

        let by_id = store.book_by_id(book.id).await.expect("query").expect("row");
        let by_isbn = store
            .book_by_isbn("978-1-78528-415-1")
            .await
            .expect("query")
            .expect("row");

        assert_eq!(by_id, book);
        assert_eq!(by_isbn, book);
    }

    #[tokio::test]
    async fn missing_keys_read_as_none() {
        let store = memory_store().await;

        assert!(store.book_by_id(42).await.expect("query").is_none());
        assert!(store
            .book_by_isbn("000-0-00000-000-0")
            .await
            .expect("query")
            .is_none());
    }

    #[tokio::test]
    async fn dangling_references_fail_without_partial_persist() {
        let store = memory_store().await;

        let result = store
            .create_book(&NewBook {
                isbn: "978-1-78528-415-1".to_string(),
                title: "Orphan".to_string(),
                description: None,
                author_id: 99,
                publisher_id: 99,
            })
            .await;

        assert!(matches!(result, Err(StoreError::ReferentialIntegrity)));
        assert_eq!(store.count_books().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn duplicate_isbn_is_rejected() {
        let store = memory_store().await;
        let book = seed_book(&store).await;

        let result = store
            .create_book(&NewBook {
                isbn: book.isbn.clone(),
                title: "Second Copy".to_string(),
                description: None,
                author_id: book.author.id,
                publisher_id: book.publisher.id,
            })
            .await;

        assert!(matches!(result, Err(StoreError::Duplicate)));
        assert_eq!(store.count_books().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn reviewer_set_is_empty_not_error() {
        let store = memory_store().await;
        let book = seed_book(&store).await;

        let reviewers = store.reviewers_for_book(book.id).await.expect("query");
        assert_eq!(reviewers, vec![]);
    }

    #[tokio::test]
    async fn attached_reviewers_come_back_in_order() {
        let store = memory_store().await;
        let book = seed_book(&store).await;
        let first = store.create_reviewer().await.expect("reviewer");
        let second = store.create_reviewer().await.expect("reviewer");

        store
            .add_reviewer_to_book(book.id, second.id)
            .await
            .expect("link");
        store
            .add_reviewer_to_book(book.id, first.id)
            .await
            .expect("link");

        let reviewers = store.reviewers_for_book(book.id).await.expect("query");
        assert_eq!(reviewers, vec![first, second]);
    }

    #[tokio::test]
    async fn linking_to_missing_book_is_referential_error() {
        let store = memory_store().await;
        let reviewer = store.create_reviewer().await.expect("reviewer");

        let result = store.add_reviewer_to_book(42, reviewer.id).await;
        assert!(matches!(result, Err(StoreError::ReferentialIntegrity)));
    }

    #[tokio::test]
    async fn author_listing_pages_and_sorts() {
        let store = memory_store().await;
        for (first, last) in [("Ada", "Lovelace"), ("Alan", "Turing"), ("Grace", "Hopper")] {
            store
                .create_author(&NewAuthor {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                })
                .await
                .expect("author");
        }

        let first_page = store
            .list_authors(&Pageable {
                page: 0,
                size: 2,
                sort: Some("last_name,desc".to_string()),
            })
            .await
            .expect("page");
        assert_eq!(first_page.len(), 2);
        assert_eq!(first_page[0].last_name, "Turing");

        let second_page = store
            .list_authors(&Pageable {
                page: 1,
                size: 2,
                sort: Some("last_name,desc".to_string()),
            })
            .await
            .expect("page");
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].last_name, "Hopper");
    }

    #[tokio::test]
    async fn books_by_author_is_a_derived_view() {
        let store = memory_store().await;
        let book = seed_book(&store).await;

        let books = store.books_by_author(book.author.id).await.expect("query");
        assert_eq!(books, vec![book]);

        let none = store.books_by_author(999).await.expect("query");
        assert!(none.is_empty());
    }
}
