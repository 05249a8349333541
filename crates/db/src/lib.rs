//! Persistence gateway for the Bookshelf catalog.
//!
//! Exposes the [`Store`] over a SQLite pool with pre-defined queries; schema
//! lives in `migrations/` and runs at connect time.

pub mod error;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use store::Store;
pub use types::{Author, Book, NewAuthor, NewBook, NewPublisher, Pageable, Publisher, Reviewer};
