//! Bookshelf Application Library
//!
//! Wires the catalog's entity modules, startup seeding, and the periodic
//! count logger on top of the kernel/http/db crates.

pub mod modules;
pub mod scheduler;
pub mod seed;

use std::sync::Arc;

use bookshelf_db::Store;
use bookshelf_kernel::ModuleRegistry;

use modules::{
    authors::AuthorsModule, books::BooksModule, publishers::PublishersModule,
    reviewers::ReviewersModule,
};

/// Build the registry with every catalog module over a shared store.
pub fn build_registry(store: &Arc<Store>) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register(Arc::new(BooksModule::new(store.clone())));
    registry.register(Arc::new(AuthorsModule::new(store.clone())));
    registry.register(Arc::new(PublishersModule::new(store.clone())));
    registry.register(Arc::new(ReviewersModule::new(store.clone())));
    registry
}
