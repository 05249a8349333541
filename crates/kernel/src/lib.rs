//! Core traits, layered settings, and the module registry for Bookshelf.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
