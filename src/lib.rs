//! Shared library for the bookshelf inventory manager.
//!
//! The crate keeps a catalog of physical books keyed by ISBN, tracks whether
//! each one is available or issued, and persists the catalog to a JSON file
//! between runs. `catalog` holds the core (records, the owning store, and the
//! crash-safe file protocol); `shell` is the thin text front end the binary
//! drives; `cli` and `logging` cover process setup.

pub mod catalog;
pub mod cli;
pub mod error;
pub mod logging;
pub mod shell;

pub use catalog::{
    BACKUP_SUFFIX, Book, BookRecord, BookStatus, CORRUPT_SUFFIX, Catalog, Isbn, TEMP_SUFFIX,
    Transition, backup_path, catalog_schema, corrupt_path,
};
pub use cli::{Cli, Commands, Config};
pub use error::CatalogError;
pub use shell::Session;
