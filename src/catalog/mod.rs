//! Book catalog: records, the owning store, and its on-disk form.
//!
//! `Book` values carry the status rule, `Catalog` owns them and enforces ISBN
//! uniqueness, and `persist` implements the crash-safe file protocol the store
//! relies on. `schema` pins the structure a catalog file must have before any
//! record is decoded from it.

pub mod identity;
pub mod model;
pub mod persist;
pub mod schema;
pub mod store;

pub use identity::{BookStatus, Isbn};
pub use model::{Book, BookRecord, Transition};
pub use persist::{BACKUP_SUFFIX, CORRUPT_SUFFIX, TEMP_SUFFIX, backup_path, corrupt_path};
pub use schema::catalog_schema;
pub use store::Catalog;
