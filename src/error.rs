//! Domain errors surfaced to callers of the catalog.
//!
//! Only rule violations the caller has to decide about live here. Disk and
//! decoding failures never reach this type; the store logs them and carries on
//! with its in-memory state.

use crate::catalog::{BookStatus, Isbn, Transition};
use thiserror::Error;

/// Recoverable catalog errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Another record already uses this ISBN.
    #[error("a book with ISBN {0} already exists")]
    DuplicateIsbn(Isbn),

    /// The book's current status does not allow the requested transition.
    #[error("cannot {action} book {isbn}: it is already {status}")]
    InvalidTransition {
        isbn: Isbn,
        action: Transition,
        status: BookStatus,
    },

    /// No record matches the requested ISBN.
    #[error("no book found with ISBN {0}")]
    UnknownIsbn(String),

    /// A required book field was blank.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}
