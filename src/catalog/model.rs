//! Book records and their on-disk representation.
//!
//! `Book` keeps its fields private so the status can only change through
//! `issue` and `return_item`. `BookRecord` is the flat serde view written to
//! the catalog file; its field order is the order keys appear on disk.

use crate::catalog::identity::{BookStatus, Isbn};
use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status change requested on a book.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transition {
    Issue,
    Return,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Issue => f.write_str("issue"),
            Transition::Return => f.write_str("return"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
/// One physical item in the catalog.
pub struct Book {
    title: String,
    author: String,
    isbn: Isbn,
    status: BookStatus,
}

impl Book {
    /// Create an available book.
    ///
    /// Surrounding whitespace is trimmed from every field; a field that ends
    /// up empty is rejected. The ISBN format is not checked.
    pub fn new(
        title: impl AsRef<str>,
        author: impl AsRef<str>,
        isbn: impl AsRef<str>,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            title: required("title", title.as_ref())?,
            author: required("author", author.as_ref())?,
            isbn: Isbn(required("isbn", isbn.as_ref())?),
            status: BookStatus::Available,
        })
    }

    /// Rebuild a book from a decoded record, keeping its stored text and
    /// status exactly as written. Only blank fields are rejected.
    pub fn from_record(record: BookRecord) -> Result<Self, CatalogError> {
        present("title", &record.title)?;
        present("author", &record.author)?;
        present("isbn", record.isbn.as_str())?;
        Ok(Self {
            title: record.title,
            author: record.author,
            isbn: record.isbn,
            status: record.status,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub fn status(&self) -> BookStatus {
        self.status
    }

    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    /// Mark the book as issued. Fails without touching state when it already is.
    pub fn issue(&mut self) -> Result<(), CatalogError> {
        self.transition(Transition::Issue, BookStatus::Available, BookStatus::Issued)
    }

    /// Mark the book as available again. Fails when it was never issued.
    pub fn return_item(&mut self) -> Result<(), CatalogError> {
        self.transition(Transition::Return, BookStatus::Issued, BookStatus::Available)
    }

    /// Serialization view with a fixed key order.
    pub fn to_record(&self) -> BookRecord {
        BookRecord {
            title: self.title.clone(),
            author: self.author.clone(),
            isbn: self.isbn.clone(),
            status: self.status,
        }
    }

    fn transition(
        &mut self,
        action: Transition,
        from: BookStatus,
        to: BookStatus,
    ) -> Result<(), CatalogError> {
        if self.status != from {
            return Err(CatalogError::InvalidTransition {
                isbn: self.isbn.clone(),
                action,
                status: self.status,
            });
        }
        self.status = to;
        Ok(())
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} (ISBN: {}) - {}",
            self.title, self.author, self.isbn, self.status
        )
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// A book as stored in the catalog file.
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub isbn: Isbn,
    pub status: BookStatus,
}

fn required(field: &'static str, value: &str) -> Result<String, CatalogError> {
    present(field, value)?;
    Ok(value.trim().to_string())
}

fn present(field: &'static str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::EmptyField(field));
    }
    Ok(())
}
