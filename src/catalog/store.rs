//! In-memory catalog bound to one backing file.
//!
//! The store owns every `Book`, keeps ISBNs unique, and writes itself back to
//! disk after each committed mutation. Lookups are linear scans in insertion
//! order, which is also the listing order.

use crate::catalog::model::Book;
use crate::catalog::persist::{load_books, save_books};
use crate::error::CatalogError;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug)]
/// Ordered book collection persisted to a JSON file.
pub struct Catalog {
    path: PathBuf,
    books: Vec<Book>,
    persisted: bool,
}

impl Catalog {
    /// Bind to `path` and load whatever is stored there.
    ///
    /// Never fails: a missing, unreadable or corrupt file yields an empty
    /// catalog and a logged diagnostic.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let books = load_books(&path);
        Self {
            path,
            books,
            persisted: true,
        }
    }

    /// Backing file for this catalog.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// False when the save after the latest `add`, `issue` or `return_item`
    /// failed.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Append a book and save.
    ///
    /// Rejects an ISBN that is already present and leaves the catalog as it
    /// was.
    pub fn add(&mut self, book: Book) -> Result<(), CatalogError> {
        if self.position(book.isbn().as_str()).is_some() {
            return Err(CatalogError::DuplicateIsbn(book.isbn().clone()));
        }
        info!(isbn = %book.isbn(), title = book.title(), "adding book");
        self.books.push(book);
        self.persisted = self.save();
        Ok(())
    }

    /// Exact ISBN lookup; surrounding whitespace in the query is ignored.
    pub fn find_by_isbn(&self, isbn: &str) -> Option<&Book> {
        let isbn = isbn.trim();
        self.books.iter().find(|book| book.isbn().as_str() == isbn)
    }

    /// Mutable lookup for callers that transition a book and then call
    /// [`Catalog::save`] themselves.
    pub fn find_by_isbn_mut(&mut self, isbn: &str) -> Option<&mut Book> {
        let isbn = isbn.trim();
        self.books
            .iter_mut()
            .find(|book| book.isbn().as_str() == isbn)
    }

    /// Case-insensitive substring match on titles, in catalog order.
    pub fn find_by_title_substring(&self, query: &str) -> Vec<&Book> {
        let needle = query.trim().to_lowercase();
        self.books
            .iter()
            .filter(|book| book.title().to_lowercase().contains(&needle))
            .collect()
    }

    /// Title matches followed by the exact ISBN match, without repeats.
    pub fn search(&self, query: &str) -> Vec<&Book> {
        let mut results = self.find_by_title_substring(query);
        if let Some(book) = self.find_by_isbn(query) {
            if !results.iter().any(|found| found.isbn() == book.isbn()) {
                results.push(book);
            }
        }
        results
    }

    /// Every book in catalog order.
    pub fn list_all(&self) -> &[Book] {
        &self.books
    }

    /// Issue the book with `isbn` and save.
    pub fn issue(&mut self, isbn: &str) -> Result<&Book, CatalogError> {
        let idx = self.require(isbn)?;
        self.books[idx].issue()?;
        info!(isbn = %self.books[idx].isbn(), "book issued");
        self.persisted = self.save();
        Ok(&self.books[idx])
    }

    /// Return the book with `isbn` and save.
    pub fn return_item(&mut self, isbn: &str) -> Result<&Book, CatalogError> {
        let idx = self.require(isbn)?;
        self.books[idx].return_item()?;
        info!(isbn = %self.books[idx].isbn(), "book returned");
        self.persisted = self.save();
        Ok(&self.books[idx])
    }

    /// Write the current state to disk.
    ///
    /// Failures are logged and swallowed; the in-memory catalog stays
    /// authoritative. Returns true when the file reflects memory.
    pub fn save(&self) -> bool {
        save_books(&self.path, &self.books)
    }

    fn position(&self, isbn: &str) -> Option<usize> {
        let isbn = isbn.trim();
        self.books
            .iter()
            .position(|book| book.isbn().as_str() == isbn)
    }

    fn require(&self, isbn: &str) -> Result<usize, CatalogError> {
        self.position(isbn)
            .ok_or_else(|| CatalogError::UnknownIsbn(isbn.trim().to_string()))
    }
}
