//! Text front end over a `Catalog`.
//!
//! `Session` runs the numbered menu against any line reader and writer so the
//! binary can bind it to stdin/stdout and tests can script it. The one-shot
//! helpers (`add_book`, `issue_book`, ...) back the non-interactive
//! subcommands and share the menu's wording.

use crate::catalog::{Book, Catalog};
use crate::error::CatalogError;
use anyhow::Result;
use std::io::{BufRead, Write};

const MENU: &str = "
Library Menu:
1. Add Book
2. Issue Book
3. Return Book
4. View All Books
5. Search (Title / ISBN)
6. Exit
";

/// Interactive menu session.
pub struct Session<'a, R, W> {
    catalog: &'a mut Catalog,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(catalog: &'a mut Catalog, input: R, output: W) -> Self {
        Self {
            catalog,
            input,
            output,
        }
    }

    /// Loop over menu choices until Exit or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.output, "{MENU}")?;
            let Some(choice) = self.prompt("Choose an option (1-6): ")? else {
                return Ok(());
            };
            let keep_going = match choice.as_str() {
                "1" => self.add()?,
                "2" => self.issue()?,
                "3" => self.return_item()?,
                "4" => {
                    list_books(self.catalog, &mut self.output)?;
                    true
                }
                "5" => self.search()?,
                "6" => {
                    writeln!(self.output, "Goodbye!")?;
                    false
                }
                _ => {
                    writeln!(self.output, "Invalid option; choose 1 to 6.")?;
                    true
                }
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    // Each action returns Ok(false) when input ran out mid-prompt.

    fn add(&mut self) -> Result<bool> {
        let Some(title) = self.prompt_nonempty("Title: ")? else {
            return Ok(false);
        };
        let Some(author) = self.prompt_nonempty("Author: ")? else {
            return Ok(false);
        };
        let Some(isbn) = self.prompt_nonempty("ISBN: ")? else {
            return Ok(false);
        };
        add_book(self.catalog, &title, &author, &isbn, &mut self.output)?;
        Ok(true)
    }

    fn issue(&mut self) -> Result<bool> {
        let Some(isbn) = self.prompt_nonempty("ISBN to issue: ")? else {
            return Ok(false);
        };
        let Some(book) = self.catalog.find_by_isbn(&isbn) else {
            writeln!(self.output, "No book found with that ISBN.")?;
            return Ok(true);
        };
        writeln!(self.output, "{book}")?;
        if !book.is_available() {
            writeln!(self.output, "Book already issued.")?;
            return Ok(true);
        }
        match self.confirm("Confirm issue?")? {
            None => Ok(false),
            Some(false) => Ok(true),
            Some(true) => {
                issue_book(self.catalog, &isbn, &mut self.output)?;
                Ok(true)
            }
        }
    }

    fn return_item(&mut self) -> Result<bool> {
        let Some(isbn) = self.prompt_nonempty("ISBN to return: ")? else {
            return Ok(false);
        };
        let Some(book) = self.catalog.find_by_isbn(&isbn) else {
            writeln!(self.output, "No book found with that ISBN.")?;
            return Ok(true);
        };
        writeln!(self.output, "{book}")?;
        if book.is_available() {
            writeln!(self.output, "Book is already available in inventory.")?;
            return Ok(true);
        }
        match self.confirm("Confirm return?")? {
            None => Ok(false),
            Some(false) => Ok(true),
            Some(true) => {
                return_book(self.catalog, &isbn, &mut self.output)?;
                Ok(true)
            }
        }
    }

    fn search(&mut self) -> Result<bool> {
        let Some(query) = self.prompt_nonempty("Enter title part or ISBN to search: ")? else {
            return Ok(false);
        };
        search_books(self.catalog, &query, &mut self.output)?;
        Ok(true)
    }

    /// One trimmed line, or `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_nonempty(&mut self, label: &str) -> Result<Option<String>> {
        loop {
            match self.prompt(label)? {
                None => return Ok(None),
                Some(value) if value.is_empty() => {
                    writeln!(self.output, "Input cannot be empty. Try again.")?;
                }
                Some(value) => return Ok(Some(value)),
            }
        }
    }

    fn confirm(&mut self, label: &str) -> Result<Option<bool>> {
        let answer = self.prompt(&format!("{label} (y/n): "))?;
        Ok(answer.map(|value| matches!(value.to_lowercase().as_str(), "y" | "yes")))
    }
}

/// Add a book, reporting the outcome. Returns the domain error, if any.
pub fn add_book<W: Write>(
    catalog: &mut Catalog,
    title: &str,
    author: &str,
    isbn: &str,
    output: &mut W,
) -> Result<Option<CatalogError>> {
    let outcome = Book::new(title, author, isbn).and_then(|book| catalog.add(book));
    match outcome {
        Ok(()) => {
            writeln!(output, "Book added successfully.")?;
            Ok(None)
        }
        Err(err) => {
            writeln!(output, "Cannot add book: {err}")?;
            Ok(Some(err))
        }
    }
}

pub fn issue_book<W: Write>(
    catalog: &mut Catalog,
    isbn: &str,
    output: &mut W,
) -> Result<Option<CatalogError>> {
    match catalog.issue(isbn) {
        Ok(_) => {
            writeln!(output, "Book issued.")?;
            Ok(None)
        }
        Err(err) => {
            writeln!(output, "Error issuing book: {err}")?;
            Ok(Some(err))
        }
    }
}

pub fn return_book<W: Write>(
    catalog: &mut Catalog,
    isbn: &str,
    output: &mut W,
) -> Result<Option<CatalogError>> {
    match catalog.return_item(isbn) {
        Ok(_) => {
            writeln!(output, "Book returned.")?;
            Ok(None)
        }
        Err(err) => {
            writeln!(output, "Error returning book: {err}")?;
            Ok(Some(err))
        }
    }
}

pub fn list_books<W: Write>(catalog: &Catalog, output: &mut W) -> Result<()> {
    let books = catalog.list_all();
    if books.is_empty() {
        writeln!(output, "No books in catalog.")?;
    }
    for book in books {
        writeln!(output, "{book}")?;
    }
    Ok(())
}

pub fn search_books<W: Write>(catalog: &Catalog, query: &str, output: &mut W) -> Result<()> {
    let results = catalog.search(query);
    if results.is_empty() {
        writeln!(output, "No results found.")?;
    }
    for book in results {
        writeln!(output, "{book}")?;
    }
    Ok(())
}
