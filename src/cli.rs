//! Command-line surface and resolved runtime configuration.
//!
//! Settings come from flags or environment variables:
//!
//! - `BOOKSHELF_CATALOG` - catalog file (default: `books.json`)
//! - `BOOKSHELF_LOG` - log filter directive (default: `info`); `RUST_LOG` wins
//!   when set

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_CATALOG_FILE: &str = "books.json";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Book inventory manager.
#[derive(Debug, Parser)]
#[command(name = "bookshelf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Catalog file to load and save.
    #[arg(long, env = "BOOKSHELF_CATALOG", default_value = DEFAULT_CATALOG_FILE)]
    pub catalog: PathBuf,

    /// Log filter directive (e.g. `info`, `bookshelf=debug`).
    #[arg(long, env = "BOOKSHELF_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_level: String,

    /// Action to run; the interactive menu when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            catalog_path: self.catalog.clone(),
            log_filter: self.log_level.clone(),
        }
    }
}

/// Catalog actions.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Interactive menu on stdin/stdout.
    Menu,
    /// Add a book.
    Add(AddArgs),
    /// Issue a book by ISBN.
    Issue {
        isbn: String,
    },
    /// Return an issued book by ISBN.
    Return {
        isbn: String,
    },
    /// Print every book in catalog order.
    List,
    /// Search by title fragment or exact ISBN.
    Search {
        query: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub author: String,
    #[arg(long)]
    pub isbn: String,
}

/// Effective settings after flags and environment are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub log_filter: String,
}
