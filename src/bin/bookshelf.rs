//! Entry point for the bookshelf inventory manager.
//!
//! With no subcommand the binary runs the interactive menu on stdin/stdout.
//! The one-shot subcommands act on the catalog without prompting and exit
//! with status 3 when the catalog rejects the request (duplicate ISBN, wrong
//! status, unknown ISBN). Status 2 stays with clap's usage errors.

use anyhow::Result;
use bookshelf::cli::{Cli, Commands};
use bookshelf::{Catalog, Session, logging, shell};
use clap::Parser;
use std::io::{self, Write};
use tracing::debug;

const EXIT_REFUSED: i32 = 3;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_REFUSED),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

/// Returns false when the catalog refused the requested action.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    let config = cli.config();
    logging::init_tracing(&config.log_filter)?;
    debug!(catalog = %config.catalog_path.display(), "starting");

    let mut catalog = Catalog::open(&config.catalog_path);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let refused = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = io::stdin();
            Session::new(&mut catalog, stdin.lock(), &mut out).run()?;
            None
        }
        Commands::Add(args) => {
            shell::add_book(&mut catalog, &args.title, &args.author, &args.isbn, &mut out)?
        }
        Commands::Issue { isbn } => shell::issue_book(&mut catalog, &isbn, &mut out)?,
        Commands::Return { isbn } => shell::return_book(&mut catalog, &isbn, &mut out)?,
        Commands::List => {
            shell::list_books(&catalog, &mut out)?;
            None
        }
        Commands::Search { query } => {
            shell::search_books(&catalog, &query, &mut out)?;
            None
        }
    };
    out.flush()?;
    if !catalog.is_persisted() {
        eprintln!(
            "warning: changes could not be saved to {}",
            catalog.path().display()
        );
    }
    Ok(refused.is_none())
}
