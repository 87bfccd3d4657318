//! Durable load/save of the catalog file.
//!
//! Saves never write the target in place. Content goes to a temporary sibling
//! first, the current file is moved to `<path>.bak`, the temporary file is
//! renamed over the target, and the backup is removed once the new file is in
//! place. Every sibling lives in the target's directory so each rename stays
//! on one filesystem.
//!
//! Loads treat an absent file as an empty catalog. Content that cannot be
//! decoded is moved aside to `<path>.corrupt` (unless an earlier capture is
//! already there) and the catalog starts empty.

use crate::catalog::model::{Book, BookRecord};
use crate::catalog::schema::validate_catalog_document;
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const TEMP_SUFFIX: &str = ".tmp";
pub const BACKUP_SUFFIX: &str = ".bak";
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// `<path><suffix>`, e.g. `books.json` -> `books.json.bak`.
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

pub fn backup_path(path: &Path) -> PathBuf {
    sibling_path(path, BACKUP_SUFFIX)
}

pub fn corrupt_path(path: &Path) -> PathBuf {
    sibling_path(path, CORRUPT_SUFFIX)
}

/// Why a load fell back to an empty catalog.
#[derive(Debug)]
pub(crate) enum LoadError {
    /// The file was read but its content is not a valid catalog.
    Corrupt(anyhow::Error),
    /// Anything else: permissions, unreadable bytes, and so on.
    Io(anyhow::Error),
}

/// Load the catalog at `path`, degrading to an empty list on any failure.
pub(crate) fn load_books(path: &Path) -> Vec<Book> {
    match read_books(path) {
        Ok(None) => {
            info!(path = %path.display(), "no catalog file yet; starting empty");
            Vec::new()
        }
        Ok(Some(books)) => {
            info!(path = %path.display(), count = books.len(), "catalog loaded");
            books
        }
        Err(LoadError::Corrupt(err)) => {
            error!(
                path = %path.display(),
                "catalog file is corrupt; starting with an empty catalog: {err:#}"
            );
            quarantine(path);
            Vec::new()
        }
        Err(LoadError::Io(err)) => {
            error!(
                path = %path.display(),
                "unexpected error while loading catalog; starting empty: {err:#}"
            );
            Vec::new()
        }
    }
}

/// Read and decode the catalog. `Ok(None)` means the file does not exist.
pub(crate) fn read_books(path: &Path) -> Result<Option<Vec<Book>>, LoadError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(LoadError::Io(
                anyhow::Error::new(err).context(format!("reading {}", path.display())),
            ));
        }
    };
    decode_books(&contents).map(Some).map_err(LoadError::Corrupt)
}

/// Parse and validate catalog text into books, in file order.
pub(crate) fn decode_books(contents: &str) -> Result<Vec<Book>> {
    let document: Value = serde_json::from_str(contents).context("parsing catalog JSON")?;
    validate_catalog_document(&document)?;
    let records: Vec<BookRecord> =
        serde_json::from_value(document).context("decoding catalog records")?;

    let mut seen = BTreeSet::new();
    let mut books = Vec::with_capacity(records.len());
    for (idx, record) in records.into_iter().enumerate() {
        let book =
            Book::from_record(record).with_context(|| format!("invalid record {idx}"))?;
        if !seen.insert(book.isbn().clone()) {
            bail!("duplicate ISBN {} at record {}", book.isbn(), idx);
        }
        books.push(book);
    }
    Ok(books)
}

/// Serialize books into the on-disk text form.
pub(crate) fn encode_books(books: &[Book]) -> Result<String> {
    let records: Vec<BookRecord> = books.iter().map(Book::to_record).collect();
    serde_json::to_string_pretty(&records).context("serializing catalog")
}

/// Move an unreadable catalog aside for manual inspection.
///
/// An existing capture is never overwritten; failures are logged only.
fn quarantine(path: &Path) {
    let corrupt = corrupt_path(path);
    if corrupt.exists() {
        warn!(
            path = %path.display(),
            capture = %corrupt.display(),
            "corrupt capture already exists; leaving file in place"
        );
        return;
    }
    match fs::rename(path, &corrupt) {
        Ok(()) => warn!(capture = %corrupt.display(), "corrupt catalog moved aside"),
        Err(err) => warn!(
            path = %path.display(),
            "could not move corrupt catalog aside: {err}"
        ),
    }
}

/// Run the durable write protocol, logging instead of returning failures.
///
/// Returns true when the target now holds the serialized books.
pub(crate) fn save_books(path: &Path, books: &[Book]) -> bool {
    match write_books(path, books) {
        Ok(()) => {
            info!(path = %path.display(), count = books.len(), "catalog saved");
            true
        }
        Err(err) => {
            error!(path = %path.display(), "failed to save catalog: {err:#}");
            false
        }
    }
}

pub(crate) fn write_books(path: &Path, books: &[Book]) -> Result<()> {
    let encoded = encode_books(books)?;

    let parent = parent_dir(path);
    fs::create_dir_all(&parent)
        .with_context(|| format!("creating directory {}", parent.display()))?;

    let mut prefix = path
        .file_name()
        .with_context(|| format!("{} has no file name", path.display()))?
        .to_os_string();
    prefix.push(".");
    // Dropped (and deleted) on any early return below.
    let mut staged = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(&parent)
        .with_context(|| format!("creating temporary file in {}", parent.display()))?;
    staged
        .write_all(encoded.as_bytes())
        .context("writing temporary catalog")?;
    staged
        .as_file()
        .sync_all()
        .context("flushing temporary catalog")?;

    swap_in(path, |target| {
        staged
            .persist(target)
            .map(|_| ())
            .map_err(|err| err.error)
    })
}

/// Put a new file at `path` through `install`, keeping the previous file at
/// `<path>.bak` until the install succeeds.
///
/// A failed install renames the backup back over `path`.
fn swap_in<F>(path: &Path, install: F) -> Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let backup = if path
        .try_exists()
        .with_context(|| format!("checking {}", path.display()))?
    {
        let backup = backup_path(path);
        if backup.exists() {
            fs::remove_file(&backup)
                .with_context(|| format!("removing stale backup {}", backup.display()))?;
        }
        fs::rename(path, &backup)
            .with_context(|| format!("moving {} to {}", path.display(), backup.display()))?;
        Some(backup)
    } else {
        None
    };

    if let Err(err) = install(path) {
        if let Some(backup) = &backup {
            restore_backup(backup, path);
        }
        return Err(anyhow::Error::new(err).context(format!("replacing {}", path.display())));
    }

    if let Some(backup) = backup {
        if let Err(err) = fs::remove_file(&backup) {
            warn!(backup = %backup.display(), "could not remove backup: {err}");
        }
    }
    Ok(())
}

fn restore_backup(backup: &Path, path: &Path) {
    if let Err(err) = fs::rename(backup, path) {
        error!(
            backup = %backup.display(),
            path = %path.display(),
            "could not restore backup after failed save: {err}"
        );
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_books() -> Vec<Book> {
        let mut emma = Book::new("Emma", "Jane Austen", "222").unwrap();
        emma.issue().unwrap();
        vec![Book::new("Dune", "Frank Herbert", "111").unwrap(), emma]
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn sibling_paths_append_suffixes() {
        let path = Path::new("/data/books.json");
        assert_eq!(backup_path(path), PathBuf::from("/data/books.json.bak"));
        assert_eq!(corrupt_path(path), PathBuf::from("/data/books.json.corrupt"));
        assert_eq!(parent_dir(Path::new("books.json")), PathBuf::from("."));
    }

    #[test]
    fn write_creates_parent_dirs_and_leaves_no_siblings() {
        let temp = TempDir::new().expect("temp dir");
        let nested = temp.path().join("a").join("b");
        let path = nested.join("books.json");

        write_books(&path, &sample_books()).unwrap();
        write_books(&path, &sample_books()).unwrap();

        assert_eq!(dir_entries(&nested), vec!["books.json".to_string()]);
        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["status"], "issued");
    }

    #[test]
    fn write_replaces_stale_backup() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("books.json");
        fs::write(&path, "[]").unwrap();
        fs::write(backup_path(&path), "stale").unwrap();

        write_books(&path, &sample_books()).unwrap();

        assert!(!backup_path(&path).exists());
        assert_eq!(read_books(&path).unwrap().unwrap(), sample_books());
    }

    #[test]
    fn encoded_catalog_is_pretty_and_ordered() {
        let encoded = encode_books(&sample_books()[..1]).unwrap();
        assert_eq!(
            encoded,
            "[\n  {\n    \"title\": \"Dune\",\n    \"author\": \"Frank Herbert\",\n    \"isbn\": \"111\",\n    \"status\": \"available\"\n  }\n]"
        );
        assert_eq!(encode_books(&[]).unwrap(), "[]");
    }

    #[test]
    fn missing_file_reads_as_none() {
        let temp = TempDir::new().expect("temp dir");
        assert!(read_books(&temp.path().join("absent.json")).unwrap().is_none());
        assert!(load_books(&temp.path().join("absent.json")).is_empty());
    }

    #[test]
    fn decode_rejects_duplicate_isbns() {
        let contents = r#"[
            {"title": "Dune", "author": "Frank Herbert", "isbn": "111", "status": "available"},
            {"title": "Dune (2nd)", "author": "Frank Herbert", "isbn": "111", "status": "issued"}
        ]"#;
        let err = decode_books(contents).unwrap_err();
        assert!(err.to_string().contains("duplicate ISBN 111"), "{err}");
    }

    #[test]
    fn decode_keeps_stored_text_and_matches_isbns_exactly() {
        let contents = r#"[
            {"title": " Dune", "author": "Frank Herbert", "isbn": "111 ", "status": "available"},
            {"title": "Dune Messiah", "author": "Frank Herbert", "isbn": "111", "status": "issued"}
        ]"#;
        let books = decode_books(contents).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title(), " Dune");
        assert_eq!(books[0].isbn().as_str(), "111 ");
        assert_eq!(books[1].isbn().as_str(), "111");

        let reencoded = encode_books(&books).unwrap();
        assert_eq!(decode_books(&reencoded).unwrap(), books);
    }

    #[test]
    fn decode_rejects_whitespace_only_fields() {
        let contents =
            r#"[{"title": "   ", "author": "Frank Herbert", "isbn": "111", "status": "available"}]"#;
        assert!(decode_books(contents).is_err());
    }

    #[test]
    fn corrupt_file_is_captured_once() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("books.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(read_books(&path), Err(LoadError::Corrupt(_))));
        assert!(load_books(&path).is_empty());
        assert!(!path.exists());
        assert_eq!(fs::read_to_string(corrupt_path(&path)).unwrap(), "{not json");

        fs::write(&path, "[{\"title\": 1}]").unwrap();
        assert!(load_books(&path).is_empty());
        assert_eq!(fs::read_to_string(corrupt_path(&path)).unwrap(), "{not json");
        assert!(path.exists(), "second corruption stays in place");
    }

    #[test]
    fn unreadable_bytes_are_not_quarantined() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("books.json");
        fs::write(&path, b"\xff\xfe\x00").unwrap();

        assert!(matches!(read_books(&path), Err(LoadError::Io(_))));
        assert!(load_books(&path).is_empty());
        assert!(path.exists());
        assert!(!corrupt_path(&path).exists());
    }

    #[test]
    fn save_failure_is_logged_not_raised() {
        let temp = TempDir::new().expect("temp dir");
        // A regular file where the parent directory should be.
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file, not dir").unwrap();
        let path = blocker.join("books.json");

        assert!(!save_books(&path, &sample_books()));
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "file, not dir");
    }

    #[test]
    fn failed_save_after_staging_leaves_target_and_no_temp_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("books.json");
        fs::write(&path, "[]").unwrap();
        // A non-empty directory where the stale backup would be removed.
        let backup = backup_path(&path);
        fs::create_dir(&backup).unwrap();
        fs::write(backup.join("keep"), "x").unwrap();

        assert!(!save_books(&path, &sample_books()));

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert_eq!(
            dir_entries(temp.path()),
            vec!["books.json".to_string(), "books.json.bak".to_string()]
        );
    }

    #[test]
    fn failed_install_restores_previous_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("books.json");
        fs::write(&path, "previous").unwrap();

        let err = swap_in(&path, |target| {
            assert!(!target.exists());
            assert_eq!(
                fs::read_to_string(backup_path(target)).unwrap(),
                "previous"
            );
            Err(io::Error::other("rename refused"))
        })
        .unwrap_err();

        assert!(format!("{err:#}").contains("rename refused"), "{err:#}");
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
        assert_eq!(dir_entries(temp.path()), vec!["books.json".to_string()]);
    }

    #[test]
    fn first_install_needs_no_backup() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("books.json");

        swap_in(&path, |target| {
            assert!(!backup_path(target).exists());
            fs::write(target, "[]")
        })
        .unwrap();

        assert_eq!(dir_entries(temp.path()), vec!["books.json".to_string()]);
    }
}
