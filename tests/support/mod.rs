#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Scratch directory plus the catalog path inside it (not created yet).
pub fn scratch_catalog() -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("books.json");
    (temp, path)
}

/// Parse the catalog file as raw JSON.
pub fn read_document(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Sorted file names directly under `dir`.
pub fn dir_listing(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

pub fn bookshelf_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_bookshelf"))
}

/// Run the binary against `catalog` with optional stdin.
pub fn run_bookshelf(catalog: &Path, args: &[&str], stdin: Option<&str>) -> Result<Output> {
    let mut cmd = Command::new(bookshelf_binary());
    cmd.arg("--catalog")
        .arg(catalog)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("BOOKSHELF_CATALOG")
        .env("BOOKSHELF_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd
        .spawn()
        .with_context(|| format!("failed to spawn {:?}", cmd))?;
    {
        let mut pipe = child.stdin.take().context("stdin pipe")?;
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes())?;
        }
    }
    let output = child.wait_with_output()?;
    Ok(output)
}

pub fn expect_success(output: &Output) -> Result<String> {
    if !output.status.success() {
        bail!(
            "bookshelf failed: status {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
