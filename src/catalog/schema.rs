//! JSON Schema for the persisted catalog document.
//!
//! The schema pins the structural contract of the file: a top-level array of
//! objects with exactly `title`, `author`, `isbn` and `status`, non-empty
//! strings, and a status drawn from the known set. Validation runs on the raw
//! `Value` before typed decoding so the error lists every violation at once.

use anyhow::{Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::{Value, json};

/// Schema the catalog file must satisfy.
pub fn catalog_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "bookshelf catalog",
        "type": "array",
        "items": {
            "type": "object",
            "additionalProperties": false,
            "required": ["title", "author", "isbn", "status"],
            "properties": {
                "title": {"type": "string", "minLength": 1},
                "author": {"type": "string", "minLength": 1},
                "isbn": {"type": "string", "minLength": 1},
                "status": {"type": "string", "enum": ["available", "issued"]}
            }
        }
    })
}

/// Compile the catalog schema.
pub(crate) fn compile_catalog_schema() -> Result<JSONSchema> {
    let schema = catalog_schema();
    JSONSchema::compile(&schema).map_err(|err| anyhow!("compiling catalog schema: {err}"))
}

/// Validate a parsed catalog document, joining every violation into one error.
pub(crate) fn validate_catalog_document(document: &Value) -> Result<()> {
    let compiled = compile_catalog_schema()?;
    if let Err(errors) = compiled.validate(document) {
        let details = errors
            .map(|err| format!("{} at '{}'", err, err.instance_path))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("catalog failed schema validation:\n{details}");
    }
    Ok(())
}
