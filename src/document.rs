//! Reading and writing result documents.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::GraderError;

/// Loads a results document, keeping the field order of the file.
pub fn load_document(path: &Path) -> Result<Value, GraderError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Writes `document` as 2-space indented JSON. Non-ASCII text is written as UTF-8.
pub fn save_document(path: &Path, document: &Value) -> Result<(), GraderError> {
    let mut rendered = serde_json::to_string_pretty(document)?;
    rendered.push('\n');
    fs::write(path, rendered)?;
    Ok(())
}
