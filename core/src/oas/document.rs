#![deny(missing_docs)]

//! # Document Loading
//!
//! Reads an OpenAPI v3 document from disk and hands back the shim tree.
//! JSON is accepted as the YAML subset it is.

use crate::error::{AppError, AppResult};
use crate::oas::shims::ShimOpenApi;
use std::fs;
use std::path::Path;

/// Reads and parses the document at `location`.
///
/// A missing or unreadable file yields [`AppError::InputNotFound`] carrying the
/// location exactly as given.
pub fn load_document(location: &Path) -> AppResult<ShimOpenApi> {
    let text = fs::read_to_string(location).map_err(|source| AppError::InputNotFound {
        location: location.display().to_string(),
        source,
    })?;
    parse_document(&text)
}

/// Parses document text into the shim tree.
///
/// This function verifies the presence of an `openapi` 3.x version field
/// before deserializing the rest of the document.
pub fn parse_document(content: &str) -> AppResult<ShimOpenApi> {
    let raw: serde_json::Value = serde_yaml::from_str(content)
        .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI document: {}", e)))?;

    match raw.get("openapi").and_then(|v| v.as_str()) {
        Some(version) if version.starts_with("3.") => {}
        Some(version) => {
            return Err(AppError::Parse(format!(
                "Unsupported OpenAPI version: {}. Only 3.x is supported.",
                version
            )))
        }
        None => {
            return Err(AppError::Parse(
                "Invalid OpenAPI document: missing 'openapi' version field.".into(),
            ))
        }
    }

    serde_json::from_value(raw)
        .map_err(|e| AppError::Parse(format!("Failed to read OpenAPI structure: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_json_document() {
        let json = r#"{"openapi": "3.0.1", "info": {"title": "T", "version": "1"}, "paths": {}}"#;
        let doc = parse_document(json).unwrap();
        assert!(doc.paths.items.is_empty());
        assert!(doc.servers.is_empty());
    }

    #[test]
    fn test_parse_rejects_swagger() {
        let err = parse_document("swagger: '2.0'\npaths: {}").err().unwrap();
        assert!(err.to_string().contains("missing 'openapi'"));

        let err = parse_document("openapi: 2.0.0\npaths: {}").err().unwrap();
        assert!(err.to_string().contains("Unsupported OpenAPI version"));
    }

    #[test]
    fn test_load_missing_file_reports_location() {
        let path = PathBuf::from("does/not/exist/openapi.json");
        let err = load_document(&path).err().unwrap();
        assert!(matches!(err, AppError::InputNotFound { .. }));
        assert!(err.to_string().contains("does/not/exist/openapi.json"));
    }
}
