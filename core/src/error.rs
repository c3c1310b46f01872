//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors (typically while writing artifacts).
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The configured document location could not be read.
    #[from(ignore)]
    #[display("Input not found: '{location}' ({source})")]
    InputNotFound {
        /// The location exactly as configured.
        location: String,
        /// Underlying read failure.
        source: std::io::Error,
    },

    /// The document text is not a usable OpenAPI v3 document.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// A `$ref` that does not point at any known component.
    #[from(ignore)]
    #[display("Schema Resolution Error: {_0}")]
    SchemaResolution(String),

    /// A configured extension module id with no registry entry.
    #[from(ignore)]
    #[display("Module Not Found: '{_0}'")]
    ModuleNotFound(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(e) => Some(e),
            AppError::InputNotFound { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_input_not_found_mentions_location() {
        let err = AppError::InputNotFound {
            location: "specs/missing.json".into(),
            source: Error::new(ErrorKind::NotFound, "no such file"),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("specs/missing.json"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_module_not_found_display() {
        let err = AppError::ModuleNotFound("bogus".into());
        assert_eq!(format!("{}", err), "Module Not Found: 'bogus'");
        assert!(err.source().is_none());
    }
}
