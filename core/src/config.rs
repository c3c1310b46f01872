#![deny(missing_docs)]

//! # Configuration
//!
//! Inputs of one generation run. Constructed by the caller and read-only
//! while generating.

use crate::error::AppResult;
use crate::extensions::{resolve_modules, ExtensionModule};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Namespace used when none is configured.
pub const DEFAULT_BASE_PACKAGE: &str = "example";

/// Allow-list of operation paths. An empty filter allows every path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct OperationFilter {
    paths: BTreeSet<String>,
}

impl OperationFilter {
    /// A filter admitting exactly the given paths.
    pub fn only<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether operations at `path` are generated.
    pub fn allows(&self, path: &str) -> bool {
        self.paths.is_empty() || self.paths.contains(path)
    }

    /// Whether the filter admits everything.
    pub fn is_allow_all(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GeneratorConfig {
    /// Location of the OpenAPI document.
    pub document: PathBuf,
    /// Directory receiving the generated sources.
    pub output: PathBuf,
    /// Namespace of the generated code. `.` or `::` separate nested modules.
    pub base_package: String,
    /// Operations to generate.
    pub operations: OperationFilter,
    /// Extension module ids, applied in order.
    pub modules: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            document: PathBuf::new(),
            output: PathBuf::new(),
            base_package: DEFAULT_BASE_PACKAGE.to_string(),
            operations: OperationFilter::default(),
            modules: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// A configuration with all defaults for the given locations.
    pub fn new(document: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            document: document.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Sets the base package.
    pub fn with_base_package(mut self, base_package: impl Into<String>) -> Self {
        self.base_package = base_package.into();
        self
    }

    /// Sets the operation filter.
    pub fn with_operations(mut self, operations: OperationFilter) -> Self {
        self.operations = operations;
        self
    }

    /// Appends an extension module id.
    pub fn with_module(mut self, id: impl Into<String>) -> Self {
        self.modules.push(id.into());
        self
    }

    /// Resolves the configured modules against the registry.
    pub fn validate(&self) -> AppResult<Vec<Box<dyn ExtensionModule>>> {
        resolve_modules(&self.modules)
    }

    /// Module path segments of the base package.
    ///
    /// e.g. `com.acme::pets` -> `["com", "acme", "pets"]`
    pub fn package_segments(&self) -> Vec<String> {
        let segments: Vec<String> = self
            .base_package
            .replace("::", ".")
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(crate::naming::snake_ident)
            .collect();
        if segments.is_empty() {
            vec![DEFAULT_BASE_PACKAGE.to_string()]
        } else {
            segments
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_filter_semantics() {
        let all = OperationFilter::default();
        assert!(all.is_allow_all());
        assert!(all.allows("/anything"));

        let some = OperationFilter::only(["/pet"]);
        assert!(some.allows("/pet"));
        assert!(!some.allows("/store"));
    }

    #[test]
    fn test_builder_and_defaults() {
        let cfg = GeneratorConfig::new("api.yaml", "out").with_module("error-logging");
        assert_eq!(cfg.base_package, "example");
        assert_eq!(cfg.modules, vec!["error-logging"]);
        assert_eq!(cfg.package_segments(), vec!["example"]);

        let cfg = cfg.with_base_package("com.acme::Pet Store");
        assert_eq!(cfg.package_segments(), vec!["com", "acme", "pet_store"]);
    }

    #[test]
    fn test_validate_rejects_unknown_module() {
        let cfg = GeneratorConfig::new("api.yaml", "out").with_module("nope");
        let err = cfg.validate().err().unwrap();
        assert!(matches!(err, AppError::ModuleNotFound(_)));
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let yaml = r#"
document: specs/petstore.yaml
output: generated
operations: ["/pet", "/pet/{petId}"]
modules: [unknown-enum-fallback]
"#;
        let cfg: GeneratorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.document, PathBuf::from("specs/petstore.yaml"));
        assert_eq!(cfg.base_package, DEFAULT_BASE_PACKAGE);
        assert!(cfg.operations.allows("/pet/{petId}"));
        assert!(!cfg.operations.allows("/store"));
        assert_eq!(cfg.modules, vec!["unknown-enum-fallback"]);
    }
}
