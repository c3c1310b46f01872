#![deny(missing_docs)]

//! # Generator
//!
//! Orchestrates one generation run:
//! modules -> load -> resolve -> filter -> apply modules -> plan -> emit.
//!
//! The pipeline is sequential and holds no state between runs.

pub mod declarations;
pub mod plan;

pub use declarations::{
    ArtifactSet, BodyDecl, ClientModuleDecl, ConfigBundleDecl, EnumMemberDecl, FieldDecl,
    MethodDecl, ModelDecl, ModelKind, ParamDecl, ResultFamilyDecl, SecurityDecl, VariantDecl,
};

use crate::codegen::{render_artifacts, RenderedFile};
use crate::config::GeneratorConfig;
use crate::error::{AppError, AppResult};
use crate::extensions::apply_modules;
use crate::model::ApiModel;
use crate::oas::load_document;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of one generation run.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// Every artifact was written.
    Success {
        /// Client modules emitted.
        clients_generated: usize,
        /// Model types emitted.
        models_generated: usize,
    },
    /// The run stopped; nothing is considered generated.
    Failure {
        /// Human-readable reason.
        message: String,
        /// Underlying error.
        cause: Option<AppError>,
    },
}

impl GenerationOutcome {
    /// Whether the run succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success { .. })
    }
}

impl From<AppError> for GenerationOutcome {
    fn from(error: AppError) -> Self {
        GenerationOutcome::Failure {
            message: error.to_string(),
            cause: Some(error),
        }
    }
}

impl ArtifactSet {
    /// Renders all files.
    pub fn render(&self) -> Vec<RenderedFile> {
        render_artifacts(self)
    }

    /// Writes all files below `dir`, creating directories as needed.
    ///
    /// Returns the written paths in emission order.
    pub fn write_to(&self, dir: &Path) -> AppResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for file in self.render() {
            let path = dir.join(&file.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, file.contents)?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Builds the declarations of a run without writing anything.
pub fn build_artifacts(config: &GeneratorConfig) -> AppResult<ArtifactSet> {
    let modules = config.validate()?;

    tracing::debug!(document = %config.document.display(), "loading document");
    let document = load_document(&config.document)?;

    let model = ApiModel::from_document(&document)?;

    let settings = apply_modules(&modules);

    tracing::debug!("planning declarations");
    Ok(plan::plan(&model, config, settings))
}

/// Runs the whole pipeline and writes the artifacts to `config.output`.
pub fn generate(config: &GeneratorConfig) -> GenerationOutcome {
    let result = build_artifacts(config).and_then(|artifacts| {
        let written = artifacts.write_to(&config.output)?;
        tracing::debug!(
            files = written.len(),
            output = %config.output.display(),
            "wrote artifacts"
        );
        Ok((artifacts.clients.len(), artifacts.models.len()))
    });

    match result {
        Ok((clients_generated, models_generated)) => {
            tracing::info!(clients_generated, models_generated, "generation finished");
            GenerationOutcome::Success {
                clients_generated,
                models_generated,
            }
        }
        Err(error) => {
            tracing::warn!(%error, "generation failed");
            error.into()
        }
    }
}
