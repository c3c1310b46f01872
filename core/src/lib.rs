#![deny(missing_docs)]

//! # Clientgen Core
//!
//! Core library of the OpenAPI-to-HTTP-client generator.
//!
//! A run loads an OpenAPI v3 document, resolves it into an [`ApiModel`],
//! filters operations, applies extension modules and emits client modules,
//! model types, result-variant families and a configuration bundle.

/// Shared error types.
pub mod error;

/// OpenAPI (OAS) document loading.
pub mod oas;

/// API model and schema resolution.
pub mod model;

/// Type mapping logic (Schema -> TypeRef).
pub mod type_mapping;

/// Identifier derivation.
pub mod naming;

/// Extension module registry.
pub mod extensions;

/// Generator configuration.
pub mod config;

/// Generation pipeline and declarations.
pub mod generator;

/// Source rendering of declarations.
pub mod codegen;

pub use codegen::{render_artifacts, RenderedFile};
pub use config::{GeneratorConfig, OperationFilter, DEFAULT_BASE_PACKAGE};
pub use error::{AppError, AppResult};
pub use extensions::{
    apply_modules, lookup, registered_ids, resolve_modules, ExtensionModule, GenerationSettings,
};
pub use generator::{build_artifacts, generate, ArtifactSet, GenerationOutcome};
pub use model::{
    ApiModel, ApiSecurityScheme, HttpMethod, Operation, Schema, SchemaResolver, SecurityLocation,
    StatusCode, DEFAULT_SERVER_URL,
};
pub use oas::{load_document, parse_document};
pub use type_mapping::{SchemaTypeMapper, TypeMapper, TypeRef};
