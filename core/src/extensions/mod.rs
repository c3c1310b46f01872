#![deny(missing_docs)]

//! # Extensions
//!
//! Named modules that adjust generation defaults without touching the
//! resolution or naming algorithms.
//!
//! - **traits**: Defines `ExtensionModule` and its hook points.
//! - **settings**: The run-scoped values hooks mutate.
//! - **builtin**: The modules shipped with the generator.
//!
//! Ids are looked up in a fixed registry; an unknown id is a configuration error.

pub mod builtin;
pub mod settings;
pub mod traits;

pub use builtin::{ErrorLogging, StrictCodec, UnknownEnumFallback};
pub use settings::{ClientSettings, CodecSettings, GenerationSettings, ModelSettings};
pub use traits::ExtensionModule;

use crate::error::{AppError, AppResult};

type Factory = fn() -> Box<dyn ExtensionModule>;

fn unknown_enum_fallback() -> Box<dyn ExtensionModule> {
    Box::new(UnknownEnumFallback)
}

fn error_logging() -> Box<dyn ExtensionModule> {
    Box::new(ErrorLogging)
}

fn strict_codec() -> Box<dyn ExtensionModule> {
    Box::new(StrictCodec)
}

const REGISTRY: &[(&str, Factory)] = &[
    ("unknown-enum-fallback", unknown_enum_fallback),
    ("error-logging", error_logging),
    ("strict-codec", strict_codec),
];

/// Ids of all registered modules, in registry order.
pub fn registered_ids() -> Vec<&'static str> {
    REGISTRY.iter().map(|(id, _)| *id).collect()
}

/// Instantiates the module registered under `id`.
pub fn lookup(id: &str) -> AppResult<Box<dyn ExtensionModule>> {
    REGISTRY
        .iter()
        .find(|(key, _)| *key == id.trim())
        .map(|(_, factory)| factory())
        .ok_or_else(|| AppError::ModuleNotFound(id.to_string()))
}

/// Resolves every id, failing on the first unknown one.
pub fn resolve_modules(ids: &[String]) -> AppResult<Vec<Box<dyn ExtensionModule>>> {
    ids.iter().map(|id| lookup(id)).collect()
}

/// Applies modules in order to fresh default settings.
pub fn apply_modules(modules: &[Box<dyn ExtensionModule>]) -> GenerationSettings {
    let mut settings = GenerationSettings::default();
    for module in modules {
        tracing::debug!(module = module.id(), "applying extension module");
        module.configure_client(&mut settings.client);
        module.configure_models(&mut settings.models);
    }
    settings
}
