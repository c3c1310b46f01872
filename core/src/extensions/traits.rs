#![deny(missing_docs)]

//! # Extension Module Trait
//!
//! Defines the hook points a module may implement to adjust generation defaults.

use crate::extensions::settings::{ClientSettings, ModelSettings};

/// A pluggable adjustment of generation-time defaults.
///
/// Both hooks are optional. Modules are applied in configuration order and
/// each hook sees the values left by the previous modules, so the last write wins.
pub trait ExtensionModule {
    /// Stable registry identifier.
    fn id(&self) -> &'static str;

    /// Overrides configuration-bundle defaults.
    fn configure_client(&self, settings: &mut ClientSettings) {
        let _ = settings;
    }

    /// Overrides model-generation defaults.
    fn configure_models(&self, settings: &mut ModelSettings) {
        let _ = settings;
    }
}
