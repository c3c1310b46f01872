#![deny(missing_docs)]

//! # Generation Settings
//!
//! Run-scoped values extension modules may override. A fresh instance is
//! created for every `generate` call.

/// Serialization behavior of generated types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecSettings {
    /// Reject payload fields the model does not declare.
    pub deny_unknown_fields: bool,
    /// Serialize absent optional fields as explicit `null`.
    pub explicit_nulls: bool,
}

/// Defaults of the client configuration bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSettings {
    /// Statement emitted when a request fails before a response arrives.
    /// `error` is in scope. `None` emits no logging.
    pub error_log_expression: Option<String>,
    /// Codec flags.
    pub codec: CodecSettings,
}

/// Defaults of model generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSettings {
    /// Member added to every enumeration to absorb unrecognized literals.
    pub enum_fallback: Option<String>,
}

/// All overridable settings of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSettings {
    /// Client bundle defaults.
    pub client: ClientSettings,
    /// Model defaults.
    pub models: ModelSettings,
}
