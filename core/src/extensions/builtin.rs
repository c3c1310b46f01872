//! Built-in extension modules.

use crate::extensions::settings::{ClientSettings, ModelSettings};
use crate::extensions::traits::ExtensionModule;

/// Name of the enumeration member produced by [`UnknownEnumFallback`].
pub const UNKNOWN_ENUM_MEMBER: &str = "Unknown";

/// Logging statement installed by [`ErrorLogging`].
pub const ERROR_LOG_EXPRESSION: &str = r#"tracing::error!(%error, "request failed");"#;

/// Adds an `Unknown` member to every enumeration and makes it the default.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnknownEnumFallback;

impl ExtensionModule for UnknownEnumFallback {
    fn id(&self) -> &'static str {
        "unknown-enum-fallback"
    }

    fn configure_models(&self, settings: &mut ModelSettings) {
        settings.enum_fallback = Some(UNKNOWN_ENUM_MEMBER.to_string());
    }
}

/// Logs transport and decoding failures through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorLogging;

impl ExtensionModule for ErrorLogging {
    fn id(&self) -> &'static str {
        "error-logging"
    }

    fn configure_client(&self, settings: &mut ClientSettings) {
        settings.error_log_expression = Some(ERROR_LOG_EXPRESSION.to_string());
    }
}

/// Rejects undeclared fields and writes absent optionals as `null`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrictCodec;

impl ExtensionModule for StrictCodec {
    fn id(&self) -> &'static str {
        "strict-codec"
    }

    fn configure_client(&self, settings: &mut ClientSettings) {
        settings.codec.deny_unknown_fields = true;
        settings.codec.explicit_nulls = true;
    }
}
