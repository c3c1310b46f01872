#![deny(missing_docs)]

//! # OpenAPI Document Module
//!
//! - **shims**: serde deserialization layer over the document.
//! - **document**: loading and version checking.
//! - **refs**: `$ref` pointer helpers.

pub mod document;
pub mod refs;
pub mod shims;

pub use document::{load_document, parse_document};
pub use shims::ShimOpenApi;
