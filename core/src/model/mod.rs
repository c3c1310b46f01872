#![deny(missing_docs)]

//! # Model
//!
//! The internal representation of an API description.

/// Aggregate API model.
pub mod api;

/// Schema graph flattening.
pub mod resolver;

/// Resolved schema nodes.
pub mod schema;

pub use api::{
    ApiModel, ApiSecurityScheme, HttpMethod, Operation, ParamLocation, Parameter, RequestBody,
    Response, SecurityLocation, StatusCode, DEFAULT_SERVER_URL,
};
pub use resolver::SchemaResolver;
pub use schema::{PrimitiveType, Property, Schema};
