#![deny(missing_docs)]

//! # Document Shims
//!
//! Generic structures acting as an Intermediate Deserialization Layer.
//! These structs map directly to OpenAPI v3 JSON/YAML objects and only carry
//! the fields the API model consumes. Unknown keys are ignored.
//!
//! Note: Shims do not derive `Debug` because `utoipa::RefOr` does not
//! implement `Debug` without the `debug` feature.

use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::openapi::RefOr;

/// Schema for the root document.
#[derive(Deserialize, Clone)]
pub struct ShimOpenApi {
    /// OpenAPI version (e.g. "3.0.3").
    pub openapi: Option<String>,

    /// Server configuration.
    #[serde(default)]
    pub servers: Vec<ShimServer>,

    /// Path items, in document order.
    #[serde(default)]
    pub paths: ShimPaths,

    /// Components section used for reference resolution.
    #[serde(default)]
    pub components: Option<ShimComponents>,
}

/// A `servers` entry.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ShimServer {
    /// URL template, possibly containing `{variable}` placeholders.
    pub url: String,
    /// Variables substituted into the URL template.
    #[serde(default)]
    pub variables: IndexMap<String, ShimServerVariable>,
}

/// A server URL template variable.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ShimServerVariable {
    /// Value used when no alternate value is supplied.
    pub default: String,
}

/// Represents the Paths Object, skipping specification extensions.
#[derive(Clone, Default)]
pub struct ShimPaths {
    /// Parsed path items keyed by path template, in document order.
    pub items: IndexMap<String, ShimPathItem>,
}

impl<'de> Deserialize<'de> for ShimPaths {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut items = IndexMap::new();

        for (key, value) in raw {
            if key.starts_with("x-") {
                continue;
            }
            let path_item = serde_json::from_value::<ShimPathItem>(value).map_err(|e| {
                DeError::custom(format!("Failed to parse path item '{}': {}", key, e))
            })?;
            items.insert(key, path_item);
        }

        Ok(Self { items })
    }
}

/// A Path Item: the operations available on a single path.
#[derive(Deserialize, Clone, Default)]
pub struct ShimPathItem {
    /// Parameters shared by every operation on this path.
    #[serde(default)]
    pub parameters: Vec<RefOr<ShimParameter>>,
    /// GET operation.
    pub get: Option<ShimOperation>,
    /// PUT operation.
    pub put: Option<ShimOperation>,
    /// POST operation.
    pub post: Option<ShimOperation>,
    /// DELETE operation.
    pub delete: Option<ShimOperation>,
    /// OPTIONS operation.
    pub options: Option<ShimOperation>,
    /// HEAD operation.
    pub head: Option<ShimOperation>,
    /// PATCH operation.
    pub patch: Option<ShimOperation>,
    /// TRACE operation.
    pub trace: Option<ShimOperation>,
}

/// An Operation Object.
#[derive(Deserialize, Clone, Default)]
pub struct ShimOperation {
    /// Declared unique identifier.
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,
    /// Short summary.
    pub summary: Option<String>,
    /// Longer description.
    pub description: Option<String>,
    /// Grouping tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Operation-level parameters.
    #[serde(default)]
    pub parameters: Vec<RefOr<ShimParameter>>,
    /// Request body.
    #[serde(rename = "requestBody")]
    pub request_body: Option<RefOr<ShimRequestBody>>,
    /// Responses keyed by status code (`"200"`, `"4XX"`, `"default"`).
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<ShimResponse>>,
    /// Whether the operation is deprecated.
    #[serde(default)]
    pub deprecated: bool,
}

/// A Parameter Object.
#[derive(Deserialize, Serialize, Clone)]
pub struct ShimParameter {
    /// Wire name.
    pub name: String,
    /// Location (`path`, `query`, `header`, `cookie`).
    #[serde(rename = "in")]
    pub location: String,
    /// Whether the parameter is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Value schema.
    pub schema: Option<RefOr<ShimSchema>>,
    /// Description.
    pub description: Option<String>,
}

/// A Request Body Object.
#[derive(Deserialize, Clone, Default)]
pub struct ShimRequestBody {
    /// Media types keyed by content type.
    #[serde(default)]
    pub content: IndexMap<String, ShimMediaType>,
    /// Whether the body is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Description.
    pub description: Option<String>,
}

/// A Response Object.
#[derive(Deserialize, Clone, Default)]
pub struct ShimResponse {
    /// Description.
    pub description: Option<String>,
    /// Media types keyed by content type.
    #[serde(default)]
    pub content: IndexMap<String, ShimMediaType>,
}

/// A Media Type Object.
#[derive(Deserialize, Clone, Default)]
pub struct ShimMediaType {
    /// Payload schema.
    pub schema: Option<RefOr<ShimSchema>>,
}

/// Components object holding reusable definitions.
#[derive(Deserialize, Clone, Default)]
pub struct ShimComponents {
    /// Reusable schemas.
    #[serde(default)]
    pub schemas: IndexMap<String, RefOr<ShimSchema>>,
    /// Reusable parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, RefOr<ShimParameter>>,
    /// Reusable request bodies.
    #[serde(rename = "requestBodies", default)]
    pub request_bodies: IndexMap<String, RefOr<ShimRequestBody>>,
    /// Reusable responses.
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<ShimResponse>>,
    /// Security schemes.
    #[serde(rename = "securitySchemes", default)]
    pub security_schemes: IndexMap<String, RefOr<ShimSecurityScheme>>,
}

/// A Security Scheme Object.
///
/// Kept loosely typed so that scheme kinds the model does not support
/// (`oauth2`, `http`, `mutualTLS`, ...) deserialize and can be skipped.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ShimSecurityScheme {
    /// Scheme kind (`apiKey`, `http`, `oauth2`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Header / query parameter name (API keys).
    pub name: Option<String>,
    /// Location (API keys).
    #[serde(rename = "in")]
    pub location: Option<String>,
    /// HTTP authentication scheme (`basic`, `bearer`).
    pub scheme: Option<String>,
}

/// The `type` keyword: a single name or a list (OAS 3.1 `["string", "null"]`).
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ShimSchemaType {
    /// `type: string`
    Single(String),
    /// `type: [string, "null"]`
    Multiple(Vec<String>),
}

impl ShimSchemaType {
    /// Returns the first non-`null` type name and whether `null` was listed.
    pub fn primary(&self) -> (Option<&str>, bool) {
        match self {
            ShimSchemaType::Single(t) => (Some(t.as_str()).filter(|t| *t != "null"), t == "null"),
            ShimSchemaType::Multiple(list) => (
                list.iter().map(String::as_str).find(|t| *t != "null"),
                list.iter().any(|t| t == "null"),
            ),
        }
    }
}

/// `additionalProperties`: either a flag or a value schema.
#[derive(Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum ShimAdditionalProperties {
    /// `additionalProperties: true|false`
    Flag(bool),
    /// `additionalProperties: { ... }`
    Schema(Box<RefOr<ShimSchema>>),
}

/// A Schema Object, restricted to the keywords the resolver understands.
#[derive(Deserialize, Serialize, Clone, Default)]
pub struct ShimSchema {
    /// The `type` keyword.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<ShimSchemaType>,
    /// The `format` keyword (`int64`, `double`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Enumerated literal values.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Array element schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<RefOr<ShimSchema>>>,
    /// Object properties, in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, RefOr<ShimSchema>>,
    /// Names of mandatory properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Map value schema.
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<ShimAdditionalProperties>,
    /// `allOf` combinator.
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<RefOr<ShimSchema>>,
    /// `oneOf` combinator.
    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<RefOr<ShimSchema>>,
    /// `anyOf` combinator.
    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<RefOr<ShimSchema>>,
    /// OAS 3.0 `nullable`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
