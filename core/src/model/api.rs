#![deny(missing_docs)]

//! # API Model
//!
//! The aggregate built once per generation run from an immutable document:
//! server URL, operations grouped by tag, the resolved schema set and the
//! API-key security schemes.

use crate::error::{AppError, AppResult};
use crate::model::resolver::SchemaResolver;
use crate::model::schema::Schema;
use crate::naming::{capitalize, operation_stem, type_ident};
use crate::oas::refs::component_name;
use crate::oas::shims::{
    ShimComponents, ShimMediaType, ShimOpenApi, ShimOperation, ShimParameter, ShimPathItem,
    ShimRequestBody, ShimResponse, ShimServer,
};
use indexmap::IndexMap;
use std::fmt;
use utoipa::openapi::RefOr;

/// Server URL used when the document declares no `servers`.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/";

/// Maximum length of a `$ref` chain between components.
const MAX_REF_DEPTH: usize = 16;

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// Upper-case method token.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    /// `/users/{id}`
    Path,
    /// `/users?page=1`
    Query,
    /// `X-Request-Id: ...`
    Header,
}

/// A path, query or header parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Wire name.
    pub name: String,
    /// Location.
    pub location: ParamLocation,
    /// Resolved value schema.
    pub schema: Schema,
    /// Whether the caller must supply it. Path parameters always are.
    pub required: bool,
    /// Description.
    pub description: Option<String>,
}

/// A request body.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    /// Resolved payload schema.
    pub schema: Schema,
    /// Whether the body is mandatory.
    pub required: bool,
    /// Selected media type.
    pub content_type: String,
}

/// A response status key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// `"200"`
    Exact(u16),
    /// `"4XX"`: the class digit.
    Range(u8),
    /// `"default"`
    Default,
}

impl StatusCode {
    /// Parses a response key. Returns `None` for malformed keys.
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        if key.eq_ignore_ascii_case("default") {
            return Some(StatusCode::Default);
        }
        let upper = key.to_ascii_uppercase();
        if let Some(class) = upper.strip_suffix("XX") {
            return match class.parse::<u8>() {
                Ok(c @ 1..=5) if class.len() == 1 => Some(StatusCode::Range(c)),
                _ => None,
            };
        }
        match key.parse::<u16>() {
            Ok(code @ 100..=599) => Some(StatusCode::Exact(code)),
            _ => None,
        }
    }

    /// Whether the code denotes success (2xx).
    pub fn is_success(&self) -> bool {
        match self {
            StatusCode::Exact(code) => (200..300).contains(code),
            StatusCode::Range(class) => *class == 2,
            StatusCode::Default => false,
        }
    }

    /// Label used when naming inline response bodies.
    fn label(&self) -> String {
        match self {
            StatusCode::Exact(code) => code.to_string(),
            StatusCode::Range(class) => format!("{}xx", class),
            StatusCode::Default => "Default".to_string(),
        }
    }
}

/// A documented response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Resolved body schema; `None` for bodiless outcomes.
    pub schema: Option<Schema>,
    /// Description.
    pub description: Option<String>,
}

/// One HTTP method + path combination.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Path template.
    pub path: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Declared `operationId`.
    pub operation_id: Option<String>,
    /// Declared summary.
    pub summary: Option<String>,
    /// Declared description.
    pub description: Option<String>,
    /// Declared tags (deduplicated, document order).
    pub tags: Vec<String>,
    /// Deprecation flag.
    pub deprecated: bool,
    /// Merged path-level and operation-level parameters.
    pub parameters: Vec<Parameter>,
    /// Request body.
    pub request_body: Option<RequestBody>,
    /// Responses in document order.
    pub responses: IndexMap<StatusCode, Response>,
}

/// Where an API key is injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityLocation {
    /// As a request header.
    Header,
    /// As a query parameter.
    Query,
}

/// An API-key security scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSecurityScheme {
    /// Scheme name as declared under `components/securitySchemes`.
    pub name: String,
    /// Injection location.
    pub location: SecurityLocation,
    /// Literal header or query parameter name.
    pub key_name: String,
}

/// The resolved API description.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiModel {
    server_url: String,
    paths_by_tags: IndexMap<String, Vec<Operation>>,
    schemas: IndexMap<String, Schema>,
    security_schemes: Vec<ApiSecurityScheme>,
}

impl ApiModel {
    /// Builds the model from a parsed document.
    ///
    /// Operations are visited in document order; the schema graph is resolved
    /// depth-first from their parameters, request bodies and responses.
    pub fn from_document(document: &ShimOpenApi) -> AppResult<Self> {
        let components = document.components.as_ref();
        let mut resolver = SchemaResolver::new(components);
        let mut paths_by_tags: IndexMap<String, Vec<Operation>> = IndexMap::new();

        for (path, item) in &document.paths.items {
            for (method, shim) in path_item_operations(item) {
                let operation =
                    build_operation(&mut resolver, components, path, method, item, shim)?;
                if operation.tags.is_empty() {
                    paths_by_tags
                        .entry(String::new())
                        .or_default()
                        .push(operation);
                } else {
                    for tag in &operation.tags {
                        paths_by_tags
                            .entry(tag.clone())
                            .or_default()
                            .push(operation.clone());
                    }
                }
            }
        }

        let model = Self {
            server_url: server_url(&document.servers),
            paths_by_tags,
            schemas: resolver.into_schemas(),
            security_schemes: extract_security_schemes(components)?,
        };

        tracing::debug!(
            tags = model.paths_by_tags.len(),
            schemas = model.schemas.len(),
            security_schemes = model.security_schemes.len(),
            "resolved API model"
        );

        Ok(model)
    }

    /// Base URL of the API.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Operations grouped by tag; untagged operations live under `""`.
    pub fn paths_by_tags(&self) -> &IndexMap<String, Vec<Operation>> {
        &self.paths_by_tags
    }

    /// Named schemas in discovery order.
    pub fn schemas(&self) -> &IndexMap<String, Schema> {
        &self.schemas
    }

    /// Extracted API-key schemes.
    pub fn security_schemes(&self) -> &[ApiSecurityScheme] {
        &self.security_schemes
    }
}

fn path_item_operations(item: &ShimPathItem) -> Vec<(HttpMethod, &ShimOperation)> {
    [
        (HttpMethod::Get, item.get.as_ref()),
        (HttpMethod::Put, item.put.as_ref()),
        (HttpMethod::Post, item.post.as_ref()),
        (HttpMethod::Delete, item.delete.as_ref()),
        (HttpMethod::Options, item.options.as_ref()),
        (HttpMethod::Head, item.head.as_ref()),
        (HttpMethod::Patch, item.patch.as_ref()),
        (HttpMethod::Trace, item.trace.as_ref()),
    ]
    .into_iter()
    .filter_map(|(method, op)| op.map(|op| (method, op)))
    .collect()
}

fn server_url(servers: &[ShimServer]) -> String {
    let Some(server) = servers.first() else {
        return DEFAULT_SERVER_URL.to_string();
    };
    let mut url = server.url.clone();
    for (name, variable) in &server.variables {
        url = url.replace(&format!("{{{}}}", name), &variable.default);
    }
    url
}

/// Follows a chain of component references to the concrete object.
fn follow<'a, T>(
    item: &'a RefOr<T>,
    section: &str,
    table: impl Fn(&ShimComponents) -> &IndexMap<String, RefOr<T>>,
    components: Option<&'a ShimComponents>,
) -> AppResult<&'a T> {
    let mut current = item;
    for _ in 0..MAX_REF_DEPTH {
        match current {
            RefOr::T(value) => return Ok(value),
            RefOr::Ref(r) => {
                let name = component_name(&r.ref_location, section).ok_or_else(|| {
                    AppError::SchemaResolution(format!(
                        "Unsupported or external reference '{}'",
                        r.ref_location
                    ))
                })?;
                current = components
                    .and_then(|c| table(c).get(&name))
                    .ok_or_else(|| {
                        AppError::SchemaResolution(format!(
                            "Reference to undefined {} entry '{}'",
                            section, name
                        ))
                    })?;
            }
        }
    }
    Err(AppError::SchemaResolution(format!(
        "Reference chain in '{}' is too deep or cyclic",
        section
    )))
}

fn build_operation(
    resolver: &mut SchemaResolver<'_>,
    components: Option<&ShimComponents>,
    path: &str,
    method: HttpMethod,
    item: &ShimPathItem,
    shim: &ShimOperation,
) -> AppResult<Operation> {
    let stem = type_ident(&operation_stem(shim.operation_id.as_deref(), method, path));
    let path_stem = type_ident(&operation_stem(None, method, path));
    let owners = [stem.as_str(), path_stem.as_str()];
    let param_owners = ["", stem.as_str(), path_stem.as_str()];

    let mut merged: IndexMap<(String, String), &ShimParameter> = IndexMap::new();
    for param in item.parameters.iter().chain(shim.parameters.iter()) {
        let param = follow(param, "parameters", |c| &c.parameters, components)?;
        merged.insert((param.name.clone(), param.location.clone()), param);
    }

    let mut parameters = Vec::new();
    for param in merged.values() {
        let location = match param.location.as_str() {
            "path" => ParamLocation::Path,
            "query" => ParamLocation::Query,
            "header" => ParamLocation::Header,
            other => {
                tracing::warn!(
                    path,
                    parameter = %param.name,
                    location = other,
                    "ignoring parameter in unsupported location"
                );
                continue;
            }
        };
        let schema = match &param.schema {
            Some(s) => resolver.resolve_owned(s, &param.name, &param_owners)?,
            None => Schema::Unknown,
        };
        parameters.push(Parameter {
            name: param.name.clone(),
            location,
            schema,
            required: param.required || location == ParamLocation::Path,
            description: param.description.clone(),
        });
    }

    let request_body = match &shim.request_body {
        Some(body) => {
            let body: &ShimRequestBody =
                follow(body, "requestBodies", |c| &c.request_bodies, components)?;
            match select_media(&body.content) {
                Some((content_type, media)) => Some(RequestBody {
                    schema: match &media.schema {
                        Some(s) => resolver.resolve_owned(s, "RequestBody", &owners)?,
                        None => Schema::Unknown,
                    },
                    required: body.required,
                    content_type: content_type.to_string(),
                }),
                None => None,
            }
        }
        None => None,
    };

    let mut responses = IndexMap::new();
    for (key, response) in &shim.responses {
        let Some(status) = StatusCode::parse(key) else {
            tracing::warn!(path, status = %key, "ignoring malformed response status");
            continue;
        };
        let response: &ShimResponse =
            follow(response, "responses", |c| &c.responses, components)?;
        let context = format!("{}Body", capitalize(&status.label()));
        let schema = match select_media(&response.content).and_then(|(_, m)| m.schema.as_ref()) {
            Some(s) => Some(resolver.resolve_owned(s, &context, &owners)?),
            None => None,
        };
        responses.insert(
            status,
            Response {
                schema,
                description: response.description.clone(),
            },
        );
    }

    let mut tags: Vec<String> = Vec::new();
    for tag in &shim.tags {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }

    Ok(Operation {
        path: path.to_string(),
        method,
        operation_id: shim.operation_id.clone(),
        summary: shim.summary.clone(),
        description: shim.description.clone(),
        tags,
        deprecated: shim.deprecated,
        parameters,
        request_body,
        responses,
    })
}

/// Picks `application/json`, then any `+json` type, then the first declared type.
fn select_media(content: &IndexMap<String, ShimMediaType>) -> Option<(&str, &ShimMediaType)> {
    content
        .get_key_value("application/json")
        .or_else(|| content.iter().find(|(k, _)| k.ends_with("+json")))
        .or_else(|| content.first())
        .map(|(k, v)| (k.as_str(), v))
}

fn extract_security_schemes(
    components: Option<&ShimComponents>,
) -> AppResult<Vec<ApiSecurityScheme>> {
    let Some(comps) = components else {
        return Ok(Vec::new());
    };

    let mut schemes = Vec::new();
    for (name, scheme) in &comps.security_schemes {
        let scheme = follow(scheme, "securitySchemes", |c| &c.security_schemes, components)?;
        if scheme.kind != "apiKey" {
            tracing::debug!(
                scheme = %name,
                kind = %scheme.kind,
                "skipping non API-key security scheme"
            );
            continue;
        }
        let location = match scheme.location.as_deref() {
            Some("header") => SecurityLocation::Header,
            Some("query") => SecurityLocation::Query,
            other => {
                tracing::debug!(
                    scheme = %name,
                    location = ?other,
                    "skipping API key in unsupported location"
                );
                continue;
            }
        };
        let Some(key_name) = scheme.name.clone() else {
            tracing::warn!(scheme = %name, "API key scheme without a key name");
            continue;
        };
        schemes.push(ApiSecurityScheme {
            name: name.clone(),
            location,
            key_name,
        });
    }
    Ok(schemes)
}
