#![deny(missing_docs)]

//! # Code Generation
//!
//! Renders declarations into Rust source files for an async `reqwest` client.
//!
//! This module turns an [`ArtifactSet`] into [`RenderedFile`] units. It handles:
//! - Type rendering (scalars, collections, boxed recursive models).
//! - Attribute injection (`derive`, `serde` renames, codec flags, enum fallbacks).
//! - Status-code dispatch into result-variant families.
//! - Module wiring (`mod.rs` files for the package, clients and models).
//!
//! Output contains no timestamps; files are emitted in a fixed order.

use crate::generator::declarations::{
    ArtifactSet, ClientModuleDecl, ConfigBundleDecl, FieldDecl, MethodDecl, ModelDecl, ModelKind,
    ParamDecl, ResultFamilyDecl, VariantDecl,
};
use crate::model::{ParamLocation, SecurityLocation, StatusCode};
use crate::type_mapping::{ScalarKind, TypeRef};
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

const HEADER: &str = "// Generated by clientgen. Do not edit.\n\n";

/// Prefix for model types referenced from client modules.
const CLIENT_MODELS: &str = "models::";

/// Prefix for model types referenced from sibling model files.
const MODEL_SIBLINGS: &str = "super::";

/// One emitted source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Path relative to the output directory.
    pub path: PathBuf,
    /// Source text.
    pub contents: String,
}

/// Renders every file of an artifact set.
pub fn render_artifacts(set: &ArtifactSet) -> Vec<RenderedFile> {
    let root: PathBuf = set.package.iter().collect();
    let mut files = Vec::new();

    for depth in 1..set.package.len() {
        let parent: PathBuf = set.package[..depth].iter().collect();
        files.push(RenderedFile {
            path: parent.join("mod.rs"),
            contents: format!("{}pub mod {};\n", HEADER, set.package[depth]),
        });
    }

    files.push(RenderedFile {
        path: root.join("mod.rs"),
        contents: render_root(),
    });
    files.push(RenderedFile {
        path: root.join("config.rs"),
        contents: render_config(&set.config),
    });
    files.push(RenderedFile {
        path: root.join("clients").join("mod.rs"),
        contents: render_index(
            "API clients, one per tag.",
            true,
            set.clients
                .iter()
                .map(|c| (c.module_name.as_str(), c.type_name.as_str())),
        ),
    });
    for client in &set.clients {
        files.push(RenderedFile {
            path: root
                .join("clients")
                .join(format!("{}.rs", client.module_name)),
            contents: render_client(client),
        });
    }
    files.push(RenderedFile {
        path: root.join("models").join("mod.rs"),
        contents: render_index(
            "Model types.",
            false,
            set.models
                .iter()
                .map(|m| (m.file_stem.as_str(), m.type_name.as_str())),
        ),
    });
    for model in &set.models {
        files.push(RenderedFile {
            path: root.join("models").join(format!("{}.rs", model.file_stem)),
            contents: render_model(model, &set.config),
        });
    }

    files
}

/// Renders a type reference as Rust type syntax.
///
/// Named models are prefixed with `prefix` (e.g. `models::`).
pub fn rust_type(ty: &TypeRef, prefix: &str) -> String {
    match ty {
        TypeRef::Scalar(kind) => match kind {
            ScalarKind::Int => "i32",
            ScalarKind::Long => "i64",
            ScalarKind::Float => "f32",
            ScalarKind::Double => "f64",
            ScalarKind::Boolean => "bool",
            ScalarKind::String => "String",
        }
        .to_string(),
        TypeRef::List(inner) => format!("Vec<{}>", rust_type(inner, prefix)),
        TypeRef::Map(inner) => format!(
            "std::collections::BTreeMap<String, {}>",
            rust_type(inner, prefix)
        ),
        TypeRef::Named(name) => format!("{}{}", prefix, name),
        TypeRef::Optional(inner) => format!("Option<{}>", rust_type(inner, prefix)),
        TypeRef::Unknown => "serde_json::Value".to_string(),
    }
}

fn boxed_type(ty: &TypeRef, prefix: &str) -> String {
    match ty {
        TypeRef::Optional(inner) => format!("Option<{}>", boxed_type(inner, prefix)),
        TypeRef::Named(_) => format!("Box<{}>", rust_type(ty, prefix)),
        other => rust_type(other, prefix),
    }
}

/// Helper to generate documentation lines.
fn doc_comment(text: Option<&str>, indent: &str) -> String {
    let mut code = String::new();
    if let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) {
        for line in text.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                code.push_str(&format!("{}///\n", indent));
            } else {
                code.push_str(&format!("{}/// {}\n", indent, line));
            }
        }
    }
    code
}

fn render_root() -> String {
    let mut code = String::from(HEADER);
    code.push_str("//! Generated API client.\n\n");
    code.push_str("pub mod clients;\npub mod config;\npub mod models;\n\n");
    code.push_str("pub use config::ClientConfig;\n");
    code
}

fn render_index<'a>(
    doc: &str,
    public_modules: bool,
    entries: impl Iterator<Item = (&'a str, &'a str)>,
) -> String {
    let mut code = String::from(HEADER);
    code.push_str(&format!("//! {}\n", doc));

    let visibility = if public_modules { "pub " } else { "" };
    let mut modules = String::new();
    let mut exports = String::new();
    for (module, item) in entries {
        modules.push_str(&format!("{}mod {};\n", visibility, module));
        exports.push_str(&format!("pub use {}::{};\n", module, item));
    }
    if !modules.is_empty() {
        code.push('\n');
        code.push_str(&modules);
        code.push('\n');
        code.push_str(&exports);
    }
    code
}

fn render_config(config: &ConfigBundleDecl) -> String {
    let mut code = String::from(HEADER);
    code.push_str("//! Client configuration.\n\n");

    code.push_str("/// Base URL declared by the API description.\n");
    code.push_str(&format!(
        "pub const DEFAULT_BASE_URL: &str = {:?};\n\n",
        config.base_url
    ));
    code.push_str("/// Whether models reject undeclared fields.\n");
    code.push_str(&format!(
        "pub const DENY_UNKNOWN_FIELDS: bool = {};\n\n",
        config.codec.deny_unknown_fields
    ));
    code.push_str("/// Whether absent optional fields serialize as `null`.\n");
    code.push_str(&format!(
        "pub const EXPLICIT_NULLS: bool = {};\n\n",
        config.codec.explicit_nulls
    ));

    code.push_str("/// API keys injected into every request.\n");
    code.push_str("#[derive(Debug, Clone, Default)]\n");
    code.push_str("pub struct ApiKeys {\n");
    for key in &config.security {
        let location = match key.location {
            SecurityLocation::Header => "header",
            SecurityLocation::Query => "query parameter",
        };
        code.push_str(&format!(
            "    /// `{}` {} (scheme `{}`).\n",
            key.key_name, location, key.scheme_name
        ));
        code.push_str(&format!("    pub {}: Option<String>,\n", key.ident));
    }
    code.push_str("}\n\n");

    code.push_str("/// Connection settings shared by all clients.\n");
    code.push_str("#[derive(Debug, Clone)]\n");
    code.push_str("pub struct ClientConfig {\n");
    code.push_str("    /// Base URL requests are sent to.\n");
    code.push_str("    pub base_url: String,\n");
    code.push_str("    /// Transport engine.\n");
    code.push_str("    pub http: reqwest::Client,\n");
    code.push_str("    /// API keys.\n");
    code.push_str("    pub api_keys: ApiKeys,\n");
    code.push_str("}\n\n");

    code.push_str("impl Default for ClientConfig {\n");
    code.push_str("    fn default() -> Self {\n");
    code.push_str("        Self::new(DEFAULT_BASE_URL)\n");
    code.push_str("    }\n");
    code.push_str("}\n\n");

    code.push_str("impl ClientConfig {\n");
    code.push_str("    /// Creates a configuration for `base_url` with a default transport.\n");
    code.push_str("    pub fn new(base_url: impl Into<String>) -> Self {\n");
    code.push_str("        Self {\n");
    code.push_str("            base_url: base_url.into(),\n");
    code.push_str("            http: reqwest::Client::new(),\n");
    code.push_str("            api_keys: ApiKeys::default(),\n");
    code.push_str("        }\n");
    code.push_str("    }\n\n");
    code.push_str("    /// Replaces the transport engine.\n");
    code.push_str("    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {\n");
    code.push_str("        self.http = http;\n");
    code.push_str("        self\n");
    code.push_str("    }\n\n");
    code.push_str("    /// Sets the API keys.\n");
    code.push_str("    pub fn with_api_keys(mut self, api_keys: ApiKeys) -> Self {\n");
    code.push_str("        self.api_keys = api_keys;\n");
    code.push_str("        self\n");
    code.push_str("    }\n\n");
    code.push_str("    /// Joins the base URL with an expanded path template.\n");
    code.push_str("    pub fn url(&self, path: &str) -> String {\n");
    code.push_str("        format!(\"{}{}\", self.base_url.trim_end_matches('/'), path)\n");
    code.push_str("    }\n\n");

    code.push_str("    /// Injects the configured API keys.\n");
    if config.security.is_empty() {
        code.push_str(
            "    pub fn apply_security(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {\n",
        );
        code.push_str("        request\n");
    } else {
        code.push_str(
            "    pub fn apply_security(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {\n",
        );
        for key in &config.security {
            code.push_str(&format!(
                "        if let Some(value) = &self.api_keys.{} {{\n",
                key.ident
            ));
            match key.location {
                SecurityLocation::Header => code.push_str(&format!(
                    "            request = request.header({:?}, value);\n",
                    key.key_name
                )),
                SecurityLocation::Query => code.push_str(&format!(
                    "            request = request.query(&[({:?}, value)]);\n",
                    key.key_name
                )),
            }
            code.push_str("        }\n");
        }
        code.push_str("        request\n");
    }
    code.push_str("    }\n\n");

    code.push_str("    /// Called when a request fails before a response is received.\n");
    code.push_str("    pub fn log_error(&self, error: &reqwest::Error) {\n");
    match &config.error_log_expression {
        Some(expression) => code.push_str(&format!("        {}\n", expression.trim())),
        None => code.push_str("        let _ = error;\n"),
    }
    code.push_str("    }\n");
    code.push_str("}\n");
    code
}

fn render_client(client: &ClientModuleDecl) -> String {
    let mut code = String::from(HEADER);
    if client.tag.is_empty() {
        code.push_str("//! Operations without a tag.\n\n");
    } else {
        code.push_str(&format!("//! Operations tagged `{}`.\n\n", client.tag));
    }
    code.push_str("use super::super::config::ClientConfig;\n");
    code.push_str("#[allow(unused_imports)]\n");
    code.push_str("use super::super::models;\n\n");

    code.push_str(&format!("/// Client for the `{}` operations.\n", client.module_name));
    code.push_str("#[derive(Debug, Clone)]\n");
    code.push_str(&format!("pub struct {} {{\n", client.type_name));
    code.push_str("    config: ClientConfig,\n");
    code.push_str("}\n\n");

    code.push_str(&format!("impl {} {{\n", client.type_name));
    code.push_str("    /// Creates a client.\n");
    code.push_str("    pub fn new(config: ClientConfig) -> Self {\n");
    code.push_str("        Self { config }\n");
    code.push_str("    }\n\n");
    code.push_str("    /// Shared configuration.\n");
    code.push_str("    pub fn config(&self) -> &ClientConfig {\n");
    code.push_str("        &self.config\n");
    code.push_str("    }\n");
    for method in &client.methods {
        code.push('\n');
        code.push_str(&render_method(method));
    }
    code.push_str("}\n");

    for method in &client.methods {
        code.push('\n');
        code.push_str(&render_family(&method.result, &client.type_name, &method.name));
    }
    code
}

fn render_method(method: &MethodDecl) -> String {
    let mut code = String::new();
    let mut doc = String::new();
    if let Some(summary) = &method.summary {
        doc.push_str(summary.trim());
        doc.push_str("\n\n");
    }
    if let Some(description) = &method.description {
        doc.push_str(description.trim());
        doc.push_str("\n\n");
    }
    doc.push_str(&format!("`{} {}`", method.http_method, method.path));
    code.push_str(&doc_comment(Some(doc.as_str()), "    "));
    if method.deprecated {
        code.push_str("    #[deprecated]\n");
    }

    let mut args = vec!["&self".to_string()];
    for param in &method.params {
        args.push(format!("{}: {}", param.ident, rust_type(&param.ty, CLIENT_MODELS)));
    }
    if let Some(body) = &method.body {
        args.push(format!("{}: {}", body.ident, rust_type(&body.ty, CLIENT_MODELS)));
    }
    code.push_str(&format!(
        "    pub async fn {}({}) -> Result<{}, reqwest::Error> {{\n",
        method.name,
        args.join(", "),
        method.result.type_name
    ));

    code.push_str(&format!("        let url = {};\n", url_expression(method)));
    code.push_str(&format!(
        "        let mut request = self.config.http.request(reqwest::Method::{}, url);\n",
        method.http_method
    ));
    code.push_str("        request = self.config.apply_security(request);\n");
    for param in &method.params {
        code.push_str(&render_param(param));
    }
    if let Some(body) = &method.body {
        let call = body_call(&body.content_type);
        if body.ty.is_optional() {
            code.push_str(&format!("        if let Some(value) = &{} {{\n", body.ident));
            code.push_str(&format!("            request = request{}(value);\n", call));
            code.push_str("        }\n");
        } else {
            code.push_str(&format!("        request = request{}(&{});\n", call, body.ident));
        }
    }

    code.push_str("        let response = match request.send().await {\n");
    code.push_str("            Ok(response) => response,\n");
    code.push_str("            Err(error) => {\n");
    code.push_str("                self.config.log_error(&error);\n");
    code.push_str("                return Err(error);\n");
    code.push_str("            }\n");
    code.push_str("        };\n");
    code.push_str(&render_dispatch(&method.result));
    code.push_str("    }\n");
    code
}

/// Expands the path template into a `url` expression.
fn url_expression(method: &MethodDecl) -> String {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    let placeholder =
        PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("Invalid regex"));

    let path = method.path.as_str();
    let mut template = String::new();
    let mut args = Vec::new();
    let mut last = 0;
    for caps in placeholder.captures_iter(path) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        template.push_str(&escape_braces(&path[last..whole.start()]));
        match method
            .params
            .iter()
            .find(|p| p.location == ParamLocation::Path && p.wire_name == name.as_str())
        {
            Some(param) => {
                template.push_str("{}");
                args.push(param.ident.as_str());
            }
            None => template.push_str(&escape_braces(whole.as_str())),
        }
        last = whole.end();
    }
    template.push_str(&escape_braces(&path[last..]));

    if args.is_empty() {
        format!("self.config.url({:?})", path)
    } else {
        format!(
            "self.config.url(&format!({:?}, {}))",
            template,
            args.join(", ")
        )
    }
}

fn escape_braces(literal: &str) -> String {
    literal.replace('{', "{{").replace('}', "}}")
}

fn body_call(content_type: &str) -> &'static str {
    if content_type == "application/x-www-form-urlencoded" {
        ".form"
    } else {
        ".json"
    }
}

fn render_param(param: &ParamDecl) -> String {
    let (optional, inner) = match &param.ty {
        TypeRef::Optional(inner) => (true, inner.as_ref()),
        other => (false, other),
    };
    let value = if optional {
        "value".to_string()
    } else {
        format!("&{}", param.ident)
    };
    let name = format!("{:?}", param.wire_name);

    let apply = match (param.location, inner) {
        (ParamLocation::Path, _) => return String::new(),
        (ParamLocation::Query, TypeRef::List(_)) => format!(
            "for item in {} {{\n    request = request.query(&[({}, item)]);\n}}",
            value, name
        ),
        (ParamLocation::Query, _) => format!("request = request.query(&[({}, {})]);", name, value),
        (ParamLocation::Header, TypeRef::List(_)) => format!(
            "request = request.header({}, {}.iter().map(|item| item.to_string()).collect::<Vec<_>>().join(\",\"));",
            name, value
        ),
        (ParamLocation::Header, _) => {
            format!("request = request.header({}, {}.to_string());", name, value)
        }
    };

    let mut code = String::new();
    if optional {
        code.push_str(&format!("        if let Some(value) = &{} {{\n", param.ident));
        for line in apply.lines() {
            code.push_str(&format!("            {}\n", line));
        }
        code.push_str("        }\n");
    } else {
        for line in apply.lines() {
            code.push_str(&format!("        {}\n", line));
        }
    }
    code
}

/// Status classes not claimed by a documented range, for the `default` arm.
fn default_pattern(result: &ResultFamilyDecl) -> Option<String> {
    let ranges: Vec<String> = [4u16, 5]
        .into_iter()
        .filter(|class| {
            !result
                .variants
                .iter()
                .any(|v| v.status == StatusCode::Range(*class as u8))
        })
        .map(|class| format!("{}..={}", class * 100, class * 100 + 99))
        .collect();
    match ranges.len() {
        0 => None,
        1 => Some(ranges.join("")),
        _ => Some(format!("({})", ranges.join(" | "))),
    }
}

fn render_dispatch(result: &ResultFamilyDecl) -> String {
    let family = &result.type_name;
    let decode = "response.json().await?";
    let mut arms = Vec::new();

    let exact = result
        .variants
        .iter()
        .filter(|v| matches!(v.status, StatusCode::Exact(_)));
    let ranges = result
        .variants
        .iter()
        .filter(|v| matches!(v.status, StatusCode::Range(_)));
    for variant in exact.chain(ranges) {
        let pattern = match variant.status {
            StatusCode::Exact(code) => code.to_string(),
            StatusCode::Range(class) => {
                let base = u16::from(class) * 100;
                format!("{}..={}", base, base + 99)
            }
            StatusCode::Default => continue,
        };
        let value = match &variant.body {
            Some(_) => format!("{}::{}({})", family, variant.name, decode),
            None => format!("{}::{}", family, variant.name),
        };
        arms.push(format!("{} => Ok({}),", pattern, value));
    }

    if let Some(variant) = result.variants.iter().find(|v| v.status == StatusCode::Default) {
        if let Some(pattern) = default_pattern(result) {
            let value = match &variant.body {
                Some(_) => format!(
                    "{}::{} {{ status_code, body: {} }}",
                    family, variant.name, decode
                ),
                None => format!("{}::{} {{ status_code }}", family, variant.name),
            };
            arms.push(format!("status_code @ {} => Ok({}),", pattern, value));
        }
    }

    arms.push(format!(
        "status_code => Ok({}::{} {{ status_code }}),",
        family, result.unknown_failure
    ));

    let mut code = String::from("        match response.status().as_u16() {\n");
    for arm in arms {
        code.push_str(&format!("            {}\n", arm));
    }
    code.push_str("        }\n");
    code
}

fn render_variant(variant: &VariantDecl) -> String {
    let mut code = doc_comment(variant.description.as_deref(), "    ");
    match (variant.status, &variant.body) {
        (StatusCode::Default, Some(body)) => {
            code.push_str(&format!("    {} {{\n", variant.name));
            code.push_str("        /// Received status code.\n");
            code.push_str("        status_code: u16,\n");
            code.push_str("        /// Decoded payload.\n");
            code.push_str(&format!("        body: {},\n", rust_type(body, CLIENT_MODELS)));
            code.push_str("    },\n");
        }
        (StatusCode::Default, None) => {
            code.push_str(&format!("    {} {{\n", variant.name));
            code.push_str("        /// Received status code.\n");
            code.push_str("        status_code: u16,\n");
            code.push_str("    },\n");
        }
        (_, Some(body)) => {
            code.push_str(&format!(
                "    {}({}),\n",
                variant.name,
                rust_type(body, CLIENT_MODELS)
            ));
        }
        (_, None) => code.push_str(&format!("    {},\n", variant.name)),
    }
    code
}

fn render_family(result: &ResultFamilyDecl, client_type: &str, method_name: &str) -> String {
    let mut code = format!(
        "/// Outcomes of [`{}::{}`].\n",
        client_type, method_name
    );
    code.push_str("#[derive(Debug, Clone, PartialEq)]\n");
    code.push_str(&format!("pub enum {} {{\n", result.type_name));
    for variant in &result.variants {
        code.push_str(&render_variant(variant));
    }
    code.push_str("    /// A status code the API description does not document.\n");
    code.push_str(&format!("    {} {{\n", result.unknown_failure));
    code.push_str("        /// Received status code.\n");
    code.push_str("        status_code: u16,\n");
    code.push_str("    },\n");
    code.push_str("}\n");
    code
}

fn render_field(field: &FieldDecl, config: &ConfigBundleDecl) -> String {
    let mut code = doc_comment(field.description.as_deref(), "    ");

    let mut attrs = Vec::new();
    if field.ident != field.wire_name {
        attrs.push(format!("rename = {:?}", field.wire_name));
    }
    if field.ty.is_optional() {
        attrs.push("default".to_string());
        if !config.codec.explicit_nulls {
            attrs.push("skip_serializing_if = \"Option::is_none\"".to_string());
        }
    }
    if !attrs.is_empty() {
        code.push_str(&format!("    #[serde({})]\n", attrs.join(", ")));
    }

    let ty = if field.boxed {
        boxed_type(&field.ty, MODEL_SIBLINGS)
    } else {
        rust_type(&field.ty, MODEL_SIBLINGS)
    };
    code.push_str(&format!("    pub {}: {},\n", field.ident, ty));
    code
}

fn render_model(model: &ModelDecl, config: &ConfigBundleDecl) -> String {
    let mut code = String::from(HEADER);
    match &model.kind {
        ModelKind::Struct(fields) => {
            code.push_str("use serde::{Deserialize, Serialize};\n\n");
            code.push_str(&format!("/// `{}`\n", model.schema_name));
            code.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
            if config.codec.deny_unknown_fields {
                code.push_str("#[serde(deny_unknown_fields)]\n");
            }
            code.push_str(&format!("pub struct {} {{\n", model.type_name));
            for field in fields {
                code.push_str(&render_field(field, config));
            }
            code.push_str("}\n");
        }
        ModelKind::Enum { members, fallback } => {
            code.push_str("use serde::{Deserialize, Serialize};\n\n");
            code.push_str(&format!("/// `{}`\n", model.schema_name));
            let default = if fallback.is_some() { "Default, " } else { "" };
            code.push_str(&format!(
                "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, {}Serialize, Deserialize)]\n",
                default
            ));
            code.push_str(&format!("pub enum {} {{\n", model.type_name));
            for member in members {
                if member.ident != member.literal {
                    code.push_str(&format!("    #[serde(rename = {:?})]\n", member.literal));
                }
                code.push_str(&format!("    {},\n", member.ident));
            }
            if let Some(fallback) = fallback {
                code.push_str("    /// Any value this version of the client does not know.\n");
                code.push_str("    #[default]\n");
                code.push_str("    #[serde(other)]\n");
                code.push_str(&format!("    {},\n", fallback));
            }
            code.push_str("}\n\n");

            code.push_str(&format!("impl std::fmt::Display for {} {{\n", model.type_name));
            code.push_str(
                "    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {\n",
            );
            if members.is_empty() && fallback.is_none() {
                code.push_str("        match *self {}\n");
            } else {
                code.push_str("        f.write_str(match self {\n");
                for member in members {
                    code.push_str(&format!(
                        "            Self::{} => {:?},\n",
                        member.ident, member.literal
                    ));
                }
                if let Some(fallback) = fallback {
                    code.push_str(&format!("            Self::{} => {:?},\n", fallback, fallback));
                }
                code.push_str("        })\n");
            }
            code.push_str("    }\n");
            code.push_str("}\n");
        }
        ModelKind::Alias(ty) => {
            code.push_str(&format!("/// `{}`\n", model.schema_name));
            code.push_str(&format!(
                "pub type {} = {};\n",
                model.type_name,
                rust_type(ty, MODEL_SIBLINGS)
            ));
        }
        ModelKind::Newtype(ty) => {
            code.push_str("use serde::{Deserialize, Serialize};\n\n");
            code.push_str(&format!("/// `{}`\n", model.schema_name));
            code.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
            code.push_str("#[serde(transparent)]\n");
            code.push_str(&format!(
                "pub struct {}(pub {});\n",
                model.type_name,
                rust_type(ty, MODEL_SIBLINGS)
            ));
        }
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::{CodecSettings, GenerationSettings};
    use crate::generator::declarations::{EnumMemberDecl, SecurityDecl};
    use crate::model::HttpMethod;
    use pretty_assertions::assert_eq;

    fn config_bundle() -> ConfigBundleDecl {
        ConfigBundleDecl {
            base_url: "http://localhost:8080/".into(),
            security: vec![SecurityDecl {
                ident: "api_key".into(),
                scheme_name: "api_key".into(),
                location: SecurityLocation::Header,
                key_name: "X-API-Key".into(),
            }],
            codec: CodecSettings::default(),
            error_log_expression: None,
        }
    }

    fn family(variants: Vec<VariantDecl>) -> ResultFamilyDecl {
        ResultFamilyDecl {
            type_name: "GetPetResponse".into(),
            variants,
            unknown_failure: "UnknownFailure".into(),
        }
    }

    fn variant(name: &str, status: StatusCode, body: Option<TypeRef>) -> VariantDecl {
        VariantDecl {
            name: name.into(),
            status,
            body,
            description: None,
        }
    }

    #[test]
    fn test_rust_type_rendering() {
        let ty = TypeRef::Optional(Box::new(TypeRef::List(Box::new(TypeRef::Named(
            "Pet".into(),
        )))));
        assert_eq!(rust_type(&ty, "models::"), "Option<Vec<models::Pet>>");
        assert_eq!(
            boxed_type(
                &TypeRef::Optional(Box::new(TypeRef::Named("Node".into()))),
                "super::"
            ),
            "Option<Box<super::Node>>"
        );
        assert_eq!(rust_type(&TypeRef::Unknown, ""), "serde_json::Value");
    }

    #[test]
    fn test_url_expression() {
        let method = MethodDecl {
            name: "get_pet".into(),
            http_method: HttpMethod::Get,
            path: "/pets/{petId}/toys".into(),
            summary: None,
            description: None,
            deprecated: false,
            params: vec![ParamDecl {
                ident: "pet_id".into(),
                wire_name: "petId".into(),
                location: ParamLocation::Path,
                ty: TypeRef::Scalar(ScalarKind::Long),
                description: None,
            }],
            body: None,
            result: family(vec![]),
        };
        assert_eq!(
            url_expression(&method),
            r#"self.config.url(&format!("/pets/{}/toys", pet_id))"#
        );

        let plain = MethodDecl {
            path: "/pets".into(),
            params: vec![],
            ..method
        };
        assert_eq!(url_expression(&plain), r#"self.config.url("/pets")"#);
    }

    #[test]
    fn test_dispatch_arms() {
        let result = family(vec![
            variant(
                "Success",
                StatusCode::Exact(200),
                Some(TypeRef::Named("Pet".into())),
            ),
            variant("Failure404", StatusCode::Exact(404), None),
            variant(
                "Failure",
                StatusCode::Default,
                Some(TypeRef::Named("Error".into())),
            ),
            variant("Failure5xx", StatusCode::Range(5), None),
        ]);
        let expected = "        match response.status().as_u16() {
            200 => Ok(GetPetResponse::Success(response.json().await?)),
            404 => Ok(GetPetResponse::Failure404),
            500..=599 => Ok(GetPetResponse::Failure5xx),
            status_code @ 400..=499 => Ok(GetPetResponse::Failure { status_code, body: response.json().await? }),
            status_code => Ok(GetPetResponse::UnknownFailure { status_code }),
        }
";
        assert_eq!(render_dispatch(&result), expected);
    }

    #[test]
    fn test_enum_with_fallback() {
        let model = ModelDecl {
            schema_name: "Status".into(),
            type_name: "Status".into(),
            file_stem: "status".into(),
            kind: ModelKind::Enum {
                members: vec![EnumMemberDecl {
                    ident: "Available".into(),
                    literal: "available".into(),
                }],
                fallback: Some("Unknown".into()),
            },
        };
        let code = render_model(&model, &config_bundle());
        assert!(code.contains("Default, Serialize, Deserialize"));
        assert!(code.contains("    #[serde(rename = \"available\")]\n    Available,\n"));
        assert!(code.contains("    #[default]\n    #[serde(other)]\n    Unknown,\n"));
        assert!(code.contains("Self::Available => \"available\","));
    }

    #[test]
    fn test_self_containing_array_renders_tuple_struct() {
        let model = ModelDecl {
            schema_name: "Forest".into(),
            type_name: "Forest".into(),
            file_stem: "forest".into(),
            kind: ModelKind::Newtype(TypeRef::List(Box::new(TypeRef::Named("Forest".into())))),
        };
        let code = render_model(&model, &config_bundle());
        assert!(code.contains(
            "#[serde(transparent)]\npub struct Forest(pub Vec<super::Forest>);\n"
        ));
        assert!(!code.contains("pub type Forest"));
    }

    #[test]
    fn test_struct_codec_flags() {
        let model = ModelDecl {
            schema_name: "Pet".into(),
            type_name: "Pet".into(),
            file_stem: "pet".into(),
            kind: ModelKind::Struct(vec![FieldDecl {
                ident: "type_".into(),
                wire_name: "type".into(),
                ty: TypeRef::Optional(Box::new(TypeRef::Scalar(ScalarKind::String))),
                boxed: false,
                description: Some("Kind of pet".into()),
            }]),
        };
        let lenient = render_model(&model, &config_bundle());
        assert!(lenient.contains(
            "    /// Kind of pet\n    #[serde(rename = \"type\", default, skip_serializing_if = \"Option::is_none\")]\n    pub type_: Option<String>,\n"
        ));
        assert!(!lenient.contains("deny_unknown_fields"));

        let mut strict = config_bundle();
        strict.codec = CodecSettings {
            deny_unknown_fields: true,
            explicit_nulls: true,
        };
        let code = render_model(&model, &strict);
        assert!(code.contains("#[serde(deny_unknown_fields)]\n"));
        assert!(code.contains("#[serde(rename = \"type\", default)]\n"));
    }

    #[test]
    fn test_config_security_injection() {
        let code = render_config(&config_bundle());
        assert!(code.contains("pub const DEFAULT_BASE_URL: &str = \"http://localhost:8080/\";"));
        assert!(code.contains("    pub api_key: Option<String>,\n"));
        assert!(code.contains("request = request.header(\"X-API-Key\", value);"));
        assert!(code.contains("        let _ = error;\n"));
    }

    #[test]
    fn test_nested_package_layout() {
        let set = ArtifactSet {
            package: vec!["com".into(), "acme".into()],
            config: config_bundle(),
            clients: vec![],
            models: vec![],
            settings: GenerationSettings::default(),
        };
        let paths: Vec<String> = render_artifacts(&set)
            .iter()
            .map(|f| f.path.to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            paths,
            vec![
                "com/mod.rs",
                "com/acme/mod.rs",
                "com/acme/config.rs",
                "com/acme/clients/mod.rs",
                "com/acme/models/mod.rs",
            ]
        );
    }
}
