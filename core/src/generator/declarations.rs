#![deny(missing_docs)]

//! # Declarations
//!
//! The structured artifacts a generation run produces. Every identifier in
//! these types is final: unique within its scope and valid Rust.

use crate::extensions::{CodecSettings, GenerationSettings};
use crate::model::{HttpMethod, ParamLocation, SecurityLocation, StatusCode};
use crate::type_mapping::TypeRef;

/// A field of a generated struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Rust identifier.
    pub ident: String,
    /// JSON property name.
    pub wire_name: String,
    /// Field type with model names already resolved to type identifiers.
    pub ty: TypeRef,
    /// Store the named model behind a `Box` (recursive shapes).
    pub boxed: bool,
    /// Description.
    pub description: Option<String>,
}

/// A member of a generated enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMemberDecl {
    /// Rust identifier.
    pub ident: String,
    /// Literal value on the wire.
    pub literal: String,
}

/// Shape of a generated model type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelKind {
    /// A struct with named fields.
    Struct(Vec<FieldDecl>),
    /// A string enumeration.
    Enum {
        /// Members in literal order.
        members: Vec<EnumMemberDecl>,
        /// Identifier of the catch-all member, when configured.
        fallback: Option<String>,
    },
    /// A type alias for non-object named schemas.
    Alias(TypeRef),
    /// A transparent tuple struct for an array or map that contains itself.
    Newtype(TypeRef),
}

/// One model type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDecl {
    /// Name of the schema in the API model.
    pub schema_name: String,
    /// Rust type identifier.
    pub type_name: String,
    /// File stem under `models/`.
    pub file_stem: String,
    /// Declaration body.
    pub kind: ModelKind,
}

impl ModelDecl {
    /// Member identifiers, including the fallback, for enumerations.
    pub fn enum_members(&self) -> Vec<&str> {
        match &self.kind {
            ModelKind::Enum { members, fallback } => members
                .iter()
                .map(|m| m.ident.as_str())
                .chain(fallback.as_deref())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The declared default member of an enumeration.
    pub fn enum_default(&self) -> Option<&str> {
        match &self.kind {
            ModelKind::Enum { fallback, .. } => fallback.as_deref(),
            _ => None,
        }
    }
}

/// A parameter of a client method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    /// Rust identifier.
    pub ident: String,
    /// Name on the wire.
    pub wire_name: String,
    /// Location.
    pub location: ParamLocation,
    /// Argument type; optional parameters are wrapped in `Optional`.
    pub ty: TypeRef,
    /// Description.
    pub description: Option<String>,
}

/// The request body argument of a client method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyDecl {
    /// Rust identifier.
    pub ident: String,
    /// Argument type; optional bodies are wrapped in `Optional`.
    pub ty: TypeRef,
    /// Media type sent.
    pub content_type: String,
}

/// One documented outcome of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDecl {
    /// Variant identifier.
    pub name: String,
    /// Status key this variant matches.
    pub status: StatusCode,
    /// Payload type, `None` for bodiless outcomes.
    pub body: Option<TypeRef>,
    /// Description.
    pub description: Option<String>,
}

/// The result-variant family of one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFamilyDecl {
    /// Enum identifier.
    pub type_name: String,
    /// Documented variants in document order.
    pub variants: Vec<VariantDecl>,
    /// Identifier of the catch-all variant.
    pub unknown_failure: String,
}

impl ResultFamilyDecl {
    /// All variant names, the catch-all last.
    pub fn variant_names(&self) -> Vec<&str> {
        self.variants
            .iter()
            .map(|v| v.name.as_str())
            .chain(std::iter::once(self.unknown_failure.as_str()))
            .collect()
    }
}

/// One callable operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Rust identifier.
    pub name: String,
    /// HTTP method.
    pub http_method: HttpMethod,
    /// Path template.
    pub path: String,
    /// Summary.
    pub summary: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Deprecation flag.
    pub deprecated: bool,
    /// Parameters in declaration order.
    pub params: Vec<ParamDecl>,
    /// Request body.
    pub body: Option<BodyDecl>,
    /// Outcome type.
    pub result: ResultFamilyDecl,
}

/// One client module, emitted per tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientModuleDecl {
    /// Source tag (`""` for untagged operations).
    pub tag: String,
    /// Module identifier.
    pub module_name: String,
    /// Client struct identifier.
    pub type_name: String,
    /// Methods in document order.
    pub methods: Vec<MethodDecl>,
}

/// An API key the configuration bundle can inject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityDecl {
    /// Field identifier on the key set.
    pub ident: String,
    /// Scheme name in the document.
    pub scheme_name: String,
    /// Injection location.
    pub location: SecurityLocation,
    /// Header or query parameter name.
    pub key_name: String,
}

/// The client configuration bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBundleDecl {
    /// Default base URL.
    pub base_url: String,
    /// Injectable API keys.
    pub security: Vec<SecurityDecl>,
    /// Codec flags the models were generated with.
    pub codec: CodecSettings,
    /// Statement run on request failure.
    pub error_log_expression: Option<String>,
}

/// Everything one run emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    /// Module path of the generated root.
    pub package: Vec<String>,
    /// Configuration bundle.
    pub config: ConfigBundleDecl,
    /// Client modules in tag order.
    pub clients: Vec<ClientModuleDecl>,
    /// Model types in discovery order.
    pub models: Vec<ModelDecl>,
    /// Settings after module application.
    pub settings: GenerationSettings,
}

impl ArtifactSet {
    /// Looks up a model by its generated type name.
    pub fn model(&self, type_name: &str) -> Option<&ModelDecl> {
        self.models.iter().find(|m| m.type_name == type_name)
    }

    /// Looks up a client module by its source tag.
    pub fn client(&self, tag: &str) -> Option<&ClientModuleDecl> {
        self.clients.iter().find(|c| c.tag == tag)
    }
}
