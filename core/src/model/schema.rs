#![deny(missing_docs)]

//! # Resolved Schemas
//!
//! The flattened schema representation the resolver produces. Inline objects and
//! string enumerations never appear nested: they are hoisted into the named
//! schema set and referenced by name.

use indexmap::{IndexMap, IndexSet};

/// The JSON type of a primitive schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `type: integer`
    Integer,
    /// `type: number`
    Number,
    /// `type: string`
    String,
    /// `type: boolean`
    Boolean,
}

impl PrimitiveType {
    /// Parses an OpenAPI `type` keyword value.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }
}

/// A resolved schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// A scalar with its optional `format` facet.
    Primitive {
        /// JSON type.
        kind: PrimitiveType,
        /// Declared format (`int64`, `float`, `uuid`, ...).
        format: Option<String>,
    },
    /// A sequence of elements.
    Array(Box<Schema>),
    /// A string-keyed map (`additionalProperties`).
    Map(Box<Schema>),
    /// A string enumeration. Literal order is preserved.
    Enum(IndexSet<String>),
    /// An object with properties in declaration order.
    Object(IndexMap<String, Property>),
    /// A reference to an entry of the named schema set.
    Reference(String),
    /// Any shape without a defined mapping (combinators, free-form objects).
    Unknown,
}

/// An object property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property value schema.
    pub schema: Schema,
    /// Listed in the parent's `required` array.
    pub required: bool,
    /// Declared `nullable` or typed with `null`.
    pub nullable: bool,
    /// Description.
    pub description: Option<String>,
}

impl Schema {
    /// Shorthand for a primitive without format.
    pub fn primitive(kind: PrimitiveType) -> Self {
        Schema::Primitive { kind, format: None }
    }

    /// Names of the schemas this node references directly or through
    /// arrays, maps and properties.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Schema::Reference(name) => out.push(name.as_str()),
            Schema::Array(inner) | Schema::Map(inner) => inner.collect_references(out),
            Schema::Object(props) => {
                for prop in props.values() {
                    prop.schema.collect_references(out);
                }
            }
            Schema::Primitive { .. } | Schema::Enum(_) | Schema::Unknown => {}
        }
    }

    /// Like [`Schema::references`] but skipping edges through arrays and maps,
    /// i.e. the references that store a value inline.
    pub fn direct_references(&self) -> Vec<&str> {
        match self {
            Schema::Reference(name) => vec![name.as_str()],
            Schema::Object(props) => props
                .values()
                .flat_map(|p| p.schema.direct_references())
                .collect(),
            _ => Vec::new(),
        }
    }
}
