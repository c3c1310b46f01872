#![deny(missing_docs)]

//! # Type Mapping
//!
//! Converts resolved schemas into semantic type references.
//! Handles scalars by `format`, collections, named models and optionality.
//!
//! The mapping is total: every [`Schema`] shape has a target, with
//! [`TypeRef::Unknown`] as the fallback.

use crate::model::{PrimitiveType, Property, Schema};

/// The scalar kinds a generated client can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// 32-bit integer (`integer`, `int32` or no format).
    Int,
    /// 64-bit integer (`integer`, `int64`).
    Long,
    /// 32-bit float (`number`, `float`).
    Float,
    /// 64-bit float (`number`, `double` or no format).
    Double,
    /// Boolean.
    Boolean,
    /// UTF-8 string, any format.
    String,
}

/// A semantic type reference, independent of identifier naming.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A scalar.
    Scalar(ScalarKind),
    /// A sequence of elements.
    List(Box<TypeRef>),
    /// A string-keyed map.
    Map(Box<TypeRef>),
    /// A named model (schema name as it appears in the schema set).
    Named(String),
    /// A value that may be absent or null.
    Optional(Box<TypeRef>),
    /// Any shape without a defined mapping.
    Unknown,
}

impl TypeRef {
    /// Wraps in [`TypeRef::Optional`] unless already optional.
    pub fn optional(self) -> Self {
        match self {
            TypeRef::Optional(_) => self,
            other => TypeRef::Optional(Box::new(other)),
        }
    }

    /// Whether this type is optional at the outermost level.
    pub fn is_optional(&self) -> bool {
        matches!(self, TypeRef::Optional(_))
    }
}

/// Trait for converting resolved schemas to type references.
pub trait TypeMapper {
    /// Maps a schema discovered under `context` (its schema or usage-site name).
    fn map_type(&self, schema: &Schema, context: &str) -> TypeRef;

    /// Maps an object property, applying `required`/`nullable` optionality.
    fn map_property(&self, property: &Property, context: &str) -> TypeRef {
        let ty = self.map_type(&property.schema, context);
        if !property.required || property.nullable {
            ty.optional()
        } else {
            ty
        }
    }
}

/// A standard implementation of `TypeMapper`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaTypeMapper;

impl TypeMapper for SchemaTypeMapper {
    fn map_type(&self, schema: &Schema, context: &str) -> TypeRef {
        match schema {
            Schema::Primitive { kind, format } => {
                TypeRef::Scalar(map_primitive(*kind, format.as_deref()))
            }
            Schema::Array(items) => TypeRef::List(Box::new(self.map_type(items, context))),
            Schema::Map(values) => TypeRef::Map(Box::new(self.map_type(values, context))),
            // Enums and objects only appear at the top of a named entry;
            // nested occurrences were hoisted and arrive as references.
            Schema::Enum(_) | Schema::Object(_) => TypeRef::Named(context.to_string()),
            Schema::Reference(name) => TypeRef::Named(name.clone()),
            Schema::Unknown => TypeRef::Unknown,
        }
    }
}

fn map_primitive(kind: PrimitiveType, format: Option<&str>) -> ScalarKind {
    match (kind, format) {
        (PrimitiveType::Integer, Some("int64")) => ScalarKind::Long,
        (PrimitiveType::Integer, _) => ScalarKind::Int,
        (PrimitiveType::Number, Some("float")) => ScalarKind::Float,
        (PrimitiveType::Number, _) => ScalarKind::Double,
        (PrimitiveType::Boolean, _) => ScalarKind::Boolean,
        (PrimitiveType::String, _) => ScalarKind::String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prim(kind: PrimitiveType, format: Option<&str>) -> Schema {
        Schema::Primitive {
            kind,
            format: format.map(str::to_string),
        }
    }

    fn prop(schema: Schema, required: bool) -> Property {
        Property {
            schema,
            required,
            nullable: false,
            description: None,
        }
    }

    #[test]
    fn test_numeric_formats() {
        let m = SchemaTypeMapper;
        let cases = [
            (prim(PrimitiveType::Integer, Some("int64")), ScalarKind::Long),
            (prim(PrimitiveType::Integer, Some("int32")), ScalarKind::Int),
            (prim(PrimitiveType::Integer, None), ScalarKind::Int),
            (prim(PrimitiveType::Number, Some("float")), ScalarKind::Float),
            (prim(PrimitiveType::Number, None), ScalarKind::Double),
            (prim(PrimitiveType::String, Some("date-time")), ScalarKind::String),
        ];
        for (schema, expected) in cases {
            assert_eq!(m.map_type(&schema, "x"), TypeRef::Scalar(expected));
        }
    }

    #[test]
    fn test_references_and_containers() {
        let m = SchemaTypeMapper;
        let tags = Schema::Array(Box::new(Schema::Reference("Tag".into())));
        assert_eq!(
            m.map_type(&tags, "tags"),
            TypeRef::List(Box::new(TypeRef::Named("Tag".into())))
        );
        let labels = Schema::Map(Box::new(prim(PrimitiveType::String, None)));
        assert_eq!(
            m.map_type(&labels, "labels"),
            TypeRef::Map(Box::new(TypeRef::Scalar(ScalarKind::String)))
        );
        assert_eq!(m.map_type(&Schema::Unknown, "x"), TypeRef::Unknown);
    }

    #[test]
    fn test_top_level_entries_named_from_context() {
        let m = SchemaTypeMapper;
        let status = Schema::Enum(["a".to_string()].into_iter().collect());
        assert_eq!(m.map_type(&status, "Status"), TypeRef::Named("Status".into()));
    }

    #[test]
    fn test_property_optionality() {
        let m = SchemaTypeMapper;
        let id = prop(prim(PrimitiveType::Integer, Some("int64")), true);
        assert_eq!(m.map_property(&id, "id"), TypeRef::Scalar(ScalarKind::Long));

        let name = prop(prim(PrimitiveType::String, None), false);
        let ty = m.map_property(&name, "name");
        assert!(ty.is_optional());
        assert_eq!(ty.clone().optional(), ty);

        let mut nullable = prop(Schema::Reference("Owner".into()), true);
        nullable.nullable = true;
        assert_eq!(
            m.map_property(&nullable, "owner"),
            TypeRef::Optional(Box::new(TypeRef::Named("Owner".into())))
        );
    }
}
