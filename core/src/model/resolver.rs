#![deny(missing_docs)]

//! # Schema Resolver
//!
//! Flattens the document's schema graph into an insertion-ordered
//! `name -> Schema` mapping.
//!
//! Rules:
//! - Component schemas are keyed by name. A component resolves once and every
//!   later `$ref` to it yields the same entry.
//! - Inline objects and string enums are hoisted under a name derived from
//!   their usage site. A structurally equal schema reuses the entry; a different
//!   one under a taken name is qualified with its owner (`PetStatus`), then
//!   numbered.
//! - An entry is reserved when first discovered, so insertion order is
//!   discovery order and re-entering a name that is still being resolved
//!   yields a forward `Reference` instead of recursing.
//! - A `$ref` without a matching component is a resolution failure.
//! - Unsupported shapes (`oneOf`, `anyOf`, multi-member `allOf`) degrade to
//!   `Schema::Unknown`.

use crate::error::{AppError, AppResult};
use crate::model::schema::{PrimitiveType, Property, Schema};
use crate::naming::capitalize;
use crate::oas::refs::component_name;
use crate::oas::shims::{ShimAdditionalProperties, ShimComponents, ShimSchema};
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use std::collections::HashMap;
use utoipa::openapi::RefOr;

/// Stateful resolver for one document.
pub struct SchemaResolver<'a> {
    components: Option<&'a ShimComponents>,
    schemas: IndexMap<String, Schema>,
    inline_origins: HashMap<String, Value>,
    owners: Vec<String>,
}

/// Occupancy of a candidate name for an inline schema.
enum Slot {
    Free,
    Same,
    SameComponent,
    Taken,
}

impl<'a> SchemaResolver<'a> {
    /// Creates a resolver over the document's components (if any).
    pub fn new(components: Option<&'a ShimComponents>) -> Self {
        Self {
            components,
            schemas: IndexMap::new(),
            inline_origins: HashMap::new(),
            owners: Vec::new(),
        }
    }

    /// Resolves a schema found at a usage site.
    ///
    /// `context` names the usage site (property, parameter, body) and becomes
    /// the schema name if the node has to be hoisted. Inside a named entry the
    /// entry's name is the fallback qualifier.
    pub fn resolve(&mut self, schema: &RefOr<ShimSchema>, context: &str) -> AppResult<Schema> {
        let context = capitalize(context);
        let mut candidates = vec![context.clone()];
        if let Some(owner) = self.owners.last() {
            candidates.push(format!("{}{}", owner, context));
        }
        self.resolve_candidates(schema, &candidates)
    }

    /// Resolves a schema whose hoisted name is `{owner}{Context}`, trying each
    /// owner in order. An empty owner leaves the context unqualified.
    pub fn resolve_owned(
        &mut self,
        schema: &RefOr<ShimSchema>,
        context: &str,
        owners: &[&str],
    ) -> AppResult<Schema> {
        let context = capitalize(context);
        let mut candidates: Vec<String> = Vec::new();
        for owner in owners {
            let name = format!("{}{}", owner, context);
            if !candidates.contains(&name) {
                candidates.push(name);
            }
        }
        if candidates.is_empty() {
            candidates.push(context);
        }
        self.resolve_candidates(schema, &candidates)
    }

    /// Resolves a `#/components/schemas/{name}` reference.
    pub fn resolve_ref(&mut self, ref_location: &str) -> AppResult<Schema> {
        let name = component_name(ref_location, "schemas").ok_or_else(|| {
            AppError::SchemaResolution(format!(
                "Unsupported or external schema reference '{}'",
                ref_location
            ))
        })?;
        self.resolve_named(&name)
    }

    /// Consumes the resolver, returning the named schema set in discovery order.
    pub fn into_schemas(self) -> IndexMap<String, Schema> {
        self.schemas
    }

    fn resolve_candidates(
        &mut self,
        schema: &RefOr<ShimSchema>,
        candidates: &[String],
    ) -> AppResult<Schema> {
        match schema {
            RefOr::Ref(r) => self.resolve_ref(&r.ref_location),
            RefOr::T(s) if is_hoisted(s) => self.register_inline(candidates, s),
            RefOr::T(s) => self.resolve_inline(s, candidates),
        }
    }

    fn resolve_named(&mut self, name: &str) -> AppResult<Schema> {
        if self.schemas.contains_key(name) {
            return Ok(Schema::Reference(name.to_string()));
        }

        let components = self.components;
        let target = components
            .and_then(|c| c.schemas.get(name))
            .ok_or_else(|| {
                AppError::SchemaResolution(format!(
                    "Reference to undefined schema '{}'",
                    name
                ))
            })?;

        self.schemas.insert(name.to_string(), Schema::Unknown);
        let resolved = match target {
            RefOr::Ref(alias) => self.resolve_ref(&alias.ref_location)?,
            RefOr::T(s) => self.resolve_owned_entry(name, s)?,
        };
        self.schemas.insert(name.to_string(), resolved);

        Ok(Schema::Reference(name.to_string()))
    }

    fn register_inline(&mut self, candidates: &[String], schema: &ShimSchema) -> AppResult<Schema> {
        let origin = serde_json::to_value(schema)
            .map_err(|e| AppError::SchemaResolution(format!("Unreadable inline schema: {}", e)))?;

        let Some(last) = candidates.last() else {
            return Err(AppError::SchemaResolution(
                "Inline schema without a name".to_string(),
            ));
        };
        let numbered = (2..).map(|n| format!("{}{}", last, n));
        let mut name = String::new();
        for candidate in candidates.iter().cloned().chain(numbered) {
            match self.slot(&candidate, &origin) {
                Slot::Free => {
                    name = candidate;
                    break;
                }
                Slot::Same => return Ok(Schema::Reference(candidate)),
                Slot::SameComponent => return self.resolve_named(&candidate),
                Slot::Taken => {}
            }
        }

        if candidates.first() != Some(&name) {
            tracing::debug!(
                schema = %name,
                wanted = ?candidates.first(),
                "inline schema name taken by a different schema; qualified"
            );
        }

        self.inline_origins.insert(name.clone(), origin);
        self.schemas.insert(name.clone(), Schema::Unknown);
        let resolved = self.resolve_owned_entry(&name, schema)?;
        self.schemas.insert(name.clone(), resolved);

        Ok(Schema::Reference(name))
    }

    fn slot(&self, name: &str, origin: &Value) -> Slot {
        if let Some(existing) = self.inline_origins.get(name) {
            return if existing == origin {
                Slot::Same
            } else {
                Slot::Taken
            };
        }
        match self.components.and_then(|c| c.schemas.get(name)) {
            Some(RefOr::T(component)) => match serde_json::to_value(component) {
                Ok(value) if &value == origin => Slot::SameComponent,
                _ => Slot::Taken,
            },
            Some(RefOr::Ref(_)) => Slot::Taken,
            None if self.schemas.contains_key(name) => Slot::Taken,
            None => Slot::Free,
        }
    }

    /// Resolves the body of entry `name` with `name` as the owner of nested
    /// inline schemas.
    fn resolve_owned_entry(&mut self, name: &str, schema: &ShimSchema) -> AppResult<Schema> {
        self.owners.push(name.to_string());
        let resolved = self.resolve_top(name, schema);
        self.owners.pop();
        resolved
    }

    /// Resolves the body of a named entry. Objects and enums stay in place here.
    fn resolve_top(&mut self, name: &str, schema: &ShimSchema) -> AppResult<Schema> {
        if let Some(values) = string_enum(schema) {
            return Ok(Schema::Enum(values));
        }
        if is_object_with_properties(schema) {
            let mut properties = IndexMap::new();
            for (prop_name, prop_schema) in &schema.properties {
                let (nullable, description) = match prop_schema {
                    RefOr::T(s) => (is_nullable(s), s.description.clone()),
                    RefOr::Ref(_) => (false, None),
                };
                let resolved = self.resolve(prop_schema, prop_name)?;
                properties.insert(
                    prop_name.clone(),
                    Property {
                        schema: resolved,
                        required: schema.required.iter().any(|r| r == prop_name),
                        nullable,
                        description,
                    },
                );
            }
            return Ok(Schema::Object(properties));
        }
        self.resolve_inline(schema, &[name.to_string()])
    }

    /// Resolves shapes that are never hoisted: primitives, arrays, maps.
    ///
    /// Element and value schemas inherit the candidate names suffixed with
    /// `Item` or `Value`.
    fn resolve_inline(&mut self, schema: &ShimSchema, candidates: &[String]) -> AppResult<Schema> {
        let context = candidates.first().map(String::as_str).unwrap_or_default();
        if schema.all_of.len() == 1 && schema.properties.is_empty() {
            return self.resolve_candidates(&schema.all_of[0], candidates);
        }
        if !schema.all_of.is_empty() || !schema.one_of.is_empty() || !schema.any_of.is_empty() {
            tracing::warn!(
                context,
                "schema combinators are not supported; mapping to an unknown type"
            );
            return Ok(Schema::Unknown);
        }

        let keyword = schema.schema_type.as_ref().and_then(|t| t.primary().0);

        match keyword {
            Some("array") => {
                let items = match &schema.items {
                    Some(items) => self.resolve_candidates(items, &suffixed(candidates, "Item"))?,
                    None => Schema::Unknown,
                };
                Ok(Schema::Array(Box::new(items)))
            }
            Some("object") | None => match &schema.additional_properties {
                Some(ShimAdditionalProperties::Schema(value)) => {
                    let value = self.resolve_candidates(value, &suffixed(candidates, "Value"))?;
                    Ok(Schema::Map(Box::new(value)))
                }
                _ => Ok(Schema::Unknown),
            },
            Some(other) => match PrimitiveType::from_keyword(other) {
                Some(kind) => Ok(Schema::Primitive {
                    kind,
                    format: schema.format.clone(),
                }),
                None => {
                    tracing::warn!(context, keyword = other, "unsupported schema type");
                    Ok(Schema::Unknown)
                }
            },
        }
    }
}

fn suffixed(candidates: &[String], suffix: &str) -> Vec<String> {
    candidates.iter().map(|c| format!("{}{}", c, suffix)).collect()
}

/// Whether a schema must become a named entry when found inline.
fn is_hoisted(schema: &ShimSchema) -> bool {
    string_enum(schema).is_some() || is_object_with_properties(schema)
}

fn is_object_with_properties(schema: &ShimSchema) -> bool {
    let keyword = schema.schema_type.as_ref().and_then(|t| t.primary().0);
    matches!(keyword, Some("object") | None) && !schema.properties.is_empty()
}

fn is_nullable(schema: &ShimSchema) -> bool {
    schema.nullable || schema.schema_type.as_ref().is_some_and(|t| t.primary().1)
}

/// Returns the literal set of a string enumeration.
///
/// Enumerations over other types stay plain scalars.
fn string_enum(schema: &ShimSchema) -> Option<IndexSet<String>> {
    let values = schema.enum_values.as_ref()?;
    let keyword = schema.schema_type.as_ref().and_then(|t| t.primary().0);
    if !matches!(keyword, Some("string") | None) {
        return None;
    }
    let literals: Option<IndexSet<String>> = values
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| v.as_str().map(str::to_string))
        .collect();
    literals.filter(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(yaml: &str) -> ShimComponents {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn schema(yaml: &str) -> RefOr<ShimSchema> {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_reference_resolved_once() {
        let comps = components(
            r#"
schemas:
  Pet:
    type: object
    properties:
      id: { type: integer, format: int64 }
"#,
        );
        let mut resolver = SchemaResolver::new(Some(&comps));
        let pet_ref = schema("$ref: '#/components/schemas/Pet'");
        let a = resolver.resolve(&pet_ref, "body").unwrap();
        let b = resolver.resolve(&pet_ref, "other").unwrap();
        assert_eq!(a, Schema::Reference("Pet".into()));
        assert_eq!(a, b);
        assert_eq!(resolver.into_schemas().len(), 1);
    }

    #[test]
    fn test_cyclic_reference_terminates() {
        let comps = components(
            r#"
schemas:
  Node:
    type: object
    properties:
      next: { $ref: '#/components/schemas/Node' }
      children:
        type: array
        items: { $ref: '#/components/schemas/Node' }
"#,
        );
        let mut resolver = SchemaResolver::new(Some(&comps));
        resolver.resolve_ref("#/components/schemas/Node").unwrap();
        let schemas = resolver.into_schemas();
        let Schema::Object(props) = &schemas["Node"] else {
            panic!("expected object")
        };
        assert_eq!(props["next"].schema, Schema::Reference("Node".into()));
        assert_eq!(
            props["children"].schema,
            Schema::Array(Box::new(Schema::Reference("Node".into())))
        );
    }

    #[test]
    fn test_dangling_reference_fails() {
        let comps = components("schemas: {}");
        let mut resolver = SchemaResolver::new(Some(&comps));
        let err = resolver
            .resolve(&schema("$ref: '#/components/schemas/Ghost'"), "x")
            .unwrap_err();
        assert!(matches!(err, AppError::SchemaResolution(_)));
        assert!(err.to_string().contains("Ghost"));
    }

    #[test]
    fn test_discovery_order_parent_first() {
        let comps = components(
            r#"
schemas:
  Order:
    type: object
    properties:
      item: { $ref: '#/components/schemas/Item' }
  Item:
    type: object
    properties:
      sku: { type: string }
"#,
        );
        let mut resolver = SchemaResolver::new(Some(&comps));
        resolver.resolve_ref("#/components/schemas/Order").unwrap();
        let names: Vec<String> = resolver.into_schemas().keys().cloned().collect();
        assert_eq!(names, vec!["Order", "Item"]);
    }

    #[test]
    fn test_inline_enum_and_object_are_hoisted() {
        let mut resolver = SchemaResolver::new(None);
        let body = schema(
            r#"
type: object
properties:
  status:
    type: string
    enum: [available, pending, sold]
  address:
    type: object
    required: [city]
    properties:
      city: { type: string }
"#,
        );
        let resolved = resolver.resolve(&body, "createPetRequestBody").unwrap();
        assert_eq!(resolved, Schema::Reference("CreatePetRequestBody".into()));

        let schemas = resolver.into_schemas();
        let names: Vec<&String> = schemas.keys().collect();
        assert_eq!(names, vec!["CreatePetRequestBody", "Status", "Address"]);

        let Schema::Enum(literals) = &schemas["Status"] else {
            panic!("expected enum")
        };
        let literals: Vec<&String> = literals.iter().collect();
        assert_eq!(literals, vec!["available", "pending", "sold"]);

        let Schema::Object(address) = &schemas["Address"] else {
            panic!("expected object")
        };
        assert!(address["city"].required);
    }

    #[test]
    fn test_equal_inline_definitions_share_an_entry() {
        let mut resolver = SchemaResolver::new(None);
        let kind = schema("type: string\nenum: [a, b]");
        let a = resolver.resolve(&kind, "kind").unwrap();
        let b = resolver.resolve(&kind, "kind").unwrap();
        assert_eq!(a, b);
        assert_eq!(resolver.into_schemas().len(), 1);
    }

    #[test]
    fn test_conflicting_inline_definitions_are_numbered() {
        let mut resolver = SchemaResolver::new(None);
        let first = schema("type: string\nenum: [a, b]");
        let second = schema("type: string\nenum: [x, y, z]");
        assert_eq!(
            resolver.resolve(&first, "kind").unwrap(),
            Schema::Reference("Kind".into())
        );
        assert_eq!(
            resolver.resolve(&second, "kind").unwrap(),
            Schema::Reference("Kind2".into())
        );
        let schemas = resolver.into_schemas();
        let Schema::Enum(literals) = &schemas["Kind2"] else {
            panic!("expected enum")
        };
        assert_eq!(literals.len(), 3);
    }

    #[test]
    fn test_conflicting_property_enums_are_qualified_by_owner() {
        let comps = components(
            r#"
schemas:
  Order:
    type: object
    properties:
      status: { type: string, enum: [placed, approved, delivered] }
  Pet:
    type: object
    properties:
      status: { type: string, enum: [available, pending, sold] }
"#,
        );
        let mut resolver = SchemaResolver::new(Some(&comps));
        resolver.resolve_ref("#/components/schemas/Order").unwrap();
        resolver.resolve_ref("#/components/schemas/Pet").unwrap();
        let schemas = resolver.into_schemas();

        let Schema::Object(pet) = &schemas["Pet"] else {
            panic!("expected object")
        };
        assert_eq!(pet["status"].schema, Schema::Reference("PetStatus".into()));

        let Schema::Enum(order_status) = &schemas["Status"] else {
            panic!("expected enum")
        };
        assert!(order_status.contains("placed"));
        let Schema::Enum(pet_status) = &schemas["PetStatus"] else {
            panic!("expected enum")
        };
        let literals: Vec<&String> = pet_status.iter().collect();
        assert_eq!(literals, vec!["available", "pending", "sold"]);
    }

    #[test]
    fn test_inline_schema_never_takes_a_component_name() {
        let comps = components(
            r#"
schemas:
  Category:
    type: object
    properties:
      id: { type: integer }
"#,
        );
        let mut resolver = SchemaResolver::new(Some(&comps));
        let inline = schema("type: object\nproperties:\n  label: { type: string }");
        let resolved = resolver
            .resolve_owned(&inline, "category", &["", "Pet"])
            .unwrap();
        assert_eq!(resolved, Schema::Reference("PetCategory".into()));

        let named = resolver.resolve_ref("#/components/schemas/Category").unwrap();
        assert_eq!(named, Schema::Reference("Category".into()));
        let Schema::Object(category) = &resolver.into_schemas()["Category"] else {
            panic!("expected object")
        };
        assert!(category.contains_key("id"));
    }

    #[test]
    fn test_combinators_degrade_to_unknown() {
        let mut resolver = SchemaResolver::new(None);
        let one_of = schema(
            r#"
oneOf:
  - { type: string }
  - { type: integer }
"#,
        );
        assert_eq!(resolver.resolve(&one_of, "x").unwrap(), Schema::Unknown);
    }

    #[test]
    fn test_single_all_of_unwraps() {
        let comps = components(
            r#"
schemas:
  Tag:
    type: object
    properties:
      name: { type: string }
"#,
        );
        let mut resolver = SchemaResolver::new(Some(&comps));
        let wrapped = schema("allOf:\n  - $ref: '#/components/schemas/Tag'");
        assert_eq!(
            resolver.resolve(&wrapped, "tag").unwrap(),
            Schema::Reference("Tag".into())
        );
    }

    #[test]
    fn test_arrays_and_maps() {
        let mut resolver = SchemaResolver::new(None);
        let arr = schema("type: array\nitems: { type: integer, format: int32 }");
        assert_eq!(
            resolver.resolve(&arr, "ids").unwrap(),
            Schema::Array(Box::new(Schema::Primitive {
                kind: PrimitiveType::Integer,
                format: Some("int32".into())
            }))
        );

        let map = schema("type: object\nadditionalProperties: { type: string }");
        assert_eq!(
            resolver.resolve(&map, "labels").unwrap(),
            Schema::Map(Box::new(Schema::primitive(PrimitiveType::String)))
        );
    }
}
