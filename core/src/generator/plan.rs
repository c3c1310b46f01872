#![deny(missing_docs)]

//! # Planning
//!
//! Turns a filtered API model into declarations with final identifiers.
//!
//! Planning is pure: identifiers are allocated from scopes seeded in a fixed
//! order, so the same model and settings always yield the same declarations.

use crate::config::GeneratorConfig;
use crate::extensions::GenerationSettings;
use crate::generator::declarations::{
    ArtifactSet, BodyDecl, ClientModuleDecl, ConfigBundleDecl, EnumMemberDecl, FieldDecl,
    MethodDecl, ModelDecl, ModelKind, ParamDecl, ResultFamilyDecl, SecurityDecl, VariantDecl,
};
use crate::model::{ApiModel, Operation, Schema, StatusCode};
use crate::naming::{
    client_type_name, enum_member_ident, method_names, module_ident, result_family_name,
    snake_ident, type_ident, variant_name, Scope, UNKNOWN_FAILURE,
};
use crate::type_mapping::{SchemaTypeMapper, TypeMapper, TypeRef};
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};

/// Names a generated client method may not take.
const RESERVED_METHODS: &[&str] = &["new", "config"];

/// Locals used by generated method bodies.
const RESERVED_LOCALS: &[&str] = &["self", "body", "url", "request", "response"];

/// Operations per tag that pass the filter. Tags left empty are dropped.
pub fn filter_operations<'m>(
    model: &'m ApiModel,
    config: &GeneratorConfig,
) -> IndexMap<&'m str, Vec<&'m Operation>> {
    let mut out = IndexMap::new();
    for (tag, operations) in model.paths_by_tags() {
        let kept: Vec<&Operation> = operations
            .iter()
            .filter(|op| config.operations.allows(&op.path))
            .collect();
        if kept.len() < operations.len() {
            tracing::debug!(
                tag = %tag,
                kept = kept.len(),
                dropped = operations.len() - kept.len(),
                "filtered operations"
            );
        }
        if !kept.is_empty() {
            out.insert(tag.as_str(), kept);
        }
    }
    out
}

/// Schema names transitively used by the given operations.
pub fn reachable_schemas<'m>(
    model: &'m ApiModel,
    operations: impl IntoIterator<Item = &'m Operation>,
) -> HashSet<&'m str> {
    let mut pending: Vec<&str> = Vec::new();
    for op in operations {
        for param in &op.parameters {
            pending.extend(param.schema.references());
        }
        if let Some(body) = &op.request_body {
            pending.extend(body.schema.references());
        }
        for response in op.responses.values() {
            if let Some(schema) = &response.schema {
                pending.extend(schema.references());
            }
        }
    }

    let mut seen = HashSet::new();
    while let Some(name) = pending.pop() {
        let Some((key, schema)) = model.schemas().get_key_value(name) else {
            continue;
        };
        if seen.insert(key.as_str()) {
            pending.extend(schema.references());
        }
    }
    seen
}

/// Builds the artifact set of one run.
pub fn plan(
    model: &ApiModel,
    config: &GeneratorConfig,
    settings: GenerationSettings,
) -> ArtifactSet {
    let groups = filter_operations(model, config);
    let reachable = reachable_schemas(model, groups.values().flatten().copied());

    let surviving: IndexMap<&str, &Schema> = model
        .schemas()
        .iter()
        .filter(|(name, _)| reachable.contains(name.as_str()))
        .map(|(name, schema)| (name.as_str(), schema))
        .collect();
    let pruned = model.schemas().len() - surviving.len();
    if pruned > 0 {
        tracing::debug!(pruned, "pruned unused schemas");
    }

    let mut type_scope = Scope::pascal();
    let type_names: HashMap<&str, String> = surviving
        .keys()
        .map(|name| (*name, type_scope.allocate(&type_ident(name))))
        .collect();
    let names = TypeNames(&type_names);

    let mut file_scope = Scope::snake();
    let models = surviving
        .iter()
        .map(|(name, schema)| {
            let type_name = names.get(name);
            let file_stem = file_scope.allocate(&snake_ident(&type_name));
            ModelDecl {
                schema_name: name.to_string(),
                kind: plan_model(name, schema, &surviving, &names, &settings),
                type_name,
                file_stem,
            }
        })
        .collect();

    let mut module_scope = Scope::snake();
    let mut client_scope = Scope::pascal();
    let clients = groups
        .iter()
        .map(|(tag, operations)| {
            let type_name = client_scope.allocate(&client_type_name(tag));
            ClientModuleDecl {
                tag: tag.to_string(),
                module_name: module_scope.allocate(&module_ident(tag)),
                methods: plan_methods(operations, &type_name, &names),
                type_name,
            }
        })
        .collect();

    let mut key_scope = Scope::snake();
    let config_bundle = ConfigBundleDecl {
        base_url: model.server_url().to_string(),
        security: model
            .security_schemes()
            .iter()
            .map(|s| SecurityDecl {
                ident: key_scope.allocate(&snake_ident(&s.name)),
                scheme_name: s.name.clone(),
                location: s.location,
                key_name: s.key_name.clone(),
            })
            .collect(),
        codec: settings.client.codec.clone(),
        error_log_expression: settings.client.error_log_expression.clone(),
    };

    ArtifactSet {
        package: config.package_segments(),
        config: config_bundle,
        clients,
        models,
        settings,
    }
}

/// Schema name to type identifier lookup.
struct TypeNames<'a>(&'a HashMap<&'a str, String>);

impl TypeNames<'_> {
    fn get(&self, schema_name: &str) -> String {
        self.0
            .get(schema_name)
            .cloned()
            .unwrap_or_else(|| type_ident(schema_name))
    }

    fn rename(&self, ty: TypeRef) -> TypeRef {
        match ty {
            TypeRef::Named(name) => TypeRef::Named(self.get(&name)),
            TypeRef::List(inner) => TypeRef::List(Box::new(self.rename(*inner))),
            TypeRef::Map(inner) => TypeRef::Map(Box::new(self.rename(*inner))),
            TypeRef::Optional(inner) => TypeRef::Optional(Box::new(self.rename(*inner))),
            other => other,
        }
    }
}

/// Whether `from` reaches `target` through inline (non-collection) edges.
fn reaches(from: &str, target: &str, schemas: &IndexMap<&str, &Schema>) -> bool {
    let mut pending = vec![from];
    let mut seen = HashSet::new();
    while let Some(name) = pending.pop() {
        if name == target {
            return true;
        }
        if !seen.insert(name) {
            continue;
        }
        if let Some(schema) = schemas.get(name) {
            pending.extend(schema.direct_references());
        }
    }
    false
}

/// Whether `name` refers back to itself through type aliases alone.
///
/// Objects and enums are nominal and end the walk. Arrays and maps are only
/// followed with `through_collections`.
fn alias_cycle(
    name: &str,
    schemas: &IndexMap<&str, &Schema>,
    through_collections: bool,
) -> bool {
    let Some(start) = schemas.get(name) else {
        return false;
    };
    let mut pending = alias_edges(start, through_collections);
    let mut seen = HashSet::new();
    while let Some(next) = pending.pop() {
        if next == name {
            return true;
        }
        if !seen.insert(next) {
            continue;
        }
        if let Some(schema) = schemas.get(next) {
            pending.extend(alias_edges(schema, through_collections));
        }
    }
    false
}

fn alias_edges(schema: &Schema, through_collections: bool) -> Vec<&str> {
    match schema {
        Schema::Reference(target) => vec![target.as_str()],
        Schema::Array(_) | Schema::Map(_) if through_collections => schema.references(),
        _ => Vec::new(),
    }
}

fn plan_model(
    name: &str,
    schema: &Schema,
    schemas: &IndexMap<&str, &Schema>,
    names: &TypeNames<'_>,
    settings: &GenerationSettings,
) -> ModelKind {
    let mapper = SchemaTypeMapper;
    match schema {
        Schema::Object(properties) => {
            let mut scope = Scope::snake();
            let fields = properties
                .iter()
                .map(|(prop_name, prop)| FieldDecl {
                    ident: scope.allocate(&snake_ident(prop_name)),
                    wire_name: prop_name.clone(),
                    ty: names.rename(mapper.map_property(prop, prop_name)),
                    boxed: prop
                        .schema
                        .direct_references()
                        .iter()
                        .any(|target| reaches(target, name, schemas)),
                    description: prop.description.clone(),
                })
                .collect();
            ModelKind::Struct(fields)
        }
        Schema::Enum(literals) => {
            let mut scope = Scope::pascal();
            let members = literals
                .iter()
                .map(|literal| EnumMemberDecl {
                    ident: scope.allocate(&enum_member_ident(literal)),
                    literal: literal.clone(),
                })
                .collect();
            let fallback = settings
                .models
                .enum_fallback
                .as_deref()
                .map(|member| scope.allocate(&enum_member_ident(member)));
            ModelKind::Enum { members, fallback }
        }
        Schema::Reference(_) if alias_cycle(name, schemas, false) => {
            tracing::warn!(schema = name, "alias cycle mapped to unknown type");
            ModelKind::Alias(TypeRef::Unknown)
        }
        Schema::Array(_) | Schema::Map(_) if alias_cycle(name, schemas, true) => {
            ModelKind::Newtype(names.rename(mapper.map_type(schema, name)))
        }
        other => ModelKind::Alias(names.rename(mapper.map_type(other, name))),
    }
}

fn plan_methods(
    operations: &[&Operation],
    client_type: &str,
    names: &TypeNames<'_>,
) -> Vec<MethodDecl> {
    let mapper = SchemaTypeMapper;
    let method_idents = method_names(operations, RESERVED_METHODS);

    let mut family_scope = Scope::pascal();
    family_scope.reserve(client_type);
    family_scope.reserve("ClientConfig");

    operations
        .iter()
        .zip(method_idents)
        .map(|(op, name)| {
            let mut locals = Scope::snake();
            for local in RESERVED_LOCALS {
                locals.reserve(*local);
            }

            let params = op
                .parameters
                .iter()
                .map(|p| {
                    let ty = names.rename(mapper.map_type(&p.schema, &p.name));
                    ParamDecl {
                        ident: locals.allocate(&snake_ident(&p.name)),
                        wire_name: p.name.clone(),
                        location: p.location,
                        ty: if p.required { ty } else { ty.optional() },
                        description: p.description.clone(),
                    }
                })
                .collect();

            let body = op.request_body.as_ref().map(|b| {
                let ty = names.rename(mapper.map_type(&b.schema, "body"));
                BodyDecl {
                    ident: "body".to_string(),
                    ty: if b.required { ty } else { ty.optional() },
                    content_type: b.content_type.clone(),
                }
            });

            let result = plan_family(op, &name, &mut family_scope, names);

            MethodDecl {
                name,
                http_method: op.method,
                path: op.path.clone(),
                summary: op.summary.clone(),
                description: op.description.clone(),
                deprecated: op.deprecated,
                params,
                body,
                result,
            }
        })
        .collect()
}

fn plan_family(
    op: &Operation,
    method_name: &str,
    scope: &mut Scope,
    names: &TypeNames<'_>,
) -> ResultFamilyDecl {
    let mapper = SchemaTypeMapper;
    let success_codes = op
        .responses
        .keys()
        .filter(|s| matches!(s, StatusCode::Exact(c) if (200..300).contains(c)))
        .count();

    let mut seen: IndexSet<String> = IndexSet::new();
    let variants = op
        .responses
        .iter()
        .filter_map(|(status, response)| {
            let name = variant_name(status, success_codes);
            if !seen.insert(name.clone()) {
                return None;
            }
            Some(VariantDecl {
                name,
                status: *status,
                body: response
                    .schema
                    .as_ref()
                    .map(|s| names.rename(mapper.map_type(s, method_name))),
                description: response.description.clone(),
            })
        })
        .collect();

    ResultFamilyDecl {
        type_name: scope.allocate(&result_family_name(method_name)),
        variants,
        unknown_failure: UNKNOWN_FAILURE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OperationFilter;
    use crate::extensions::{apply_modules, ExtensionModule, UnknownEnumFallback};
    use crate::oas::parse_document;
    use crate::type_mapping::ScalarKind;

    const DOC: &str = r#"
openapi: 3.0.3
info: { title: Pets, version: 1.0.0 }
paths:
  /pet/findByStatus:
    get:
      tags: [pet]
      summary: Finds Pets by status
      operationId: findByStatus
      parameters:
        - name: status
          in: query
          schema: { type: string, enum: [available, pending, sold] }
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema: { type: array, items: { $ref: '#/components/schemas/Pet' } }
        '400': { description: invalid }
  /pet/v2/findByStatus:
    get:
      tags: [pet]
      summary: Finds Pets by status
      operationId: findByStatus
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema: { $ref: '#/components/schemas/Pet' }
        default:
          description: error
          content:
            application/json:
              schema: { $ref: '#/components/schemas/Error' }
  /store/order:
    post:
      tags: [store]
      operationId: placeOrder
      requestBody:
        content:
          application/json:
            schema: { $ref: '#/components/schemas/Order' }
      responses:
        '200': { description: ok }
components:
  schemas:
    Pet:
      type: object
      required: [id]
      properties:
        id: { type: integer, format: int64 }
        type: { type: string }
        parent: { $ref: '#/components/schemas/Pet' }
        children: { type: array, items: { $ref: '#/components/schemas/Pet' } }
    Error:
      type: object
      properties:
        message: { type: string }
    Order:
      type: object
      properties:
        id: { type: integer }
"#;

    fn artifacts(config: &GeneratorConfig, settings: GenerationSettings) -> ArtifactSet {
        let model = ApiModel::from_document(&parse_document(DOC).unwrap()).unwrap();
        plan(&model, config, settings)
    }

    #[test]
    fn test_colliding_operations_get_distinct_identifiers() {
        let set = artifacts(&GeneratorConfig::default(), GenerationSettings::default());
        let pet = set.client("pet").unwrap();
        let methods: Vec<&str> = pet.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(methods, vec!["find_by_status", "find_by_status_v2"]);
        let families: Vec<&str> = pet
            .methods
            .iter()
            .map(|m| m.result.type_name.as_str())
            .collect();
        assert_eq!(families, vec!["FindByStatusResponse", "FindByStatusV2Response"]);
    }

    #[test]
    fn test_result_variants() {
        let set = artifacts(&GeneratorConfig::default(), GenerationSettings::default());
        let pet = set.client("pet").unwrap();
        assert_eq!(
            pet.methods[0].result.variant_names(),
            vec!["Success", "Failure400", "UnknownFailure"]
        );
        assert_eq!(
            pet.methods[1].result.variant_names(),
            vec!["Success", "Failure", "UnknownFailure"]
        );
        assert_eq!(
            pet.methods[0].result.variants[0].body,
            Some(TypeRef::List(Box::new(TypeRef::Named("Pet".into()))))
        );
        assert!(pet.methods[0].result.variants[1].body.is_none());
    }

    #[test]
    fn test_models_fields_and_boxing() {
        let set = artifacts(&GeneratorConfig::default(), GenerationSettings::default());
        let names: Vec<&str> = set.models.iter().map(|m| m.type_name.as_str()).collect();
        assert_eq!(names, vec!["Status", "Pet", "Error", "Order"]);

        let ModelKind::Struct(fields) = &set.model("Pet").unwrap().kind else {
            panic!("Pet should be a struct");
        };
        let idents: Vec<&str> = fields.iter().map(|f| f.ident.as_str()).collect();
        assert_eq!(idents, vec!["id", "type_", "parent", "children"]);
        assert_eq!(fields[0].ty, TypeRef::Scalar(ScalarKind::Long));
        assert_eq!(fields[1].wire_name, "type");
        assert!(fields[2].boxed);
        assert!(!fields[3].boxed);
    }

    #[test]
    fn test_filter_prunes_schemas_and_clients() {
        let config = GeneratorConfig::default()
            .with_operations(OperationFilter::only(["/store/order"]));
        let set = artifacts(&config, GenerationSettings::default());
        assert_eq!(set.clients.len(), 1);
        assert_eq!(set.clients[0].type_name, "StoreClient");
        let names: Vec<&str> = set.models.iter().map(|m| m.type_name.as_str()).collect();
        assert_eq!(names, vec!["Order"]);
    }

    #[test]
    fn test_enum_fallback_from_settings() {
        let plain = artifacts(&GeneratorConfig::default(), GenerationSettings::default());
        let status = plain.model("Status").unwrap();
        assert_eq!(status.enum_members(), vec!["Available", "Pending", "Sold"]);
        assert_eq!(status.enum_default(), None);

        let modules: Vec<Box<dyn ExtensionModule>> = vec![Box::new(UnknownEnumFallback)];
        let settings = apply_modules(&modules);
        let set = artifacts(&GeneratorConfig::default(), settings);
        let status = set.model("Status").unwrap();
        assert_eq!(
            status.enum_members(),
            vec!["Available", "Pending", "Sold", "Unknown"]
        );
        assert_eq!(status.enum_default(), Some("Unknown"));
    }

    #[test]
    fn test_optional_body_and_params() {
        let set = artifacts(&GeneratorConfig::default(), GenerationSettings::default());
        let find = &set.client("pet").unwrap().methods[0];
        assert_eq!(find.params[0].ident, "status");
        assert_eq!(
            find.params[0].ty,
            TypeRef::Optional(Box::new(TypeRef::Named("Status".into())))
        );
        let place = &set.client("store").unwrap().methods[0];
        let body = place.body.as_ref().unwrap();
        assert_eq!(body.ident, "body");
        assert!(body.ty.is_optional());
    }

    #[test]
    fn test_self_containing_collections_become_newtypes() {
        let doc = r#"
openapi: 3.0.3
info: { title: Trees, version: 1.0.0 }
paths:
  /forest:
    get:
      operationId: getForest
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema: { $ref: '#/components/schemas/Wood' }
  /loop:
    get:
      operationId: getLoop
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema: { $ref: '#/components/schemas/Ping' }
components:
  schemas:
    Wood: { $ref: '#/components/schemas/Forest' }
    Forest:
      type: array
      items: { $ref: '#/components/schemas/Forest' }
    Ping: { $ref: '#/components/schemas/Pong' }
    Pong: { $ref: '#/components/schemas/Ping' }
"#;
        let model = ApiModel::from_document(&parse_document(doc).unwrap()).unwrap();
        let set = plan(&model, &GeneratorConfig::default(), GenerationSettings::default());

        assert_eq!(
            set.model("Forest").unwrap().kind,
            ModelKind::Newtype(TypeRef::List(Box::new(TypeRef::Named("Forest".into()))))
        );
        assert_eq!(
            set.model("Wood").unwrap().kind,
            ModelKind::Alias(TypeRef::Named("Forest".into()))
        );
        assert_eq!(
            set.model("Ping").unwrap().kind,
            ModelKind::Alias(TypeRef::Unknown)
        );
    }
}
