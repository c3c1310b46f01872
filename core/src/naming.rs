#![deny(missing_docs)]

//! # Naming
//!
//! Derives Rust-safe identifiers for generated declarations.
//!
//! Every name is produced deterministically from the model: the same document
//! always yields the same identifiers. Names allocated inside one [`Scope`]
//! never collide; a candidate that is already taken receives a numeric suffix.

use crate::model::{HttpMethod, Operation, StatusCode};
use heck::{ToPascalCase, ToSnakeCase};
use std::collections::{HashMap, HashSet};

/// Module name used for operations without tags.
pub const DEFAULT_MODULE: &str = "default";

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "gen", "macro", "override",
    "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Reserved type names that would shadow prelude or generated items.
const RESERVED_TYPES: &[&str] = &["Self", "Option", "Result", "String", "Vec", "Box"];

/// Upper-cases the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replaces every character that cannot appear in an identifier with a word break.
fn words(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect()
}

/// Converts a raw name into a `PascalCase` type identifier.
///
/// e.g. `pet-store.Order` -> `PetStoreOrder`, `2fa` -> `T2fa`
pub fn type_ident(raw: &str) -> String {
    let ident = words(raw).to_pascal_case();
    let ident = if ident.is_empty() {
        "Unnamed".to_string()
    } else if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("T{}", ident)
    } else {
        ident
    };
    if RESERVED_TYPES.contains(&ident.as_str()) {
        format!("{}Model", ident)
    } else {
        ident
    }
}

/// Converts a raw name into a `snake_case` value identifier.
///
/// Keywords receive a trailing underscore (`type` -> `type_`).
pub fn snake_ident(raw: &str) -> String {
    let ident = words(raw).to_snake_case();
    let ident = if ident.is_empty() {
        "value".to_string()
    } else if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("v{}", ident)
    } else {
        ident
    };
    if KEYWORDS.contains(&ident.as_str()) {
        format!("{}_", ident)
    } else {
        ident
    }
}

/// Converts an enumeration literal into a variant identifier.
pub fn enum_member_ident(literal: &str) -> String {
    let ident = words(literal).to_pascal_case();
    if ident.is_empty() {
        "Empty".to_string()
    } else if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Value{}", ident)
    } else if ident == "Self" {
        "SelfValue".to_string()
    } else {
        ident
    }
}

/// Non-parameter segments of a path template.
///
/// e.g. `/pets/{id}/toys` -> `["pets", "toys"]`
pub fn path_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty() && !(s.starts_with('{') && s.ends_with('}')))
        .map(str::to_string)
        .collect()
}

/// Derives the undisambiguated method name of an operation.
///
/// Prefers the declared `operationId`. Otherwise the HTTP method is joined
/// with the path segments, path parameters stripped.
///
/// e.g. `GET /users/{id}/activate` -> `get_users_activate`
pub fn operation_stem(operation_id: Option<&str>, method: HttpMethod, path: &str) -> String {
    if let Some(id) = operation_id.filter(|id| !id.trim().is_empty()) {
        return snake_ident(id);
    }
    let mut raw = method.as_str().to_lowercase();
    for segment in path_segments(path) {
        raw.push('_');
        raw.push_str(&segment);
    }
    snake_ident(&raw)
}

/// A set of identifiers already in use in one emitted scope.
#[derive(Debug, Default, Clone)]
pub struct Scope {
    taken: HashSet<String>,
    separator: &'static str,
}

impl Scope {
    /// A scope for `snake_case` names (`name`, `name_2`, ...).
    pub fn snake() -> Self {
        Self {
            taken: HashSet::new(),
            separator: "_",
        }
    }

    /// A scope for `PascalCase` names (`Name`, `Name2`, ...).
    pub fn pascal() -> Self {
        Self {
            taken: HashSet::new(),
            separator: "",
        }
    }

    /// Marks a name as used without allocating it.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.taken.insert(name.into());
    }

    /// Whether the name is already used.
    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Returns `candidate` if free, otherwise the first free suffixed variant.
    pub fn allocate(&mut self, candidate: &str) -> String {
        if self.taken.insert(candidate.to_string()) {
            return candidate.to_string();
        }
        let mut n = 2usize;
        loop {
            let next = format!("{}{}{}", candidate, self.separator, n);
            if self.taken.insert(next.clone()) {
                return next;
            }
            n += 1;
        }
    }
}

/// Resolves method names for all operations of one client module.
///
/// Operations whose stems are unique keep them. Operations sharing a stem are
/// qualified with the path segments that distinguish them from the rest of the
/// group, then with the HTTP method, and finally with a numeric suffix; no two
/// returned names are equal.
pub fn method_names(operations: &[&Operation], reserved: &[&str]) -> Vec<String> {
    let stems: Vec<String> = operations
        .iter()
        .map(|op| operation_stem(op.operation_id.as_deref(), op.method, &op.path))
        .collect();

    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, stem) in stems.iter().enumerate() {
        groups.entry(stem.as_str()).or_default().push(i);
    }

    let mut scope = Scope::snake();
    for name in reserved {
        scope.reserve(*name);
    }
    let mut names: Vec<Option<String>> = vec![None; operations.len()];

    for (i, stem) in stems.iter().enumerate() {
        if groups[stem.as_str()].len() == 1 && !scope.contains(stem) {
            scope.reserve(stem.clone());
            names[i] = Some(stem.clone());
        }
    }

    for (i, stem) in stems.iter().enumerate() {
        if names[i].is_some() {
            continue;
        }
        let group: Vec<&Operation> = groups[stem.as_str()]
            .iter()
            .map(|&j| operations[j])
            .collect();
        let candidate = qualify(stem, operations[i], &group);
        names[i] = Some(scope.allocate(&candidate));
    }

    names.into_iter().flatten().collect()
}

fn qualify(stem: &str, operation: &Operation, group: &[&Operation]) -> String {
    if group.len() < 2 {
        return stem.to_string();
    }

    let own = path_segments(&operation.path);
    let shared: HashSet<String> = group
        .iter()
        .map(|op| path_segments(&op.path).into_iter().collect::<HashSet<_>>())
        .reduce(|a, b| a.intersection(&b).cloned().collect())
        .unwrap_or_default();
    let distinguishing: Vec<&String> = own.iter().filter(|s| !shared.contains(*s)).collect();

    if !distinguishing.is_empty() {
        let suffix: Vec<&str> = distinguishing.iter().map(|s| s.as_str()).collect();
        return snake_ident(&format!("{}_{}", stem, suffix.join("_")));
    }

    let same_method = group.iter().all(|op| op.method == operation.method);
    if !same_method {
        return snake_ident(&format!("{}_{}", stem, operation.method.as_str()));
    }

    stem.to_string()
}

/// Name of the result-variant family of a method.
pub fn result_family_name(method_name: &str) -> String {
    format!("{}Response", type_ident(method_name))
}

/// Name of the variant for one documented status code.
///
/// `success_codes` is the number of exact 2xx codes the operation documents;
/// a lone success code uses the plain `Success` name.
pub fn variant_name(status: &StatusCode, success_codes: usize) -> String {
    match status {
        StatusCode::Exact(code) => match code / 100 {
            2 if success_codes == 1 => "Success".to_string(),
            2 => format!("Success{}", code),
            4 | 5 => format!("Failure{}", code),
            _ => format!("Status{}", code),
        },
        StatusCode::Range(class) => match class {
            2 => "Success2xx".to_string(),
            4 | 5 => format!("Failure{}xx", class),
            _ => format!("Status{}xx", class),
        },
        StatusCode::Default => "Failure".to_string(),
    }
}

/// Name of the catch-all variant every family carries.
pub const UNKNOWN_FAILURE: &str = "UnknownFailure";

/// Module identifier for a tag (`""` maps to [`DEFAULT_MODULE`]).
pub fn module_ident(tag: &str) -> String {
    if tag.trim().is_empty() {
        DEFAULT_MODULE.to_string()
    } else {
        snake_ident(tag)
    }
}

/// Client type name for a tag.
pub fn client_type_name(tag: &str) -> String {
    if tag.trim().is_empty() {
        "DefaultClient".to_string()
    } else {
        format!("{}Client", type_ident(tag))
    }
}
