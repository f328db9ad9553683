//! Key → identifier conversions.
//!
//! `normalize` turns raw JSON keys into PascalCase property / class names.
//! Everything else here is emitter-side: snake_case for Rust fields,
//! identifier sanitizing, reserved-word escaping and collision handling.
pub mod singular;

pub use singular::{EnglishInflector, Singularize};

use std::collections::HashSet;

/// Split on `_`, then on space, then on `-`, capitalize each token and join.
///
/// Each separator gets its own full pass over the string, so
/// `"fine_tuning"`, `"fine tuning"` and `"fine-tuning"` all give `"FineTuning"`.
pub fn normalize(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    ['_', ' ', '-']
        .into_iter()
        .fold(raw.to_string(), |acc, sep| {
            acc.split(sep).map(capitalize).collect()
        })
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

/// `"IsAllowedToFineTune"` → `"is_allowed_to_fine_tune"`, `"HTTPStatus"` → `"http_status"`.
pub fn to_snake_case(s: &str) -> String {
    let chars = s.chars().collect::<Vec<_>>();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_lower);
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Drop every character that can't appear in an identifier and make sure the
/// result doesn't start with a digit. May return an empty string.
pub fn sanitize_identifier(s: &str) -> String {
    let mut out: String = s
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Make every name unique by suffixing `2`, `3`, ... to later duplicates.
/// Order and length of the input are preserved.
pub fn unique_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::<String>::new();
    let mut out = Vec::new();
    for name in names {
        let mut candidate = name.clone();
        let mut n = 2;
        while seen.contains(&candidate) {
            candidate = format!("{name}{n}");
            n += 1;
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

// ————————————————————————————————————————————————————————————————————————————
// TARGET CONVENTIONS
// ————————————————————————————————————————————————————————————————————————————

/// How a target language spells type and field names.
#[derive(Debug, Clone, Copy)]
pub struct NamingConvention {
    /// PascalCase class name → type identifier
    pub type_to_name: fn(&str) -> String,
    /// PascalCase property name → field identifier
    pub field_to_name: fn(&str) -> String,
    pub reserved_words: &'static [&'static str],
    pub escape_reserved: fn(&str) -> String,
    /// Type names the generated file itself refers to; a class may not shadow them.
    pub reserved_types: &'static [&'static str],
    /// Used when a name sanitizes down to nothing.
    pub fallback_field: &'static str,
}

impl NamingConvention {
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words.contains(&name)
    }

    fn safe_name(&self, name: String) -> String {
        if self.is_reserved(&name) {
            (self.escape_reserved)(&name)
        } else {
            name
        }
    }

    pub fn type_name(&self, name: &str) -> String {
        let ident = sanitize_identifier(&(self.type_to_name)(name));
        if ident.is_empty() {
            return ANONYMOUS_CLASS.to_string();
        }
        if self.reserved_types.contains(&ident.as_str()) {
            return format!("{ident}_");
        }
        self.safe_name(ident)
    }

    pub fn field_name(&self, name: &str) -> String {
        let ident = sanitize_identifier(&(self.field_to_name)(name));
        if ident.is_empty() {
            return self.fallback_field.to_string();
        }
        self.safe_name(ident)
    }
}

/// Class name used when a key normalizes to nothing.
pub const ANONYMOUS_CLASS: &str = "Anonymous";

fn escape_rust_reserved(name: &str) -> String {
    // these four can't be raw identifiers
    if matches!(name, "self" | "Self" | "super" | "crate") {
        format!("{name}_")
    } else {
        format!("r#{name}")
    }
}

fn escape_csharp_reserved(name: &str) -> String {
    format!("@{name}")
}

fn pascal_identity(name: &str) -> String {
    normalize(name)
}

pub const RUST_NAMING: NamingConvention = NamingConvention {
    type_to_name: pascal_identity,
    field_to_name: to_snake_case,
    reserved_words: &[
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
        "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
        "trait", "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box",
        "do", "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual",
        "yield",
    ],
    escape_reserved: escape_rust_reserved,
    reserved_types: &["String", "Vec", "Option", "Box", "Serialize", "Deserialize"],
    fallback_field: "field",
};

pub const CSHARP_NAMING: NamingConvention = NamingConvention {
    type_to_name: pascal_identity,
    field_to_name: pascal_identity,
    reserved_words: &[
        "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
        "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
        "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
        "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
        "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
        "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed",
        "short", "sizeof", "stackalloc", "static", "string", "struct", "switch", "this",
        "throw", "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort",
        "using", "virtual", "void", "volatile", "while",
    ],
    escape_reserved: escape_csharp_reserved,
    reserved_types: &["JsonPropertyName", "JsonPropertyNameAttribute"],
    fallback_field: "Field",
};
