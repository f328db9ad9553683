use std::collections::HashSet;

use super::{Block, ClassEmitter};
use crate::model::{ClassInfo, ClassModel, DataType, PropertyInfo};
use crate::naming::{self, RUST_NAMING};

/// serde structs. `#[serde(default)]` on every struct gives each field its
/// zero value (`""`, `0`, `false`, empty `Vec`, default nested struct) when
/// the key is missing.
pub struct RustEmitter;

impl ClassEmitter for RustEmitter {
    fn prelude(&self) -> String {
        "use serde::{Deserialize, Serialize};\n".to_string()
    }

    fn emit_class(&self, class: &ClassInfo, model: &ClassModel) -> String {
        let type_name = RUST_NAMING.type_name(&class.name);
        let props = class.properties().collect::<Vec<_>>();
        let fields = naming::unique_names(props.iter().map(|p| RUST_NAMING.field_name(&p.name)));

        let mut b = Block::new("    ");
        b.line("#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]")
            .line("#[serde(default)]")
            .line(&format!("pub struct {type_name} {{"))
            .indent();
        for (p, field) in props.iter().zip(&fields) {
            // Debug formatting of a str is a valid Rust string literal
            b.line(&format!("#[serde(rename = {:?})]", p.json_name))
                .line(&format!("pub {field}: {},", field_type(class, p, model)));
        }
        b.dedent().line("}");
        b.build()
    }
}

fn field_type(owner: &ClassInfo, p: &PropertyInfo, model: &ClassModel) -> String {
    let base = match &p.data_type {
        DataType::String | DataType::Unknown => "String".to_string(),
        DataType::Int => "i64".to_string(),
        DataType::Bool => "bool".to_string(),
        DataType::Class(name) => RUST_NAMING.type_name(name),
    };
    if p.is_array {
        return format!("Vec<{base}>");
    }
    match p.data_type.class_name() {
        Some(target) if closes_cycle(model, target, &owner.name) => format!("Option<Box<{base}>>"),
        _ => base,
    }
}

/// Does `from` lead back to `owner` through non-array class fields?
/// Such a field would make the struct infinitely sized.
fn closes_cycle(model: &ClassModel, from: &str, owner: &str) -> bool {
    let mut stack = vec![from];
    let mut seen = HashSet::new();
    while let Some(name) = stack.pop() {
        if name == owner {
            return true;
        }
        if !seen.insert(name) {
            continue;
        }
        let Some(class) = model.get(name) else { continue };
        stack.extend(
            class
                .properties()
                .filter(|p| !p.is_array)
                .filter_map(|p| p.data_type.class_name()),
        );
    }
    false
}
