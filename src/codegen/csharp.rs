use super::{Block, ClassEmitter};
use crate::model::{ClassInfo, ClassModel, DataType, PropertyInfo};
use crate::naming::{self, CSHARP_NAMING};

/// System.Text.Json classes with auto-properties.
pub struct CSharpEmitter<'a> {
    pub namespace: Option<&'a str>,
}

impl ClassEmitter for CSharpEmitter<'_> {
    fn prelude(&self) -> String {
        let mut out = String::from("using System.Collections.Generic;\nusing System.Text.Json.Serialization;\n");
        if let Some(ns) = self.namespace {
            out.push_str(&format!("\nnamespace {ns};\n"));
        }
        out
    }

    fn emit_class(&self, class: &ClassInfo, _model: &ClassModel) -> String {
        let type_name = CSHARP_NAMING.type_name(&class.name);
        let props = class.properties().collect::<Vec<_>>();
        // a member can't share its enclosing type's name
        let members = naming::unique_names(props.iter().map(|p| {
            let name = CSHARP_NAMING.field_name(&p.name);
            if name == type_name { format!("{name}Value") } else { name }
        }));

        let mut b = Block::new("    ");
        b.line(&format!("public class {type_name}")).line("{").indent();
        for (i, (p, member)) in props.iter().zip(&members).enumerate() {
            if i > 0 {
                b.blank();
            }
            b.line(&format!("[JsonPropertyName(\"{}\")]", escape_string(&p.json_name)))
                .line(&format!("public {} {member} {{ get; set; }}{}", property_type(p), initializer(p)));
        }
        b.dedent().line("}");
        b.build()
    }
}

fn property_type(p: &PropertyInfo) -> String {
    let base = match &p.data_type {
        DataType::String | DataType::Unknown => "string".to_string(),
        DataType::Int => "int".to_string(),
        DataType::Bool => "bool".to_string(),
        DataType::Class(name) => CSHARP_NAMING.type_name(name),
    };
    if p.is_array { format!("List<{base}>") } else { base }
}

fn initializer(p: &PropertyInfo) -> &'static str {
    if p.is_array {
        return " = new();";
    }
    match p.data_type {
        DataType::String | DataType::Unknown => " = string.Empty;",
        DataType::Class(_) => " = new();",
        DataType::Int | DataType::Bool => "",
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{DEFAULT_ROOT_CLASS, infer_from_str};

    fn emit(src: &str) -> Vec<String> {
        let model = infer_from_str(src, DEFAULT_ROOT_CLASS).unwrap();
        let emitter = CSharpEmitter { namespace: None };
        model.classes().map(|c| emitter.emit_class(c, &model)).collect()
    }

    #[test]
    fn flat_class() {
        let out = emit(r#"{"title":"asdf","isAwesome":true,"favoriteNumber":123}"#);
        let expected = [
            "public class RootClass",
            "{",
            "    [JsonPropertyName(\"title\")]",
            "    public string Title { get; set; } = string.Empty;",
            "",
            "    [JsonPropertyName(\"isAwesome\")]",
            "    public bool IsAwesome { get; set; }",
            "",
            "    [JsonPropertyName(\"favoriteNumber\")]",
            "    public int FavoriteNumber { get; set; }",
            "}",
            "",
        ]
        .join("\n");
        assert_eq!(out[0], expected);
    }

    #[test]
    fn defaults_for_arrays_and_nested_classes() {
        let out = emit(r#"{"audiences":["a"],"addresses":[{"zip":1}],"owner":{"name":"x"}}"#);
        assert!(out[0].contains("public List<string> Audiences { get; set; } = new();"));
        assert!(out[0].contains("public List<Address> Addresses { get; set; } = new();"));
        assert!(out[0].contains("public Owner Owner { get; set; } = new();"));
    }

    #[test]
    fn member_named_like_its_class_is_renamed() {
        let out = emit(r#"{"item":{"item":1}}"#);
        assert!(out[1].starts_with("public class Item\n"));
        assert!(out[1].contains("public int ItemValue { get; set; }"));
    }

    #[test]
    fn namespace_goes_in_the_prelude() {
        let emitter = CSharpEmitter { namespace: Some("Acme.Models") };
        assert!(emitter.prelude().ends_with("\nnamespace Acme.Models;\n"));
    }

    #[test]
    fn keys_are_escaped() {
        assert_eq!(escape_string(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape_string("tab\there"), "tab\\there");
    }
}
