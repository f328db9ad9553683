//! Input pre-processing for the CLI: JSON Pointer selection, then jq.
use anyhow::{Context, Result, anyhow};
use jaq_core::{Compiler, Ctx, RcIter, compile::Undefined, load};
use jaq_json::Val;
use serde_json::Value;

/// Narrow a document down to the values inference should see.
///
/// The pointer (if any) is applied first; the jq filter then runs on the
/// selected node and every output it yields becomes its own document.
pub fn select_documents(doc: Value, json_pointer: Option<&str>, jq_expr: Option<&str>) -> Result<Vec<Value>> {
    let doc = match json_pointer {
        None => doc,
        Some(ptr) => doc
            .pointer(ptr)
            .cloned()
            .ok_or_else(|| anyhow!("JSON pointer `{ptr}` does not match anything"))?,
    };
    match jq_expr {
        None => Ok(vec![doc]),
        Some(filter) => run_jaq(filter, &doc),
    }
}

pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    for item in outputs {
        let v = item.map_err(|e| anyhow!("jq filter `{filter_src}` failed: {e:?}"))?;
        // Val displays as JSON text
        let text = v.to_string();
        let value = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("jq produced a value that is not JSON: {text}"))?;
        out.push(value);
    }
    Ok(out)
}

fn format_parse_errors(
    errs: Vec<(load::File<&str, ()>, load::Error<&str>)>,
) -> anyhow::Error {
    let msg = errs
        .iter()
        .map(|(file, err)| format!("jq parse error: {err:?} in `{}`", file.code))
        .collect::<Vec<_>>()
        .join("\n");
    anyhow!(msg)
}

fn format_undefined_errors(
    errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>,
) -> anyhow::Error {
    let msg = errs
        .iter()
        .flat_map(|(file, list)| {
            list.iter()
                .map(move |(name, undef)| format!("jq: undefined `{name}`: {undef:?} in `{}`", file.code))
        })
        .collect::<Vec<_>>()
        .join("\n");
    anyhow!(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pointer_selects_subdocument() {
        let doc = json!({"data": {"items": [{"a": 1}]}});
        let out = select_documents(doc, Some("/data/items/0"), None).unwrap();
        assert_eq!(out, [json!({"a": 1})]);
    }

    #[test]
    fn missing_pointer_is_an_error() {
        assert!(select_documents(json!({}), Some("/nope"), None).is_err());
    }

    #[test]
    fn jq_outputs_become_documents() {
        let doc = json!({"rows": [{"a": 1}, {"b": 2}]});
        let out = select_documents(doc, None, Some(".rows[]")).unwrap();
        assert_eq!(out, [json!({"a": 1}), json!({"b": 2})]);
    }

    #[test]
    fn bad_jq_filter_is_reported() {
        assert!(run_jaq(".[", &json!([])).is_err());
    }
}
