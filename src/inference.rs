//! Shape inference: JSON documents in, class model out.
//!
//! One session walks each document top to bottom and folds every object it
//! meets into a named class:
//! - nested objects become a class named after their key;
//! - arrays of objects become a class named after the singularized key, and
//!   every element adds to that same class;
//! - arrays of scalars stay primitive arrays; empty arrays contribute nothing.
//!
//! Policy is first-sample-wins. A property's type is fixed by the first
//! non-null value seen for it; later disagreeing samples are reported as
//! [`ShapeWarning`]s and otherwise ignored. A `null` only leaves an `unknown`
//! placeholder, which the next non-null sample fills in and [`Inference::solve`]
//! turns into `string` if nothing ever does.
pub mod arr;
mod obj;

use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{ClassModel, DataType};
use crate::naming::{EnglishInflector, Singularize};
use crate::path_de;

pub const DEFAULT_ROOT_CLASS: &str = "RootClass";

// ------------------------------- Warnings --------------------------------- //

/// Non-fatal shape ambiguity. Inference keeps going with the first sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeWarning {
    /// array elements of different shapes
    MixedArray { class: String, key: String },
    /// a later sample disagrees with the recorded type
    ConflictingSample { class: String, key: String, kept: String, observed: String },
    /// array of arrays; no property recorded
    NestedArray { class: String, key: String },
}

impl fmt::Display for ShapeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MixedArray { class, key } => {
                write!(f, "{class}.{key}: array mixes element shapes, first sample wins")
            }
            Self::ConflictingSample { class, key, kept, observed } => {
                write!(f, "{class}.{key}: saw {observed} but kept {kept}")
            }
            Self::NestedArray { class, key } => {
                write!(f, "{class}.{key}: nested arrays are not inferred, property skipped")
            }
        }
    }
}

// ------------------------------- Front API -------------------------------- //

/// One inference session. Use a fresh one (or [`Inference::reset`]) per
/// document unless merging documents into the same classes is intended.
pub struct Inference<S = EnglishInflector> {
    model: ClassModel,
    singularizer: S,
    warnings: Vec<ShapeWarning>,
}

impl Inference {
    pub fn new() -> Self {
        Self::with_singularizer(EnglishInflector)
    }
}

impl Default for Inference {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Singularize> Inference<S> {
    pub fn with_singularizer(singularizer: S) -> Self {
        Self { model: ClassModel::new(), singularizer, warnings: Vec::new() }
    }

    /// Parse `json_text` and fold it into the model under `root_class_name`.
    ///
    /// Blank input records nothing. Invalid JSON fails before anything is
    /// recorded.
    pub fn parse(&mut self, json_text: &str, root_class_name: &str) -> Result<()> {
        if json_text.trim().is_empty() {
            debug!("blank input; nothing to infer");
            return Ok(());
        }
        let value = path_de::parse_document(json_text)?;
        self.observe_value(&value, root_class_name);
        Ok(())
    }

    /// Fold an already-parsed document into the model. The root name is
    /// normalized like any nested key, so `"my_root"` registers `MyRoot`.
    pub fn observe_value(&mut self, value: &Value, root_class_name: &str) {
        let root = obj::class_name_for(root_class_name);
        match value {
            Value::Object(map) => self.populate_object(&root, map),
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Object(map) => self.populate_object(&root, map),
                        _ => debug!("skipping non-object element of root array"),
                    }
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                debug!("root is a scalar; no class produced");
            }
        }
    }

    /// The model as recorded so far, placeholders included.
    pub fn model(&self) -> &ClassModel {
        &self.model
    }

    pub fn warnings(&self) -> &[ShapeWarning] {
        &self.warnings
    }

    /// Finished model: every remaining `unknown` becomes a `string`.
    pub fn solve(&self) -> ClassModel {
        let mut model = self.model.clone();
        for class in model.classes_mut() {
            for p in class.properties.values_mut() {
                if p.data_type.is_unknown() {
                    p.data_type = DataType::String;
                }
            }
        }
        model
    }

    pub fn reset(&mut self) {
        self.model.clear();
        self.warnings.clear();
    }

    fn warn(&mut self, warning: ShapeWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Parse and solve one document in a fresh session.
pub fn infer_from_str(json_text: &str, root_class_name: &str) -> Result<ClassModel> {
    let mut inf = Inference::new();
    inf.parse(json_text, root_class_name)?;
    Ok(inf.solve())
}

/// Treat every value as a sample of the same root class.
pub fn infer_from_values<'a, I>(values: I, root_class_name: &str) -> ClassModel
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut inf = Inference::new();
    for v in values {
        inf.observe_value(v, root_class_name);
    }
    inf.solve()
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClassInfo;
    use serde_json::json;

    fn infer(v: Value) -> ClassModel {
        infer_from_values([&v], DEFAULT_ROOT_CLASS)
    }

    fn shape(class: &ClassInfo) -> Vec<(String, String, bool)> {
        class
            .properties()
            .map(|p| (p.name.clone(), p.data_type.to_string(), p.is_array))
            .collect()
    }

    fn prop(name: &str, ty: &str, is_array: bool) -> (String, String, bool) {
        (name.to_string(), ty.to_string(), is_array)
    }

    #[test]
    fn flat_object() {
        let model = infer_from_str(
            r#"{"title":"asdf","isAwesome":true,"favoriteNumber":123}"#,
            DEFAULT_ROOT_CLASS,
        )
        .unwrap();
        assert_eq!(model.len(), 1);
        let root = model.get("RootClass").unwrap();
        assert_eq!(
            shape(root),
            [prop("Title", "string", false), prop("IsAwesome", "bool", false), prop("FavoriteNumber", "int", false)]
        );
    }

    #[test]
    fn array_of_scalars_stays_primitive() {
        let model = infer(json!({"audiences": ["asdf", "qwer", "zxcv"]}));
        assert_eq!(model.len(), 1);
        assert_eq!(shape(model.get("RootClass").unwrap()), [prop("Audiences", "string", true)]);
    }

    #[test]
    fn nested_object_with_snake_case_keys() {
        let model = infer(json!({
            "fine_tuning": {
                "is_allowed_to_fine_tune": false,
                "finetuning_state": "not_started",
                "verification_attempts_count": 0
            }
        }));
        let names = model.classes().map(|c| c.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["RootClass", "FineTuning"]);
        assert_eq!(shape(model.get("RootClass").unwrap()), [prop("FineTuning", "FineTuning", false)]);
        assert_eq!(
            shape(model.get("FineTuning").unwrap()),
            [
                prop("IsAllowedToFineTune", "bool", false),
                prop("FinetuningState", "string", false),
                prop("VerificationAttemptsCount", "int", false),
            ]
        );
    }

    #[test]
    fn array_of_objects_uses_singular_class_and_unions_keys() {
        let model = infer(json!({
            "addresses": [
                {"street": "1 Main", "zip": 12345},
                {"street": "2 Side", "city": "Springfield"}
            ]
        }));
        assert_eq!(shape(model.get("RootClass").unwrap()), [prop("Addresses", "Address", true)]);
        assert_eq!(
            shape(model.get("Address").unwrap()),
            [prop("Street", "string", false), prop("Zip", "int", false), prop("City", "string", false)]
        );
    }

    #[test]
    fn root_array_accumulates_into_root_class() {
        let model = infer(json!([
            {"id": 1, "name": "a"},
            "not an object",
            {"id": 2, "active": true}
        ]));
        assert_eq!(model.len(), 1);
        assert_eq!(
            shape(model.get("RootClass").unwrap()),
            [prop("Id", "int", false), prop("Name", "string", false), prop("Active", "bool", false)]
        );
    }

    #[test]
    fn scalar_root_produces_nothing() {
        assert!(infer(json!(42)).is_empty());
        assert!(infer(Value::Null).is_empty());
        assert!(infer(json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn empty_array_contributes_no_property() {
        let model = infer(json!({"tags": [], "nulls": [null], "name": "x"}));
        assert_eq!(shape(model.get("RootClass").unwrap()), [prop("Name", "string", false)]);
    }

    #[test]
    fn null_only_key_defaults_to_string() {
        let model = infer(json!([{"note": null}, {"note": null}]));
        assert_eq!(shape(model.get("RootClass").unwrap()), [prop("Note", "string", false)]);
    }

    #[test]
    fn null_placeholder_takes_first_real_sample_and_keeps_position() {
        let model = infer(json!([
            {"a": null, "b": 1},
            {"a": {"x": true}, "b": 2}
        ]));
        assert_eq!(
            shape(model.get("RootClass").unwrap()),
            [prop("A", "A", false), prop("B", "int", false)]
        );
        assert_eq!(shape(model.get("A").unwrap()), [prop("X", "bool", false)]);
    }

    #[test]
    fn first_sample_wins_and_warns() {
        let mut inf = Inference::new();
        inf.observe_value(&json!([{"v": "text"}, {"v": {"nested": 1}}]), DEFAULT_ROOT_CLASS);
        let model = inf.solve();
        assert_eq!(shape(model.get("RootClass").unwrap()), [prop("V", "string", false)]);
        // the conflicting object was not descended into
        assert!(model.get("V").is_none());
        assert_eq!(
            inf.warnings(),
            [ShapeWarning::ConflictingSample {
                class: "RootClass".into(),
                key: "v".into(),
                kept: "string".into(),
                observed: "V".into(),
            }]
        );
    }

    #[test]
    fn mixed_and_nested_arrays_are_reported() {
        let mut inf = Inference::new();
        inf.observe_value(&json!({"mixed": ["a", {"k": 1}], "grid": [[1, 2], [3]]}), "Doc");
        let model = inf.solve();
        assert_eq!(shape(model.get("Doc").unwrap()), [prop("Mixed", "Mixed", true)]);
        assert_eq!(shape(model.get("Mixed").unwrap()), [prop("K", "int", false)]);
        assert_eq!(inf.warnings().len(), 2);
        assert!(matches!(inf.warnings()[1], ShapeWarning::NestedArray { .. }));
    }

    #[test]
    fn same_nested_key_reuses_one_class() {
        let model = infer(json!({
            "home": {"owner": {"name": "a"}},
            "work": {"owner": {"name": "b", "title": "c"}}
        }));
        let names = model.classes().map(|c| c.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["RootClass", "Home", "Owner", "Work"]);
        assert_eq!(
            shape(model.get("Owner").unwrap()),
            [prop("Name", "string", false), prop("Title", "string", false)]
        );
    }

    #[test]
    fn empty_nested_object_still_registers_class() {
        let model = infer(json!({"meta": {}}));
        assert!(model.get("Meta").unwrap().properties.is_empty());
    }

    #[test]
    fn custom_singularizer_names_element_classes() {
        let mut inf = Inference::with_singularizer(|w: &str| format!("{w}_entry"));
        inf.observe_value(&json!({"rows": [{"n": 1}]}), DEFAULT_ROOT_CLASS);
        let model = inf.solve();
        assert_eq!(shape(model.get("RootClass").unwrap()), [prop("Rows", "RowsEntry", true)]);
        assert!(model.get("RowsEntry").is_some());
    }

    #[test]
    fn parse_is_deterministic_across_sessions() {
        let src = r#"{"b": [{"y": 1, "x": "s"}], "a": {"q": null}, "c": [true]}"#;
        let first = infer_from_str(src, "Root").unwrap();
        let second = infer_from_str(src, "Root").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_json_records_nothing() {
        let mut inf = Inference::new();
        assert!(inf.parse(r#"{"a": [1, 2"#, DEFAULT_ROOT_CLASS).is_err());
        assert!(inf.model().is_empty());
    }

    #[test]
    fn blank_input_is_not_an_error() {
        let mut inf = Inference::new();
        inf.parse("  \n\t", DEFAULT_ROOT_CLASS).unwrap();
        assert!(inf.solve().is_empty());
    }

    #[test]
    fn root_name_is_normalized_like_nested_keys() {
        let model = infer_from_values([&json!({"my_root": {"id": 1}, "name": "x"})], "my_root");
        let names = model.classes().map(|c| c.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["MyRoot"]);
        assert_eq!(
            shape(model.get("MyRoot").unwrap()),
            [prop("MyRoot", "MyRoot", false), prop("Id", "int", false), prop("Name", "string", false)]
        );
    }

    #[test]
    fn reset_forgets_previous_document() {
        let mut inf = Inference::new();
        inf.parse(r#"{"a": 1}"#, DEFAULT_ROOT_CLASS).unwrap();
        inf.reset();
        inf.parse(r#"{"b": "x"}"#, DEFAULT_ROOT_CLASS).unwrap();
        assert_eq!(shape(inf.model().get("RootClass").unwrap()), [prop("B", "string", false)]);
    }
}
