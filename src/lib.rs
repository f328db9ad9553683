//! Infer named record types from example JSON and emit type declarations.
//!
//! ```
//! use json_classgen::{Target, generate_classes};
//!
//! let classes = generate_classes(r#"{"title": "x", "tags": ["a"]}"#, "RootClass", &Target::Rust).unwrap();
//! assert!(classes["RootClass"].contains("pub tags: Vec<String>,"));
//! ```
pub mod classify;
pub mod codegen;
pub mod error;
pub mod inference;
pub mod jq_exec;
pub mod model;
pub mod naming;
pub mod path_de;

use indexmap::IndexMap;

pub use codegen::Target;
pub use error::{Error, Result};
pub use inference::{DEFAULT_ROOT_CLASS, Inference, ShapeWarning};
pub use model::{ClassInfo, ClassModel, DataType, PropertyInfo};

/// Parse one document in a fresh session and render every inferred class.
/// Blank input gives an empty map.
pub fn generate_classes(json_text: &str, root_class_name: &str, target: &Target) -> Result<IndexMap<String, String>> {
    let model = inference::infer_from_str(json_text, root_class_name)?;
    Ok(codegen::generate(&model, target))
}
