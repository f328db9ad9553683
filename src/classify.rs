use serde_json::Value;

use crate::model::DataType;

/// Semantic kind of a JSON scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: ValueKind,
    pub data_type: DataType,
}

/// Classify a scalar. Numbers are always narrowed to `int`; `null` (and any
/// non-scalar passed in) comes back as `unknown`.
pub fn classify(value: &Value) -> Classification {
    let (kind, data_type) = match value {
        Value::String(_) => (ValueKind::String, DataType::String),
        Value::Number(_) => (ValueKind::Number, DataType::Int),
        Value::Bool(_) => (ValueKind::Boolean, DataType::Bool),
        Value::Null | Value::Array(_) | Value::Object(_) => (ValueKind::Unknown, DataType::Unknown),
    };
    Classification { kind, data_type }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_map_to_primitive_types() {
        assert_eq!(classify(&json!("asdf")).data_type, DataType::String);
        assert_eq!(classify(&json!(123)).data_type, DataType::Int);
        assert_eq!(classify(&json!(true)).data_type, DataType::Bool);
        assert_eq!(classify(&json!(false)).kind, ValueKind::Boolean);
    }

    #[test]
    fn floats_still_narrow_to_int() {
        let c = classify(&json!(4.5));
        assert_eq!(c.kind, ValueKind::Number);
        assert_eq!(c.data_type.as_str(), "int");
    }

    #[test]
    fn null_and_containers_are_unknown() {
        assert_eq!(classify(&Value::Null).data_type, DataType::Unknown);
        assert_eq!(classify(&json!([1])).kind, ValueKind::Unknown);
        assert_eq!(classify(&json!({})).kind, ValueKind::Unknown);
    }
}
