use serde_json::Value;

use crate::classify::classify;
use crate::model::DataType;

/// What an array's elements look like, as far as inference cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementShape {
    /// no elements, or only nulls
    Empty,
    Scalar(DataType),
    Objects,
    /// arrays of arrays; not inferred
    Nested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayShape {
    pub kind: ElementShape,
    /// non-null elements disagree with `kind`
    pub mixed: bool,
}

impl ArrayShape {
    /// Any object element makes the array object-shaped; otherwise the first
    /// non-null element decides. Disagreeing elements only set `mixed`.
    pub fn inspect(items: &[Value]) -> Self {
        let mut non_null = items.iter().filter(|v| !v.is_null()).map(element_shape);
        let Some(first) = non_null.next() else {
            return Self { kind: ElementShape::Empty, mixed: false };
        };
        let mut has_object = first == ElementShape::Objects;
        let mut mixed = false;
        for shape in non_null {
            has_object |= shape == ElementShape::Objects;
            mixed |= shape != first;
        }
        let kind = if has_object { ElementShape::Objects } else { first };
        Self { kind, mixed }
    }
}

fn element_shape(v: &Value) -> ElementShape {
    match v {
        Value::Object(_) => ElementShape::Objects,
        Value::Array(_) => ElementShape::Nested,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            ElementShape::Scalar(classify(v).data_type)
        }
    }
}
