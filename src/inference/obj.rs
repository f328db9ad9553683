use serde_json::{Map, Value};
use tracing::debug;

use super::arr::{ArrayShape, ElementShape};
use super::{Inference, ShapeWarning};
use crate::classify::classify;
use crate::model::DataType;
use crate::naming::{self, Singularize};

/// Class name for a nested object or array element stored under `key`.
pub(super) fn class_name_for(key: &str) -> String {
    let name = naming::normalize(key);
    if name.is_empty() { naming::ANONYMOUS_CLASS.to_string() } else { name }
}

fn describe(data_type: &DataType, is_array: bool) -> String {
    if is_array { format!("{data_type}[]") } else { data_type.to_string() }
}

impl<S: Singularize> Inference<S> {
    /// Fold one JSON object into `class_name`, keys in source order.
    pub(super) fn populate_object(&mut self, class_name: &str, map: &Map<String, Value>) {
        self.model.get_or_create(class_name);
        for (key, value) in map {
            match value {
                Value::Object(inner) => {
                    let nested = class_name_for(key);
                    if self.record(class_name, key, DataType::Class(nested.clone()), false) {
                        self.populate_object(&nested, inner);
                    }
                }
                Value::Array(items) => self.populate_array(class_name, key, items),
                Value::Null => {
                    self.record(class_name, key, DataType::Unknown, false);
                }
                Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                    self.record(class_name, key, classify(value).data_type, false);
                }
            }
        }
    }

    fn populate_array(&mut self, class_name: &str, key: &str, items: &[Value]) {
        let shape = ArrayShape::inspect(items);
        if shape.mixed {
            self.warn(ShapeWarning::MixedArray {
                class: class_name.to_string(),
                key: key.to_string(),
            });
        }
        match shape.kind {
            ElementShape::Empty => {
                debug!(class = class_name, key, "array has no non-null elements; property skipped");
            }
            ElementShape::Scalar(data_type) => {
                self.record(class_name, key, data_type, true);
            }
            ElementShape::Objects => {
                let element_class = class_name_for(&self.singularizer.singularize(key));
                if self.record(class_name, key, DataType::Class(element_class.clone()), true) {
                    for item in items {
                        if let Value::Object(map) = item {
                            self.populate_object(&element_class, map);
                        }
                    }
                }
            }
            ElementShape::Nested => {
                self.warn(ShapeWarning::NestedArray {
                    class: class_name.to_string(),
                    key: key.to_string(),
                });
            }
        }
    }

    /// Record one sample for `key`. Returns `true` when the property (new or
    /// existing) has exactly this type, i.e. the caller may descend into it.
    ///
    /// First sample wins: an existing type is only replaced when it is the
    /// `unknown` placeholder left by a `null`.
    fn record(&mut self, class_name: &str, key: &str, data_type: DataType, is_array: bool) -> bool {
        let class = self.model.get_or_create(class_name);
        let existing = class.property(key).map(|p| (p.data_type.clone(), p.is_array));
        let Some((kept_type, kept_array)) = existing else {
            class.add_property(key, data_type, is_array);
            return true;
        };
        if kept_type == data_type && kept_array == is_array {
            return true;
        }
        if data_type.is_unknown() {
            // a null never conflicts with anything
            return false;
        }
        if kept_type.is_unknown() {
            return class.resolve_placeholder(key, data_type, is_array);
        }
        self.warn(ShapeWarning::ConflictingSample {
            class: class_name.to_string(),
            key: key.to_string(),
            kept: describe(&kept_type, kept_array),
            observed: describe(&data_type, is_array),
        });
        false
    }
}
