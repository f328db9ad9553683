// In-memory class model built during one inference session.
//
// Classes live in an `IndexMap` keyed by name (registration order is emission
// order); properties refer to other classes by that name.
use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::naming;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    String,
    Int,
    Bool,
    /// Reference to another class in the same model, by name.
    Class(String),
    /// No non-null sample seen yet.
    Unknown,
}

impl DataType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Class(name) => name,
            Self::Unknown => "unknown",
        }
    }
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::String | Self::Int | Self::Bool)
    }
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Class(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyInfo {
    pub json_name: String,
    pub name: String,
    pub data_type: DataType,
    pub is_array: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassInfo {
    pub name: String,
    pub properties: IndexMap<String, PropertyInfo>,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), properties: IndexMap::new() }
    }

    /// Add a property keyed by its original JSON key. A key that already
    /// exists is returned untouched, whatever type is passed in.
    pub fn add_property(&mut self, json_key: &str, data_type: DataType, is_array: bool) -> &PropertyInfo {
        self.properties
            .entry(json_key.to_string())
            .or_insert_with(|| PropertyInfo {
                json_name: json_key.to_string(),
                name: naming::normalize(json_key),
                data_type,
                is_array,
            })
    }

    pub fn property(&self, json_key: &str) -> Option<&PropertyInfo> {
        self.properties.get(json_key)
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyInfo> {
        self.properties.values()
    }

    /// Give an `unknown` placeholder its first real type. Returns `false` and
    /// leaves the property alone when it is missing or already typed.
    pub fn resolve_placeholder(&mut self, json_key: &str, data_type: DataType, is_array: bool) -> bool {
        match self.properties.get_mut(json_key) {
            Some(p) if p.data_type.is_unknown() && !data_type.is_unknown() => {
                p.data_type = data_type;
                p.is_array = is_array;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassModel {
    classes: IndexMap<String, ClassInfo>,
}

impl ClassModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact, case-sensitive lookup; registers the class on first use.
    pub fn get_or_create(&mut self, name: &str) -> &mut ClassInfo {
        self.classes
            .entry(name.to_string())
            .or_insert_with(|| ClassInfo::new(name))
    }

    pub fn get(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    pub(crate) fn classes_mut(&mut self) -> impl Iterator<Item = &mut ClassInfo> {
        self.classes.values_mut()
    }

    /// Classes in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn clear(&mut self) {
        self.classes.clear();
    }
}
