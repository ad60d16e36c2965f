//! Type descriptor table.
//!
//! Each schema type tag has a descriptor holding the attribute defaults a
//! freshly created property of that type gets, plus for collections the
//! element type implied by each `subtype` value. The table is immutable and
//! built once per generation call, then passed to the mapper by reference.

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::model::{normalize_type_tag, DataType};

/// Descriptor of one schema type
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub name: &'static str,
    /// Attributes applied to a property created from this type alone
    pub default_values: Value,
    /// `subtype` value → child value type tag
    pub subtypes: HashMap<&'static str, &'static str>,
}

impl TypeDescriptor {
    fn new(name: &'static str, default_values: Value) -> Self {
        Self {
            name,
            default_values,
            subtypes: HashMap::new(),
        }
    }

    fn with_subtypes(mut self, subtypes: &[(&'static str, &'static str)]) -> Self {
        self.subtypes.extend(subtypes.iter().copied());
        self
    }
}

/// Child value type when a collection has neither items nor a known subtype
pub const DEFAULT_CHILD_VALUE_TYPE: &str = "text";

const ARRAY_SUBTYPES: &[(&str, &str)] = &[
    ("array<txt>", "text"),
    ("array<num>", "numeric"),
    ("array<bool>", "bool"),
    ("array<str>", "struct"),
    ("array<arr>", "array"),
    ("array<map>", "map"),
    ("array<ts>", "timestamp"),
    ("array<date>", "date"),
    ("array<bin>", "binary"),
    ("array<union>", "union"),
];

const MAP_SUBTYPES: &[(&str, &str)] = &[
    ("map<txt>", "text"),
    ("map<num>", "numeric"),
    ("map<bool>", "bool"),
    ("map<str>", "struct"),
    ("map<arr>", "array"),
    ("map<map>", "map"),
    ("map<ts>", "timestamp"),
    ("map<date>", "date"),
    ("map<bin>", "binary"),
];

const SET_SUBTYPES: &[(&str, &str)] = &[
    ("set<txt>", "text"),
    ("set<num>", "numeric"),
    ("set<bool>", "bool"),
    ("set<str>", "struct"),
];

/// Immutable lookup table of type descriptors keyed by type tag
#[derive(Debug, Clone)]
pub struct TypeDescriptors {
    descriptors: HashMap<&'static str, TypeDescriptor>,
}

impl Default for TypeDescriptors {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TypeDescriptors {
    /// The descriptors shipped with the crate.
    pub fn builtin() -> Self {
        let list = vec![
            TypeDescriptor::new("text", json!({ "mode": "string" })),
            TypeDescriptor::new("numeric", json!({ "mode": "int" })),
            TypeDescriptor::new("bool", json!({})),
            TypeDescriptor::new("interval", json!({})),
            TypeDescriptor::new("timestamp", json!({})),
            TypeDescriptor::new("date", json!({})),
            TypeDescriptor::new("binary", json!({})),
            TypeDescriptor::new("struct", json!({})),
            TypeDescriptor::new("jsonObject", json!({})),
            TypeDescriptor::new("jsonArray", json!({})),
            TypeDescriptor::new("union", json!({})),
            TypeDescriptor::new("array", json!({ "subtype": "array<txt>" }))
                .with_subtypes(ARRAY_SUBTYPES),
            TypeDescriptor::new("set", json!({ "subtype": "set<txt>" }))
                .with_subtypes(SET_SUBTYPES),
            TypeDescriptor::new("map", json!({ "keyType": "text", "subtype": "map<txt>" }))
                .with_subtypes(MAP_SUBTYPES),
        ];

        Self {
            descriptors: list.into_iter().map(|d| (d.name, d)).collect(),
        }
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.descriptors.get(type_name)
    }

    /// Data type of a property created from a bare type tag with descriptor defaults.
    ///
    /// Unknown tags yield a property carrying just the tag.
    pub fn default_data_type(&self, type_name: &str) -> DataType {
        let type_name = normalize_type_tag(type_name);
        match self.get(type_name) {
            // union descriptors have no member list to default to
            Some(descriptor) if descriptor.name == "union" => DataType::Undefined,
            Some(descriptor) => {
                DataType::from_json_with_type(&descriptor.default_values, type_name)
            }
            None => DataType::Named(type_name.to_string()),
        }
    }

    /// Element type implied by a collection's `subtype`, defaulting to text.
    pub fn child_by_subtype(&self, parent_type: &str, subtype: Option<&str>) -> DataType {
        let child = subtype
            .and_then(|s| self.get(parent_type)?.subtypes.get(s).copied())
            .unwrap_or(DEFAULT_CHILD_VALUE_TYPE);
        self.default_data_type(child)
    }
}
