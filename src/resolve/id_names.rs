//! Flat id → name lookup built from schema document trees.
//!
//! Relationship endpoints and key references point at properties by opaque
//! `GUID`. The table is built in one depth-first pass over every document a
//! reference may land in, before any rendering happens.

use std::collections::HashMap;

use serde_json::Value;

use crate::model::json::{bool_field, first_str_field, str_field};

/// Name and own activation state of an identified schema node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdEntry {
    pub name: String,
    pub is_activated: bool,
}

/// Lookup from property id to its display name
#[derive(Debug, Clone, Default)]
pub struct IdNameTable {
    entries: HashMap<String, IdEntry>,
}

impl IdNameTable {
    /// Build from a set of documents. Later documents win on duplicate ids.
    pub fn build<'a>(documents: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut table = Self::default();
        for document in documents {
            table.extend_from(document);
        }
        table
    }

    /// Add every identified node of `document`.
    pub fn extend_from(&mut self, document: &Value) {
        self.walk(document);
    }

    fn walk(&mut self, node: &Value) {
        for container in ["properties", "definitions", "patternProperties"] {
            if let Some(Value::Object(children)) = node.get(container) {
                for (key, child) in children {
                    self.register(key, child);
                    self.walk(child);
                }
            }
        }

        match node.get("items") {
            Some(Value::Array(items)) => items.iter().for_each(|item| self.walk_item(item)),
            Some(item @ Value::Object(_)) => self.walk_item(item),
            _ => {}
        }

        for variants in ["oneOf", "allOf", "anyOf"] {
            if let Some(Value::Array(members)) = node.get(variants) {
                members.iter().for_each(|member| self.walk(member));
            }
        }
    }

    /// Array items have no key of their own; only an explicit alias names them.
    fn walk_item(&mut self, item: &Value) {
        if let Some(name) = first_str_field(item, &["code", "name"]) {
            self.register(&name, item);
        }
        self.walk(item);
    }

    fn register(&mut self, key: &str, node: &Value) {
        if let Some(id) = str_field(node, "GUID") {
            let name = first_str_field(node, &["code", "name"]).unwrap_or_else(|| key.to_string());
            let is_activated = bool_field(node, "isActivated").unwrap_or(true);
            self.entries.insert(id, IdEntry { name, is_activated });
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&IdEntry> {
        self.entries.get(id)
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(|entry| entry.name.as_str())
    }

    /// Dotted name of a path of ids; unknown ids are skipped.
    pub fn name_by_path(&self, path: &[String]) -> String {
        path.iter()
            .filter_map(|id| self.name_of(id))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// True unless some node along the path is deactivated.
    pub fn path_activated(&self, path: &[String]) -> bool {
        path.iter()
            .filter_map(|id| self.entries.get(id))
            .all(|entry| entry.is_activated)
    }
}
