//! Column and key-name resolution for one table

use std::collections::HashSet;

use crate::model::{KeyFlags, KeyRef, SortOrder, TableSchema};
use crate::types::TypeMapper;
use crate::util::escape_single_quotes;

use super::id_names::IdNameTable;

/// Type of a partition key that matches no resolved column
const IMPLICIT_PARTITION_TYPE: &str = "string";

/// Column-level constraints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnConstraints {
    /// Required and not already asserted unique
    pub not_null: bool,
    pub unique: bool,
    pub check: Option<String>,
    pub default_value: Option<String>,
}

impl ColumnConstraints {
    pub fn is_empty(&self) -> bool {
        !self.not_null && !self.unique && self.check.is_none() && self.default_value.is_none()
    }

    /// `NOT NULL UNIQUE DEFAULT x CHECK (..) DISABLE NOVALIDATE`, or `None`.
    pub fn render(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut parts = Vec::new();
        if self.not_null {
            parts.push("NOT NULL".to_string());
        }
        if self.unique {
            parts.push("UNIQUE".to_string());
        }
        if let Some(default_value) = &self.default_value {
            parts.push(format!("DEFAULT {}", default_value));
        }
        if let Some(check) = &self.check {
            if check.trim_start().starts_with('(') {
                parts.push(format!("CHECK {}", check));
            } else {
                parts.push(format!("CHECK ({})", check));
            }
        }
        parts.push("DISABLE NOVALIDATE".to_string());
        Some(parts.join(" "))
    }
}

/// A resolved column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Display name (alias if present, else the property key)
    pub name: String,
    pub id: Option<String>,
    pub data_type: String,
    pub comment: Option<String>,
    pub constraints: ColumnConstraints,
    /// The property's own activation flag
    pub is_activated: bool,
    pub keys: KeyFlags,
}

impl Column {
    fn implicit(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: None,
            data_type: IMPLICIT_PARTITION_TYPE.to_string(),
            comment: None,
            constraints: ColumnConstraints::default(),
            is_activated: true,
            keys: KeyFlags::default(),
        }
    }

    /// `name type [COMMENT '..']`
    pub fn definition(&self) -> String {
        match &self.comment {
            Some(comment) => format!(
                "{} {} COMMENT '{}'",
                self.name,
                self.data_type,
                escape_single_quotes(comment)
            ),
            None => format!("{} {}", self.name, self.data_type),
        }
    }

    /// Definition followed by any constraints.
    pub fn statement(&self) -> String {
        match self.constraints.render() {
            Some(constraints) => format!("{} {}", self.definition(), constraints),
            None => self.definition(),
        }
    }
}

/// Ordered columns of a table and the names of the deactivated ones
#[derive(Debug, Clone, Default)]
pub struct ResolvedColumns {
    pub columns: Vec<Column>,
    pub deactivated_names: HashSet<String>,
}

impl ResolvedColumns {
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn by_id(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id.as_deref() == Some(id))
    }

    pub fn is_activated(&self, name: &str) -> bool {
        !self.deactivated_names.contains(name)
    }

    /// Columns that are not partition keys.
    pub fn without<'a>(
        &'a self,
        partition_names: &'a [String],
    ) -> impl Iterator<Item = &'a Column> {
        self.columns
            .iter()
            .filter(move |c| !partition_names.contains(&c.name))
    }
}

/// Resolve a table's columns in property order, then one-of/all-of unions.
///
/// Duplicate names are last-write-wins but keep their first position.
pub fn resolve_columns(table: &TableSchema, mapper: &TypeMapper) -> ResolvedColumns {
    let mut columns: Vec<Column> = Vec::new();

    let mut put = |column: Column| {
        match columns.iter_mut().find(|c| c.name == column.name) {
            Some(slot) => *slot = column,
            None => columns.push(column),
        }
    };

    for (key, property) in &table.properties {
        let unique = property.constraints.unique;
        put(Column {
            name: property.display_name(key).to_string(),
            id: property.id.clone(),
            data_type: mapper.type_of(property),
            comment: property.comment.clone(),
            constraints: ColumnConstraints {
                not_null: table.is_required(key) && !unique,
                unique,
                check: property.constraints.check.clone(),
                default_value: property.constraints.default_value.clone(),
            },
            is_activated: property.is_activated,
            keys: property.keys,
        });
    }

    for (name, union) in mapper.variant_unions(&table.variants) {
        put(Column {
            name,
            id: None,
            data_type: union,
            comment: None,
            constraints: ColumnConstraints::default(),
            is_activated: true,
            keys: KeyFlags::default(),
        });
    }

    let deactivated_names = columns
        .iter()
        .filter(|c| !c.is_activated)
        .map(|c| c.name.clone())
        .collect();

    ResolvedColumns {
        columns,
        deactivated_names,
    }
}

/// Resolved key names of a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyNames {
    pub primary_keys: Vec<String>,
    pub partition: Vec<String>,
    pub clustering: Vec<String>,
    pub sorted_by: Vec<(String, SortOrder)>,
    pub skewed_by: Vec<String>,
}

/// Current display name of a key reference.
///
/// Ids resolve against the table's own columns first, then the shared id
/// table. References that resolve nowhere are dropped.
pub fn key_name(key: &KeyRef, columns: &ResolvedColumns, id_names: &IdNameTable) -> Option<String> {
    if let Some(id) = &key.key_id {
        if let Some(column) = columns.by_id(id) {
            return Some(column.name.clone());
        }
        if let Some(name) = id_names.name_of(id) {
            return Some(name.to_string());
        }
    }
    key.name.clone()
}

fn names_of(keys: &[KeyRef], columns: &ResolvedColumns, id_names: &IdNameTable) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in keys.iter().filter_map(|k| key_name(k, columns, id_names)) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn with_flagged(
    mut names: Vec<String>,
    columns: &ResolvedColumns,
    flag: fn(&KeyFlags) -> bool,
) -> Vec<String> {
    for column in columns.columns.iter().filter(|c| flag(&c.keys)) {
        if !names.contains(&column.name) {
            names.push(column.name.clone());
        }
    }
    names
}

/// Resolve entity-level key designations plus property-level key flags.
pub fn resolve_key_names(
    table: &TableSchema,
    columns: &ResolvedColumns,
    id_names: &IdNameTable,
) -> KeyNames {
    let keys = &table.keys;

    KeyNames {
        primary_keys: with_flagged(
            names_of(&keys.primary_keys, columns, id_names),
            columns,
            |k| k.primary_key,
        ),
        partition: with_flagged(
            names_of(&keys.partition, columns, id_names),
            columns,
            |k| k.partition_key,
        ),
        clustering: with_flagged(
            names_of(&keys.clustering, columns, id_names),
            columns,
            |k| k.clustering_key,
        ),
        sorted_by: keys
            .sorted_by
            .iter()
            .filter_map(|sort| Some((key_name(&sort.key, columns, id_names)?, sort.order)))
            .collect(),
        skewed_by: names_of(&keys.skewed_by, columns, id_names),
    }
}

/// Partition key columns in key order; unknown names get an implicit string column.
pub fn get_partitions_keys(columns: &ResolvedColumns, partition_names: &[String]) -> Vec<Column> {
    partition_names
        .iter()
        .map(|name| {
            columns
                .get(name)
                .cloned()
                .unwrap_or_else(|| Column::implicit(name))
        })
        .collect()
}
