//! Foreign key resolution across entities

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::model::{ContainerDocuments, Relationship, TableSchema};
use crate::util::{comment_if_deactivated, replace_space_with_underscore};

use super::id_names::IdNameTable;

/// One relationship edge with its endpoints resolved to names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyEdge {
    pub name: String,
    pub parent_table: String,
    pub child_table: String,
    pub parent_column: String,
    pub child_column: String,
    pub disable_no_validate: bool,
    /// Both tables and every node on both field paths are active
    pub is_activated: bool,
}

/// Edges coalesced into one (possibly composite) constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyGroup {
    /// Parent table name followed by the constraint name
    pub group_key: String,
    pub edges: Vec<ForeignKeyEdge>,
}

impl ForeignKeyGroup {
    fn first(&self) -> Option<&ForeignKeyEdge> {
        self.edges.first()
    }

    pub fn name(&self) -> String {
        self.first()
            .map(|e| replace_space_with_underscore(&e.name))
            .unwrap_or_default()
    }

    pub fn parent_table(&self) -> &str {
        self.first().map(|e| e.parent_table.as_str()).unwrap_or_default()
    }

    pub fn child_table(&self) -> &str {
        self.first().map(|e| e.child_table.as_str()).unwrap_or_default()
    }

    pub fn disable_no_validate(&self) -> bool {
        self.edges.iter().any(|e| e.disable_no_validate)
    }

    pub fn is_activated(&self) -> bool {
        self.edges.iter().all(|e| e.is_activated)
    }

    pub fn child_columns(&self) -> String {
        self.edges
            .iter()
            .map(|e| e.child_column.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn parent_columns(&self) -> String {
        self.edges
            .iter()
            .map(|e| e.parent_column.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn validation_suffix(&self) -> &'static str {
        if self.disable_no_validate() {
            " DISABLE NOVALIDATE"
        } else {
            ""
        }
    }

    /// `FOREIGN KEY (..) REFERENCES p(..)` constraint clause for use inside CREATE TABLE.
    pub fn inline_clause(&self) -> String {
        format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({}){}",
            self.name(),
            self.child_columns(),
            self.parent_table(),
            self.parent_columns(),
            self.validation_suffix()
        )
    }

    /// Standalone `ALTER TABLE ... ADD CONSTRAINT` statement.
    pub fn alter_table_statement(&self) -> String {
        format!(
            "ALTER TABLE {} ADD {};",
            self.child_table(),
            self.inline_clause()
        )
    }
}

/// Constraint groups keyed by child entity id, each in first-edge order
#[derive(Debug, Clone, Default)]
pub struct ForeignKeyIndex {
    by_child: HashMap<String, Vec<ForeignKeyGroup>>,
}

impl ForeignKeyIndex {
    pub fn groups_for(&self, child_entity_id: &str) -> &[ForeignKeyGroup] {
        self.by_child
            .get(child_entity_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_child.is_empty()
    }
}

/// Id → name table over every entity taking part in a relationship, plus
/// the shared definitions any of them may import from.
pub fn relationship_id_names(
    relationships: &[Relationship],
    documents: &ContainerDocuments,
) -> IdNameTable {
    let mut table = IdNameTable::default();
    for entity in documents
        .entities
        .iter()
        .filter(|e| relationships.iter().any(|r| r.touches(&e.id)))
    {
        table.extend_from(&entity.json_schema);
        table.extend_from(&entity.internal_definitions);
        for shared in documents.shared_definitions() {
            table.extend_from(shared);
        }
    }
    table
}

/// Group relationships into constraints per child entity.
///
/// `database_activated` is the container's state; an inactive database
/// makes every constraint inactive.
pub fn build_foreign_key_index(
    relationships: &[Relationship],
    documents: &ContainerDocuments,
    database_activated: bool,
) -> ForeignKeyIndex {
    let id_names = relationship_id_names(relationships, documents);
    let tables: HashMap<&str, TableSchema> = documents
        .entities
        .iter()
        .filter(|e| relationships.iter().any(|r| r.touches(&e.id)))
        .map(|e| {
            (
                e.id.as_str(),
                TableSchema::from_documents(&e.json_schema, &e.entity_tabs),
            )
        })
        .collect();

    let mut index = ForeignKeyIndex::default();

    for relationship in relationships {
        let (Some(parent), Some(child)) = (
            tables.get(relationship.parent_collection.as_str()),
            tables.get(relationship.child_collection.as_str()),
        ) else {
            warn!(
                relationship = %relationship.name,
                "Skipping relationship with an unknown entity"
            );
            continue;
        };

        let edge = ForeignKeyEdge {
            name: relationship.name.clone(),
            parent_table: replace_space_with_underscore(&parent.name),
            child_table: replace_space_with_underscore(&child.name),
            parent_column: id_names.name_by_path(relationship.parent_path()),
            child_column: id_names.name_by_path(relationship.child_path()),
            disable_no_validate: relationship.custom_properties.disable_no_validate,
            is_activated: database_activated
                && parent.is_activated
                && child.is_activated
                && id_names.path_activated(relationship.parent_path())
                && id_names.path_activated(relationship.child_path()),
        };

        let group_key = format!("{}{}", edge.parent_table, edge.name);
        let groups = index
            .by_child
            .entry(relationship.child_collection.clone())
            .or_default();
        match groups.iter_mut().find(|g| g.group_key == group_key) {
            Some(group) => group.edges.push(edge),
            None => groups.push(ForeignKeyGroup {
                group_key,
                edges: vec![edge],
            }),
        }
    }

    debug!(entities = index.by_child.len(), "Built foreign key index");
    index
}

/// ALTER TABLE statements of one child entity joined by newlines, inactive
/// constraints commented out. `None` when the entity has no constraints.
pub fn foreign_key_statements(groups: &[ForeignKeyGroup]) -> Option<String> {
    if groups.is_empty() {
        return None;
    }
    Some(
        groups
            .iter()
            .map(|g| comment_if_deactivated(&g.alter_table_statement(), g.is_activated()))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}
