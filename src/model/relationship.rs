//! Relationships between entities (foreign keys)

use serde::Deserialize;

/// A relationship edge from a child entity field to a parent entity field.
///
/// Field paths are lists of opaque ids; the first element is the owning
/// entity's id and the rest walk down to the referenced property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(default)]
    pub name: String,
    pub parent_collection: String,
    pub child_collection: String,
    #[serde(default)]
    pub parent_field: Vec<String>,
    #[serde(default)]
    pub child_field: Vec<String>,
    #[serde(default)]
    pub custom_properties: RelationshipProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipProperties {
    #[serde(default)]
    pub disable_no_validate: bool,
}

impl Relationship {
    /// Field path below the entity id.
    pub fn parent_path(&self) -> &[String] {
        self.parent_field.get(1..).unwrap_or(&[])
    }

    pub fn child_path(&self) -> &[String] {
        self.child_field.get(1..).unwrap_or(&[])
    }

    pub fn touches(&self, entity_id: &str) -> bool {
        self.parent_collection == entity_id || self.child_collection == entity_id
    }
}
