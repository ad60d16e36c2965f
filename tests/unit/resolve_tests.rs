//! Unit tests for column, key and foreign-key resolution

use serde_json::{json, Value};

use rust_glue_ddl::model::{ContainerBundle, SortOrder, TableSchema};
use rust_glue_ddl::resolve::{
    build_foreign_key_index, foreign_key_statements, resolve_columns, resolve_key_names,
    IdNameTable,
};
use rust_glue_ddl::types::{TypeDescriptors, TypeDialect, TypeMapper};

fn table_with(schema: Value, entity: Value) -> TableSchema {
    TableSchema::from_documents(&schema, &[entity])
}

// ============================================================================
// Key names
// ============================================================================

#[test]
fn test_key_ids_resolve_to_current_names() {
    let schema = json!({ "properties": {
        "id": { "type": "numeric", "mode": "int", "GUID": "g-id", "code": "order_id" },
        "dt": { "type": "date", "GUID": "g-dt", "compositePartitionKey": true },
        "region": { "type": "text", "GUID": "g-region" }
    } });
    let table = table_with(
        schema.clone(),
        json!({
            "primaryKey": [{ "keyId": "g-id" }],
            "compositePartitionKey": [{ "keyId": "g-region" }],
            "sortedByKey": [{ "keyId": "g-id", "type": "descending" }, { "keyId": "nowhere" }]
        }),
    );
    let descriptors = TypeDescriptors::builtin();
    let mapper = TypeMapper::new(&descriptors, TypeDialect::HIVE);
    let columns = resolve_columns(&table, &mapper);
    let keys = resolve_key_names(&table, &columns, &IdNameTable::build([&schema]));

    assert_eq!(keys.primary_keys, vec!["order_id"]);
    // Entity-level designations come first, property flags are appended
    assert_eq!(keys.partition, vec!["region", "dt"]);
    assert_eq!(keys.sorted_by, vec![("order_id".to_string(), SortOrder::Descending)]);
}

#[test]
fn test_key_by_name_survives_without_id() {
    let table = table_with(
        json!({ "properties": { "a": { "type": "text" } } }),
        json!({ "compositeClusteringKey": [{ "name": "a" }] }),
    );
    let descriptors = TypeDescriptors::builtin();
    let mapper = TypeMapper::new(&descriptors, TypeDialect::HIVE);
    let columns = resolve_columns(&table, &mapper);
    let keys = resolve_key_names(&table, &columns, &IdNameTable::default());
    assert_eq!(keys.clustering, vec!["a"]);
}

#[test]
fn test_id_names_follow_nested_paths() {
    let schema = json!({ "properties": {
        "address": {
            "type": "struct",
            "GUID": "addr",
            "properties": { "zip": { "type": "text", "GUID": "zip", "isActivated": false } }
        }
    } });
    let id_names = IdNameTable::build([&schema]);
    let path = vec!["addr".to_string(), "zip".to_string()];
    assert_eq!(id_names.name_by_path(&path), "address.zip");
    assert!(!id_names.path_activated(&path));
    assert!(id_names.path_activated(&path[..1]));
}

// ============================================================================
// Foreign keys
// ============================================================================

fn container(relationships: Value, parent_active: bool) -> ContainerBundle {
    serde_json::from_value(json!({
        "entities": ["p", "c"],
        "jsonSchema": {
            "p": { "properties": { "id": { "type": "text", "GUID": "p-id" } } },
            "c": { "properties": { "pid": { "type": "text", "GUID": "c-pid" } } }
        },
        "entityData": {
            "p": [{ "collectionName": "parent table", "isActivated": parent_active }],
            "c": [{ "collectionName": "child" }]
        },
        "relationships": relationships
    }))
    .unwrap()
}

fn edge(name: &str) -> Value {
    json!({
        "name": name,
        "parentCollection": "p",
        "childCollection": "c",
        "parentField": ["p", "p-id"],
        "childField": ["c", "c-pid"]
    })
}

#[test]
fn test_foreign_keys_keyed_by_child_entity() {
    let bundle = container(json!([edge("fk a"), edge("fk_b")]), true);
    let documents = bundle.documents().unwrap();
    let index = build_foreign_key_index(&bundle.relationships, &documents, true);

    assert!(index.groups_for("p").is_empty());
    let groups = index.groups_for("c");
    assert_eq!(groups.len(), 2);
    assert_eq!(
        foreign_key_statements(groups).unwrap(),
        "ALTER TABLE child ADD CONSTRAINT fk_a FOREIGN KEY (pid) REFERENCES parent_table(id);\n\
         ALTER TABLE child ADD CONSTRAINT fk_b FOREIGN KEY (pid) REFERENCES parent_table(id);"
    );
}

#[test]
fn test_inactive_parent_comments_constraint() {
    let bundle = container(json!([edge("fk")]), false);
    let documents = bundle.documents().unwrap();
    let index = build_foreign_key_index(&bundle.relationships, &documents, true);
    assert!(foreign_key_statements(index.groups_for("c"))
        .unwrap()
        .starts_with("-- ALTER TABLE child"));
}

#[test]
fn test_inactive_database_comments_constraint() {
    let bundle = container(json!([edge("fk")]), true);
    let documents = bundle.documents().unwrap();
    let index = build_foreign_key_index(&bundle.relationships, &documents, false);
    assert!(!index.groups_for("c")[0].is_activated());
}

#[test]
fn test_relationship_to_unknown_entity_is_skipped() {
    let mut unknown = edge("fk");
    unknown["parentCollection"] = json!("ghost");
    let bundle = container(json!([unknown]), true);
    let documents = bundle.documents().unwrap();
    let index = build_foreign_key_index(&bundle.relationships, &documents, true);
    assert!(index.is_empty());
    assert_eq!(foreign_key_statements(index.groups_for("c")), None);
}
