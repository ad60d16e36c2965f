//! Catalog boundary tests
//!
//! These tests drive the catalog entry points against an in-memory catalog.

use pretty_assertions::assert_eq;
use serde_json::json;

use rust_glue_ddl::glue::{
    CatalogColumn, CatalogTable, Classification, SortColumn, StorageDescriptor,
};
use rust_glue_ddl::{
    apply_to_instance, generate_container_script, generate_script, get_db_collections_data,
    get_db_collections_names, test_connection, CollectionSelection, ConnectionInfo, GlueDdlError,
};

use crate::common::{
    connection_info, glue_options, hive_options, orders_bundle, shop_bundle, FakeCatalog,
    FakeConnector,
};

fn table(database: &str, name: &str, columns: &[(&str, &str)]) -> CatalogTable {
    CatalogTable {
        name: name.to_string(),
        database_name: database.to_string(),
        storage_descriptor: StorageDescriptor {
            columns: columns
                .iter()
                .map(|(name, column_type)| CatalogColumn {
                    name: name.to_string(),
                    column_type: column_type.to_string(),
                    comment: None,
                })
                .collect(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn selection(database: &str, tables: &[&str]) -> CollectionSelection {
    serde_json::from_value(json!({
        "dataBaseNames": [database],
        "collections": { database: tables }
    }))
    .unwrap()
}

// ============================================================================
// applyToInstance
// ============================================================================

#[test]
fn test_apply_creates_database_then_table() {
    let connector = FakeConnector::new(FakeCatalog::default());
    let script = generate_script(&orders_bundle(glue_options())).unwrap();

    apply_to_instance(&connector, &script, &connection_info()).unwrap();

    assert_eq!(connector.catalog.created_databases(), vec!["sales"]);
    assert_eq!(
        connector.catalog.created_tables(),
        vec![("sales".to_string(), "orders".to_string())]
    );
}

#[test]
fn test_apply_container_script() {
    let connector = FakeConnector::new(FakeCatalog::default());
    let script = generate_container_script(&shop_bundle(glue_options(), true)).unwrap();

    apply_to_instance(&connector, &script, &connection_info()).unwrap();

    let mut tables = connector.catalog.created_tables();
    tables.sort();
    assert_eq!(
        tables,
        vec![
            ("shop".to_string(), "customers".to_string()),
            ("shop".to_string(), "orders".to_string())
        ]
    );
}

#[test]
fn test_apply_empty_script() {
    let connector = FakeConnector::new(FakeCatalog::default());
    let err = apply_to_instance(&connector, "  \n", &connection_info()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GlueDdlError>(),
        Some(GlueDdlError::EmptyScript)
    ));
}

#[test]
fn test_apply_hive_script_is_unsupported() {
    let connector = FakeConnector::new(FakeCatalog::default());
    let script = generate_script(&orders_bundle(hive_options())).unwrap();

    let err = apply_to_instance(&connector, &script, &connection_info()).unwrap_err();
    assert_eq!(err.to_string(), "HiveQL is not supported for this operation");
    assert!(connector.catalog.created_databases().is_empty());
}

#[test]
fn test_apply_reports_catalog_failure() {
    let catalog = FakeCatalog::default();
    catalog
        .created
        .lock()
        .unwrap()
        .databases
        .push("sales".to_string());
    let connector = FakeConnector::new(catalog);
    let script = generate_script(&orders_bundle(glue_options())).unwrap();

    let err = apply_to_instance(&connector, &script, &connection_info()).unwrap_err();
    match err.downcast_ref::<GlueDdlError>() {
        Some(GlueDdlError::Catalog { operation, message }) => {
            assert_eq!(operation, "CreateDatabase");
            assert!(message.contains("sales"));
        }
        other => panic!("Expected catalog error, got {:?}", other),
    }
    assert!(connector.catalog.created_tables().is_empty());
}

// ============================================================================
// testConnection / getDbCollectionsNames
// ============================================================================

#[test]
fn test_connection_succeeds() {
    let connector = FakeConnector::new(FakeCatalog::default().with_database("sales"));
    test_connection(&connector, &connection_info()).unwrap();
}

#[test]
fn test_connection_rejected() {
    let connector = FakeConnector::new(FakeCatalog::default());
    let err = test_connection(&connector, &ConnectionInfo::default()).unwrap_err();
    assert!(err.to_string().contains("Connect"));
}

#[test]
fn test_connection_listing_failure() {
    let connector = FakeConnector::new(FakeCatalog {
        fail_listing: true,
        ..Default::default()
    });
    let err = test_connection(&connector, &connection_info()).unwrap_err();
    assert!(err.to_string().contains("throttled"));
}

#[test]
fn test_db_collections_names() {
    let catalog = FakeCatalog::default()
        .with_table(table("sales", "orders", &[]))
        .with_table(table("sales", "customers", &[]))
        .with_database("empty");
    let connector = FakeConnector::new(catalog);

    let names = get_db_collections_names(&connector, &connection_info()).unwrap();
    assert_eq!(
        serde_json::to_value(&names).unwrap(),
        json!([
            { "dbName": "sales", "dbCollections": ["orders", "customers"], "isEmpty": false },
            { "dbName": "empty", "dbCollections": [], "isEmpty": true }
        ])
    );
}

// ============================================================================
// getDbCollectionsData
// ============================================================================

#[test]
fn test_db_collections_data_reverse_maps_tables() {
    let mut events = table("logs", "events", &[("id", "bigint"), ("tags", "array<string>")]);
    events.partition_keys = vec![CatalogColumn {
        name: "dt".to_string(),
        column_type: "date".to_string(),
        comment: None,
    }];
    events.parameters = serde_json::from_value(json!({ "classification": "json" })).unwrap();
    events.storage_descriptor.bucket_columns = vec!["id".to_string()];
    events.storage_descriptor.sort_columns = vec![SortColumn {
        column: "id".to_string(),
        sort_order: 0,
    }];
    let connector = FakeConnector::new(FakeCatalog::default().with_table(events));

    let tables =
        get_db_collections_data(&connector, &connection_info(), &selection("logs", &["events"]))
            .unwrap();
    assert_eq!(tables.len(), 1);

    let reversed = &tables[0];
    assert_eq!(reversed.entity_level.classification, Classification::Json);
    assert_eq!(reversed.entity_level.composite_clustering_key, vec!["id"]);
    assert_eq!(reversed.entity_level.sorted_by_key[0].order, "descending");

    let document = serde_json::to_value(reversed).unwrap();
    assert_eq!(document["dbName"], json!("logs"));
    assert_eq!(document["collectionName"], json!("events"));
    assert_eq!(document["documents"], json!([]));
    assert_eq!(document["entityLevel"]["classification"], json!("JSON"));
    assert_eq!(document["entityLevel"]["storedAsTable"], json!("input/output format"));
    let properties = &document["validation"]["jsonSchema"]["properties"];
    assert_eq!(properties["tags"]["type"], json!("array"));
    assert_eq!(properties["tags"]["items"]["type"], json!("text"));
    assert_eq!(properties["dt"]["type"], json!("date"));
}

#[test]
fn test_db_collections_data_skips_failing_tables() {
    let catalog = FakeCatalog {
        failing_tables: vec!["broken".to_string()],
        ..Default::default()
    }
    .with_table(table("db", "a", &[("x", "int")]))
    .with_table(table("db", "broken", &[]))
    .with_table(table("db", "b", &[("y", "string")]));
    let connector = FakeConnector::new(catalog);

    let tables = get_db_collections_data(
        &connector,
        &connection_info(),
        &selection("db", &["a", "broken", "missing", "b"]),
    )
    .unwrap();
    let names: Vec<&str> = tables.iter().map(|t| t.collection_name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_generated_table_reverses_to_same_columns() {
    let connector = FakeConnector::new(FakeCatalog::default());
    let script = generate_script(&orders_bundle(glue_options())).unwrap();
    apply_to_instance(&connector, &script, &connection_info()).unwrap();

    let request = &rust_glue_ddl::glue::api_statements(&script).unwrap().tables[0];
    let created = CatalogTable {
        name: request.table_input.name.clone(),
        database_name: request.database_name.clone(),
        storage_descriptor: request.table_input.storage_descriptor.clone(),
        ..Default::default()
    };
    let reversed = rust_glue_ddl::glue::map_table_data(&created);
    let properties = &reversed.validation.json_schema["properties"];
    assert_eq!(properties["id"]["mode"], json!("int"));
    assert_eq!(properties["total"]["precision"], json!(10));
    assert_eq!(properties["total"]["scale"], json!(2));
}
