//! Script generation tests
//!
//! These tests run whole bundles through `generate_script` and
//! `generate_container_script` and compare the rendered scripts.

use pretty_assertions::assert_eq;
use serde_json::json;

use rust_glue_ddl::glue::api_statements;
use rust_glue_ddl::{generate_container_script, generate_script, ContainerBundle, SchemaBundle};

use crate::common::{glue_options, hive_options, orders_bundle, shop_bundle};

// ============================================================================
// Single entity
// ============================================================================

#[test]
fn test_entity_hive_script() {
    let script = generate_script(&orders_bundle(hive_options())).unwrap();
    assert_eq!(
        script,
        "CREATE DATABASE IF NOT EXISTS sales;\n\n\
         CREATE TABLE IF NOT EXISTS sales.orders (\n    \
         id int NOT NULL DISABLE NOVALIDATE,\n    \
         total decimal(10, 2)\n\
         );"
    );
}

#[test]
fn test_entity_glue_script_round_trips_payloads() {
    let script = generate_script(&orders_bundle(glue_options())).unwrap();
    assert!(script.starts_with("aws glue create-database '{"));
    assert!(script.contains("\n\naws glue create-table '{"));

    let statements = api_statements(&script).unwrap();
    assert_eq!(statements.databases.len(), 1);
    assert_eq!(statements.databases[0].database_input.name, "sales");

    let table = &statements.tables[0];
    assert_eq!(table.database_name, "sales");
    assert_eq!(table.table_input.name, "orders");
    let columns: Vec<(&str, &str)> = table
        .table_input
        .storage_descriptor
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c.column_type.as_str()))
        .collect();
    assert_eq!(columns, vec![("id", "int"), ("total", "decimal(10, 2)")]);
}

#[test]
fn test_custom_cli_tool() {
    let options = json!({ "targetScriptOptions": { "keyword": "awsCli" }, "cliTool": "glue-cli" });
    let script = generate_script(&orders_bundle(options)).unwrap();
    assert!(script.starts_with("glue-cli create-database"));
    assert_eq!(api_statements(&script).unwrap().tables.len(), 1);
}

#[test]
fn test_full_clause_order() {
    let bundle: SchemaBundle = serde_json::from_value(json!({
        "jsonSchema": {
            "properties": {
                "id": { "type": "numeric", "mode": "bigint", "GUID": "id" },
                "name": { "type": "text", "GUID": "name", "comments": "customer's name" },
                "dt": { "type": "date", "GUID": "dt" }
            }
        },
        "containerData": [{ "name": "logs" }],
        "entityData": [{
            "collectionName": "visits",
            "description": "raw visits",
            "externalTable": true,
            "compositePartitionKey": [{ "keyId": "dt" }],
            "compositeClusteringKey": [{ "keyId": "id" }],
            "sortedByKey": [{ "keyId": "id", "type": "descending" }],
            "numBuckets": 4,
            "skewedby": [{ "keyId": "name" }],
            "skewedOn": "('a', 'b')",
            "skewStoredAsDir": true,
            "storedAsTable": "textfile",
            "rowFormat": "delimited",
            "fieldsTerminatedBy": ",",
            "linesTerminatedBy": "\\n",
            "location": "s3://bucket/visits",
            "tableProperties": "{\"skip.header.line.count\": \"1\"}"
        }],
        "options": hive_options()
    }))
    .unwrap();

    let script = generate_script(&bundle).unwrap();
    assert_eq!(
        script,
        "CREATE DATABASE IF NOT EXISTS logs;\n\n\
         CREATE EXTERNAL TABLE IF NOT EXISTS logs.visits (\n    \
         id bigint,\n    \
         name string COMMENT 'customer\\'s name'\n\
         )\n\
         COMMENT 'raw visits'\n\
         PARTITIONED BY (dt date)\n\
         CLUSTERED BY (id)\n\
         SORTED BY (id DESC)\n\
         INTO 4 BUCKETS\n\
         SKEWED BY (name) ON ('a', 'b') STORED AS DIRECTORIES\n\
         ROW FORMAT DELIMITED\n    \
         FIELDS TERMINATED BY ','\n    \
         LINES TERMINATED BY '\\n'\n\
         STORED AS TEXTFILE\n\
         LOCATION \"s3://bucket/visits\"\n\
         TBLPROPERTIES ('skip.header.line.count'='1');"
    );
}

#[test]
fn test_inactive_table_is_fully_commented() {
    let bundle: SchemaBundle = serde_json::from_value(json!({
        "jsonSchema": { "properties": {
            "a": { "type": "text" },
            "b": { "type": "text", "isActivated": false }
        } },
        "containerData": [{ "name": "db" }],
        "entityData": [{ "collectionName": "t", "isActivated": false }],
        "options": hive_options()
    }))
    .unwrap();

    let script = generate_script(&bundle).unwrap();
    assert_eq!(
        script,
        "CREATE DATABASE IF NOT EXISTS db;\n\n\
         -- CREATE TABLE IF NOT EXISTS db.t (\n\
         --     a string,\n\
         --     b string\n\
         -- );"
    );
}

#[test]
fn test_inactive_partition_keys_comment_the_clause() {
    let bundle: SchemaBundle = serde_json::from_value(json!({
        "jsonSchema": { "properties": {
            "a": { "type": "text", "GUID": "a" },
            "p": { "type": "text", "GUID": "p", "isActivated": false }
        } },
        "containerData": [{ "name": "db" }],
        "entityData": [{ "collectionName": "t", "compositePartitionKey": [{ "keyId": "p" }] }],
        "options": hive_options()
    }))
    .unwrap();

    let script = generate_script(&bundle).unwrap();
    assert!(script.ends_with("\n)\n-- PARTITIONED BY (p string)\n;"));
}

#[test]
fn test_commented_last_clause_keeps_table_terminated() {
    let bundle: SchemaBundle = serde_json::from_value(json!({
        "jsonSchema": { "properties": {
            "a": { "type": "text", "GUID": "a" },
            "p": { "type": "text", "GUID": "p", "isActivated": false }
        } },
        "containerData": [{ "name": "db" }],
        "entityData": [
            { "collectionName": "t", "compositePartitionKey": [{ "keyId": "p" }] },
            { "SecIndxs": [{ "name": "ix", "SecIndxKey": [{ "keyId": "a" }] }] }
        ],
        "options": hive_options()
    }))
    .unwrap();

    let script = generate_script(&bundle).unwrap();
    let table = script
        .split("\n\n")
        .find(|statement| statement.starts_with("CREATE TABLE"))
        .unwrap();
    assert_eq!(
        table,
        "CREATE TABLE IF NOT EXISTS db.t (\n\
         \x20   a string\n\
         )\n\
         -- PARTITIONED BY (p string)\n\
         ;"
    );
    assert!(script.ends_with("\n;\n\nCREATE INDEX ix ON TABLE db.t (a) AS 'COMPACT';"));
}

#[test]
fn test_one_of_columns_become_unions() {
    let bundle: SchemaBundle = serde_json::from_value(json!({
        "jsonSchema": {
            "properties": { "id": { "type": "numeric", "mode": "int" } },
            "oneOf": [
                { "properties": { "value": { "type": "text" } } },
                { "properties": { "value": { "type": "numeric", "mode": "int" } } }
            ]
        },
        "containerData": [{ "name": "db" }],
        "entityData": [{ "collectionName": "t" }],
        "options": hive_options()
    }))
    .unwrap();

    let script = generate_script(&bundle).unwrap();
    assert!(script.contains("    id int,\n    value uniontype<string, int>\n);"));
}

#[test]
fn test_malformed_schema_document_is_an_error() {
    let bundle: SchemaBundle = serde_json::from_value(json!({
        "jsonSchema": "{ not json",
        "options": hive_options()
    }))
    .unwrap();

    let err = generate_script(&bundle).unwrap_err();
    assert!(err.to_string().contains("jsonSchema"));
}

// ============================================================================
// Whole database
// ============================================================================

#[test]
fn test_container_script_with_alter_table_foreign_keys() {
    let script = generate_container_script(&shop_bundle(hive_options(), true)).unwrap();
    assert_eq!(
        script,
        "CREATE DATABASE IF NOT EXISTS shop;\n\n\
         CREATE TABLE IF NOT EXISTS shop.customers (\n    \
         id int\n\
         );\n\n\
         CREATE TABLE IF NOT EXISTS shop.orders (\n    \
         id int,\n    \
         customer_id int\n\
         );\n\n\
         ALTER TABLE orders ADD CONSTRAINT fk_customer FOREIGN KEY (customer_id) REFERENCES customers(id) DISABLE NOVALIDATE;"
    );
}

#[test]
fn test_container_script_with_inline_foreign_keys() {
    let options = json!({
        "targetScriptOptions": { "keyword": "hiveQl" },
        "foreignKeys": "inline"
    });
    let script = generate_container_script(&shop_bundle(options, true)).unwrap();
    assert!(script.ends_with(
        "CREATE TABLE IF NOT EXISTS shop.orders (\n    \
         id int,\n    \
         customer_id int,\n    \
         CONSTRAINT fk_customer FOREIGN KEY (customer_id) REFERENCES customers(id) DISABLE NOVALIDATE\n\
         );"
    ));
    assert!(!script.contains("ALTER TABLE"));
}

#[test]
fn test_foreign_key_on_inactive_column_is_commented() {
    let script = generate_container_script(&shop_bundle(hive_options(), false)).unwrap();
    assert!(script.contains("    id int\n    -- customer_id int\n);"));
    assert!(script.ends_with(
        "\n\n-- ALTER TABLE orders ADD CONSTRAINT fk_customer FOREIGN KEY (customer_id) \
         REFERENCES customers(id) DISABLE NOVALIDATE;"
    ));
}

#[test]
fn test_composite_foreign_key_is_grouped() {
    let bundle: ContainerBundle = serde_json::from_value(json!({
        "entities": ["p", "c"],
        "jsonSchema": {
            "p": { "properties": {
                "a": { "type": "text", "GUID": "pa" },
                "b": { "type": "text", "GUID": "pb" }
            } },
            "c": { "properties": {
                "x": { "type": "text", "GUID": "cx" },
                "y": { "type": "text", "GUID": "cy" }
            } }
        },
        "entityData": {
            "p": [{ "collectionName": "parent" }],
            "c": [{ "collectionName": "child" }]
        },
        "relationships": [
            { "name": "fk", "parentCollection": "p", "childCollection": "c",
              "parentField": ["p", "pa"], "childField": ["c", "cx"] },
            { "name": "fk", "parentCollection": "p", "childCollection": "c",
              "parentField": ["p", "pb"], "childField": ["c", "cy"] }
        ],
        "containerData": [{ "name": "db" }],
        "options": hive_options()
    }))
    .unwrap();

    let script = generate_container_script(&bundle).unwrap();
    assert!(script.ends_with(
        "ALTER TABLE child ADD CONSTRAINT fk FOREIGN KEY (x, y) REFERENCES parent(a, b);"
    ));
}

#[test]
fn test_container_glue_script_has_one_table_per_entity() {
    let script = generate_container_script(&shop_bundle(glue_options(), true)).unwrap();
    let statements = api_statements(&script).unwrap();
    let tables: Vec<&str> = statements
        .tables
        .iter()
        .map(|t| t.table_input.name.as_str())
        .collect();
    assert_eq!(tables, vec!["customers", "orders"]);
    assert!(!script.contains("ALTER TABLE"));
}

#[test]
fn test_container_glue_script_omits_inactive_columns() {
    let script = generate_container_script(&shop_bundle(glue_options(), false)).unwrap();
    let statements = api_statements(&script).unwrap();
    let orders = &statements.tables[1].table_input;
    let names: Vec<&str> = orders
        .storage_descriptor
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["id"]);
}

#[test]
fn test_entity_with_malformed_schema_is_dropped() {
    let bundle: ContainerBundle = serde_json::from_value(json!({
        "entities": ["bad", "good"],
        "jsonSchema": {
            "bad": "{ nope",
            "good": { "properties": { "a": { "type": "text" } } }
        },
        "entityData": { "good": [{ "collectionName": "good" }] },
        "containerData": [{ "name": "db" }],
        "options": hive_options()
    }))
    .unwrap();

    let script = generate_container_script(&bundle).unwrap();
    assert_eq!(
        script,
        "CREATE DATABASE IF NOT EXISTS db;\n\n\
         CREATE TABLE IF NOT EXISTS db.good (\n    \
         a string\n\
         );"
    );
}
