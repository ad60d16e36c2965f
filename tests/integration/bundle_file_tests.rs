//! Bundle file loading tests

use std::io::Write;

use serde_json::json;
use tempfile::NamedTempFile;

use rust_glue_ddl::model::read_file_with_encoding_fallback;
use rust_glue_ddl::{
    generate_container_script, generate_script, load_bundle, ContainerBundle, GlueDdlError,
    SchemaBundle, ScriptTarget,
};

use crate::common::{bundle_file, hive_options};

#[test]
fn test_load_entity_bundle_from_file() {
    let file = bundle_file(&json!({
        "jsonSchema": "{\"title\": \"t\", \"properties\": {\"a\": {\"type\": \"text\"}}}",
        "containerData": [{ "name": "db" }],
        "options": hive_options()
    }));

    let bundle: SchemaBundle = load_bundle(file.path()).unwrap();
    assert_eq!(
        generate_script(&bundle).unwrap(),
        "CREATE DATABASE IF NOT EXISTS db;\n\nCREATE TABLE IF NOT EXISTS db.t (\n    a string\n);"
    );
}

#[test]
fn test_target_override_on_loaded_bundle() {
    let file = bundle_file(&json!({
        "entities": ["e"],
        "jsonSchema": { "e": { "properties": { "a": { "type": "text" } } } },
        "entityData": { "e": [{ "collectionName": "t" }] },
        "containerData": [{ "name": "db" }]
    }));

    let mut bundle: ContainerBundle = load_bundle(file.path()).unwrap();
    assert!(generate_container_script(&bundle)
        .unwrap()
        .starts_with("aws glue create-database"));

    bundle.options = bundle.options.with_target(ScriptTarget::HiveQl);
    assert!(generate_container_script(&bundle)
        .unwrap()
        .starts_with("CREATE DATABASE IF NOT EXISTS db;"));
}

#[test]
fn test_windows_1252_bundle_is_decoded() {
    let mut file = NamedTempFile::with_suffix(".json").unwrap();
    // "café" with 0xE9 for é
    file.write_all(b"{\"jsonSchema\": {\"title\": \"caf\xE9\"}}").unwrap();
    file.flush().unwrap();

    let text = read_file_with_encoding_fallback(file.path()).unwrap();
    assert!(text.contains("café"));
    let bundle: SchemaBundle = load_bundle(file.path()).unwrap();
    assert!(generate_script(&bundle).unwrap().contains("café"));
}

#[test]
fn test_missing_bundle_file() {
    let err = load_bundle::<SchemaBundle>(std::path::Path::new("/nonexistent/bundle.json"))
        .unwrap_err();
    assert!(matches!(err, GlueDdlError::BundleRead { .. }));
}

#[test]
fn test_malformed_bundle_file() {
    let mut file = NamedTempFile::with_suffix(".json").unwrap();
    file.write_all(b"{ \"jsonSchema\": ").unwrap();
    file.flush().unwrap();

    let err = load_bundle::<SchemaBundle>(file.path()).unwrap_err();
    assert!(matches!(err, GlueDdlError::DocumentParse { .. }));
}
