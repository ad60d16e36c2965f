//! Unit tests for the type mapper and its inverse
//!
//! These tests go through the public `types` API: property schema → type
//! literal, and type literal → property schema → type literal.

use serde_json::{json, Value};

use rust_glue_ddl::model::{DataType, PropertySchema, Variants};
use rust_glue_ddl::types::{schema_of, TypeDescriptors, TypeDialect, TypeMapper};

fn map_with(dialect: TypeDialect, property: Value) -> String {
    let descriptors = TypeDescriptors::builtin();
    let mapper = TypeMapper::new(&descriptors, dialect);
    mapper.type_of(&PropertySchema::from_json(&property))
}

fn hive(property: Value) -> String {
    map_with(TypeDialect::HIVE, property)
}

fn reparse(dialect: TypeDialect, literal: &str) -> String {
    let descriptors = TypeDescriptors::builtin();
    let mapper = TypeMapper::new(&descriptors, dialect);
    mapper.type_of(&schema_of(literal))
}

// ============================================================================
// Forward mapping
// ============================================================================

#[test]
fn test_nested_struct_with_inactive_field() {
    let literal = hive(json!({
        "type": "struct",
        "properties": {
            "a": { "type": "numeric", "mode": "int" },
            "b": { "type": "text" },
            "c": { "type": "bool", "isActivated": false }
        }
    }));
    assert_eq!(literal, "struct<a: int, b: string /*, c: boolean */>");
}

#[test]
fn test_struct_with_only_inactive_fields_keeps_them_commented() {
    let literal = hive(json!({
        "type": "struct",
        "properties": {
            "a": { "type": "numeric", "mode": "int", "isActivated": false },
            "b": { "type": "text", "isActivated": false }
        }
    }));
    assert_eq!(literal, "struct<new_column: string /*, a: int, b: string */>");
    assert_eq!(reparse(TypeDialect::HIVE, &literal), "struct<new_column: string>");
}

#[test]
fn test_empty_struct_gets_placeholder_field() {
    assert_eq!(hive(json!({ "type": "struct" })), "struct<new_column: string>");
}

#[test]
fn test_struct_field_alias_and_comment() {
    let literal = hive(json!({
        "type": "struct",
        "properties": { "a": { "type": "text", "code": "alias", "comments": "it's" } }
    }));
    assert_eq!(literal, "struct<alias: string COMMENT 'it\\'s'>");
}

#[test]
fn test_set_depends_on_dialect() {
    let property = json!({ "type": "set", "items": { "type": "numeric", "mode": "bigint" } });
    assert_eq!(hive(property.clone()), "array<bigint>");
    assert_eq!(map_with(TypeDialect::GLUE, property), "set<bigint>");
}

#[test]
fn test_multi_type_union_depends_on_dialect() {
    let property = json!({ "type": ["string", "number"] });
    assert_eq!(hive(property.clone()), "uniontype<string,int>");
    assert_eq!(map_with(TypeDialect::GLUE, property), "union<string,int>");
}

#[test]
fn test_map_value_and_key() {
    assert_eq!(
        hive(json!({
            "type": "map",
            "keySubtype": "varchar",
            "properties": { "v": { "type": "array", "items": { "type": "text" } } }
        })),
        "map<varchar(255), array<string>>"
    );
}

#[test]
fn test_one_of_union_via_mapper() {
    let descriptors = TypeDescriptors::builtin();
    let mapper = TypeMapper::new(&descriptors, TypeDialect::HIVE);
    let variants = Variants::from_json(&json!({
        "oneOf": [
            { "properties": { "v": { "type": "text" }, "only": { "type": "bool" } } },
            { "properties": { "v": { "type": "numeric", "mode": "double" } } }
        ]
    }));
    assert_eq!(
        mapper.variant_unions(&variants),
        vec![
            ("v".to_string(), "uniontype<string, double>".to_string()),
            ("only".to_string(), "uniontype<boolean>".to_string())
        ]
    );
}

// ============================================================================
// Inverse mapping
// ============================================================================

#[test]
fn test_primitive_literals_round_trip() {
    for literal in [
        "int",
        "bigint",
        "string",
        "boolean",
        "double",
        "timestamp",
        "varchar(20)",
        "char(3)",
        "decimal(10, 2)",
    ] {
        assert_eq!(reparse(TypeDialect::HIVE, literal), literal);
    }
}

#[test]
fn test_complex_literals_round_trip() {
    for literal in [
        "array<string>",
        "map<string, int>",
        "struct<a: int, b: array<struct<c: string>>>",
        "uniontype<int,string>",
    ] {
        assert_eq!(reparse(TypeDialect::HIVE, literal), literal);
    }
    assert_eq!(reparse(TypeDialect::GLUE, "set<int>"), "set<int>");
}

#[test]
fn test_map_key_literals_round_trip() {
    for key in ["string", "int", "char(255)", "varchar(255)", "bigint", "date", "boolean"] {
        let literal = format!("map<{}, string>", key);
        assert_eq!(reparse(TypeDialect::HIVE, &literal), literal);
        assert_eq!(reparse(TypeDialect::GLUE, &literal), literal);
    }
    assert_eq!(reparse(TypeDialect::HIVE, "map<boolean,int>"), "map<boolean, int>");
    assert_eq!(reparse(TypeDialect::HIVE, "map<decimal(10,2), int>"), "map<decimal(10, 2), int>");
}

#[test]
fn test_forward_map_keys_parse_back() {
    for (key_type, key_subtype, expected) in [
        ("text", "char", "map<char(255), int>"),
        ("text", "varchar", "map<varchar(255), int>"),
        ("numeric", "bigint", "map<bigint, int>"),
        ("text", "date", "map<date, int>"),
    ] {
        let literal = hive(json!({
            "type": "map",
            "keyType": key_type,
            "keySubtype": key_subtype,
            "properties": { "v": { "type": "numeric", "mode": "int" } }
        }));
        assert_eq!(literal, expected);
        assert_eq!(reparse(TypeDialect::HIVE, &literal), literal);
    }
}

#[test]
fn test_escaped_comments_round_trip() {
    let literal = hive(json!({
        "type": "struct",
        "properties": {
            "a": { "type": "numeric", "mode": "int", "comments": "it's" },
            "b": { "type": "text", "comments": "back\\slash" }
        }
    }));
    assert_eq!(literal, r"struct<a: int COMMENT 'it\'s', b: string COMMENT 'back\\slash'>");
    assert_eq!(reparse(TypeDialect::HIVE, &literal), literal);

    match schema_of(r"struct<a: int COMMENT 'it\'s'>").data_type {
        DataType::Struct { properties, .. } => {
            assert_eq!(properties[0].1.comment.as_deref(), Some("it's"));
        }
        other => panic!("Expected struct, got {:?}", other),
    }
}

#[test]
fn test_inverse_normalizes_spelling() {
    assert_eq!(reparse(TypeDialect::HIVE, "decimal"), "decimal(9, 0)");
    assert_eq!(reparse(TypeDialect::HIVE, "INTEGER"), "int");
    assert_eq!(reparse(TypeDialect::HIVE, "map<string,array<int>>"), "map<string, array<int>>");
    assert_eq!(reparse(TypeDialect::HIVE, "union<int,string>"), "uniontype<int,string>");
}

#[test]
fn test_inactive_struct_fields_are_dropped_on_inverse() {
    assert_eq!(
        reparse(TypeDialect::HIVE, "struct<a: int /*, c: boolean */>"),
        "struct<a: int>"
    );
}

#[test]
fn test_malformed_literal_becomes_string() {
    let schema = schema_of("map<int>");
    assert!(matches!(schema.data_type, DataType::Text { .. }));
    assert_eq!(reparse(TypeDialect::HIVE, "struct<"), "string");
}
