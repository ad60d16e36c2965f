//! Reverse mapping: catalog table description → host schema document

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::model::SortOrder;
use crate::types::schema_of;

use super::payload::{CatalogColumn, CatalogTable, EXTERNAL_TABLE, SERDE_PATHS_PARAMETER};

/// Reserved table parameter naming the data format
pub const CLASSIFICATION_PARAMETER: &str = "classification";
/// Storage mode recorded for every reversed table
pub const REVERSED_STORED_AS: &str = "input/output format";

/// Data format declared by the `classification` parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Classification {
    Avro,
    #[serde(rename = "CSV")]
    Csv,
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "XML")]
    Xml,
    Parquet,
    #[serde(rename = "ORC")]
    Orc,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl std::str::FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "avro" => Ok(Classification::Avro),
            "csv" => Ok(Classification::Csv),
            "json" => Ok(Classification::Json),
            "xml" => Ok(Classification::Xml),
            "parquet" => Ok(Classification::Parquet),
            "orc" => Ok(Classification::Orc),
            _ => Err(format!("Unknown classification: {}", s)),
        }
    }
}

/// Displayable table parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableProperty {
    pub property_key: String,
    pub property_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortedKey {
    pub name: String,
    #[serde(rename = "type")]
    pub order: &'static str,
}

/// Entity-level attributes of a reversed table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityLevel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub external_table: bool,
    pub classification: Classification,
    pub table_properties: Vec<TableProperty>,
    pub composite_partition_key: Vec<String>,
    pub composite_clustering_key: Vec<String>,
    pub sorted_by_key: Vec<SortedKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_buckets: Option<i64>,
    pub stored_as_table: &'static str,
    #[serde(rename = "StoredAsSubDirectories", skip_serializing_if = "Option::is_none")]
    pub stored_as_sub_directories: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_format_classname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format_classname: Option<String>,
    #[serde(rename = "serDeLibrary", skip_serializing_if = "Option::is_none")]
    pub serde_library: Option<String>,
    pub parameter_paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReversedValidation {
    pub json_schema: Value,
}

/// A catalog table in the host's document shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReversedTable {
    pub db_name: String,
    pub collection_name: String,
    pub entity_level: EntityLevel,
    pub documents: Vec<Value>,
    pub validation: ReversedValidation,
}

fn parameter_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Split table parameters into the classification and the remaining pairs.
pub fn split_parameters(parameters: &Map<String, Value>) -> (Classification, Vec<TableProperty>) {
    let mut classification = Classification::Unknown;
    let mut properties = Vec::new();

    for (key, value) in parameters {
        if key == CLASSIFICATION_PARAMETER {
            classification = parameter_text(value).parse().unwrap_or_default();
        } else {
            properties.push(TableProperty {
                property_key: key.clone(),
                property_value: parameter_text(value),
            });
        }
    }

    (classification, properties)
}

/// Column schema documents keyed by column name, in column order.
fn column_properties<'a>(columns: impl Iterator<Item = &'a CatalogColumn>) -> Map<String, Value> {
    columns
        .map(|column| {
            let mut property = schema_of(&column.column_type).to_json();
            if let (Value::Object(map), Some(comment)) = (&mut property, &column.comment) {
                map.insert("comments".to_string(), json!(comment));
            }
            (column.name.clone(), property)
        })
        .collect()
}

pub fn map_table_data(table: &CatalogTable) -> ReversedTable {
    let storage = &table.storage_descriptor;
    let (classification, table_properties) = split_parameters(&table.parameters);

    let parameter_paths = storage
        .serde_info
        .parameters
        .get(SERDE_PATHS_PARAMETER)
        .map(parameter_text)
        .unwrap_or_default()
        .split(',')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    let properties =
        column_properties(storage.columns.iter().chain(table.partition_keys.iter()));

    ReversedTable {
        db_name: table.database_name.clone(),
        collection_name: table.name.clone(),
        entity_level: EntityLevel {
            description: table.description.clone(),
            external_table: table.table_type.as_deref() == Some(EXTERNAL_TABLE),
            classification,
            table_properties,
            composite_partition_key: table.partition_keys.iter().map(|c| c.name.clone()).collect(),
            composite_clustering_key: storage.bucket_columns.clone(),
            sorted_by_key: storage
                .sort_columns
                .iter()
                .map(|sort| SortedKey {
                    name: sort.column.clone(),
                    order: SortOrder::from_catalog_code(sort.sort_order).as_str(),
                })
                .collect(),
            compressed: storage.compressed,
            location: storage.location.clone(),
            num_buckets: storage.number_of_buckets,
            stored_as_table: REVERSED_STORED_AS,
            stored_as_sub_directories: storage.stored_as_sub_directories,
            input_format_classname: storage.input_format.clone(),
            output_format_classname: storage.output_format.clone(),
            serde_library: storage.serde_info.serialization_library.clone(),
            parameter_paths,
        },
        documents: Vec::new(),
        validation: ReversedValidation {
            json_schema: json!({ "properties": properties }),
        },
    }
}
