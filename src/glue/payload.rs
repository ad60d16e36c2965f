//! Catalog request and response shapes, and the forward payload mapping

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{DatabaseSchema, TableSchema};
use crate::resolve::{
    get_partitions_keys, key_name, resolve_columns, resolve_key_names, Column, IdNameTable,
};
use crate::types::TypeMapper;

/// Table type marker of external tables
pub const EXTERNAL_TABLE: &str = "EXTERNAL_TABLE";
/// Serde parameter carrying the comma-separated JSON paths
pub const SERDE_PATHS_PARAMETER: &str = "paths";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDatabaseRequest {
    pub database_input: DatabaseInput,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatabaseInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_uri: Option<String>,
}

/// Database entry of a `GetDatabases` listing
pub type CatalogDatabase = DatabaseInput;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTableRequest {
    pub database_name: String,
    pub table_input: TableInput,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub storage_descriptor: StorageDescriptor,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub partition_keys: Vec<CatalogColumn>,
    #[serde(default)]
    pub table_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageDescriptor {
    #[serde(default)]
    pub columns: Vec<CatalogColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_buckets: Option<i64>,
    #[serde(default)]
    pub serde_info: SerdeInfo,
    #[serde(default)]
    pub bucket_columns: Vec<String>,
    #[serde(default)]
    pub sort_columns: Vec<SortColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_as_sub_directories: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SerdeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialization_library: Option<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogColumn {
    pub name: String,
    #[serde(rename = "Type", default)]
    pub column_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SortColumn {
    pub column: String,
    pub sort_order: i32,
}

/// Table description as returned by `GetTable`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogTable {
    pub name: String,
    #[serde(default)]
    pub database_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_type: Option<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub partition_keys: Vec<CatalogColumn>,
    #[serde(default)]
    pub storage_descriptor: StorageDescriptor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetTableResponse {
    pub table: CatalogTable,
}

impl From<&Column> for CatalogColumn {
    fn from(column: &Column) -> Self {
        Self {
            name: column.name.clone(),
            column_type: column.data_type.clone(),
            comment: column.comment.clone(),
        }
    }
}

pub fn create_database_request(database: &DatabaseSchema) -> CreateDatabaseRequest {
    CreateDatabaseRequest {
        database_input: DatabaseInput {
            name: database.name.clone(),
            description: database.description.clone(),
            location_uri: database.location.clone(),
        },
    }
}

/// Table properties as catalog parameters; anything but a JSON object maps to none.
fn table_parameters(properties: Option<&str>) -> Map<String, Value> {
    match properties.map(serde_json::from_str::<Value>) {
        Some(Ok(Value::Object(map))) => map,
        _ => Map::new(),
    }
}

/// Build the `CreateTable` request of a table. Inactive columns are omitted.
pub fn create_table_request(
    mapper: &TypeMapper,
    database_name: &str,
    table: &TableSchema,
    id_names: &IdNameTable,
) -> CreateTableRequest {
    let columns = resolve_columns(table, mapper);
    let keys = resolve_key_names(table, &columns, id_names);
    let storage = &table.storage;
    let is_active = |name: &String| columns.is_activated(name);

    let data_columns = columns
        .without(&keys.partition)
        .filter(|c| c.is_activated)
        .map(CatalogColumn::from)
        .collect();
    let partition_keys = get_partitions_keys(&columns, &keys.partition)
        .iter()
        .filter(|c| c.is_activated)
        .map(CatalogColumn::from)
        .collect();

    let paths: Vec<String> = storage
        .parameter_paths
        .iter()
        .filter_map(|key| key_name(key, &columns, id_names))
        .collect();
    let mut serde_parameters = Map::new();
    serde_parameters.insert(SERDE_PATHS_PARAMETER.to_string(), Value::String(paths.join(",")));

    CreateTableRequest {
        database_name: database_name.to_string(),
        table_input: TableInput {
            name: table.name.clone(),
            description: table.comment.clone(),
            storage_descriptor: StorageDescriptor {
                columns: data_columns,
                location: storage.location.clone(),
                input_format: storage.input_format.clone(),
                output_format: storage.output_format.clone(),
                compressed: storage.compressed,
                number_of_buckets: storage.num_buckets.map(i64::from),
                serde_info: SerdeInfo {
                    serialization_library: storage.serde_library.clone(),
                    parameters: serde_parameters,
                },
                bucket_columns: keys.clustering.iter().filter(|n| is_active(n)).cloned().collect(),
                sort_columns: keys
                    .sorted_by
                    .iter()
                    .filter(|(name, _)| is_active(name))
                    .map(|(name, order)| SortColumn {
                        column: name.clone(),
                        sort_order: order.catalog_code(),
                    })
                    .collect(),
                stored_as_sub_directories: storage.stored_as_sub_directories,
            },
            parameters: table_parameters(storage.table_properties.as_deref()),
            partition_keys,
            table_type: if table.external_table {
                EXTERNAL_TABLE.to_string()
            } else {
                String::new()
            },
        },
    }
}
