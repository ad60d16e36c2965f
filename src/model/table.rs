//! Table, database and index schemas built from host documents

use serde_json::Value;

use super::json::{array_field, bool_field, first_str_field, str_field, tab, u32_field};
use super::property::{properties_from_json, Properties, Variants};

/// Reference to a column, by opaque id or by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRef {
    pub key_id: Option<String>,
    pub name: Option<String>,
}

impl KeyRef {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            key_id: None,
            name: Some(name.into()),
        }
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            key_id: Some(id.into()),
            name: None,
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) if !name.is_empty() => Some(KeyRef::by_name(name.clone())),
            Value::Object(_) => {
                let key = KeyRef {
                    key_id: str_field(value, "keyId"),
                    name: first_str_field(value, &["name", "code"]),
                };
                (key.key_id.is_some() || key.name.is_some()).then_some(key)
            }
            _ => None,
        }
    }

    fn list_from_json(value: &Value, field: &str) -> Vec<KeyRef> {
        array_field(value, field)
            .iter()
            .filter_map(KeyRef::from_json)
            .collect()
    }
}

/// Sort direction of a sorted-by key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }

    /// Numeric code used by the catalog (1 ascending, 0 descending)
    pub fn catalog_code(&self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => 0,
        }
    }

    pub fn from_catalog_code(code: i32) -> Self {
        if code == 1 {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ascending" | "asc" => Ok(SortOrder::Ascending),
            "descending" | "desc" => Ok(SortOrder::Descending),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

/// Sorted-by key entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub key: KeyRef,
    pub order: SortOrder,
}

/// Key designations declared at entity level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyDesignations {
    pub primary_keys: Vec<KeyRef>,
    pub partition: Vec<KeyRef>,
    pub clustering: Vec<KeyRef>,
    pub sorted_by: Vec<SortKey>,
    pub skewed_by: Vec<KeyRef>,
}

/// Row format declaration (only meaningful for text-file storage)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFormat {
    Delimited {
        fields_terminated_by: Option<String>,
        fields_escaped_by: Option<String>,
        collection_items_terminated_by: Option<String>,
        map_keys_terminated_by: Option<String>,
        lines_terminated_by: Option<String>,
        null_defined_as: Option<String>,
    },
    SerDe,
}

/// Physical storage attributes of a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageAttributes {
    pub location: Option<String>,
    /// `textfile`, `ORC`, `input/output format`, `by`, ...
    pub stored_as: Option<String>,
    pub row_format: Option<RowFormat>,
    pub serde_library: Option<String>,
    pub serde_properties: Option<String>,
    pub input_format: Option<String>,
    pub output_format: Option<String>,
    pub compressed: Option<bool>,
    pub num_buckets: Option<u32>,
    pub skewed_on: Option<String>,
    pub skew_stored_as_dir: bool,
    pub stored_as_sub_directories: Option<bool>,
    pub table_properties: Option<String>,
    pub parameter_paths: Vec<KeyRef>,
}

/// Secondary index declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSchema {
    pub name: String,
    pub keys: Vec<KeyRef>,
    pub handler: Option<String>,
    pub in_table: Option<String>,
    pub comment: Option<String>,
    pub with_deferred_rebuild: bool,
    pub properties: Option<String>,
    pub is_activated: bool,
}

/// One entity (table) with everything needed to render it
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub id: Option<String>,
    pub name: String,
    pub comment: Option<String>,
    pub properties: Properties,
    pub required: Vec<String>,
    pub variants: Variants,
    pub keys: KeyDesignations,
    pub storage: StorageAttributes,
    pub indexes: Vec<IndexSchema>,
    pub is_activated: bool,
    pub external_table: bool,
    pub temporary_table: bool,
    pub select_statement: Option<String>,
}

impl TableSchema {
    /// Build a table from its JSON schema document and entity-level tabs.
    ///
    /// Entity tab 0 holds table attributes and key lists, tab 1 holds indexes.
    /// Attributes missing from the entity tab are looked up on the schema
    /// document itself.
    pub fn from_documents(json_schema: &Value, entity_tabs: &[Value]) -> Self {
        let entity = tab(entity_tabs, 0);
        let attr = |key: &str| str_field(entity, key).or_else(|| str_field(json_schema, key));
        let flag = |key: &str| bool_field(entity, key).or_else(|| bool_field(json_schema, key));
        let keys_of = |field: &str| {
            let from_entity = KeyRef::list_from_json(entity, field);
            if from_entity.is_empty() {
                KeyRef::list_from_json(json_schema, field)
            } else {
                from_entity
            }
        };

        let name = first_str_field(entity, &["code", "collectionName", "name"])
            .or_else(|| first_str_field(json_schema, &["code", "collectionName", "title", "name"]))
            .unwrap_or_default();

        let row_format = match attr("rowFormat").as_deref() {
            Some("delimited") => Some(RowFormat::Delimited {
                fields_terminated_by: attr("fieldsTerminatedBy"),
                fields_escaped_by: attr("fieldsescapedBy"),
                collection_items_terminated_by: attr("collectionItemsTerminatedBy"),
                map_keys_terminated_by: attr("mapKeysTerminatedBy"),
                lines_terminated_by: attr("linesTerminatedBy"),
                null_defined_as: attr("nullDefinedAs"),
            }),
            Some(format) if format.eq_ignore_ascii_case("serde") => Some(RowFormat::SerDe),
            _ => None,
        };

        let sorted_by = {
            let source = if array_field(entity, "sortedByKey").is_empty() {
                json_schema
            } else {
                entity
            };
            array_field(source, "sortedByKey")
                .iter()
                .filter_map(|entry| {
                    let key = KeyRef::from_json(entry)?;
                    let order = str_field(entry, "type")
                        .and_then(|t| t.parse().ok())
                        .unwrap_or_default();
                    Some(SortKey { key, order })
                })
                .collect()
        };

        Self {
            id: str_field(json_schema, "GUID"),
            name,
            comment: first_str_field(entity, &["comments", "description"])
                .or_else(|| first_str_field(json_schema, &["comments", "description"])),
            properties: properties_from_json(json_schema),
            required: array_field(json_schema, "required")
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            variants: Variants::from_json(json_schema),
            keys: KeyDesignations {
                primary_keys: keys_of("primaryKey"),
                partition: keys_of("compositePartitionKey"),
                clustering: keys_of("compositeClusteringKey"),
                sorted_by,
                skewed_by: keys_of("skewedby"),
            },
            storage: StorageAttributes {
                location: attr("location"),
                stored_as: attr("storedAsTable"),
                row_format,
                serde_library: attr("serDeLibrary"),
                serde_properties: attr("serDeProperties"),
                input_format: attr("inputFormatClassname"),
                output_format: attr("outputFormatClassname"),
                compressed: flag("compressed"),
                num_buckets: u32_field(entity, "numBuckets")
                    .or_else(|| u32_field(json_schema, "numBuckets")),
                skewed_on: attr("skewedOn"),
                skew_stored_as_dir: flag("skewStoredAsDir").unwrap_or(false),
                stored_as_sub_directories: flag("StoredAsSubDirectories"),
                table_properties: attr("tableProperties"),
                parameter_paths: keys_of("parameterPaths"),
            },
            indexes: array_field(tab(entity_tabs, 1), "SecIndxs")
                .iter()
                .map(IndexSchema::from_json)
                .collect(),
            is_activated: flag("isActivated").unwrap_or(true),
            external_table: flag("externalTable").unwrap_or(false),
            temporary_table: flag("temporaryTable").unwrap_or(false),
            select_statement: attr("selectStatement"),
        }
    }

    pub fn is_required(&self, property_key: &str) -> bool {
        self.required.iter().any(|r| r == property_key)
    }
}

impl IndexSchema {
    fn from_json(value: &Value) -> Self {
        Self {
            name: str_field(value, "name").unwrap_or_default(),
            keys: KeyRef::list_from_json(value, "SecIndxKey"),
            handler: str_field(value, "SecIndxHandler"),
            in_table: str_field(value, "SecIndxTable"),
            comment: str_field(value, "SecIndxComments"),
            with_deferred_rebuild: bool_field(value, "SecIndxWithDeferredRebuild").unwrap_or(false),
            properties: str_field(value, "SecIndxProperties"),
            is_activated: bool_field(value, "isActivated").unwrap_or(true),
        }
    }
}

/// Database (container) attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSchema {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub db_properties: Option<String>,
    pub is_activated: bool,
}

impl Default for DatabaseSchema {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            location: None,
            db_properties: None,
            is_activated: true,
        }
    }
}

impl DatabaseSchema {
    /// Build from the container tabs; only tab 0 carries attributes.
    pub fn from_tabs(container_tabs: &[Value]) -> Self {
        let data = tab(container_tabs, 0);
        Self {
            name: first_str_field(data, &["code", "name"]).unwrap_or_default(),
            description: first_str_field(data, &["description", "comments"]),
            location: str_field(data, "location"),
            db_properties: str_field(data, "dbProperties"),
            is_activated: bool_field(data, "isActivated").unwrap_or(true),
        }
    }
}
