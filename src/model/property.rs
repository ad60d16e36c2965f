//! Property schema: the recursive column/field description.

use serde_json::{json, Map, Value};

use super::json::{array_field, bool_field, first_str_field, object_entries, str_field, u32_field};

/// Ordered name → property mapping (document order is significant).
pub type Properties = Vec<(String, PropertySchema)>;

/// A single property node of an entity schema
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    /// Opaque identifier (`GUID`) used by relationships and key references
    pub id: Option<String>,
    /// Explicit alias that overrides the property key as the column name
    pub code: Option<String>,
    pub comment: Option<String>,
    pub is_activated: bool,
    pub data_type: DataType,
    pub constraints: PropertyConstraints,
    pub keys: KeyFlags,
}

/// Column constraints carried verbatim from the property
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyConstraints {
    pub unique: bool,
    pub check: Option<String>,
    pub default_value: Option<String>,
}

/// Key designations flagged directly on a property
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyFlags {
    pub primary_key: bool,
    pub partition_key: bool,
    pub clustering_key: bool,
}

/// One-of / all-of alternative shapes attached to a container node.
///
/// Each one-of variant contributes its fields; each all-of member contributes
/// only through its own one-of block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variants {
    pub one_of: Vec<Properties>,
    pub all_of: Vec<Variants>,
}

impl Variants {
    pub fn is_empty(&self) -> bool {
        self.one_of.is_empty() && self.all_of.is_empty()
    }
}

/// Character string flavour of a text property
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextMode {
    #[default]
    String,
    Char,
    Varchar,
}

impl TextMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextMode::String => "string",
            TextMode::Char => "char",
            TextMode::Varchar => "varchar",
        }
    }
}

impl std::str::FromStr for TextMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" => Ok(TextMode::String),
            "char" => Ok(TextMode::Char),
            "varchar" => Ok(TextMode::Varchar),
            _ => Err(format!("Unknown text mode: {}", s)),
        }
    }
}

/// Item description of an array or set
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Items {
    #[default]
    None,
    Single(Box<PropertySchema>),
    List(Vec<PropertySchema>),
}

impl Items {
    /// The item schema that drives the element type: first of a list, or the single item.
    pub fn first(&self) -> Option<&PropertySchema> {
        match self {
            Items::None => None,
            Items::Single(item) => Some(item),
            Items::List(items) => items.first(),
        }
    }
}

/// Closed set of property kinds
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    Text {
        mode: TextMode,
        max_length: Option<u32>,
    },
    Numeric {
        mode: String,
        precision: Option<u32>,
        scale: Option<u32>,
    },
    Boolean,
    Interval,
    Struct {
        properties: Properties,
        variants: Variants,
    },
    Array {
        items: Items,
        variants: Variants,
        subtype: Option<String>,
    },
    Set {
        items: Items,
        variants: Variants,
        subtype: Option<String>,
    },
    Map {
        key_type: Option<String>,
        key_subtype: Option<String>,
        properties: Properties,
        variants: Variants,
        subtype: Option<String>,
    },
    /// JSON document column; rendered through its physical type when one is declared
    Json {
        document: JsonDocumentKind,
        physical_type: Option<Box<DataType>>,
    },
    /// Multiple primitive type tags on one property
    Union(Vec<DataType>),
    /// Primitive passed through by name (`timestamp`, `date`, `binary`, ...)
    Named(String),
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonDocumentKind {
    Object,
    Array,
}

impl DataType {
    /// Type tag as written in schema documents.
    pub fn type_name(&self) -> &str {
        match self {
            DataType::Text { .. } => "text",
            DataType::Numeric { .. } => "numeric",
            DataType::Boolean => "bool",
            DataType::Interval => "interval",
            DataType::Struct { .. } => "struct",
            DataType::Array { .. } => "array",
            DataType::Set { .. } => "set",
            DataType::Map { .. } => "map",
            DataType::Json {
                document: JsonDocumentKind::Object,
                ..
            } => "jsonObject",
            DataType::Json {
                document: JsonDocumentKind::Array,
                ..
            } => "jsonArray",
            DataType::Union(_) => "union",
            DataType::Named(name) => name,
            DataType::Undefined => "undefined",
        }
    }

    /// Parse the kind-specific attributes of `value` as if its type tag were `type_name`.
    pub fn from_json_with_type(value: &Value, type_name: &str) -> DataType {
        match type_name {
            "text" => DataType::Text {
                mode: str_field(value, "mode")
                    .and_then(|m| m.parse().ok())
                    .unwrap_or_default(),
                max_length: u32_field(value, "maxLength"),
            },
            "numeric" => DataType::Numeric {
                mode: str_field(value, "mode").unwrap_or_else(|| "int".to_string()),
                precision: u32_field(value, "precision"),
                scale: u32_field(value, "scale"),
            },
            "bool" | "boolean" => DataType::Boolean,
            "interval" => DataType::Interval,
            "struct" | "object" => DataType::Struct {
                properties: properties_from_json(value),
                variants: Variants::from_json(value),
            },
            "array" => DataType::Array {
                items: items_from_json(value),
                variants: Variants::from_json(value),
                subtype: str_field(value, "subtype"),
            },
            "set" => DataType::Set {
                items: items_from_json(value),
                variants: Variants::from_json(value),
                subtype: str_field(value, "subtype"),
            },
            "map" => DataType::Map {
                key_type: str_field(value, "keyType"),
                key_subtype: str_field(value, "keySubtype"),
                properties: properties_from_json(value),
                variants: Variants::from_json(value),
                subtype: str_field(value, "subtype"),
            },
            "jsonObject" | "jsonArray" => {
                let document = if type_name == "jsonObject" {
                    JsonDocumentKind::Object
                } else {
                    JsonDocumentKind::Array
                };
                let physical_type = str_field(value, "physicalType")
                    .filter(|physical| physical != type_name)
                    .map(|physical| Box::new(DataType::from_json_with_type(value, &physical)));
                DataType::Json {
                    document,
                    physical_type,
                }
            }
            other => DataType::Named(other.to_string()),
        }
    }

    /// Default-valued data type for a bare type tag, accepting JSON-schema spellings.
    pub fn from_type_tag(tag: &str) -> DataType {
        DataType::from_json_with_type(&Value::Null, normalize_type_tag(tag))
    }

    /// Parse the data type of a property object from its `type` tag.
    pub fn from_json(value: &Value) -> DataType {
        match value.get("type") {
            Some(Value::Array(tags)) => DataType::Union(
                tags.iter()
                    .filter_map(Value::as_str)
                    .filter(|tag| *tag != "null")
                    .map(DataType::from_type_tag)
                    .collect(),
            ),
            Some(Value::String(tag)) if !tag.is_empty() => {
                DataType::from_json_with_type(value, tag)
            }
            _ => DataType::Undefined,
        }
    }

    /// Write kind-specific attributes into `target`.
    fn write_json(&self, target: &mut Map<String, Value>) {
        match self {
            DataType::Union(members) => {
                let tags: Vec<Value> = members
                    .iter()
                    .map(|m| Value::String(m.type_name().to_string()))
                    .collect();
                target.insert("type".into(), Value::Array(tags));
                return;
            }
            DataType::Undefined => return,
            _ => {
                target.insert("type".into(), Value::String(self.type_name().to_string()));
            }
        }

        match self {
            DataType::Text { mode, max_length } => {
                target.insert("mode".into(), json!(mode.as_str()));
                if let Some(len) = max_length {
                    target.insert("maxLength".into(), json!(len));
                }
            }
            DataType::Numeric {
                mode,
                precision,
                scale,
            } => {
                target.insert("mode".into(), json!(mode));
                if let Some(p) = precision {
                    target.insert("precision".into(), json!(p));
                }
                if let Some(s) = scale {
                    target.insert("scale".into(), json!(s));
                }
            }
            DataType::Struct {
                properties,
                variants,
            } => {
                write_properties(target, properties);
                variants.write_json(target);
            }
            DataType::Array {
                items,
                variants,
                subtype,
            }
            | DataType::Set {
                items,
                variants,
                subtype,
            } => {
                match items {
                    Items::None => {}
                    Items::Single(item) => {
                        target.insert("items".into(), item.to_json());
                    }
                    Items::List(list) => {
                        target.insert(
                            "items".into(),
                            Value::Array(list.iter().map(PropertySchema::to_json).collect()),
                        );
                    }
                }
                variants.write_json(target);
                if let Some(subtype) = subtype {
                    target.insert("subtype".into(), json!(subtype));
                }
            }
            DataType::Map {
                key_type,
                key_subtype,
                properties,
                variants,
                subtype,
            } => {
                if let Some(kt) = key_type {
                    target.insert("keyType".into(), json!(kt));
                }
                if let Some(ks) = key_subtype {
                    target.insert("keySubtype".into(), json!(ks));
                }
                write_properties(target, properties);
                variants.write_json(target);
                if let Some(subtype) = subtype {
                    target.insert("subtype".into(), json!(subtype));
                }
            }
            DataType::Json {
                physical_type: Some(physical),
                ..
            } => {
                let mut physical_map = Map::new();
                physical.write_json(&mut physical_map);
                for (key, value) in physical_map {
                    if key == "type" {
                        target.insert("physicalType".into(), value);
                    } else {
                        target.insert(key, value);
                    }
                }
            }
            _ => {}
        }
    }
}

impl Variants {
    pub fn from_json(value: &Value) -> Variants {
        Variants {
            one_of: array_field(value, "oneOf")
                .iter()
                .map(properties_from_json)
                .collect(),
            all_of: array_field(value, "allOf")
                .iter()
                .map(Variants::from_json)
                .collect(),
        }
    }

    fn write_json(&self, target: &mut Map<String, Value>) {
        if !self.one_of.is_empty() {
            let one_of = self
                .one_of
                .iter()
                .map(|props| {
                    let mut variant = Map::new();
                    write_properties(&mut variant, props);
                    Value::Object(variant)
                })
                .collect();
            target.insert("oneOf".into(), Value::Array(one_of));
        }
        if !self.all_of.is_empty() {
            let all_of = self
                .all_of
                .iter()
                .map(|member| {
                    let mut sub = Map::new();
                    member.write_json(&mut sub);
                    Value::Object(sub)
                })
                .collect();
            target.insert("allOf".into(), Value::Array(all_of));
        }
    }
}

impl Default for PropertySchema {
    fn default() -> Self {
        Self {
            id: None,
            code: None,
            comment: None,
            is_activated: true,
            data_type: DataType::Undefined,
            constraints: PropertyConstraints::default(),
            keys: KeyFlags::default(),
        }
    }
}

impl PropertySchema {
    /// Build a bare property around a data type.
    pub fn of_type(data_type: DataType) -> Self {
        Self {
            data_type,
            ..Default::default()
        }
    }

    /// Parse a property object. Never fails: unknown or missing attributes default.
    pub fn from_json(value: &Value) -> Self {
        Self {
            id: str_field(value, "GUID"),
            code: first_str_field(value, &["code", "name"]),
            comment: first_str_field(value, &["comments", "description"]),
            is_activated: bool_field(value, "isActivated").unwrap_or(true),
            data_type: DataType::from_json(value),
            constraints: PropertyConstraints {
                unique: bool_field(value, "unique").unwrap_or(false),
                check: str_field(value, "check"),
                default_value: super::json::scalar_text(value, "default"),
            },
            keys: KeyFlags {
                primary_key: bool_field(value, "primaryKey").unwrap_or(false),
                partition_key: bool_field(value, "compositePartitionKey").unwrap_or(false),
                clustering_key: bool_field(value, "compositeClusteringKey").unwrap_or(false),
            },
        }
    }

    /// Column name: explicit alias if present, else the property key.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.code.as_deref().unwrap_or(key)
    }

    /// Serialize back into the host document shape.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.data_type.write_json(&mut map);
        if let Some(id) = &self.id {
            map.insert("GUID".into(), json!(id));
        }
        if let Some(code) = &self.code {
            map.insert("code".into(), json!(code));
        }
        if let Some(comment) = &self.comment {
            map.insert("comments".into(), json!(comment));
        }
        if !self.is_activated {
            map.insert("isActivated".into(), json!(false));
        }
        if self.constraints.unique {
            map.insert("unique".into(), json!(true));
        }
        if let Some(check) = &self.constraints.check {
            map.insert("check".into(), json!(check));
        }
        if let Some(default_value) = &self.constraints.default_value {
            map.insert("default".into(), json!(default_value));
        }
        if self.keys.primary_key {
            map.insert("primaryKey".into(), json!(true));
        }
        if self.keys.partition_key {
            map.insert("compositePartitionKey".into(), json!(true));
        }
        if self.keys.clustering_key {
            map.insert("compositeClusteringKey".into(), json!(true));
        }
        Value::Object(map)
    }
}

/// Map JSON-schema primitive spellings onto schema type tags.
pub fn normalize_type_tag(tag: &str) -> &str {
    match tag {
        "string" => "text",
        "number" | "integer" => "numeric",
        "boolean" => "bool",
        "object" => "struct",
        other => other,
    }
}

/// Parse the `properties` object of a node, preserving document order.
pub fn properties_from_json(value: &Value) -> Properties {
    object_entries(value, "properties")
        .into_iter()
        .map(|(name, child)| (name.clone(), PropertySchema::from_json(child)))
        .collect()
}

fn items_from_json(value: &Value) -> Items {
    match value.get("items") {
        Some(Value::Array(list)) => {
            Items::List(list.iter().map(PropertySchema::from_json).collect())
        }
        Some(item @ Value::Object(_)) => Items::Single(Box::new(PropertySchema::from_json(item))),
        _ => Items::None,
    }
}

fn write_properties(target: &mut Map<String, Value>, properties: &Properties) {
    if properties.is_empty() {
        return;
    }
    let map: Map<String, Value> = properties
        .iter()
        .map(|(name, prop)| (name.clone(), prop.to_json()))
        .collect();
    target.insert("properties".into(), Value::Object(map));
}
