//! Generation request bundles as supplied by the host

use std::collections::HashMap;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::GlueDdlError;
use crate::options::ScriptOptions;

use super::relationship::Relationship;

/// A schema document, either inline JSON or serialized JSON text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawDocument {
    Text(String),
    Value(Value),
}

impl RawDocument {
    /// Parse the document; `document` names it in the error.
    pub fn parse(&self, document: &str) -> Result<Value, GlueDdlError> {
        match self {
            RawDocument::Text(text) if text.trim().is_empty() => Ok(Value::Null),
            RawDocument::Text(text) => {
                serde_json::from_str(text).map_err(|source| GlueDdlError::DocumentParse {
                    document: document.to_string(),
                    source,
                })
            }
            RawDocument::Value(value) => Ok(value.clone()),
        }
    }
}

fn parse_optional(doc: &Option<RawDocument>, document: &str) -> Result<Value, GlueDdlError> {
    doc.as_ref()
        .map(|d| d.parse(document))
        .transpose()
        .map(Option::unwrap_or_default)
}

/// Single-entity generation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaBundle {
    pub json_schema: RawDocument,
    #[serde(default)]
    pub model_definitions: Option<RawDocument>,
    #[serde(default)]
    pub internal_definitions: Option<RawDocument>,
    #[serde(default)]
    pub external_definitions: Option<RawDocument>,
    #[serde(default)]
    pub container_data: Vec<Value>,
    #[serde(default)]
    pub entity_data: Vec<Value>,
    #[serde(default)]
    pub options: ScriptOptions,
}

/// Parsed documents of a single-entity request
#[derive(Debug, Clone)]
pub struct EntityDocuments {
    pub json_schema: Value,
    pub model_definitions: Value,
    pub internal_definitions: Value,
    pub external_definitions: Value,
}

impl EntityDocuments {
    /// Documents searched for id → name resolution, main schema first.
    pub fn all(&self) -> [&Value; 4] {
        [
            &self.json_schema,
            &self.internal_definitions,
            &self.model_definitions,
            &self.external_definitions,
        ]
    }
}

impl SchemaBundle {
    /// Parse every document. All of them are required, so any failure is fatal.
    pub fn documents(&self) -> Result<EntityDocuments, GlueDdlError> {
        Ok(EntityDocuments {
            json_schema: self.json_schema.parse("jsonSchema")?,
            model_definitions: parse_optional(&self.model_definitions, "modelDefinitions")?,
            internal_definitions: parse_optional(
                &self.internal_definitions,
                "internalDefinitions",
            )?,
            external_definitions: parse_optional(
                &self.external_definitions,
                "externalDefinitions",
            )?,
        })
    }
}

/// Whole-database generation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerBundle {
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub json_schema: HashMap<String, RawDocument>,
    #[serde(default)]
    pub internal_definitions: HashMap<String, RawDocument>,
    #[serde(default)]
    pub entity_data: HashMap<String, Vec<Value>>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub container_data: Vec<Value>,
    #[serde(default)]
    pub model_definitions: Option<RawDocument>,
    #[serde(default)]
    pub external_definitions: Option<RawDocument>,
    #[serde(default)]
    pub options: ScriptOptions,
}

/// Parsed per-entity documents of a container request
#[derive(Debug, Clone)]
pub struct ContainerEntity {
    pub id: String,
    pub json_schema: Value,
    pub internal_definitions: Value,
    pub entity_tabs: Vec<Value>,
}

/// Parsed documents of a container request
#[derive(Debug, Clone)]
pub struct ContainerDocuments {
    /// Entities in request order; entities whose schema failed to parse are absent
    pub entities: Vec<ContainerEntity>,
    pub model_definitions: Value,
    pub external_definitions: Value,
}

impl ContainerDocuments {
    pub fn entity(&self, id: &str) -> Option<&ContainerEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Definitions shared by every entity.
    pub fn shared_definitions(&self) -> [&Value; 2] {
        [&self.model_definitions, &self.external_definitions]
    }
}

impl ContainerBundle {
    /// Parse documents. Shared definitions are fatal on failure; a per-entity
    /// document that fails to parse drops that entity from the result.
    pub fn documents(&self) -> Result<ContainerDocuments, GlueDdlError> {
        let model_definitions = parse_optional(&self.model_definitions, "modelDefinitions")?;
        let external_definitions =
            parse_optional(&self.external_definitions, "externalDefinitions")?;

        let entities = self
            .entities
            .iter()
            .filter_map(|id| {
                let json_schema = match self.json_schema.get(id).map(|d| d.parse("jsonSchema")) {
                    Some(Ok(value)) => value,
                    Some(Err(err)) => {
                        warn!(entity = %id, error = %err, "Dropping entity with malformed schema");
                        return None;
                    }
                    None => {
                        warn!(entity = %id, "Dropping entity without schema document");
                        return None;
                    }
                };
                let internal_definitions = match self
                    .internal_definitions
                    .get(id)
                    .map(|d| d.parse("internalDefinitions"))
                {
                    Some(Ok(value)) => value,
                    Some(Err(err)) => {
                        warn!(
                            entity = %id,
                            error = %err,
                            "Ignoring malformed internal definitions"
                        );
                        Value::Null
                    }
                    None => Value::Null,
                };
                Some(ContainerEntity {
                    id: id.clone(),
                    json_schema,
                    internal_definitions,
                    entity_tabs: self.entity_data.get(id).cloned().unwrap_or_default(),
                })
            })
            .collect();

        Ok(ContainerDocuments {
            entities,
            model_definitions,
            external_definitions,
        })
    }
}

/// Read a file as a string, trying UTF-8 first, then Windows-1252 as fallback
pub fn read_file_with_encoding_fallback(path: &Path) -> Result<String, GlueDdlError> {
    let bytes = std::fs::read(path).map_err(|source| GlueDdlError::BundleRead {
        path: path.to_path_buf(),
        source,
    })?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s.trim_start_matches('\u{feff}').to_string()),
        Err(err) => {
            let bytes = err.into_bytes();
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                Err(GlueDdlError::BundleRead {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "File contains invalid characters",
                    ),
                })
            } else {
                Ok(decoded.into_owned())
            }
        }
    }
}

/// Read and deserialize a bundle file.
pub fn load_bundle<T: DeserializeOwned>(path: &Path) -> Result<T, GlueDdlError> {
    let text = read_file_with_encoding_fallback(path)?;
    serde_json::from_str(&text).map_err(|source| GlueDdlError::DocumentParse {
        document: path.display().to_string(),
        source,
    })
}
