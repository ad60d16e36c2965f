//! Error types for rust-glue-ddl

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while synthesizing scripts or talking to the catalog
#[derive(Error, Debug)]
pub enum GlueDdlError {
    #[error("Failed to parse {document} document")]
    DocumentParse {
        document: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read schema bundle: {path}")]
    BundleRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Empty script")]
    EmptyScript,

    #[error("{message}")]
    UnsupportedOperation { message: String },

    #[error("Catalog call {operation} failed: {message}")]
    Catalog { operation: String, message: String },
}

/// Error raised by a catalog collaborator (network transport, auth, missing objects)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("entity already exists: {0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Service(String),
}

impl GlueDdlError {
    pub(crate) fn catalog(operation: &str, err: CatalogError) -> Self {
        GlueDdlError::Catalog {
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }
}
