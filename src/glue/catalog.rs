//! Catalog boundary: the remote catalog as a trait, and the operations run against it

use std::collections::HashMap;
use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{CatalogError, GlueDdlError};

use super::cli_script::ApiStatements;
use super::payload::{CatalogDatabase, CatalogTable, CreateDatabaseRequest, CreateTableRequest};
use super::reverse::{map_table_data, ReversedTable};

/// The subset of the metadata catalog API this crate talks to.
///
/// Implementations are shared across worker threads.
pub trait GlueCatalog: Sync {
    fn get_databases(&self) -> Result<Vec<CatalogDatabase>, CatalogError>;
    fn get_tables(&self, database_name: &str) -> Result<Vec<CatalogTable>, CatalogError>;
    fn get_table(
        &self,
        database_name: &str,
        table_name: &str,
    ) -> Result<CatalogTable, CatalogError>;
    fn create_database(&self, request: &CreateDatabaseRequest) -> Result<(), CatalogError>;
    fn create_table(&self, request: &CreateTableRequest) -> Result<(), CatalogError>;
}

/// Opens a catalog client for a set of credentials.
pub trait CatalogConnector {
    type Catalog: GlueCatalog;

    fn connect(&self, info: &ConnectionInfo) -> Result<Self::Catalog, CatalogError>;
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
    #[serde(default)]
    pub region: String,
}

impl fmt::Debug for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionInfo")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"****")
            .field("region", &self.region)
            .finish()
    }
}

/// Table names of one database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DbCollections {
    pub db_name: String,
    pub db_collections: Vec<String>,
    pub is_empty: bool,
}

/// Databases and tables picked for reverse retrieval
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CollectionSelection {
    #[serde(rename = "dataBaseNames", default)]
    pub database_names: Vec<String>,
    #[serde(default)]
    pub collections: HashMap<String, Vec<String>>,
}

impl CollectionSelection {
    fn tables_of(&self, database_name: &str) -> &[String] {
        self.collections
            .get(database_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

pub fn test_connection(catalog: &impl GlueCatalog) -> Result<(), GlueDdlError> {
    match catalog.get_databases() {
        Ok(databases) => {
            info!(databases = databases.len(), "Connection succeeded");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "Connection failed");
            Err(GlueDdlError::catalog("GetDatabases", err))
        }
    }
}

/// List every database with its table names. Any failing call aborts.
pub fn db_collections_names(
    catalog: &impl GlueCatalog,
) -> Result<Vec<DbCollections>, GlueDdlError> {
    let databases = catalog
        .get_databases()
        .map_err(|err| GlueDdlError::catalog("GetDatabases", err))?;

    databases
        .par_iter()
        .map(|database| {
            let tables = catalog
                .get_tables(&database.name)
                .map_err(|err| GlueDdlError::catalog("GetTables", err))?;
            let db_collections: Vec<String> = tables.into_iter().map(|t| t.name).collect();
            Ok(DbCollections {
                db_name: database.name.clone(),
                is_empty: db_collections.is_empty(),
                db_collections,
            })
        })
        .collect()
}

/// Fetch and reverse-map every selected table, in selection order.
///
/// A table that cannot be fetched is logged and skipped; the remaining
/// tables are still returned.
pub fn db_collections_data(
    catalog: &impl GlueCatalog,
    selection: &CollectionSelection,
) -> Vec<ReversedTable> {
    let requests: Vec<(&str, &str)> = selection
        .database_names
        .iter()
        .flat_map(|db| {
            selection
                .tables_of(db)
                .iter()
                .map(move |table| (db.as_str(), table.as_str()))
        })
        .collect();

    let tables: Vec<ReversedTable> = requests
        .par_iter()
        .filter_map(|(database_name, table_name)| {
            match catalog.get_table(database_name, table_name) {
                Ok(table) => Some(map_table_data(&table)),
                Err(err) => {
                    warn!(database_name, table_name, error = %err, "Skipping table");
                    None
                }
            }
        })
        .collect();

    debug!(requested = requests.len(), retrieved = tables.len(), "Reverse-mapped tables");
    tables
}

/// Create the parsed databases, then the tables. The first failure aborts.
pub fn apply_api_statements(
    catalog: &impl GlueCatalog,
    statements: &ApiStatements,
) -> Result<(), GlueDdlError> {
    statements
        .databases
        .par_iter()
        .try_for_each(|request| {
            debug!(database = %request.database_input.name, "Creating database");
            catalog
                .create_database(request)
                .map_err(|err| GlueDdlError::catalog("CreateDatabase", err))
        })?;

    statements
        .tables
        .par_iter()
        .try_for_each(|request| {
            debug!(
                database = %request.database_name,
                table = %request.table_input.name,
                "Creating table"
            );
            catalog
                .create_table(request)
                .map_err(|err| GlueDdlError::catalog("CreateTable", err))
        })?;

    info!(
        databases = statements.databases.len(),
        tables = statements.tables.len(),
        "Applied catalog statements"
    );
    Ok(())
}
