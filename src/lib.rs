//! rust-glue-ddl: Hive DDL and metadata catalog payloads from entity schemas
//!
//! This library turns JSON-schema entity models into Hive `CREATE` scripts or
//! catalog CLI scripts with embedded JSON payloads, applies those payloads to
//! a catalog, and maps catalog tables back into schema documents.

pub mod ddl;
pub mod error;
pub mod glue;
pub mod model;
pub mod options;
pub mod resolve;
pub mod types;
pub mod util;

use anyhow::Result;
use tracing::{debug, info};

pub use error::{CatalogError, GlueDdlError};
pub use glue::{
    CatalogConnector, CollectionSelection, ConnectionInfo, DbCollections, GlueCatalog,
    ReversedTable,
};
pub use model::{load_bundle, ContainerBundle, SchemaBundle};
pub use options::{ForeignKeyPlacement, ScriptOptions, ScriptTarget};

use model::{DatabaseSchema, TableSchema};
use resolve::IdNameTable;
use types::{TypeDescriptors, TypeDialect, TypeMapper};

fn catalog_statement<T: serde::Serialize>(
    cli_tool: &str,
    command: &str,
    payload: &T,
) -> Result<String> {
    Ok(glue::cli_statement(cli_tool, command, payload)?)
}

/// Generate the script of a single entity.
pub fn generate_script(bundle: &SchemaBundle) -> Result<String> {
    let documents = bundle.documents()?;
    let database = DatabaseSchema::from_tabs(&bundle.container_data);
    let table = TableSchema::from_documents(&documents.json_schema, &bundle.entity_data);
    let descriptors = TypeDescriptors::builtin();
    let options = &bundle.options;

    debug!(table = %table.name, target = ?options.target(), "Generating entity script");

    match options.target() {
        ScriptTarget::HiveQl => {
            let mapper = TypeMapper::new(&descriptors, TypeDialect::HIVE);
            Ok(ddl::entity_hive_script(&mapper, &database, &table, &documents))
        }
        ScriptTarget::GlueCli => {
            let mapper = TypeMapper::new(&descriptors, TypeDialect::GLUE);
            let id_names = IdNameTable::build(documents.all());
            let statements = [
                catalog_statement(
                    options.cli_tool(),
                    glue::CREATE_DATABASE,
                    &glue::create_database_request(&database),
                )?,
                catalog_statement(
                    options.cli_tool(),
                    glue::CREATE_TABLE,
                    &glue::create_table_request(&mapper, &database.name, &table, &id_names),
                )?,
            ];
            Ok(glue::compose_cli_script(&statements))
        }
    }
}

/// Generate the script of a whole database.
pub fn generate_container_script(bundle: &ContainerBundle) -> Result<String> {
    let documents = bundle.documents()?;
    let database = DatabaseSchema::from_tabs(&bundle.container_data);
    let descriptors = TypeDescriptors::builtin();
    let options = &bundle.options;

    debug!(
        database = %database.name,
        entities = documents.entities.len(),
        target = ?options.target(),
        "Generating container script"
    );

    match options.target() {
        ScriptTarget::HiveQl => {
            let mapper = TypeMapper::new(&descriptors, TypeDialect::HIVE);
            Ok(ddl::container_hive_script(
                &mapper,
                &database,
                &documents,
                &bundle.relationships,
                options.foreign_keys,
            ))
        }
        ScriptTarget::GlueCli => {
            let mapper = TypeMapper::new(&descriptors, TypeDialect::GLUE);
            let [model_definitions, external_definitions] = documents.shared_definitions();
            let mut statements = vec![catalog_statement(
                options.cli_tool(),
                glue::CREATE_DATABASE,
                &glue::create_database_request(&database),
            )?];

            for entity in &documents.entities {
                let table = TableSchema::from_documents(&entity.json_schema, &entity.entity_tabs);
                let id_names = IdNameTable::build([
                    &entity.json_schema,
                    &entity.internal_definitions,
                    model_definitions,
                    external_definitions,
                ]);
                statements.push(catalog_statement(
                    options.cli_tool(),
                    glue::CREATE_TABLE,
                    &glue::create_table_request(&mapper, &database.name, &table, &id_names),
                )?);
            }

            Ok(glue::compose_cli_script(&statements))
        }
    }
}

fn connect<C: CatalogConnector>(connector: &C, info: &ConnectionInfo) -> Result<C::Catalog> {
    debug!(connection = ?info, "Connecting to catalog");
    Ok(connector
        .connect(info)
        .map_err(|err| GlueDdlError::catalog("Connect", err))?)
}

/// Create the databases and tables described by a catalog CLI script.
pub fn apply_to_instance<C: CatalogConnector>(
    connector: &C,
    script: &str,
    info: &ConnectionInfo,
) -> Result<()> {
    if script.trim().is_empty() {
        return Err(GlueDdlError::EmptyScript.into());
    }

    let statements = glue::api_statements(script)?;
    if statements.is_empty() {
        return Err(GlueDdlError::UnsupportedOperation {
            message: "HiveQL is not supported for this operation".to_string(),
        }
        .into());
    }

    let catalog = connect(connector, info)?;
    glue::apply_api_statements(&catalog, &statements)?;
    info!(region = %info.region, "Script applied");
    Ok(())
}

pub fn test_connection<C: CatalogConnector>(connector: &C, info: &ConnectionInfo) -> Result<()> {
    let catalog = connect(connector, info)?;
    Ok(glue::test_connection(&catalog)?)
}

/// Every database with its table names.
pub fn get_db_collections_names<C: CatalogConnector>(
    connector: &C,
    info: &ConnectionInfo,
) -> Result<Vec<DbCollections>> {
    let catalog = connect(connector, info)?;
    Ok(glue::db_collections_names(&catalog)?)
}

/// Reverse-map the selected tables into schema documents.
pub fn get_db_collections_data<C: CatalogConnector>(
    connector: &C,
    info: &ConnectionInfo,
    selection: &CollectionSelection,
) -> Result<Vec<ReversedTable>> {
    let catalog = connect(connector, info)?;
    Ok(glue::db_collections_data(&catalog, selection))
}
