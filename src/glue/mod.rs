//! Catalog payloads, CLI scripts, reverse mapping and the catalog boundary

mod catalog;
mod cli_script;
mod payload;
mod reverse;

pub use catalog::{
    apply_api_statements, db_collections_data, db_collections_names, test_connection,
    CatalogConnector, CollectionSelection, ConnectionInfo, DbCollections, GlueCatalog,
};
pub use cli_script::{
    api_statements, cli_statement, compose_cli_script, ApiStatements, CREATE_DATABASE,
    CREATE_TABLE, STATEMENT_SEPARATOR,
};
pub use payload::{
    create_database_request, create_table_request, CatalogColumn, CatalogDatabase, CatalogTable,
    CreateDatabaseRequest, CreateTableRequest, DatabaseInput, GetTableResponse, SerdeInfo,
    SortColumn, StorageDescriptor, TableInput, EXTERNAL_TABLE, SERDE_PATHS_PARAMETER,
};
pub use reverse::{
    map_table_data, split_parameters, Classification, EntityLevel, ReversedTable,
    ReversedValidation, SortedKey, TableProperty, CLASSIFICATION_PARAMETER, REVERSED_STORED_AS,
};
