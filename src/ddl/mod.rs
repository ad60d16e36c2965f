//! Hive DDL statement assembly

mod database;
mod index;
mod script;
mod statement_builder;
mod table;

pub use database::database_statement;
pub use index::{index_statements, DEFAULT_INDEX_HANDLER};
pub use script::{container_hive_script, entity_hive_script, hive_script};
pub use statement_builder::{StatementBuilder, CLAUSE_INDENT};
pub use table::{
    row_format_statement, stored_as_statement, table_properties_statement, table_statement,
    table_statement_from_columns, TableContext,
};
