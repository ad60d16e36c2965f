//! CREATE DATABASE statement

use crate::model::DatabaseSchema;
use crate::util::replace_space_with_underscore;

use super::statement_builder::StatementBuilder;

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

pub fn database_statement(database: &DatabaseSchema) -> String {
    StatementBuilder::new(format!(
        "CREATE DATABASE IF NOT EXISTS {}",
        replace_space_with_underscore(&database.name)
    ))
    .optional(database.description.as_deref(), |c| format!("COMMENT {}", quoted(c)))
    .optional(database.location.as_deref(), |l| format!("LOCATION {}", quoted(l)))
    .optional(database.db_properties.as_deref(), |p| {
        format!("WITH DBPROPERTIES ({})", p)
    })
    .activated(database.is_activated)
    .build()
}
