//! Hive script assembly for a single entity or a whole database

use tracing::debug;

use crate::model::{ContainerDocuments, DatabaseSchema, EntityDocuments, Relationship, TableSchema};
use crate::options::ForeignKeyPlacement;
use crate::resolve::{
    build_foreign_key_index, foreign_key_statements, resolve_columns, ForeignKeyGroup, IdNameTable,
};
use crate::types::TypeMapper;

use super::database::database_statement;
use super::index::index_statements;
use super::table::{table_statement_from_columns, TableContext};

/// Join non-empty statements with a blank line.
pub fn hive_script(statements: impl IntoIterator<Item = String>) -> String {
    statements
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn table_and_indexes(mapper: &TypeMapper, context: &TableContext) -> Vec<String> {
    let columns = resolve_columns(context.table, mapper);
    let mut statements = vec![table_statement_from_columns(context, &columns)];
    statements.extend(index_statements(context, &columns));
    statements
}

/// Database, table and index statements of one entity.
pub fn entity_hive_script(
    mapper: &TypeMapper,
    database: &DatabaseSchema,
    table: &TableSchema,
    documents: &EntityDocuments,
) -> String {
    let id_names = IdNameTable::build(documents.all());
    let context = TableContext {
        database,
        table,
        id_names: &id_names,
        inline_foreign_keys: &[],
    };

    let mut statements = vec![database_statement(database)];
    statements.extend(table_and_indexes(mapper, &context));
    hive_script(statements)
}

/// Database statement, every entity's table and indexes in request order,
/// then the foreign keys (unless they are rendered inline).
pub fn container_hive_script(
    mapper: &TypeMapper,
    database: &DatabaseSchema,
    documents: &ContainerDocuments,
    relationships: &[Relationship],
    placement: ForeignKeyPlacement,
) -> String {
    let foreign_keys = build_foreign_key_index(relationships, documents, database.is_activated);
    let [model_definitions, external_definitions] = documents.shared_definitions();

    let mut statements = vec![database_statement(database)];
    let mut alter_statements = Vec::new();

    for entity in &documents.entities {
        let table = TableSchema::from_documents(&entity.json_schema, &entity.entity_tabs);
        let id_names = IdNameTable::build([
            &entity.json_schema,
            &entity.internal_definitions,
            model_definitions,
            external_definitions,
        ]);
        let groups = foreign_keys.groups_for(&entity.id);
        let inline_foreign_keys: &[ForeignKeyGroup] = match placement {
            ForeignKeyPlacement::Inline => groups,
            ForeignKeyPlacement::AlterTable => &[],
        };

        let context = TableContext {
            database,
            table: &table,
            id_names: &id_names,
            inline_foreign_keys,
        };
        statements.extend(table_and_indexes(mapper, &context));

        if placement == ForeignKeyPlacement::AlterTable {
            alter_statements.extend(foreign_key_statements(groups));
        }
    }

    debug!(
        entities = documents.entities.len(),
        foreign_keys = alter_statements.len(),
        "Assembled container script"
    );

    statements.push(alter_statements.join("\n"));
    hive_script(statements)
}
