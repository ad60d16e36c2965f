//! CREATE INDEX statements

use crate::model::IndexSchema;
use crate::resolve::{key_name, ResolvedColumns};
use crate::util::{
    comment_deactivated_inline_keys, escape_single_quotes, replace_space_with_underscore,
};

use super::statement_builder::StatementBuilder;
use super::table::TableContext;

/// Handler used when an index declares none
pub const DEFAULT_INDEX_HANDLER: &str = "COMPACT";

fn index_statement(
    context: &TableContext,
    columns: &ResolvedColumns,
    index: &IndexSchema,
) -> String {
    let table_activated = context.is_activated();
    let key_names: Vec<String> = index
        .keys
        .iter()
        .filter_map(|key| key_name(key, columns, context.id_names))
        .collect();
    let keys = if table_activated {
        comment_deactivated_inline_keys(&key_names, |name| columns.is_activated(name)).keys
    } else {
        key_names.join(", ")
    };

    StatementBuilder::new(format!(
        "CREATE INDEX {} ON TABLE {} ({}) AS '{}'",
        replace_space_with_underscore(&index.name),
        context.qualified_name(),
        keys,
        index.handler.as_deref().unwrap_or(DEFAULT_INDEX_HANDLER)
    ))
    .clause(index.with_deferred_rebuild, || "WITH DEFERRED REBUILD".to_string())
    .optional(index.properties.as_deref(), |p| format!("IDXPROPERTIES {}", p))
    .optional(index.in_table.as_deref(), str::to_string)
    .optional(index.comment.as_deref(), |c| {
        format!("COMMENT '{}'", escape_single_quotes(c))
    })
    .activated(table_activated && index.is_activated)
    .build()
}

/// One statement per declared index, each commented out when the table or
/// the index is inactive.
pub fn index_statements(context: &TableContext, columns: &ResolvedColumns) -> Vec<String> {
    context
        .table
        .indexes
        .iter()
        .map(|index| index_statement(context, columns, index))
        .collect()
}
