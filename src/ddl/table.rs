//! CREATE TABLE statement

use serde_json::Value;

use crate::model::{DatabaseSchema, RowFormat, StorageAttributes, TableSchema};
use crate::resolve::{
    get_partitions_keys, resolve_columns, resolve_key_names, ForeignKeyGroup, IdNameTable,
    KeyNames, ResolvedColumns,
};
use crate::types::TypeMapper;
use crate::util::{
    comment_deactivated_inline_keys, escape_single_quotes, replace_space_with_underscore,
    COMMENT_MARKER,
};

use super::statement_builder::StatementBuilder;

/// Everything needed to render one table
#[derive(Debug, Clone, Copy)]
pub struct TableContext<'a> {
    pub database: &'a DatabaseSchema,
    pub table: &'a TableSchema,
    pub id_names: &'a IdNameTable,
    /// Constraints rendered inside the column list
    pub inline_foreign_keys: &'a [ForeignKeyGroup],
}

impl TableContext<'_> {
    /// A table inherits inactivity from its database.
    pub fn is_activated(&self) -> bool {
        self.table.is_activated && self.database.is_activated
    }

    pub fn qualified_name(&self) -> String {
        format!(
            "{}.{}",
            replace_space_with_underscore(&self.database.name),
            replace_space_with_underscore(&self.table.name)
        )
    }
}

/// A line inside the parenthesized table body
struct BodyLine {
    text: String,
    is_activated: bool,
}

/// Join body lines. Inactive lines are commented out and commas only
/// separate active lines, so the rendered list stays valid either way.
fn join_body_lines(lines: &[BodyLine]) -> String {
    let last_active = lines.iter().rposition(|l| l.is_activated);
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if !line.is_activated {
                format!("{}{}", COMMENT_MARKER, line.text)
            } else if Some(i) == last_active {
                line.text.clone()
            } else {
                format!("{},", line.text)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A rendered key clause and whether any of its keys is active
struct KeyClause {
    text: String,
    is_activated: bool,
}

impl KeyClause {
    fn render(self) -> String {
        if self.is_activated {
            self.text
        } else {
            format!("{}{}", COMMENT_MARKER, self.text)
        }
    }
}

/// Render a key clause; active keys first, inactive ones in a trailing block
/// comment. The clause is inactive only when all keys are inactive in an
/// active table.
fn key_clause(
    items: &[String],
    is_item_activated: impl Fn(&str) -> bool,
    table_activated: bool,
    render: impl FnOnce(&str) -> String,
) -> Option<KeyClause> {
    if items.is_empty() {
        return None;
    }
    if !table_activated {
        return Some(KeyClause {
            text: render(&items.join(", ")),
            is_activated: true,
        });
    }
    let keys = comment_deactivated_inline_keys(items, is_item_activated);
    Some(KeyClause {
        text: render(&keys.keys),
        is_activated: !keys.all_deactivated,
    })
}

fn is_textfile(storage: &StorageAttributes) -> bool {
    storage
        .stored_as
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case("textfile"))
}

/// `ROW FORMAT` clause body, only meaningful for text-file storage.
pub fn row_format_statement(storage: &StorageAttributes) -> Option<String> {
    if !is_textfile(storage) {
        return None;
    }
    let quote = |s: &str| format!("'{}'", s);

    match storage.row_format.as_ref()? {
        RowFormat::Delimited {
            fields_terminated_by,
            fields_escaped_by,
            collection_items_terminated_by,
            map_keys_terminated_by,
            lines_terminated_by,
            null_defined_as,
        } => {
            let subclauses = [
                ("FIELDS TERMINATED BY", fields_terminated_by),
                ("ESCAPED BY", fields_escaped_by),
                ("COLLECTION ITEMS TERMINATED BY", collection_items_terminated_by),
                ("MAP KEYS TERMINATED BY", map_keys_terminated_by),
                ("LINES TERMINATED BY", lines_terminated_by),
                ("NULL DEFINED AS", null_defined_as),
            ];
            let builder = subclauses.into_iter().fold(
                StatementBuilder::new("DELIMITED"),
                |builder, (label, value)| match value {
                    Some(value) => {
                        builder.indented_clause(true, || format!("{} {}", label, quote(value)))
                    }
                    None => builder,
                },
            );
            Some(builder.compose())
        }
        RowFormat::SerDe => Some(
            StatementBuilder::new(format!(
                "SERDE {}",
                quote(storage.serde_library.as_deref().unwrap_or_default())
            ))
            .optional(storage.serde_properties.as_deref(), |p| {
                format!("    WITH SERDEPROPERTIES {}", p)
            })
            .compose(),
        ),
    }
}

/// `STORED AS` / `STORED BY` clause.
pub fn stored_as_statement(storage: &StorageAttributes) -> Option<String> {
    let stored_as = storage.stored_as.as_deref().filter(|s| !s.is_empty())?;
    Some(match stored_as {
        "input/output format" => format!(
            "STORED AS INPUTFORMAT '{}' OUTPUTFORMAT '{}'",
            storage.input_format.as_deref().unwrap_or_default(),
            storage.output_format.as_deref().unwrap_or_default()
        ),
        "by" => format!(
            "STORED BY '{}'",
            storage.serde_library.as_deref().unwrap_or_default()
        ),
        other => format!("STORED AS {}", other.to_uppercase()),
    })
}

/// Table properties: a JSON object becomes `('k'='v', ...)`, anything else is verbatim.
pub fn table_properties_statement(properties: &str) -> String {
    match serde_json::from_str::<Value>(properties) {
        Ok(Value::Object(map)) => {
            let pairs: Vec<String> = map
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    format!(
                        "'{}'='{}'",
                        escape_single_quotes(key),
                        escape_single_quotes(&value)
                    )
                })
                .collect();
            format!("({})", pairs.join(", "))
        }
        _ => properties.to_string(),
    }
}

fn skewed_statement(keys: &str, storage: &StorageAttributes) -> String {
    let mut statement = format!("SKEWED BY ({})", keys);
    if let Some(on) = storage.skewed_on.as_deref() {
        statement.push_str(&format!(" ON {}", on));
    }
    if storage.skew_stored_as_dir {
        statement.push_str(" STORED AS DIRECTORIES");
    }
    statement
}

fn body_lines(
    context: &TableContext,
    columns: &ResolvedColumns,
    keys: &KeyNames,
    table_activated: bool,
) -> Vec<BodyLine> {
    let mut lines: Vec<BodyLine> = columns
        .without(&keys.partition)
        .map(|column| BodyLine {
            text: column.statement(),
            is_activated: column.is_activated || !table_activated,
        })
        .collect();

    if let Some(primary_key) = key_clause(
        &keys.primary_keys,
        |name| columns.is_activated(name),
        table_activated,
        |keys| format!("PRIMARY KEY ({}) DISABLE NOVALIDATE", keys),
    ) {
        lines.push(BodyLine {
            text: primary_key.text,
            is_activated: primary_key.is_activated,
        });
    }

    for group in context.inline_foreign_keys {
        lines.push(BodyLine {
            text: group.inline_clause(),
            is_activated: group.is_activated() || !table_activated,
        });
    }

    lines
}

/// Render `CREATE TABLE` for the context's table.
pub fn table_statement(mapper: &TypeMapper, context: &TableContext) -> String {
    let columns = resolve_columns(context.table, mapper);
    table_statement_from_columns(context, &columns)
}

/// Render `CREATE TABLE` from already resolved columns.
pub fn table_statement_from_columns(context: &TableContext, columns: &ResolvedColumns) -> String {
    let table = context.table;
    let storage = &table.storage;
    let table_activated = context.is_activated();

    let keys = resolve_key_names(table, columns, context.id_names);
    let is_column_activated = |name: &str| columns.is_activated(name);

    let body = join_body_lines(&body_lines(context, columns, &keys, table_activated));

    let partition_columns = get_partitions_keys(columns, &keys.partition);
    let partition_items: Vec<String> = partition_columns.iter().map(|c| c.definition()).collect();
    let partitioned_by = key_clause(
        &partition_items,
        |item| {
            partition_columns
                .iter()
                .find(|c| c.definition() == item)
                .map_or(true, |c| c.is_activated)
        },
        table_activated,
        |keys| format!("PARTITIONED BY ({})", keys),
    );
    let clustered_by = key_clause(&keys.clustering, is_column_activated, table_activated, |k| {
        format!("CLUSTERED BY ({})", k)
    });
    let sorted_items: Vec<String> = keys
        .sorted_by
        .iter()
        .map(|(name, order)| format!("{} {}", name, order.keyword()))
        .collect();
    let sorted_by = key_clause(
        &sorted_items,
        |item| {
            keys.sorted_by
                .iter()
                .zip(&sorted_items)
                .find(|(_, rendered)| rendered.as_str() == item)
                .map_or(true, |((name, _), _)| columns.is_activated(name))
        },
        table_activated,
        |k| format!("SORTED BY ({})", k),
    );
    let skewed_by = key_clause(&keys.skewed_by, is_column_activated, table_activated, |k| {
        skewed_statement(k, storage)
    });

    let mut opening = String::from("CREATE ");
    if table.temporary_table {
        opening.push_str("TEMPORARY ");
    }
    if table.external_table {
        opening.push_str("EXTERNAL ");
    }
    opening.push_str(&format!("TABLE IF NOT EXISTS {} (", context.qualified_name()));

    StatementBuilder::new(opening)
        .indented_clause(!body.is_empty(), || body.clone())
        .clause(true, || ")".to_string())
        .optional(table.comment.as_deref(), |c| {
            format!("COMMENT '{}'", escape_single_quotes(c))
        })
        .optional(partitioned_by, KeyClause::render)
        .optional(clustered_by, KeyClause::render)
        .optional(sorted_by, KeyClause::render)
        .optional(storage.num_buckets, |n| format!("INTO {} BUCKETS", n))
        .optional(skewed_by, KeyClause::render)
        .optional(row_format_statement(storage), |r| format!("ROW FORMAT {}", r))
        .optional(stored_as_statement(storage), |s| s)
        .optional(storage.location.as_deref(), |l| format!("LOCATION \"{}\"", l))
        .optional(storage.table_properties.as_deref(), |p| {
            format!("TBLPROPERTIES {}", table_properties_statement(p))
        })
        .optional(table.select_statement.as_deref(), |s| format!("AS {}", s))
        .activated(table_activated)
        .build()
}
