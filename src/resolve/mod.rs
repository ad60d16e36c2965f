//! Column, key and foreign-key resolution

mod columns;
mod foreign_keys;
mod id_names;

pub use columns::{
    get_partitions_keys, key_name, resolve_columns, resolve_key_names, Column, ColumnConstraints,
    KeyNames, ResolvedColumns,
};
pub use foreign_keys::{
    build_foreign_key_index, foreign_key_statements, relationship_id_names, ForeignKeyEdge,
    ForeignKeyGroup, ForeignKeyIndex,
};
pub use id_names::{IdEntry, IdNameTable};
