//! Type mapping between property schemas and Hive/catalog type literals

mod descriptors;
mod dialect;
mod mapper;
mod token_parser_base;
mod type_parser;

pub use descriptors::{TypeDescriptor, TypeDescriptors, DEFAULT_CHILD_VALUE_TYPE};
pub use dialect::TypeDialect;
pub use mapper::{
    TypeMapper, DEFAULT_CHAR_LENGTH, DEFAULT_DECIMAL_PRECISION, DEFAULT_DECIMAL_SCALE,
    PLACEHOLDER_STRUCT_FIELD,
};
pub use type_parser::{parse_type, schema_of, MAP_VALUE_PROPERTY};
