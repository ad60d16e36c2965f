//! Abstract schema model built from host JSON documents

mod bundle;
pub(crate) mod json;
mod property;
mod relationship;
mod table;

pub use bundle::{
    load_bundle, read_file_with_encoding_fallback, ContainerBundle, ContainerDocuments,
    ContainerEntity, EntityDocuments, RawDocument, SchemaBundle,
};
pub use property::{
    normalize_type_tag, properties_from_json, DataType, Items, JsonDocumentKind, KeyFlags,
    Properties, PropertyConstraints, PropertySchema, TextMode, Variants,
};
pub use relationship::{Relationship, RelationshipProperties};
pub use table::{
    DatabaseSchema, IndexSchema, KeyDesignations, KeyRef, RowFormat, SortKey, SortOrder,
    StorageAttributes, TableSchema,
};
