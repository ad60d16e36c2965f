//! Forward type mapping: property schema → Hive/catalog type literal.

use crate::model::{DataType, Items, Properties, PropertySchema, TextMode, Variants};
use crate::util::{escape_single_quotes, upsert};

use super::descriptors::TypeDescriptors;
use super::dialect::TypeDialect;

/// Length used for char/varchar literals that carry no explicit length
pub const DEFAULT_CHAR_LENGTH: u32 = 255;
pub const DEFAULT_DECIMAL_PRECISION: u32 = 9;
pub const DEFAULT_DECIMAL_SCALE: u32 = 0;
/// Field synthesized into a struct that has no active field
pub const PLACEHOLDER_STRUCT_FIELD: &str = "new_column: string";

/// Maps property schemas to type strings for one dialect
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    descriptors: &'a TypeDescriptors,
    dialect: TypeDialect,
}

impl<'a> TypeMapper<'a> {
    pub fn new(descriptors: &'a TypeDescriptors, dialect: TypeDialect) -> Self {
        Self {
            descriptors,
            dialect,
        }
    }

    pub fn dialect(&self) -> TypeDialect {
        self.dialect
    }

    /// Type string of a property.
    pub fn type_of(&self, property: &PropertySchema) -> String {
        self.data_type_of(&property.data_type)
    }

    /// Type string of a bare data type. Every data type resolves; nothing errors.
    pub fn data_type_of(&self, data_type: &DataType) -> String {
        match data_type {
            DataType::Text { mode, max_length } => text_type(*mode, *max_length),
            DataType::Numeric {
                mode,
                precision,
                scale,
            } => numeric_type(mode, *precision, *scale),
            DataType::Boolean => "boolean".to_string(),
            DataType::Interval | DataType::Undefined => "string".to_string(),
            DataType::Named(name) => name.clone(),
            DataType::Json { physical_type, .. } => match physical_type {
                Some(physical) => self.data_type_of(physical),
                None => "string".to_string(),
            },
            DataType::Struct {
                properties,
                variants,
            } => self.struct_type(properties, variants),
            DataType::Array {
                items,
                variants,
                subtype,
            } => format!(
                "array<{}>",
                self.collection_item_type("array", items, variants, subtype.as_deref())
            ),
            DataType::Set {
                items,
                variants,
                subtype,
            } => format!(
                "{}<{}>",
                self.dialect.set_keyword(),
                self.collection_item_type("set", items, variants, subtype.as_deref())
            ),
            DataType::Map {
                key_type,
                key_subtype,
                properties,
                variants,
                subtype,
            } => {
                let key = map_key_type(key_type.as_deref(), key_subtype.as_deref());
                let value = properties
                    .first()
                    .map(|(_, prop)| self.type_of(prop))
                    .or_else(|| self.first_variant_union(variants))
                    .unwrap_or_else(|| {
                        self.data_type_of(
                            &self.descriptors.child_by_subtype("map", subtype.as_deref()),
                        )
                    });
                format!("map<{}, {}>", key, value)
            }
            DataType::Union(members) => {
                let types: Vec<String> = members.iter().map(|m| self.data_type_of(m)).collect();
                self.dialect.union_literal(&types, ",")
            }
        }
    }

    fn struct_type(&self, properties: &Properties, variants: &Variants) -> String {
        let mut active = Vec::new();
        let mut inactive = Vec::new();

        for (key, child) in properties {
            let field = struct_field(
                child.display_name(key),
                &self.type_of(child),
                child.comment.as_deref(),
            );
            if child.is_activated {
                active.push(field);
            } else {
                inactive.push(field);
            }
        }

        for (name, union) in self.variant_unions(variants) {
            active.push(struct_field(&name, &union, None));
        }

        if active.is_empty() {
            active.push(PLACEHOLDER_STRUCT_FIELD.to_string());
        }
        let body = if inactive.is_empty() {
            active.join(", ")
        } else {
            format!("{} /*, {} */", active.join(", "), inactive.join(", "))
        };

        format!("struct<{}>", body)
    }

    fn collection_item_type(
        &self,
        parent_type: &str,
        items: &Items,
        variants: &Variants,
        subtype: Option<&str>,
    ) -> String {
        items
            .first()
            .map(|item| self.type_of(item))
            .or_else(|| self.first_variant_union(variants))
            .unwrap_or_else(|| {
                self.data_type_of(&self.descriptors.child_by_subtype(parent_type, subtype))
            })
    }

    fn first_variant_union(&self, variants: &Variants) -> Option<String> {
        self.union_from_one_of(&variants.one_of)
            .into_iter()
            .next()
            .or_else(|| self.union_from_all_of(&variants.all_of).into_iter().next())
            .map(|(_, union)| union)
    }

    /// Union columns synthesized from one-of variants, keyed by field name.
    ///
    /// Every variant that declares a field contributes its type to that field's
    /// union; variants lacking the field are skipped.
    pub fn union_from_one_of(&self, one_of: &[Properties]) -> Vec<(String, String)> {
        let mut collected: Vec<(String, Vec<String>)> = Vec::new();

        for variant in one_of {
            for (key, property) in variant {
                let name = property.display_name(key).to_string();
                let property_type = self.type_of(property);
                match collected.iter_mut().find(|(n, _)| *n == name) {
                    Some((_, types)) => types.push(property_type),
                    None => collected.push((name, vec![property_type])),
                }
            }
        }

        collected
            .into_iter()
            .map(|(name, types)| (name, self.dialect.union_literal(&types, ", ")))
            .collect()
    }

    /// Merged one-of unions of every all-of member that has a one-of block.
    pub fn union_from_all_of(&self, all_of: &[Variants]) -> Vec<(String, String)> {
        let mut merged = Vec::new();
        for member in all_of.iter().filter(|m| !m.one_of.is_empty()) {
            for (name, union) in self.union_from_one_of(&member.one_of) {
                upsert(&mut merged, name, union);
            }
        }
        merged
    }

    /// One-of unions followed by all-of unions; later names overwrite earlier ones in place.
    pub fn variant_unions(&self, variants: &Variants) -> Vec<(String, String)> {
        let mut unions = self.union_from_one_of(&variants.one_of);
        for (name, union) in self.union_from_all_of(&variants.all_of) {
            upsert(&mut unions, name, union);
        }
        unions
    }
}

fn struct_field(name: &str, field_type: &str, comment: Option<&str>) -> String {
    match comment {
        Some(comment) => format!(
            "{}: {} COMMENT '{}'",
            name,
            field_type,
            escape_single_quotes(comment)
        ),
        None => format!("{}: {}", name, field_type),
    }
}

fn text_type(mode: TextMode, max_length: Option<u32>) -> String {
    match mode {
        TextMode::String => "string".to_string(),
        TextMode::Char | TextMode::Varchar => format!(
            "{}({})",
            mode.as_str(),
            max_length.unwrap_or(DEFAULT_CHAR_LENGTH)
        ),
    }
}

pub(super) fn numeric_type(mode: &str, precision: Option<u32>, scale: Option<u32>) -> String {
    if mode != "decimal" || (precision.is_none() && scale.is_none()) {
        return mode.to_string();
    }
    format!(
        "decimal({}, {})",
        precision.unwrap_or(DEFAULT_DECIMAL_PRECISION),
        scale.unwrap_or(DEFAULT_DECIMAL_SCALE)
    )
}

fn map_key_type(key_type: Option<&str>, key_subtype: Option<&str>) -> String {
    match key_subtype {
        Some(sub @ ("char" | "varchar")) => format!("{}({})", sub, DEFAULT_CHAR_LENGTH),
        Some(sub) => sub.to_string(),
        None if key_type == Some("numeric") => "int".to_string(),
        None => "string".to_string(),
    }
}
