//! Inverse type mapping: Hive/catalog type literal → property schema.
//!
//! Recursive descent over the token stream. Delimiters inside nested angle
//! brackets belong to the inner literal, so a field list is only ever split
//! at its own depth. Anything that does not parse falls back to `string`.

use sqlparser::tokenizer::Token;
use tracing::debug;

use crate::model::{DataType, Items, Properties, PropertySchema, TextMode, Variants};

use super::mapper::{numeric_type, DEFAULT_DECIMAL_PRECISION, DEFAULT_DECIMAL_SCALE};
use super::token_parser_base::TokenParser;

/// Name given to the value property of a parsed map
pub const MAP_VALUE_PROPERTY: &str = "value";

/// Reconstruct a property schema from a type literal.
///
/// Never fails: malformed literals become a plain text property.
pub fn schema_of(type_string: &str) -> PropertySchema {
    let data_type = parse_type(type_string).unwrap_or_else(|| {
        debug!(type_string, "Unparseable type literal, using string");
        DataType::Text {
            mode: TextMode::String,
            max_length: None,
        }
    });
    PropertySchema::of_type(data_type)
}

/// Parse a type literal, returning `None` if it is malformed.
pub fn parse_type(type_string: &str) -> Option<DataType> {
    let mut parser = TypeLiteralParser::new(type_string)?;
    let data_type = parser.parse_data_type()?;
    parser.base.only_whitespace_left().then_some(data_type)
}

struct TypeLiteralParser {
    base: TokenParser,
}

impl TypeLiteralParser {
    fn new(type_string: &str) -> Option<Self> {
        Some(Self {
            base: TokenParser::new(type_string)?,
        })
    }

    fn parse_data_type(&mut self) -> Option<DataType> {
        self.base.skip_whitespace();
        let name = self.base.parse_identifier()?.to_lowercase();

        match name.as_str() {
            "struct" => self.parse_struct(),
            "array" => Some(DataType::Array {
                items: Items::Single(Box::new(self.parse_single_generic()?)),
                variants: Variants::default(),
                subtype: None,
            }),
            "set" => Some(DataType::Set {
                items: Items::Single(Box::new(self.parse_single_generic()?)),
                variants: Variants::default(),
                subtype: None,
            }),
            "map" => self.parse_map(),
            "uniontype" | "union" => self.parse_union(),
            "string" => Some(DataType::Text {
                mode: TextMode::String,
                max_length: None,
            }),
            "char" | "varchar" => {
                let mode = name.parse().ok()?;
                let max_length = self.parse_parameters()?.first().copied();
                Some(DataType::Text { mode, max_length })
            }
            "decimal" | "numeric" => {
                let params = self.parse_parameters()?;
                Some(DataType::Numeric {
                    mode: "decimal".to_string(),
                    precision: Some(params.first().copied().unwrap_or(DEFAULT_DECIMAL_PRECISION)),
                    scale: Some(params.get(1).copied().unwrap_or(DEFAULT_DECIMAL_SCALE)),
                })
            }
            "double" => {
                self.base.skip_whitespace();
                let _ = self.base.expect_word_ci("precision");
                Some(numeric(&name))
            }
            "tinyint" | "smallint" | "int" | "integer" | "bigint" | "float" => {
                Some(numeric(if name == "integer" { "int" } else { &name }))
            }
            "boolean" => Some(DataType::Boolean),
            "interval" => Some(DataType::Interval),
            _ => Some(DataType::Named(name)),
        }
    }

    /// `(n[, m])` after a primitive name; an absent list yields no parameters.
    fn parse_parameters(&mut self) -> Option<Vec<u32>> {
        self.base.skip_whitespace();
        if self.base.expect_token(&Token::LParen).is_none() {
            return Some(Vec::new());
        }

        let mut params = Vec::new();
        loop {
            self.base.skip_whitespace();
            params.push(self.base.parse_positive_integer()?);
            self.base.skip_whitespace();
            if self.base.expect_token(&Token::Comma).is_none() {
                break;
            }
        }
        self.base.expect_token(&Token::RParen)?;
        Some(params)
    }

    fn open_generic(&mut self) -> Option<()> {
        self.base.skip_whitespace();
        self.base.expect_token(&Token::Lt)
    }

    fn close_generic(&mut self) -> Option<()> {
        self.base.skip_whitespace();
        self.base.expect_token(&Token::Gt)
    }

    fn parse_single_generic(&mut self) -> Option<PropertySchema> {
        self.open_generic()?;
        let inner = self.parse_data_type()?;
        self.close_generic()?;
        Some(PropertySchema::of_type(inner))
    }

    fn parse_struct(&mut self) -> Option<DataType> {
        self.open_generic()?;
        let mut properties: Properties = Vec::new();

        self.base.skip_whitespace();
        if self.base.check_token(&Token::Gt) {
            self.base.advance();
            return Some(struct_of(properties));
        }

        loop {
            self.base.skip_whitespace();
            let name = self.base.parse_identifier()?;
            self.base.skip_whitespace();
            self.base.expect_token(&Token::Colon)?;

            let mut field = PropertySchema::of_type(self.parse_data_type()?);
            self.base.skip_whitespace();
            if self.base.expect_word_ci("COMMENT").is_some() {
                self.base.skip_whitespace();
                field.comment = Some(self.base.parse_string_literal()?);
            }
            properties.push((name, field));

            self.base.skip_whitespace();
            if self.base.expect_token(&Token::Comma).is_none() {
                break;
            }
        }

        self.close_generic()?;
        Some(struct_of(properties))
    }

    fn parse_map(&mut self) -> Option<DataType> {
        self.open_generic()?;
        let key = self.parse_data_type()?;
        self.base.skip_whitespace();
        self.base.expect_token(&Token::Comma)?;
        let value = self.parse_data_type()?;
        self.close_generic()?;

        let (key_type, key_subtype) = map_key(key);

        Some(DataType::Map {
            key_type: Some(key_type),
            key_subtype,
            properties: vec![(
                MAP_VALUE_PROPERTY.to_string(),
                PropertySchema::of_type(value),
            )],
            variants: Variants::default(),
            subtype: None,
        })
    }

    fn parse_union(&mut self) -> Option<DataType> {
        self.open_generic()?;
        let mut members = Vec::new();
        loop {
            members.push(self.parse_data_type()?);
            self.base.skip_whitespace();
            if self.base.expect_token(&Token::Comma).is_none() {
                break;
            }
        }
        self.close_generic()?;
        Some(DataType::Union(members))
    }
}

/// Key tag and key subtype of a parsed map key.
///
/// The subtype holds the literal the forward mapper prints back, so `string`
/// and `int` keys carry none and char/varchar keys carry only their mode.
fn map_key(key: DataType) -> (String, Option<String>) {
    let key_type = key.type_name().to_string();
    let key_subtype = match key {
        DataType::Text {
            mode: TextMode::String,
            ..
        } => None,
        DataType::Text { mode, .. } => Some(mode.as_str().to_string()),
        DataType::Numeric { ref mode, .. } if mode == "int" => None,
        DataType::Numeric {
            mode,
            precision,
            scale,
        } => Some(numeric_type(&mode, precision, scale)),
        DataType::Boolean => Some("boolean".to_string()),
        DataType::Interval => Some("interval".to_string()),
        DataType::Named(name) => Some(name),
        other => {
            debug!(key_type = other.type_name(), "Non-primitive map key, using string");
            return ("text".to_string(), None);
        }
    };
    (key_type, key_subtype)
}

fn numeric(mode: &str) -> DataType {
    DataType::Numeric {
        mode: mode.to_string(),
        precision: None,
        scale: None,
    }
}

fn struct_of(properties: Properties) -> DataType {
    DataType::Struct {
        properties,
        variants: Variants::default(),
    }
}
