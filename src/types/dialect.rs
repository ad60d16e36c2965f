//! Dialect-specific spellings of complex type literals

/// Literal spellings that differ between Hive DDL and catalog payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDialect {
    /// Keyword of the union literal (`uniontype<...>` or `union<...>`)
    pub union_keyword: &'static str,
    /// Whether `set<T>` is emitted; otherwise sets render as `array<T>`
    pub native_sets: bool,
}

impl TypeDialect {
    pub const HIVE: TypeDialect = TypeDialect {
        union_keyword: "uniontype",
        native_sets: false,
    };

    pub const GLUE: TypeDialect = TypeDialect {
        union_keyword: "union",
        native_sets: true,
    };

    /// Render a union literal over already-mapped member types.
    pub fn union_literal(&self, members: &[String], separator: &str) -> String {
        format!("{}<{}>", self.union_keyword, members.join(separator))
    }

    /// Collection keyword for a set-typed property.
    pub fn set_keyword(&self) -> &'static str {
        if self.native_sets {
            "set"
        } else {
            "array"
        }
    }
}

impl Default for TypeDialect {
    fn default() -> Self {
        TypeDialect::HIVE
    }
}
