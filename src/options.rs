//! Script generation options

use serde::Deserialize;

/// Default catalog CLI invocation prefix
pub const DEFAULT_CLI_TOOL: &str = "aws glue";

/// Which representation a generation call produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptTarget {
    /// Hive Query Language DDL
    HiveQl,
    /// Catalog CLI invocations with embedded JSON payloads
    #[default]
    GlueCli,
}

impl std::str::FromStr for ScriptTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hive" | "hiveql" => Ok(ScriptTarget::HiveQl),
            "glue" | "cli" | "awscli" => Ok(ScriptTarget::GlueCli),
            _ => Err(format!("Unknown script target: {}", s)),
        }
    }
}

/// Where foreign-key constraints are rendered in Hive scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ForeignKeyPlacement {
    /// Trailing `ALTER TABLE ... ADD CONSTRAINT` statements
    #[default]
    AlterTable,
    /// Constraint clauses inside `CREATE TABLE`
    Inline,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetScriptOptions {
    #[serde(default)]
    pub keyword: String,
}

/// Options attached to a generation request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptOptions {
    #[serde(default)]
    pub target_script_options: Option<TargetScriptOptions>,
    #[serde(default)]
    pub foreign_keys: ForeignKeyPlacement,
    #[serde(default)]
    pub cli_tool: Option<String>,
}

impl ScriptOptions {
    /// Hive when the host asked for `hiveQl`, otherwise the catalog CLI script.
    pub fn target(&self) -> ScriptTarget {
        match &self.target_script_options {
            Some(target) if target.keyword == "hiveQl" => ScriptTarget::HiveQl,
            _ => ScriptTarget::GlueCli,
        }
    }

    pub fn with_target(mut self, target: ScriptTarget) -> Self {
        let keyword = match target {
            ScriptTarget::HiveQl => "hiveQl",
            ScriptTarget::GlueCli => "awsCli",
        };
        self.target_script_options = Some(TargetScriptOptions {
            keyword: keyword.to_string(),
        });
        self
    }

    pub fn cli_tool(&self) -> &str {
        self.cli_tool.as_deref().unwrap_or(DEFAULT_CLI_TOOL)
    }
}
