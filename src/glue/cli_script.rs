//! Catalog CLI script composition and payload extraction

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::GlueDdlError;

use super::payload::{CreateDatabaseRequest, CreateTableRequest};

pub const CREATE_DATABASE: &str = "create-database";
pub const CREATE_TABLE: &str = "create-table";

/// Statement separator of composed scripts
pub const STATEMENT_SEPARATOR: &str = "\n\n";

/// `<tool> create-database|create-table '<json>'` on a single line
static CLI_STATEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(.*?)\s*\bcreate-(database|table)\s+'(.*\})'\s*$").unwrap()
});

/// Render one CLI invocation with its payload as 2-space indented JSON.
pub fn cli_statement<T: Serialize>(
    cli_tool: &str,
    command: &str,
    payload: &T,
) -> Result<String, serde_json::Error> {
    Ok(format!(
        "{} {} '{}'",
        cli_tool,
        command,
        serde_json::to_string_pretty(payload)?
    ))
}

pub fn compose_cli_script(statements: &[String]) -> String {
    statements.join(STATEMENT_SEPARATOR)
}

/// Payloads recovered from a composed CLI script
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiStatements {
    pub databases: Vec<CreateDatabaseRequest>,
    pub tables: Vec<CreateTableRequest>,
}

impl ApiStatements {
    pub fn is_empty(&self) -> bool {
        self.databases.is_empty() && self.tables.is_empty()
    }
}

fn parse_payload<T: DeserializeOwned>(json: &str, command: &str) -> Result<T, GlueDdlError> {
    serde_json::from_str(json).map_err(|source| GlueDdlError::DocumentParse {
        document: format!("{} payload", command),
        source,
    })
}

/// Extract `create-database` / `create-table` payloads from a script.
///
/// Statements are split on blank lines and flattened to one line before
/// matching; anything that is not a CLI invocation (Hive DDL, comments) is
/// skipped.
pub fn api_statements(script: &str) -> Result<ApiStatements, GlueDdlError> {
    let mut statements = ApiStatements::default();

    for statement in script.split(STATEMENT_SEPARATOR) {
        let one_line = statement.replace(['\r', '\n'], "");
        let Some(captures) = CLI_STATEMENT_RE.captures(&one_line) else {
            continue;
        };

        debug!(tool = &captures[1], command = &captures[2], "Found CLI statement");
        if captures[2].eq_ignore_ascii_case("database") {
            statements
                .databases
                .push(parse_payload(&captures[3], CREATE_DATABASE)?);
        } else {
            statements.tables.push(parse_payload(&captures[3], CREATE_TABLE)?);
        }
    }

    Ok(statements)
}
