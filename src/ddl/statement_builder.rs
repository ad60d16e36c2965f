//! Conditional clause accumulator shared by every statement assembler.
//!
//! A statement is an opening clause followed by optional clauses, each on its
//! own line and appended only when its condition holds. Clause order is the
//! order of the calls. `build` appends the terminator and comments out every
//! line of a deactivated statement.

use crate::util::{comment_if_deactivated, indent_string, COMMENT_MARKER};

/// Indentation of column-level clauses
pub const CLAUSE_INDENT: usize = 4;

#[derive(Debug, Clone)]
pub struct StatementBuilder {
    opening: String,
    clauses: Vec<String>,
    is_activated: bool,
}

impl StatementBuilder {
    pub fn new(opening: impl Into<String>) -> Self {
        Self {
            opening: opening.into(),
            clauses: Vec::new(),
            is_activated: true,
        }
    }

    /// Global activation state applied at `build`.
    pub fn activated(mut self, is_activated: bool) -> Self {
        self.is_activated = is_activated;
        self
    }

    /// Append a clause when `condition` holds; the text is rendered lazily.
    pub fn clause(mut self, condition: bool, text: impl FnOnce() -> String) -> Self {
        if condition {
            self.clauses.push(text());
        }
        self
    }

    /// Append a clause rendered from a present value.
    pub fn optional<T>(mut self, value: Option<T>, render: impl FnOnce(T) -> String) -> Self {
        if let Some(value) = value {
            self.clauses.push(render(value));
        }
        self
    }

    /// Append an indented clause when `condition` holds.
    pub fn indented_clause(mut self, condition: bool, text: impl FnOnce() -> String) -> Self {
        if condition {
            self.clauses.push(indent_string(&text(), CLAUSE_INDENT));
        }
        self
    }

    /// Opening and clauses joined by newlines, with no terminator.
    pub fn compose(&self) -> String {
        let mut statement = self.opening.clone();
        for clause in &self.clauses {
            statement.push('\n');
            statement.push_str(clause);
        }
        statement
    }

    /// Terminated statement, commented out when inactive.
    ///
    /// The terminator of an active statement moves to its own line when the
    /// last clause is commented out, so it stays live.
    pub fn build(self) -> String {
        let mut statement = self.compose();
        let last_line_commented = statement
            .rsplit('\n')
            .next()
            .is_some_and(|line| line.trim_start().starts_with(COMMENT_MARKER.trim_end()));
        if self.is_activated && last_line_commented {
            statement.push('\n');
        }
        statement.push(';');
        comment_if_deactivated(&statement, self.is_activated)
    }
}
