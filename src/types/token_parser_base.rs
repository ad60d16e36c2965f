//! Base token parser providing navigation helpers over Hive type literals.
//!
//! Type strings are tokenized with `HiveTypeLiteralDialect`, a `HiveDialect`
//! that also reads backslash escapes in string literals (struct field
//! comments are written as `'it\'s'`). The tokenizer reads `>>` as a single
//! shift operator, which closes two nested generics in a type literal, so it
//! is split back into two `>` tokens up front.

use std::any::TypeId;

use sqlparser::dialect::{Dialect, HiveDialect};
use sqlparser::tokenizer::{Token, Tokenizer};

/// `HiveDialect` with backslash escapes in quoted strings.
#[derive(Debug)]
pub struct HiveTypeLiteralDialect {
    base: HiveDialect,
}

impl HiveTypeLiteralDialect {
    pub fn new() -> Self {
        Self {
            base: HiveDialect {},
        }
    }
}

impl Default for HiveTypeLiteralDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for HiveTypeLiteralDialect {
    // Report as HiveDialect for dialect_of!() checks
    fn dialect(&self) -> TypeId {
        TypeId::of::<HiveDialect>()
    }

    fn is_identifier_start(&self, ch: char) -> bool {
        self.base.is_identifier_start(ch)
    }

    fn is_identifier_part(&self, ch: char) -> bool {
        self.base.is_identifier_part(ch)
    }

    fn is_delimited_identifier_start(&self, ch: char) -> bool {
        self.base.is_delimited_identifier_start(ch)
    }

    fn supports_numeric_prefix(&self) -> bool {
        self.base.supports_numeric_prefix()
    }

    fn supports_string_literal_backslash_escape(&self) -> bool {
        true
    }
}

/// Token stream with a cursor and the common check/expect helpers.
pub struct TokenParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenParser {
    /// Create a new TokenParser from a type literal.
    ///
    /// Returns `None` if tokenization fails (unterminated quotes and the like).
    pub fn new(text: &str) -> Option<Self> {
        let dialect = HiveTypeLiteralDialect::new();
        let raw = Tokenizer::new(&dialect, text).tokenize().ok()?;

        let tokens = raw
            .into_iter()
            .flat_map(|token| match token {
                Token::ShiftRight => vec![Token::Gt, Token::Gt],
                other => vec![other],
            })
            .collect();

        Some(Self { tokens, pos: 0 })
    }

    // ========================================================================
    // Position and state
    // ========================================================================

    /// Check if at end of tokens.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Get current token without consuming.
    #[inline]
    pub fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Advance to next token.
    #[inline]
    pub fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    /// Skip whitespace tokens. Comments are whitespace to the tokenizer.
    pub fn skip_whitespace(&mut self) {
        while let Some(Token::Whitespace(_)) = self.current_token() {
            self.advance();
        }
    }

    /// True when only whitespace remains.
    pub fn only_whitespace_left(&mut self) -> bool {
        self.skip_whitespace();
        self.is_at_end()
    }

    // ========================================================================
    // Token type checks
    // ========================================================================

    /// Check if current token is a word matching (case-insensitive).
    #[inline]
    pub fn check_word_ci(&self, word: &str) -> bool {
        matches!(self.current_token(), Some(Token::Word(w)) if w.value.eq_ignore_ascii_case(word))
    }

    /// Check if current token matches a specific token type (by discriminant).
    #[inline]
    pub fn check_token(&self, expected: &Token) -> bool {
        self.current_token()
            .is_some_and(|token| std::mem::discriminant(token) == std::mem::discriminant(expected))
    }

    // ========================================================================
    // Expect methods (check and advance)
    // ========================================================================

    /// Expect a specific word (case-insensitive), advancing if found.
    pub fn expect_word_ci(&mut self, word: &str) -> Option<()> {
        if self.check_word_ci(word) {
            self.advance();
            Some(())
        } else {
            None
        }
    }

    /// Expect a specific token type, advancing if found.
    ///
    /// Returns `Some(())` if the token type was found and position advanced,
    /// `None` otherwise (position unchanged).
    pub fn expect_token(&mut self, expected: &Token) -> Option<()> {
        if self.check_token(expected) {
            self.advance();
            Some(())
        } else {
            None
        }
    }

    // ========================================================================
    // Value parsing
    // ========================================================================

    /// Parse an identifier (plain or backtick/double-quoted).
    ///
    /// Returns the identifier value without quotes.
    pub fn parse_identifier(&mut self) -> Option<String> {
        match self.current_token()? {
            Token::Word(w) => {
                let name = w.value.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        }
    }

    /// Parse a positive integer only.
    ///
    /// Hive lets identifiers start with digits, so a bare number may also
    /// arrive as a word token.
    pub fn parse_positive_integer(&mut self) -> Option<u32> {
        let value = match self.current_token()? {
            Token::Number(n, _) => n.parse::<u32>().ok()?,
            Token::Word(w) if w.quote_style.is_none() => w.value.parse::<u32>().ok()?,
            _ => return None,
        };
        self.advance();
        Some(value)
    }

    /// Parse a single-quoted string literal.
    pub fn parse_string_literal(&mut self) -> Option<String> {
        match self.current_token()? {
            Token::SingleQuotedString(s) | Token::DoubleQuotedString(s) => {
                let value = s.clone();
                self.advance();
                Some(value)
            }
            _ => None,
        }
    }
}
