//! Raw tokens of a translation unit.

use serde::{Deserialize, Serialize};

use crate::SourceRange;

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Punctuation,
    Keyword,
    Identifier,
    Literal,
    Comment,
}

/// A token with its source extent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub spelling: String,
    pub extent: SourceRange,
}

impl Token {
    pub fn new(kind: TokenKind, spelling: impl Into<String>, extent: SourceRange) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            extent,
        }
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }

    /// Returns true for punctuation spelled exactly `punct`.
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.spelling == punct
    }
}
