//! A small C tokenizer.
//!
//! Produces the raw token stream a parser would report for a file: comments
//! are kept as tokens, preprocessor directives are split into ordinary
//! tokens (`#`, `define`, `NAME`, ...). Columns are 1-based byte offsets and
//! token extents are half-open.

use crate::{SourceLocation, SourceRange, Token, TokenKind};

const KEYWORDS: &[&str] = &[
    "_Alignas", "_Alignof", "_Atomic", "_Bool", "_Complex", "_Generic", "_Imaginary",
    "_Noreturn", "_Static_assert", "_Thread_local", "auto", "break", "case", "char", "const",
    "continue", "default", "do", "double", "else", "enum", "extern", "float", "for", "goto",
    "if", "inline", "int", "long", "register", "restrict", "return", "short", "signed",
    "sizeof", "static", "struct", "switch", "typedef", "union", "unsigned", "void",
    "volatile", "while",
];

/// Multi-character punctuators, longest first.
const PUNCTUATORS: &[&str] = &[
    "%:%:", "...", "<<=", ">>=", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&",
    "||", "*=", "/=", "%=", "+=", "-=", "&=", "^=", "|=", "##", "<:", ":>", "<%", "%>", "%:",
];

/// Returns true if `word` is a C keyword.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Tokenize `source`, attributing every token to `file`.
///
/// Malformed input never fails: an unterminated comment or literal runs to
/// the end of the input, and stray bytes become single-byte punctuation.
pub fn tokenize(file: &str, source: &str) -> Vec<Token> {
    Lexer::new(file, source).run()
}

struct Lexer<'a> {
    file: &'a str,
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(file: &'a str, source: &'a str) -> Self {
        Self {
            file,
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(byte) = self.peek(0) {
            match byte {
                b'\n' => self.advance(1),
                b' ' | b'\t' | b'\r' | b'\x0b' | b'\x0c' => self.advance(1),
                b'\\' if matches!(self.peek(1), Some(b'\n')) => self.advance(2),
                b'\\' if self.peek(1) == Some(b'\r') && self.peek(2) == Some(b'\n') => {
                    self.advance(3)
                }
                b'/' if self.peek(1) == Some(b'/') => self.line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.block_comment(),
                b'"' | b'\'' => self.quoted(1),
                b'L' | b'u' | b'U' if self.literal_prefix_len() > 0 => {
                    let prefix = self.literal_prefix_len();
                    self.quoted(prefix + 1)
                }
                b'0'..=b'9' => self.number(),
                b'.' if self.peek(1).is_some_and(|b| b.is_ascii_digit()) => self.number(),
                b if b == b'_' || b.is_ascii_alphabetic() => self.word(),
                _ => self.punctuation(),
            }
        }
        self.tokens
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance(&mut self, count: usize) {
        for _ in 0..count {
            match self.peek(0) {
                Some(b'\n') => {
                    self.line += 1;
                    self.column = 1;
                }
                Some(_) => self.column += 1,
                None => return,
            }
            self.pos += 1;
        }
    }

    fn location(&self) -> SourceLocation {
        SourceLocation::new(self.file, self.line, self.column)
    }

    /// Consume `len` bytes as one token.
    fn emit(&mut self, kind: TokenKind, len: usize) {
        let start = self.location();
        let begin = self.pos;
        self.advance(len);
        let end = self.location();
        let spelling = &self.source[begin..self.pos];
        self.tokens
            .push(Token::new(kind, spelling, SourceRange::new(start, end)));
    }

    fn line_comment(&mut self) {
        let len = self.bytes[self.pos..]
            .iter()
            .position(|&b| b == b'\n')
            .unwrap_or(self.bytes.len() - self.pos);
        // a trailing \r belongs to the line break
        let len = if len > 0 && self.bytes[self.pos + len - 1] == b'\r' {
            len - 1
        } else {
            len
        };
        self.emit(TokenKind::Comment, len);
    }

    fn block_comment(&mut self) {
        let rest = &self.source[self.pos + 2..];
        let len = match rest.find("*/") {
            Some(end) => end + 4,
            None => rest.len() + 2,
        };
        self.emit(TokenKind::Comment, len);
    }

    /// Length of an encoding prefix (`L`, `u`, `U`, `u8`) directly followed by a quote.
    fn literal_prefix_len(&self) -> usize {
        let is_quote = |b: Option<u8>| matches!(b, Some(b'"') | Some(b'\''));
        match (self.peek(0), self.peek(1)) {
            (Some(b'u'), Some(b'8')) if is_quote(self.peek(2)) => 2,
            (Some(b'L' | b'u' | b'U'), next) if is_quote(next) => 1,
            _ => 0,
        }
    }

    /// A character or string literal whose opening quote sits at `quote_at - 1`.
    fn quoted(&mut self, quote_at: usize) {
        let quote = self.bytes[self.pos + quote_at - 1];
        let mut len = quote_at;
        while let Some(&b) = self.bytes.get(self.pos + len) {
            len += 1;
            match b {
                b'\\' => len += 1,
                b'\n' => {
                    len -= 1;
                    break;
                }
                _ if b == quote => break,
                _ => {}
            }
        }
        let mut len = len.min(self.bytes.len() - self.pos);
        while !self.source.is_char_boundary(self.pos + len) {
            len += 1;
        }
        self.emit(TokenKind::Literal, len);
    }

    /// A preprocessing number: digits, letters, `_`, `.` and signed exponents.
    fn number(&mut self) {
        let mut len = 1;
        while let Some(b) = self.peek(len) {
            let exponent_sign = matches!(b, b'+' | b'-')
                && matches!(self.bytes[self.pos + len - 1], b'e' | b'E' | b'p' | b'P');
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || exponent_sign {
                len += 1;
            } else {
                break;
            }
        }
        self.emit(TokenKind::Literal, len);
    }

    fn word(&mut self) {
        let len = self.bytes[self.pos..]
            .iter()
            .position(|&b| !(b == b'_' || b.is_ascii_alphanumeric()))
            .unwrap_or(self.bytes.len() - self.pos);
        let word = &self.source[self.pos..self.pos + len];
        let kind = if is_keyword(word) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.emit(kind, len);
    }

    fn punctuation(&mut self) {
        let rest = &self.source[self.pos..];
        let len = PUNCTUATORS
            .iter()
            .find(|punct| rest.starts_with(**punct))
            .map(|punct| punct.len())
            .unwrap_or_else(|| rest.chars().next().map_or(1, char::len_utf8));
        self.emit(TokenKind::Punctuation, len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spellings(source: &str) -> Vec<(TokenKind, String)> {
        tokenize("t.h", source)
            .into_iter()
            .map(|token| (token.kind, token.spelling))
            .collect()
    }

    #[test]
    fn test_declaration_tokens() {
        let tokens = spellings("typedef unsigned int UINT; // note\n");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Keyword, "typedef".to_string()),
                (TokenKind::Keyword, "unsigned".to_string()),
                (TokenKind::Keyword, "int".to_string()),
                (TokenKind::Identifier, "UINT".to_string()),
                (TokenKind::Punctuation, ";".to_string()),
                (TokenKind::Comment, "// note".to_string()),
            ]
        );
    }

    #[test]
    fn test_extents_are_half_open() {
        let tokens = tokenize("t.h", "int x;\n  char y;");
        let x = &tokens[1];
        assert_eq!(x.spelling, "x");
        assert_eq!((x.extent.start.line, x.extent.start.column), (1, 5));
        assert_eq!((x.extent.end.line, x.extent.end.column), (1, 6));

        let char_kw = &tokens[3];
        assert_eq!((char_kw.extent.start.line, char_kw.extent.start.column), (2, 3));
        assert_eq!(char_kw.extent.end.column, 7);
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let tokens = tokenize("t.h", "/* first\n * second\n */\nint a;");
        let comment = &tokens[0];
        assert!(comment.is_comment());
        assert_eq!(comment.spelling, "/* first\n * second\n */");
        assert_eq!(comment.extent.start.line, 1);
        assert_eq!((comment.extent.end.line, comment.extent.end.column), (3, 4));
        assert_eq!(tokens[1].extent.start.line, 4);
    }

    #[test]
    fn test_directive_and_literals() {
        let tokens = spellings("#define MASK 0x1Fu\n#define NEG -1\n#define E 1.5e-3");
        let texts: Vec<&str> = tokens.iter().map(|(_, s)| s.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "#", "define", "MASK", "0x1Fu", "#", "define", "NEG", "-", "1", "#", "define",
                "E", "1.5e-3"
            ]
        );
    }

    #[test]
    fn test_string_and_char_literals() {
        let tokens = spellings(r#"x = L"a\"b"; c = 'q';"#);
        assert!(tokens.contains(&(TokenKind::Literal, r#"L"a\"b""#.to_string())));
        assert!(tokens.contains(&(TokenKind::Literal, "'q'".to_string())));
    }

    #[test]
    fn test_multi_char_punctuation() {
        let tokens = spellings("a->b <<= 2; f(...);");
        let puncts: Vec<&str> = tokens
            .iter()
            .filter(|(kind, _)| *kind == TokenKind::Punctuation)
            .map(|(_, s)| s.as_str())
            .collect();
        assert_eq!(puncts, vec!["->", "<<=", ";", "(", "...", ")", ";"]);
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        let tokens = tokenize("t.h", "int a; /* open");
        assert_eq!(tokens.last().map(|t| t.spelling.as_str()), Some("/* open"));
    }
}
