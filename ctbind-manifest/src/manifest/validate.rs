//! Validation context and utilities for manifest parsing.

use std::sync::Arc;

use ctbind_core::{DeclKind, is_python_keyword, validate_identifier};
use miette::SourceSpan;

use crate::{Result, error::SourceContext};

/// Parsing and validation context that carries source information.
///
/// Carries the source for error reporting and the path of the table being
/// validated, e.g. `include[2]`.
///
/// # Example
///
/// ```ignore
/// let ctx = ParseContext::new(src, "ctbind.toml");
/// ctx.push("include[0]").validate_name("ErrorManager", "alias")?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Source context for error reporting (shared across nested contexts)
    source: Arc<SourceContext>,
    path: Vec<String>,
}

impl ParseContext {
    /// Create a new parse context with the given source and filename.
    pub fn new(src: &str, filename: &str) -> Self {
        Self {
            source: Arc::new(SourceContext::new(src, filename)),
            path: Vec::new(),
        }
    }

    pub fn src(&self) -> &str {
        self.source.src()
    }

    pub fn filename(&self) -> &str {
        self.source.filename()
    }

    /// Get the source context for error creation.
    pub fn source_context(&self) -> &SourceContext {
        &self.source
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(segment.into());
        Self {
            source: Arc::clone(&self.source),
            path,
        }
    }

    /// Get the current path as a dot-separated string.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Get a context description for error messages.
    ///
    /// For example: "alias in 'include[0]'" or just "alias" if no path.
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    /// A validation error pointing at `key = "value"` when it can be found.
    pub fn error_at(&self, message: impl AsRef<str>, key: &str, value: &str) -> Box<crate::Error> {
        let message = if self.path.is_empty() {
            message.as_ref().to_string()
        } else {
            format!("{}: {}", self.path_string(), message.as_ref())
        };
        self.source
            .validation_error(message, find_value_span(self.src(), key, value))
    }

    /// Validate that `name`, the value of `key`, is a usable Python identifier.
    pub fn validate_name(&self, name: &str, key: &str) -> Result<()> {
        let span = find_value_span(self.src(), key, name);
        if is_python_keyword(name) {
            return Err(self
                .source
                .reserved_keyword_error(name, self.context_for(key), span));
        }

        if let Some(reason) = validate_identifier(name) {
            return Err(self.source.invalid_identifier_error(
                name,
                self.context_for(key),
                reason,
                span,
            ));
        }

        Ok(())
    }

    /// Validate that `kind` is one of `allowed`.
    pub fn expect_kind(&self, kind: DeclKind, allowed: &[DeclKind], what: &str) -> Result<()> {
        if allowed.contains(&kind) {
            return Ok(());
        }
        let valid: Vec<&str> = allowed.iter().map(DeclKind::as_str).collect();
        Err(self.error_at(
            format!("{what} does not accept kind '{kind}' (expected one of: {})", valid.join(", ")),
            "kind",
            kind.as_str(),
        ))
    }
}

/// Find the span of `value` in a `key = "value"` assignment.
///
/// Accepts single or double quotes and optional spaces around `=`. Returns
/// `None` rather than guess when the assignment is not found.
pub(crate) fn find_value_span(src: &str, key: &str, value: &str) -> Option<SourceSpan> {
    for quote in ['"', '\''] {
        for separator in [" = ", "=", " =", "= "] {
            let pattern = format!("{key}{separator}{quote}{value}{quote}");
            let mut offset = 0;
            while let Some(pos) = src[offset..].find(&pattern) {
                let start = offset + pos;
                // keys like `alias` must not match `my_alias`
                let boundary = src[..start]
                    .chars()
                    .next_back()
                    .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '_'));
                if boundary {
                    let value_start = start + key.len() + separator.len() + 1;
                    return Some(SourceSpan::from((value_start, value.len())));
                }
                offset = start + pattern.len();
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_value_span() {
        let src = "[[include]]\nkind = \"struct\"\nname = \"point\"\n";
        let span = find_value_span(src, "name", "point").unwrap();
        assert_eq!(&src[span.offset()..span.offset() + span.len()], "point");
    }

    #[test]
    fn test_find_value_span_inline_table() {
        let src = "before = { kind = 'struct', name='B' }";
        let span = find_value_span(src, "name", "B").unwrap();
        assert_eq!(&src[span.offset()..span.offset() + span.len()], "B");
    }

    #[test]
    fn test_find_value_span_respects_key_boundary() {
        let src = "my_name = \"x\"\nname = \"x\"";
        let span = find_value_span(src, "name", "x").unwrap();
        assert_eq!(span.offset(), src.rfind('x').unwrap());
        assert!(find_value_span(src, "alias", "x").is_none());
    }

    #[test]
    fn test_validate_name() {
        let ctx = ParseContext::new("alias = \"class\"", "ctbind.toml").push("include[0]");
        let err = ctx.validate_name("class", "alias").unwrap_err();
        assert!(matches!(*err, crate::Error::ReservedKeyword { .. }));

        let err = ctx.validate_name("2fast", "alias").unwrap_err();
        assert!(matches!(
            *err,
            crate::Error::InvalidIdentifier { ref context, .. } if context == "alias in 'include[0]'"
        ));

        assert!(ctx.validate_name("ErrorManager", "alias").is_ok());
    }

    #[test]
    fn test_expect_kind() {
        let ctx = ParseContext::new("kind = \"enum\"", "ctbind.toml");
        assert!(
            ctx.expect_kind(DeclKind::Struct, &[DeclKind::Struct, DeclKind::Union], "forward")
                .is_ok()
        );
        let err = ctx
            .expect_kind(DeclKind::Enum, &[DeclKind::Struct, DeclKind::Union], "forward")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "forward does not accept kind 'enum' (expected one of: struct, union)"
        );
    }
}
