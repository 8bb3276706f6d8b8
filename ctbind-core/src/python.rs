//! Python naming rules for generated identifiers.

/// Python reserved keywords that cannot be used as identifiers.
/// Source: https://docs.python.org/3/reference/lexical_analysis.html#keywords
pub const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Check if a name is a Python reserved keyword
pub fn is_python_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}

/// Validate that a name is usable as a Python identifier.
/// Returns None if valid, Some(reason) if invalid
///
/// Only ASCII identifiers are accepted; C declarations never produce anything else.
pub fn validate_identifier(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("name cannot be empty");
    }

    if is_python_keyword(name) {
        return Some("name is a Python reserved keyword");
    }

    let mut chars = name.chars();

    // First character must be a letter or underscore
    if let Some(first) = chars.next()
        && !first.is_ascii_alphabetic()
        && first != '_'
    {
        return Some("name must start with a letter or underscore");
    }

    if chars.any(|c| !c.is_ascii_alphanumeric() && c != '_') {
        return Some("name can only contain letters, numbers, and underscores");
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_keywords() {
        assert!(is_python_keyword("class"));
        assert!(is_python_keyword("None"));
        assert!(!is_python_keyword("none"));
        assert!(!is_python_keyword("struct"));
    }

    #[test]
    fn test_validate_identifier() {
        assert_eq!(validate_identifier("ErrorManager"), None);
        assert_eq!(validate_identifier("_private_1"), None);
        assert_eq!(validate_identifier(""), Some("name cannot be empty"));
        assert_eq!(
            validate_identifier("lambda"),
            Some("name is a Python reserved keyword")
        );
        assert_eq!(
            validate_identifier("1st"),
            Some("name must start with a letter or underscore")
        );
        assert_eq!(
            validate_identifier("jpeg-error"),
            Some("name can only contain letters, numbers, and underscores")
        );
    }
}
