//! Code builder utility for generating properly indented Python code.

use super::Indent;

/// Line buffer with indentation and blank-line bookkeeping.
///
/// Blank lines are never indented. The builder counts the blank lines at the
/// end of its buffer, so spacing requests from consecutive items collapse to
/// the larger of the two instead of adding up.
///
/// # Example
///
/// ```
/// use ctbind_codegen::builder::CodeBuilder;
///
/// let mut builder = CodeBuilder::python();
/// builder
///     .push_line("class Point(Structure):")
///     .push_indent()
///     .push_line("pass")
///     .push_dedent()
///     .pad_to(2)
///     .pad_to(1)
///     .push_line("ORIGIN = Point()");
///
/// assert_eq!(
///     builder.build(),
///     "class Point(Structure):\n    pass\n\n\nORIGIN = Point()\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
    trailing_blanks: usize,
}

impl CodeBuilder {
    /// Create a new CodeBuilder with the specified indentation.
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
            trailing_blanks: 0,
        }
    }

    /// Create a new CodeBuilder with 4-space indentation.
    pub fn python() -> Self {
        Self::new(Indent::PYTHON)
    }

    /// Add a line of code with current indentation.
    ///
    /// An empty line is recorded as a blank line.
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        if s.is_empty() {
            return self.push_blank();
        }
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self.trailing_blanks = 0;
        self
    }

    /// Add several lines at the current indentation.
    pub fn push_lines<S: AsRef<str>>(&mut self, lines: impl IntoIterator<Item = S>) -> &mut Self {
        for line in lines {
            self.push_line(line.as_ref());
        }
        self
    }

    /// Add a blank line.
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self.trailing_blanks += 1;
        self
    }

    /// Add blank lines until at least `count` of them end the buffer.
    pub fn pad_to(&mut self, count: usize) -> &mut Self {
        while self.trailing_blanks < count {
            self.push_blank();
        }
        self
    }

    /// Increase indentation level.
    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    /// Decrease indentation level.
    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Remove one blank line from the start of the buffer, if there is one.
    pub fn drop_leading_blank(&mut self) -> &mut Self {
        if self.buffer.starts_with('\n') {
            if self.trailing_blanks == self.buffer.len() {
                self.trailing_blanks -= 1;
            }
            self.buffer.remove(0);
        }
        self
    }

    /// Remove every blank line at the end of the buffer.
    pub fn trim_trailing_blanks(&mut self) -> &mut Self {
        let trimmed = self.buffer.len() - self.trailing_blanks;
        self.buffer.truncate(trimmed);
        self.trailing_blanks = 0;
        self
    }

    /// Returns true if the buffer starts with a blank line.
    pub fn starts_with_blank(&self) -> bool {
        self.buffer.starts_with('\n')
    }

    /// Number of blank lines at the end of the buffer.
    pub fn trailing_blanks(&self) -> usize {
        self.trailing_blanks
    }

    /// Get the current indentation level.
    pub fn current_indent(&self) -> usize {
        self.indent_level
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    /// Get a reference to the current buffer content.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent.as_str());
        }
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::python()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_lines() {
        let mut builder = CodeBuilder::python();
        builder.push_line("a = 1").push_line("b = 2");
        assert_eq!(builder.build(), "a = 1\nb = 2\n");
    }

    #[test]
    fn test_indentation() {
        let mut builder = CodeBuilder::python();
        builder
            .push_line("class A(Structure):")
            .push_indent()
            .push_line("_fields_ = (")
            .push_indent()
            .push_line("(\"x\", c_int),")
            .push_dedent()
            .push_line(")")
            .push_dedent();
        assert_eq!(
            builder.build(),
            "class A(Structure):\n    _fields_ = (\n        (\"x\", c_int),\n    )\n"
        );
    }

    #[test]
    fn test_blank_lines_are_not_indented() {
        let mut builder = CodeBuilder::python();
        builder.push_indent().push_line("x").push_line("").push_line("y");
        assert_eq!(builder.as_str(), "    x\n\n    y\n");
    }

    #[test]
    fn test_pad_to_takes_maximum() {
        let mut builder = CodeBuilder::python();
        builder.push_line("x").pad_to(1).pad_to(2).pad_to(1);
        assert_eq!(builder.trailing_blanks(), 2);
        builder.push_line("y").pad_to(0);
        assert_eq!(builder.build(), "x\n\n\ny\n");
    }

    #[test]
    fn test_pad_to_at_start() {
        let mut builder = CodeBuilder::python();
        builder.pad_to(2).push_line("class A:");
        assert!(builder.starts_with_blank());
        builder.drop_leading_blank();
        assert_eq!(builder.as_str(), "\nclass A:\n");
    }

    #[test]
    fn test_trim_trailing_blanks() {
        let mut builder = CodeBuilder::python();
        builder.push_line("x").pad_to(2).trim_trailing_blanks();
        assert_eq!(builder.trailing_blanks(), 0);
        assert_eq!(builder.build(), "x\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let mut builder = CodeBuilder::new(Indent::Tab);
        builder.push_dedent().push_indent().push_line("pass");
        assert_eq!(builder.current_indent(), 1);
        assert_eq!(builder.build(), "\tpass\n");
    }
}
