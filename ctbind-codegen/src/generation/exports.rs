//! The `__all__` list of a generated module.

use std::collections::BTreeSet;

use crate::builder::CodeBuilder;

/// Exported aliases, kept sorted.
#[derive(Debug, Clone, Default)]
pub struct ExportList {
    names: BTreeSet<String>,
}

impl ExportList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// Write the `__all__` assignment, one quoted name per line.
    pub fn render(&self, builder: &mut CodeBuilder) {
        builder.push_line("__all__ = [");
        builder.push_indent();
        for name in &self.names {
            builder.push_line(&format!("\"{name}\","));
        }
        builder.push_dedent();
        builder.push_line("]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_sorted_and_unique() {
        let mut exports = ExportList::new();
        exports.add("Level");
        exports.add("DCTSIZE");
        exports.add("Level");
        assert_eq!(exports.len(), 2);

        let mut builder = CodeBuilder::python();
        exports.render(&mut builder);
        assert_eq!(
            builder.build(),
            "__all__ = [\n    \"DCTSIZE\",\n    \"Level\",\n]\n"
        );
    }
}
