//! Import collection for generated Python modules.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::builder::CodeBuilder;

/// Modules importing at least this many symbols use a parenthesized list.
const MULTILINE_THRESHOLD: usize = 5;

/// Tracks imports and deduplicates them.
///
/// Modules keep their insertion order; symbols within a module are sorted.
///
/// # Example
///
/// ```
/// use ctbind_codegen::{builder::CodeBuilder, generation::ImportCollector};
///
/// let mut imports = ImportCollector::new();
/// imports.add("ctypes", "c_int");
/// imports.add("ctypes", "Structure");
/// imports.add("enum", "IntFlag");
///
/// let mut builder = CodeBuilder::python();
/// imports.render(&mut builder);
/// assert_eq!(
///     builder.build(),
///     "from ctypes import Structure, c_int\nfrom enum import IntFlag\n"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImportCollector {
    /// Module path -> set of symbols (sorted for deterministic output)
    imports: IndexMap<String, BTreeSet<String>>,
}

impl ImportCollector {
    /// Create a new empty import collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol import from a module.
    pub fn add(&mut self, module: &str, symbol: &str) {
        self.imports
            .entry(module.to_string())
            .or_default()
            .insert(symbol.to_string());
    }

    /// Add every `(module, symbol)` pair.
    pub fn extend<'a>(&mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (module, symbol) in pairs {
            self.add(module, symbol);
        }
    }

    /// Merge another collector into this one.
    pub fn merge(&mut self, other: &ImportCollector) {
        for (module, symbols) in &other.imports {
            let entry = self.imports.entry(module.clone()).or_default();
            entry.extend(symbols.iter().cloned());
        }
    }

    /// Check if a module is already imported.
    pub fn has_module(&self, module: &str) -> bool {
        self.imports.contains_key(module)
    }

    /// Check if a specific symbol is imported from a module.
    pub fn has_symbol(&self, module: &str, symbol: &str) -> bool {
        self.imports
            .get(module)
            .is_some_and(|symbols| symbols.contains(symbol))
    }

    /// Iterate over all imports in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.imports.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Check if the collector is empty.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Get the number of modules.
    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn clear(&mut self) {
        self.imports.clear();
    }

    /// Write one import statement per module.
    pub fn render(&self, builder: &mut CodeBuilder) {
        for (module, symbols) in self.iter() {
            if symbols.len() < MULTILINE_THRESHOLD {
                let names: Vec<&str> = symbols.iter().map(String::as_str).collect();
                builder.push_line(&format!("from {module} import {}", names.join(", ")));
            } else {
                builder.push_line(&format!("from {module} import ("));
                builder.push_indent();
                for symbol in symbols {
                    builder.push_line(&format!("{symbol},"));
                }
                builder.push_dedent();
                builder.push_line(")");
            }
        }
    }
}
