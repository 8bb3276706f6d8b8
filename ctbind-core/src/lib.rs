//! Core utilities and types for the ctbind binding generator.
//!
//! This crate provides the glossary enums shared by the declaration model,
//! the code generator and the manifest, plus Python naming rules and
//! generated-file writing.

mod file;
mod kind;
mod python;

// File operations
pub use file::{File, FileRules, Overwrite, WriteResult};
// Glossary enums
pub use kind::{DeclKind, DefinitionMode};
// Python naming
pub use python::{PYTHON_KEYWORDS, is_python_keyword, validate_identifier};
