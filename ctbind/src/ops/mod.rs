//! Core operations.
//!
//! This module contains the business logic for ctbind commands,
//! separated from CLI argument parsing and output rendering.

pub mod apply;
pub mod check;
pub mod generate;
pub mod list;

use std::path::Path;

use ctbind_ast::TranslationUnit;
use eyre::{Context, Result};
use tracing::debug;

pub use check::check;
pub use generate::{GenerateOptions, generate};
pub use list::list;

/// Load a translation unit serialized as JSON by a parser adapter.
pub fn load_unit(path: &Path) -> Result<TranslationUnit> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    let unit = TranslationUnit::from_json(&json)
        .wrap_err_with(|| format!("Invalid translation unit in {}", path.display()))?;
    debug!(
        path = %path.display(),
        header = unit.spelling(),
        cursors = unit.cursor_ids().count(),
        "loaded translation unit"
    );
    Ok(unit)
}
