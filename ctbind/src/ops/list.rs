//! List operation - top-level declarations of a parsed header.

use std::path::Path;

use ctbind_core::DeclKind;
use ctbind_decl::DeclIndex;
use eyre::Result;

use super::load_unit;
use crate::reports::{DeclarationInfo, ListReport};

/// Execute the list operation.
pub fn list(ast: &Path, kind: Option<DeclKind>) -> Result<ListReport> {
    let index = DeclIndex::new(load_unit(ast)?);
    let mut selection = index.select();
    if let Some(kind) = kind {
        selection = selection.of_kind(kind);
    }
    let declarations = selection
        .iter()
        .map(|decl| DeclarationInfo {
            kind: decl.kind(),
            name: decl.name().to_string(),
            location: index.cursor(decl.id()).location().to_string(),
            definition: decl.is_definition(),
        })
        .collect();

    Ok(ListReport {
        header: index.unit().spelling().to_string(),
        declarations,
    })
}
