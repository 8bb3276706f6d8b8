//! Check operation - manifest validation, optionally against a parsed header.

use std::path::Path;

use ctbind_decl::DeclIndex;
use ctbind_manifest::Manifest;
use eyre::Result;

use super::{apply, load_unit};
use crate::reports::CheckReport;

/// Execute the check operation.
///
/// Parsing already validated the manifest. With `ast`, the rules are also
/// resolved against the header's declarations.
pub fn check(manifest: &Manifest, config_path: &Path, ast: Option<&Path>) -> Result<CheckReport> {
    let resolved = match ast {
        Some(ast) => {
            let mut index = DeclIndex::new(load_unit(ast)?);
            Some(apply::apply(manifest, &mut index)?)
        }
        None => None,
    };

    let rules = manifest
        .includes
        .iter()
        .map(|rule| {
            let mut line = format!("include {}", rule.describe());
            if let Some(alias) = &rule.alias {
                line.push_str(&format!(" as {alias}"));
            }
            if let Some(before) = &rule.before {
                line.push_str(&format!(" before {before}"));
            }
            line
        })
        .chain(manifest.forwards.iter().map(|rule| {
            format!("forward {} '{}' before {}", rule.kind, rule.name, rule.before)
        }))
        .chain(manifest.opaques.iter().map(|rule| {
            format!("opaque {} '{}' before {}", rule.kind, rule.name, rule.before)
        }))
        .collect();

    Ok(CheckReport {
        config_path: config_path.to_path_buf(),
        header: manifest.module.header.clone(),
        library: manifest
            .library
            .as_ref()
            .map(|library| format!("{} = {}", library.handle, library.path)),
        rules,
        resolved,
    })
}
