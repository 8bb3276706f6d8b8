//! Apply manifest rules to a declaration index.

use std::path::Path;

use ctbind_core::DeclKind;
use ctbind_decl::{DeclId, DeclIndex};
use ctbind_manifest::{DeclRef, IncludeRule, Manifest, OpaqueRule};
use eyre::{Context, Result};
use tracing::debug;

/// What applying a manifest changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplySummary {
    pub included: usize,
    pub forwards: usize,
    pub opaques: usize,
}

/// Mark declarations for emission following the manifest's rules.
///
/// Include rules run first, in file order, then forward splits and opaque
/// placeholders, whose `before` targets usually come from include rules.
/// A manifest without include rules selects every declaration of the main
/// header, leaving out functions when no library is configured.
pub fn apply(manifest: &Manifest, index: &mut DeclIndex) -> Result<ApplySummary> {
    let mut summary = ApplySummary::default();

    if manifest.includes.is_empty() {
        summary.included = include_main_header(manifest, index);
    }
    for (position, rule) in manifest.includes.iter().enumerate() {
        summary.included += include(manifest, rule, index)
            .wrap_err_with(|| format!("include[{position}]: {}", rule.describe()))?;
    }

    for (position, rule) in manifest.forwards.iter().enumerate() {
        let id = index
            .named(rule.kind, &rule.name)
            .and_then(|id| {
                let before = resolve(index, &rule.before)?;
                index.include_forward(id, before, rule.export)
            })
            .wrap_err_with(|| format!("forward[{position}]: {} '{}'", rule.kind, rule.name))?;
        debug!(name = %rule.name, forward = %id, "applied forward rule");
        summary.forwards += 1;
    }

    for (position, rule) in manifest.opaques.iter().enumerate() {
        opaque(rule, index)
            .wrap_err_with(|| format!("opaque[{position}]: {} '{}'", rule.kind, rule.name))?;
        summary.opaques += 1;
    }

    Ok(summary)
}

fn include_main_header(manifest: &Manifest, index: &mut DeclIndex) -> usize {
    let main = manifest
        .module
        .header
        .clone()
        .unwrap_or_else(|| index.unit().spelling().to_string());
    let with_functions = manifest.library.is_some();
    let ids = index
        .select()
        .filter(|decl| {
            decl.file().is_some_and(|file| in_header(file, &main))
                && (with_functions || decl.kind() != DeclKind::Function)
                && (decl.kind() != DeclKind::Struct || decl.is_definition())
        })
        .into_ids();
    debug!(header = %main, count = ids.len(), "including main header");
    index.include_all(&ids, true);
    ids.len()
}

fn include(manifest: &Manifest, rule: &IncludeRule, index: &mut DeclIndex) -> Result<usize> {
    let header = manifest.header_for(rule);
    let mut selection = match rule.kind {
        DeclKind::Struct => index.select().structs(),
        kind => index.select().of_kind(kind),
    };
    if let Some(header) = header {
        selection = selection.filter(|decl| decl.file().is_some_and(|file| in_header(file, header)));
    }
    let ids = match &rule.name {
        Some(name) => vec![selection.named(name).single(rule.kind, name)?],
        None => selection.into_ids(),
    };
    let before = rule
        .before
        .as_ref()
        .map(|before| resolve(index, before))
        .transpose()?;

    for &id in &ids {
        index.include(id, rule.export, before);
        if let Some(alias) = &rule.alias {
            index.rename(id, alias.as_str());
        }
    }
    Ok(ids.len())
}

fn opaque(rule: &OpaqueRule, index: &mut DeclIndex) -> Result<()> {
    let target = match (rule.kind, rule.member_path()) {
        (DeclKind::Field, Some((record, field))) => {
            let record = index
                .struct_named(record)
                .or_else(|_| index.union_named(record))?;
            index.field(record, field)?
        }
        (DeclKind::Parameter, Some((function, parameter))) => {
            let function = index.function(function)?;
            index.parameter(function, parameter)?
        }
        (kind, _) => index.named(kind, &rule.name)?,
    };
    let before = resolve(index, &rule.before)?;
    index.include_opaque_type(target, before, rule.export)?;
    Ok(())
}

fn resolve(index: &DeclIndex, target: &DeclRef) -> ctbind_decl::Result<DeclId> {
    index.named(target.kind, &target.name)
}

/// Whether `file` is `header`, compared by trailing path components.
fn in_header(file: &str, header: &str) -> bool {
    Path::new(file).ends_with(header)
}

#[cfg(test)]
mod tests {
    use ctbind_ast::{Cursor, CursorKind, SourceRange, TranslationUnitBuilder, TypeKind};

    use super::*;

    fn range(file: &str, line: u32) -> SourceRange {
        SourceRange::in_file(file, (line, 1), (line, 40))
    }

    /// `struct node { struct node *next; struct pool *pool; };`, a typedef,
    /// a function and a macro from `/usr/include/list.h`, plus a struct
    /// from another header.
    fn sample() -> DeclIndex {
        let main = "/usr/include/list.h";
        let mut builder = TranslationUnitBuilder::new(main);
        let int = builder.builtin(TypeKind::Int);
        let pool = builder.add_cursor(
            None,
            Cursor::new(CursorKind::StructDecl, "pool", range("/usr/include/pool.h", 1)),
        );
        builder.record(pool);
        builder.add_cursor(None, Cursor::new(CursorKind::MacroDefinition, "LIST_MAX", range(main, 1)));
        let node = builder.add_cursor(
            None,
            Cursor::new(CursorKind::StructDecl, "node", range(main, 2)).definition(),
        );
        builder.record(node);
        let node_ref = builder.elaborated(node);
        let node_ptr = builder.pointer(node_ref);
        let pool_ref = builder.elaborated(pool);
        let pool_ptr = builder.pointer(pool_ref);
        builder.add_cursor(
            Some(node),
            Cursor::new(CursorKind::FieldDecl, "next", range(main, 3)).with_type(node_ptr),
        );
        builder.add_cursor(
            Some(node),
            Cursor::new(CursorKind::FieldDecl, "pool", range(main, 4)).with_type(pool_ptr),
        );
        builder.add_cursor(
            None,
            Cursor::new(CursorKind::TypedefDecl, "count_t", range(main, 6)).with_underlying_type(int),
        );
        let proto = builder.function_proto(int, vec![node_ptr]);
        let length = builder.add_cursor(
            None,
            Cursor::new(CursorKind::FunctionDecl, "list_length", range(main, 7)).with_type(proto),
        );
        builder.add_cursor(
            Some(length),
            Cursor::new(CursorKind::ParmDecl, "head", range(main, 7)).with_type(node_ptr),
        );
        DeclIndex::new(builder.build())
    }

    fn included(index: &DeclIndex) -> Vec<String> {
        index
            .select()
            .included()
            .iter()
            .map(|decl| decl.alias().to_string())
            .collect()
    }

    #[test]
    fn test_empty_manifest_includes_main_header() {
        let mut index = sample();
        let summary = apply(&Manifest::default(), &mut index).unwrap();
        assert_eq!(summary.included, 3);
        assert_eq!(included(&index), vec!["LIST_MAX", "node", "count_t"]);
    }

    #[test]
    fn test_include_rules() {
        let manifest: Manifest = r#"
[module]
header = "list.h"

[library]
path = "liblist.so"

[[include]]
kind = "struct"
name = "node"
alias = "Node"

[[include]]
kind = "function"
export = false
"#
        .parse()
        .unwrap();
        let mut index = sample();
        let summary = apply(&manifest, &mut index).unwrap();
        assert_eq!(summary.included, 2);
        assert_eq!(included(&index), vec!["Node", "list_length"]);

        let function = index.function("list_length").unwrap();
        assert!(!index.get(function).is_exported());
    }

    #[test]
    fn test_header_filter_excludes_other_files() {
        let manifest: Manifest = "[module]\nheader = \"pool.h\"\n\n[[include]]\nkind = \"typedef\"\n"
            .parse()
            .unwrap();
        let mut index = sample();
        let summary = apply(&manifest, &mut index).unwrap();
        assert_eq!(summary.included, 0);
    }

    #[test]
    fn test_opaque_field_rule() {
        let manifest: Manifest = r#"
[[include]]
kind = "struct"
name = "node"

[[opaque]]
kind = "field"
name = "node.pool"
before = { kind = "struct", name = "node" }
"#
        .parse()
        .unwrap();
        let mut index = sample();
        let summary = apply(&manifest, &mut index).unwrap();
        assert_eq!(summary.opaques, 1);

        let node = index.struct_named("node").unwrap();
        let predecessors: Vec<DeclId> = index.get(node).predecessors().collect();
        assert_eq!(predecessors.len(), 1);
        let placeholder = index.get(predecessors[0]);
        assert_eq!(placeholder.kind(), DeclKind::Opaque);
        assert_eq!(placeholder.name(), "pool");
    }

    #[test]
    fn test_opaque_rule_needs_pointer() {
        let manifest: Manifest = r#"
[library]
path = "liblist.so"

[[include]]
kind = "function"
name = "list_length"

[[opaque]]
kind = "typedef"
name = "count_t"
before = { kind = "function", name = "list_length" }
"#
        .parse()
        .unwrap();
        let mut index = sample();
        let err = apply(&manifest, &mut index).unwrap_err();
        assert_eq!(err.to_string(), "opaque[0]: typedef 'count_t'");
        assert_eq!(
            err.root_cause().to_string(),
            "type of 'count_t' is not a pointer"
        );
    }

    #[test]
    fn test_unknown_name_is_reported() {
        let manifest: Manifest = "[[include]]\nkind = \"struct\"\nname = \"missing\"\n"
            .parse()
            .unwrap();
        let mut index = sample();
        let err = apply(&manifest, &mut index).unwrap_err();
        assert_eq!(err.to_string(), "include[0]: struct 'missing'");
        assert_eq!(err.root_cause().to_string(), "no struct named 'missing'");
    }

    #[test]
    fn test_forward_rule() {
        let manifest: Manifest = r#"
[[include]]
kind = "struct"
name = "node"

[[include]]
kind = "typedef"

[[forward]]
kind = "struct"
name = "node"
before = { kind = "typedef", name = "count_t" }
"#
        .parse()
        .unwrap();
        let mut index = sample();
        let summary = apply(&manifest, &mut index).unwrap();
        assert_eq!(summary.forwards, 1);
        let typedef = index.typedef("count_t").unwrap();
        assert_eq!(index.get(typedef).predecessors().count(), 1);
    }

    #[test]
    fn test_in_header() {
        assert!(in_header("/usr/include/jpeglib.h", "jpeglib.h"));
        assert!(in_header("jpeglib.h", "jpeglib.h"));
        assert!(!in_header("/usr/include/myjpeglib.h", "jpeglib.h"));
    }
}
