//! Manifest parsing from files and strings.

use std::{path::Path, str::FromStr};

use ctbind_core::DeclKind;

use super::{DeclRef, Manifest, validate::ParseContext};
use crate::{Error, Result, error::SourceContext};

const FORWARD_KINDS: &[DeclKind] = &[DeclKind::Struct, DeclKind::Union];
const OPAQUE_KINDS: &[DeclKind] = &[DeclKind::Typedef, DeclKind::Field, DeclKind::Parameter];
const TOP_LEVEL_KINDS: &[DeclKind] = &[
    DeclKind::Struct,
    DeclKind::Union,
    DeclKind::Enum,
    DeclKind::Typedef,
    DeclKind::Function,
    DeclKind::Macro,
];

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_manifest(s, "ctbind.toml")
    }
}

impl Manifest {
    /// Parse a ctbind.toml file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_manifest(&content, &path.display().to_string())
    }

    /// Parse a ctbind.toml from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        parse_manifest(content, filename)
    }
}

/// Parse a manifest from content with the given filename for error reporting.
pub fn parse_manifest(content: &str, filename: &str) -> Result<Manifest> {
    let source_ctx = SourceContext::new(content, filename);
    let manifest: Manifest = toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;
    validate_manifest(&manifest, content, filename)?;
    Ok(manifest)
}

/// Validate the manifest after parsing.
fn validate_manifest(manifest: &Manifest, src: &str, filename: &str) -> Result<()> {
    let ctx = ParseContext::new(src, filename);

    if let Some(library) = &manifest.library {
        let ctx = ctx.push("library");
        ctx.validate_name(&library.handle, "handle")?;
        if library.path.is_empty() {
            return Err(ctx.error_at("library path cannot be empty", "path", ""));
        }
    }

    for (position, rule) in manifest.includes.iter().enumerate() {
        let ctx = ctx.push(format!("include[{position}]"));
        ctx.expect_kind(rule.kind, TOP_LEVEL_KINDS, "include")?;
        if let Some(alias) = &rule.alias {
            if rule.name.is_none() {
                return Err(ctx.error_at(
                    "an alias needs a `name` to select a single declaration",
                    "alias",
                    alias,
                ));
            }
            ctx.validate_name(alias, "alias")?;
        }
        if rule.kind == DeclKind::Function && manifest.library.is_none() {
            return Err(ctx.error_at(
                "functions are bound through a native library; add a [library] table",
                "kind",
                rule.kind.as_str(),
            ));
        }
        if let Some(before) = &rule.before {
            validate_before(&ctx, before)?;
        }
    }

    for (position, rule) in manifest.forwards.iter().enumerate() {
        let ctx = ctx.push(format!("forward[{position}]"));
        ctx.expect_kind(rule.kind, FORWARD_KINDS, "forward")?;
        validate_before(&ctx, &rule.before)?;
    }

    for (position, rule) in manifest.opaques.iter().enumerate() {
        let ctx = ctx.push(format!("opaque[{position}]"));
        ctx.expect_kind(rule.kind, OPAQUE_KINDS, "opaque")?;
        let is_member = matches!(rule.kind, DeclKind::Field | DeclKind::Parameter);
        if is_member != rule.member_path().is_some() {
            let expected = match rule.kind {
                DeclKind::Field => "fields are named `struct.field`",
                DeclKind::Parameter => "parameters are named `function.param`",
                _ => "typedef names cannot contain `.`",
            };
            return Err(ctx.error_at(expected, "name", &rule.name));
        }
        validate_before(&ctx, &rule.before)?;
    }

    Ok(())
}

fn validate_before(ctx: &ParseContext, before: &DeclRef) -> Result<()> {
    ctx.push("before")
        .expect_kind(before.kind, TOP_LEVEL_KINDS, "before")
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG: &str = r#"
[module]
header = "jpeglib.h"
output = "jpeglib.py"

[library]
path = "libjpeg.so.62"

[[include]]
kind = "macro"

[[include]]
kind = "struct"
name = "jpeg_error_mgr"
alias = "ErrorManager"

[[include]]
kind = "function"
name = "jpeg_std_error"
header = "jerror.h"
export = false

[[forward]]
kind = "struct"
name = "jpeg_compress_struct"
before = { kind = "struct", name = "jpeg_error_mgr" }

[[opaque]]
kind = "field"
name = "jpeg_compress_struct.mem"
before = { kind = "struct", name = "jpeg_compress_struct" }
"#;

    #[test]
    fn test_parse_full_manifest() {
        let manifest: Manifest = JPEG.parse().unwrap();
        assert_eq!(manifest.module.header.as_deref(), Some("jpeglib.h"));
        let library = manifest.library.as_ref().unwrap();
        assert_eq!(library.handle, "_lib");
        assert_eq!(library.path, "libjpeg.so.62");
        assert_eq!(manifest.includes.len(), 3);
        assert_eq!(manifest.rule_count(), 5);

        let function = &manifest.includes[2];
        assert!(!function.export);
        assert_eq!(manifest.header_for(function), Some("jerror.h"));
        assert_eq!(manifest.header_for(&manifest.includes[0]), Some("jpeglib.h"));

        assert_eq!(manifest.forwards[0].before.name, "jpeg_error_mgr");
        assert!(!manifest.forwards[0].export);
        assert_eq!(
            manifest.opaques[0].member_path(),
            Some(("jpeg_compress_struct", "mem"))
        );
    }

    #[test]
    fn test_empty_manifest() {
        let manifest: Manifest = "".parse().unwrap();
        assert!(manifest.library.is_none());
        assert_eq!(manifest.rule_count(), 0);
    }

    #[test]
    fn test_unknown_kind_is_a_parse_error() {
        let err = "[[include]]\nkind = \"class\"\n".parse::<Manifest>().unwrap_err();
        assert!(matches!(*err, Error::Parse { span: Some(_), .. }));
    }

    #[test]
    fn test_unknown_field_is_a_parse_error() {
        let err = "[[include]]\nkind = \"enum\"\nnmae = \"x\"\n"
            .parse::<Manifest>()
            .unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }

    #[test]
    fn test_alias_requires_name() {
        let src = "[[include]]\nkind = \"struct\"\nalias = \"Point\"\n";
        let err = src.parse::<Manifest>().unwrap_err();
        let Error::Validation { span, message, .. } = *err else {
            panic!("expected validation error");
        };
        assert!(message.starts_with("include[0]: an alias needs a `name`"));
        let span = span.unwrap();
        assert_eq!(&src[span.offset()..span.offset() + span.len()], "Point");
    }

    #[test]
    fn test_alias_must_be_python_identifier() {
        let src = "[[include]]\nkind = \"struct\"\nname = \"pass\"\nalias = \"pass\"\n";
        let err = src.parse::<Manifest>().unwrap_err();
        assert!(matches!(*err, Error::ReservedKeyword { ref name, .. } if name == "pass"));

        let src = "[[include]]\nkind = \"struct\"\nname = \"a\"\nalias = \"my-struct\"\n";
        let err = src.parse::<Manifest>().unwrap_err();
        assert!(matches!(*err, Error::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_functions_need_library() {
        let src = "[[include]]\nkind = \"function\"\n";
        let err = src.parse::<Manifest>().unwrap_err();
        assert!(err.to_string().contains("add a [library] table"));
    }

    #[test]
    fn test_rule_kinds_are_checked() {
        let src = "[[include]]\nkind = \"field\"\n";
        assert!(src.parse::<Manifest>().is_err());

        let src = "[[forward]]\nkind = \"enum\"\nname = \"e\"\nbefore = { kind = \"struct\", name = \"s\" }\n";
        assert!(src.parse::<Manifest>().is_err());

        let src = "[[opaque]]\nkind = \"typedef\"\nname = \"t\"\nbefore = { kind = \"field\", name = \"s\" }\n";
        let err = src.parse::<Manifest>().unwrap_err();
        assert!(err.to_string().starts_with("opaque[0].before:"));
    }

    #[test]
    fn test_opaque_member_names() {
        let src = "[[opaque]]\nkind = \"field\"\nname = \"err\"\nbefore = { kind = \"struct\", name = \"s\" }\n";
        let err = src.parse::<Manifest>().unwrap_err();
        assert!(err.to_string().contains("`struct.field`"));

        let src = "[[opaque]]\nkind = \"typedef\"\nname = \"a.b\"\nbefore = { kind = \"struct\", name = \"s\" }\n";
        assert!(src.parse::<Manifest>().is_err());
    }

    #[test]
    fn test_library_handle_is_validated() {
        let src = "[library]\nhandle = \"lambda\"\npath = \"libm.so\"\n";
        let err = src.parse::<Manifest>().unwrap_err();
        assert!(matches!(
            *err,
            Error::ReservedKeyword { ref context, .. } if context == "handle in 'library'"
        ));
    }
}
