//! Generate operation - ctypes module from a parsed header and manifest.

use std::path::Path;

use ctbind_codegen::{CTypesGenerator, GeneratorConfig, NativeLibrary};
use ctbind_core::{FileRules, Overwrite, WriteResult};
use ctbind_decl::DeclIndex;
use ctbind_manifest::Manifest;
use eyre::{Context, Result};
use tracing::info;

use super::{apply, load_unit};
use crate::reports::GenerateReport;

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    /// Translation unit JSON produced by a parser adapter.
    pub ast: &'a Path,
    /// Where to write the module; `None` only previews.
    pub output: Option<&'a Path>,
    /// Leave an existing output file untouched.
    pub keep_existing: bool,
}

/// Execute the generate operation.
pub fn generate(manifest: &Manifest, opts: GenerateOptions) -> Result<GenerateReport> {
    let unit = load_unit(opts.ast)?;
    let mut index = DeclIndex::new(unit);
    let summary = apply::apply(manifest, &mut index)?;
    info!(
        included = summary.included,
        forwards = summary.forwards,
        opaques = summary.opaques,
        "applied manifest"
    );

    let mut config = GeneratorConfig::default();
    if let Some(library) = &manifest.library {
        config = config.with_library(NativeLibrary::new(&library.handle, &library.path));
    }
    let module = CTypesGenerator::new(&index, config)
        .generate()
        .wrap_err("Failed to generate module")?;
    let warnings = module.unexposed.iter().map(ToString::to_string).collect();

    let Some(output) = opts.output else {
        return Ok(GenerateReport {
            output: None,
            written: false,
            code: Some(module.code),
            warnings,
        });
    };

    let overwrite = if opts.keep_existing {
        Overwrite::IfMissing
    } else {
        Overwrite::Always
    };
    let file = module
        .into_file(output)
        .with_rules(FileRules { overwrite });
    let written = file
        .write()
        .wrap_err_with(|| format!("Failed to write {}", output.display()))?;

    Ok(GenerateReport {
        output: Some(output.to_path_buf()),
        written: written == WriteResult::Written,
        code: None,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use ctbind_ast::{Cursor, CursorKind, SourceRange, TranslationUnitBuilder, TypeKind};

    use super::*;

    fn write_unit(dir: &Path) -> std::path::PathBuf {
        let mut builder = TranslationUnitBuilder::new("t.h");
        let int = builder.builtin(TypeKind::Int);
        builder.add_cursor(
            None,
            Cursor::new(
                CursorKind::TypedefDecl,
                "count_t",
                SourceRange::in_file("t.h", (1, 1), (1, 20)),
            )
            .with_underlying_type(int),
        );
        let path = dir.join("t.json");
        std::fs::write(&path, builder.build().to_json().unwrap()).unwrap();
        path
    }

    #[test]
    fn test_generate_writes_module() {
        let dir = tempfile::tempdir().unwrap();
        let ast = write_unit(dir.path());
        let output = dir.path().join("out").join("t.py");

        let report = generate(
            &Manifest::default(),
            GenerateOptions {
                ast: &ast,
                output: Some(&output),
                keep_existing: false,
            },
        )
        .unwrap();
        assert!(report.written);
        assert!(report.warnings.is_empty());
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "from ctypes import c_int\n\ncount_t = c_int\n\n__all__ = [\n    \"count_t\",\n]\n"
        );
    }

    #[test]
    fn test_keep_existing_skips_write() {
        let dir = tempfile::tempdir().unwrap();
        let ast = write_unit(dir.path());
        let output = dir.path().join("t.py");
        std::fs::write(&output, "# edited by hand\n").unwrap();

        let report = generate(
            &Manifest::default(),
            GenerateOptions {
                ast: &ast,
                output: Some(&output),
                keep_existing: true,
            },
        )
        .unwrap();
        assert!(!report.written);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "# edited by hand\n");
    }

    #[test]
    fn test_preview_returns_code() {
        let dir = tempfile::tempdir().unwrap();
        let ast = write_unit(dir.path());
        let report = generate(
            &Manifest::default(),
            GenerateOptions {
                ast: &ast,
                output: None,
                keep_existing: false,
            },
        )
        .unwrap();
        assert!(report.code.unwrap().contains("count_t = c_int\n"));
    }
}
