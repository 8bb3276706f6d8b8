//! The ctypes module generator.
//!
//! [`CTypesGenerator::write_module`] emits every included declaration of a
//! [`DeclIndex`] in selection order, predecessors first, and assembles the
//! module from three sections:
//!
//! ```text
//! from ctypes import ...        imports, collected while emitting
//!
//! <declarations>                body
//!
//! __all__ = [...]               exported aliases
//! ```

mod config;
mod emit;
mod literal;

use std::{
    collections::{BTreeSet, HashSet},
    io,
    path::PathBuf,
};

use ctbind_ast::CursorId;
use ctbind_core::File;
use ctbind_decl::{DeclId, DeclIndex};
use indexmap::IndexMap;
use tracing::{debug, trace};

pub use config::{GeneratorConfig, NativeLibrary};

use crate::{
    Result,
    builder::CodeBuilder,
    diagnostic::{Diagnostic, UnexposedDependency},
    generation::{ExportList, ImportCollector},
    mapper::{CTypesMapper, TypeExpr},
};

/// Generated module text together with its diagnostics.
#[derive(Debug, Clone)]
pub struct GeneratedModule {
    pub code: String,
    pub unexposed: Vec<UnexposedDependency>,
}

impl GeneratedModule {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.unexposed
            .iter()
            .map(UnexposedDependency::to_diagnostic)
            .collect()
    }

    /// The module as a file to be written at `path`.
    pub fn into_file(self, path: impl Into<PathBuf>) -> File {
        File::new(path, self.code)
    }
}

/// Emits Python `ctypes` bindings for the included declarations of an index.
///
/// The generator only reads the index. Its accumulators are reset on every
/// [`write_module`](Self::write_module) call, so one generator can produce
/// several modules in turn.
#[derive(Debug)]
pub struct CTypesGenerator<'a> {
    index: &'a DeclIndex,
    mapper: CTypesMapper<'a>,
    config: GeneratorConfig,
    imports: ImportCollector,
    exports: ExportList,
    /// Referenced but unexposed declarations, with the names referring to them.
    unexposed: IndexMap<CursorId, BTreeSet<String>>,
    emitted: HashSet<DeclId>,
    in_progress: HashSet<DeclId>,
}

impl<'a> CTypesGenerator<'a> {
    pub fn new(index: &'a DeclIndex, config: GeneratorConfig) -> Self {
        Self {
            index,
            mapper: CTypesMapper::new(index),
            config,
            imports: ImportCollector::new(),
            exports: ExportList::new(),
            unexposed: IndexMap::new(),
            emitted: HashSet::new(),
            in_progress: HashSet::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the module into a string.
    pub fn generate(&mut self) -> Result<GeneratedModule> {
        let mut code = Vec::new();
        let unexposed = self.write_module(&mut code)?;
        Ok(GeneratedModule {
            code: String::from_utf8_lossy(&code).into_owned(),
            unexposed,
        })
    }

    /// Write the module to `out`.
    ///
    /// Returns the declarations the module refers to without exposing them.
    /// They do not stop the module from being written.
    pub fn write_module<W: io::Write>(&mut self, out: &mut W) -> Result<Vec<UnexposedDependency>> {
        self.imports.clear();
        self.exports.clear();
        self.unexposed.clear();
        self.emitted.clear();
        self.in_progress.clear();

        let mut body = CodeBuilder::new(self.config.indent);
        if let Some(library) = &self.config.library {
            self.imports.add("ctypes", "cdll");
            body.push_line(&library.load_statement());
        }
        let included = self.index.select().included().into_ids();
        for id in included {
            self.emit(id, &mut body)?;
        }

        let mut header = CodeBuilder::new(self.config.indent);
        if self.imports.is_empty() {
            while body.starts_with_blank() {
                body.drop_leading_blank();
            }
        } else {
            self.imports.render(&mut header);
            header.push_blank();
            if body.starts_with_blank() {
                body.drop_leading_blank();
            }
        }
        if self.exports.is_empty() {
            body.trim_trailing_blanks();
            if body.is_empty() {
                header.trim_trailing_blanks();
            }
        } else {
            body.pad_to(1);
            self.exports.render(&mut body);
        }

        out.write_all(header.as_str().as_bytes())?;
        out.write_all(body.as_str().as_bytes())?;
        out.flush()?;

        let unexposed = self.unexposed_dependencies();
        debug!(
            emitted = self.emitted.len(),
            exported = self.exports.len(),
            unexposed = unexposed.len(),
            "wrote module"
        );
        Ok(unexposed)
    }

    /// Emit a declaration after its predecessors.
    fn emit(&mut self, id: DeclId, body: &mut CodeBuilder) -> Result<()> {
        if self.emitted.contains(&id) {
            return Ok(());
        }
        if !self.in_progress.insert(id) {
            debug!(declaration = %self.index.get(id), "skipping predecessor cycle");
            return Ok(());
        }
        let predecessors: Vec<DeclId> = self.index.get(id).predecessors().collect();
        for predecessor in predecessors {
            self.emit(predecessor, body)?;
        }
        trace!(declaration = %self.index.get(id), "emitting");
        self.emit_declaration(id, body)?;
        self.in_progress.remove(&id);
        self.emitted.insert(id);
        Ok(())
    }

    fn load_imports(&mut self, expr: &TypeExpr) {
        self.imports.extend(expr.imports());
    }

    /// Record the declarations `expr` names that will not be emitted.
    fn check_dependencies(&mut self, expr: &TypeExpr, referrer: DeclId) {
        for cursor in expr.dependencies() {
            if self.index.is_exposed(cursor) {
                continue;
            }
            let referrer = self.index.get(referrer).name().to_string();
            self.unexposed.entry(cursor).or_default().insert(referrer);
        }
    }

    fn unexposed_dependencies(&self) -> Vec<UnexposedDependency> {
        self.unexposed
            .iter()
            .filter_map(|(&cursor, referrers)| {
                let Some(id) = self.index.lookup(cursor) else {
                    trace!(?cursor, "referenced cursor is not a declaration");
                    return None;
                };
                let decl = self.index.get(id);
                Some(UnexposedDependency {
                    name: decl.name().to_string(),
                    kind: decl.kind(),
                    location: self.index.cursor(id).location().to_string(),
                    referrers: referrers.clone(),
                })
            })
            .collect()
    }
}
