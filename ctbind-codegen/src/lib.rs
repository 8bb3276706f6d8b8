//! Python `ctypes` code generation for the ctbind binding generator.
//!
//! # Module Organization
//!
//! - [`mapper`] - C types to [`TypeExpr`](mapper::TypeExpr) values ([`TypeMapper`](mapper::TypeMapper), [`CTypesMapper`](mapper::CTypesMapper))
//! - [`builder`] - Code generation building blocks ([`CodeBuilder`](builder::CodeBuilder), [`Indent`](builder::Indent))
//! - [`generation`] - Output sections ([`ImportCollector`](generation::ImportCollector), [`ExportList`](generation::ExportList))
//! - [`comment`] - C comments rendered as Python comments
//! - [`diagnostic`] - Warnings reported with a generated module
//! - [`CTypesGenerator`] - The module generator
//!
//! # Example
//!
//! ```
//! use ctbind_ast::{Cursor, CursorKind, SourceRange, TranslationUnitBuilder, TypeKind};
//! use ctbind_codegen::{CTypesGenerator, GeneratorConfig};
//! use ctbind_decl::DeclIndex;
//!
//! let mut builder = TranslationUnitBuilder::new("t.h");
//! let int = builder.builtin(TypeKind::Int);
//! builder.add_cursor(
//!     None,
//!     Cursor::new(CursorKind::TypedefDecl, "INT_TYPEDEF", SourceRange::in_file("t.h", (1, 1), (1, 24)))
//!         .with_underlying_type(int),
//! );
//! let mut index = DeclIndex::new(builder.build());
//! let typedefs = index.select().typedefs().into_ids();
//! index.include_all(&typedefs, true);
//!
//! let module = CTypesGenerator::new(&index, GeneratorConfig::default()).generate()?;
//! assert_eq!(
//!     module.code,
//!     "from ctypes import c_int\n\nINT_TYPEDEF = c_int\n\n__all__ = [\n    \"INT_TYPEDEF\",\n]\n"
//! );
//! # Ok::<(), ctbind_codegen::Error>(())
//! ```

pub mod builder;
pub mod comment;
pub mod diagnostic;
mod error;
pub mod generation;
mod generator;
pub mod mapper;

pub use diagnostic::{Diagnostic, Severity, UnexposedDependency};
pub use error::{Error, Result};
pub use generator::{CTypesGenerator, GeneratedModule, GeneratorConfig, NativeLibrary};
