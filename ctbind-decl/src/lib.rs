//! Declaration model for the ctbind binding generator.
//!
//! A [`DeclIndex`] wraps every declaration cursor of a translation unit in a
//! [`Declaration`] carrying generation state: whether it is included and
//! exported, its alias, the declarations that must be emitted before it, and
//! for structs and unions a [`DefinitionMode`](ctbind_core::DefinitionMode).
//!
//! Declarations live in an arena and refer to each other by [`DeclId`].
//! Callers pick declarations through [`Selection`] queries and mark them with
//! the `include*` family of methods on the index.
//!
//! ```
//! use ctbind_ast::{Cursor, CursorKind, SourceRange, TranslationUnitBuilder, TypeKind};
//! use ctbind_decl::DeclIndex;
//!
//! let mut builder = TranslationUnitBuilder::new("t.h");
//! let int = builder.builtin(TypeKind::Int);
//! builder.add_cursor(
//!     None,
//!     Cursor::new(CursorKind::TypedefDecl, "count_t", SourceRange::in_file("t.h", (1, 1), (1, 20)))
//!         .with_underlying_type(int),
//! );
//! let mut index = DeclIndex::new(builder.build());
//!
//! let ids = index.select().typedefs().into_ids();
//! index.include_all(&ids, true);
//! assert_eq!(index.select().included().len(), 1);
//! ```

mod comments;
mod declaration;
mod error;
mod index;
mod selection;

pub use comments::CommentIndex;
pub use declaration::{DeclId, Declaration};
pub use error::{Error, Result};
pub use index::DeclIndex;
pub use selection::Selection;
