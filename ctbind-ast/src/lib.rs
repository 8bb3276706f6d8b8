//! Parsed C declaration model for the ctbind binding generator.
//!
//! This crate describes what a C parser hands to the generator: a cursor
//! tree with source extents, a type table, and the raw token stream of the
//! translation unit. Parser adapters populate it through
//! [`TranslationUnitBuilder`]; the rest of the pipeline only reads it.
//!
//! # Architecture
//!
//! ```text
//! C header → parser adapter → TranslationUnit (this crate) → ctbind-decl → ctbind-codegen
//! ```
//!
//! Cursors and types live in arenas and refer to each other by
//! [`CursorId`] / [`TypeId`], so the model serializes to JSON as-is.

mod builder;
mod cursor;
mod error;
pub mod lexer;
mod token;
mod types;
mod unit;

pub use builder::TranslationUnitBuilder;
pub use cursor::{Cursor, CursorId, CursorKind, SourceLocation, SourceRange};
pub use error::{Error, Result};
pub use token::{Token, TokenKind};
pub use types::{Type, TypeId, TypeKind};
pub use unit::TranslationUnit;
