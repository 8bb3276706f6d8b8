//! Mapping of parsed C types to target-language type expressions.

mod ctypes;
mod expr;

use ctbind_ast::{CursorId, TypeId};

pub use ctypes::CTypesMapper;
pub use expr::{ArrayLen, TypeExpr};

/// Trait for mapping parsed types to a target language.
pub trait TypeMapper {
    /// The target language name
    fn language(&self) -> &'static str;

    /// Map a type to its expression.
    ///
    /// `owner` is the declaration whose source tokens spell the type; it
    /// lets array counts keep the macro names they were written with.
    fn map(&self, ty: TypeId, owner: Option<CursorId>) -> TypeExpr;
}
