//! Filtered, ordered views over top-level declarations.

use ctbind_core::DeclKind;

use crate::{DeclId, DeclIndex, Declaration, Error, Result};

/// An ordered subset of the top-level declarations of a [`DeclIndex`].
///
/// Filters keep the selection order, which is source order with macro
/// definitions of the main file interleaved where they were written.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    index: &'a DeclIndex,
    ids: Vec<DeclId>,
}

impl<'a> Selection<'a> {
    pub(crate) fn new(index: &'a DeclIndex, ids: Vec<DeclId>) -> Self {
        Self { index, ids }
    }

    /// Keep the declarations matching `predicate`.
    pub fn filter(mut self, predicate: impl Fn(&Declaration) -> bool) -> Self {
        let index = self.index;
        self.ids.retain(|&id| predicate(index.get(id)));
        self
    }

    /// Declarations found in a particular source file.
    pub fn in_header(self, path: &str) -> Self {
        self.filter(|decl| decl.file() == Some(path))
    }

    pub fn of_kind(self, kind: DeclKind) -> Self {
        self.filter(|decl| decl.kind() == kind)
    }

    /// Struct definitions; bare `struct foo;` declarations are left out.
    pub fn structs(self) -> Self {
        self.filter(|decl| decl.kind() == DeclKind::Struct && decl.is_definition())
    }

    pub fn unions(self) -> Self {
        self.of_kind(DeclKind::Union)
    }

    pub fn enums(self) -> Self {
        self.of_kind(DeclKind::Enum)
    }

    pub fn typedefs(self) -> Self {
        self.of_kind(DeclKind::Typedef)
    }

    pub fn functions(self) -> Self {
        self.of_kind(DeclKind::Function)
    }

    pub fn macros(self) -> Self {
        self.of_kind(DeclKind::Macro)
    }

    pub fn named(self, name: &str) -> Self {
        self.filter(|decl| decl.name() == name)
    }

    /// Declarations marked for emission.
    pub fn included(self) -> Self {
        self.filter(Declaration::is_included)
    }

    /// The one declaration left in the selection.
    ///
    /// `kind` and `name` only describe the query in the error.
    pub fn single(&self, kind: DeclKind, name: &str) -> Result<DeclId> {
        match self.ids.as_slice() {
            [id] => Ok(*id),
            [] => Err(Error::NoMatch {
                kind,
                name: name.to_string(),
            }),
            ids => Err(Error::MultipleMatches {
                kind,
                name: name.to_string(),
                count: ids.len(),
            }),
        }
    }

    pub fn ids(&self) -> &[DeclId] {
        &self.ids
    }

    pub fn into_ids(self) -> Vec<DeclId> {
        self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Declaration> + '_ {
        let index = self.index;
        self.ids.iter().map(move |&id| index.get(id))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
