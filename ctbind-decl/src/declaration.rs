//! A declaration cursor together with its generation state.

use std::fmt;

use ctbind_ast::{CursorId, SourceLocation, SourceRange};
use ctbind_core::{DeclKind, DefinitionMode};
use indexmap::IndexSet;

/// Stable identity of a declaration within one [`DeclIndex`](crate::DeclIndex).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeclId(pub(crate) usize);

impl DeclId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Generation state for one declaration.
///
/// Holds a copy of the cursor fields the generator needs; anything else is
/// reached through [`Declaration::cursor`] on the owning translation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    id: DeclId,
    cursor: CursorId,
    kind: DeclKind,
    name: String,
    extent: SourceRange,
    is_definition: bool,
    alias: Option<String>,
    included: bool,
    exported: bool,
    predecessors: IndexSet<DeclId>,
    mode: DefinitionMode,
}

impl Declaration {
    pub(crate) fn builder(cursor: CursorId, kind: DeclKind, name: impl Into<String>) -> Builder {
        Builder {
            cursor,
            kind,
            name: name.into(),
            extent: None,
            is_definition: false,
            alias: None,
            mode: DefinitionMode::Full,
        }
    }

    pub fn id(&self) -> DeclId {
        self.id
    }

    /// The wrapped cursor.
    pub fn cursor(&self) -> CursorId {
        self.cursor
    }

    pub fn kind(&self) -> DeclKind {
        self.kind
    }

    /// The C name; anonymous records and enums fall back to their type spelling.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The exported name: the alias when renamed, the C name otherwise.
    pub fn alias(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn is_renamed(&self) -> bool {
        self.alias.is_some()
    }

    pub fn extent(&self) -> &SourceRange {
        &self.extent
    }

    pub fn file(&self) -> Option<&str> {
        self.extent.file()
    }

    pub fn start_line(&self) -> u32 {
        self.extent.start.line
    }

    pub fn end_line(&self) -> u32 {
        self.extent.end.line
    }

    pub fn is_definition(&self) -> bool {
        self.is_definition
    }

    pub fn is_included(&self) -> bool {
        self.included
    }

    pub fn is_exported(&self) -> bool {
        self.exported
    }

    /// Declarations that must be emitted before this one, in registration order.
    pub fn predecessors(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.predecessors.iter().copied()
    }

    /// Emission mode; always [`DefinitionMode::Full`] outside structs and unions.
    pub fn mode(&self) -> DefinitionMode {
        self.mode
    }

    pub(crate) fn mark_included(&mut self, export: bool) {
        self.included = true;
        self.exported = export;
    }

    pub(crate) fn add_predecessor(&mut self, predecessor: DeclId) {
        if predecessor != self.id {
            self.predecessors.insert(predecessor);
        }
    }

    pub(crate) fn set_alias(&mut self, alias: impl Into<String>) {
        self.alias = Some(alias.into());
    }

    /// Carry over the selection state of `other` (flags and predecessors).
    pub(crate) fn with_selection_of(mut self, other: &Declaration) -> Self {
        self.included = other.included;
        self.exported = other.exported;
        self.predecessors = other.predecessors.clone();
        self
    }

    /// A builder seeded with this declaration's identity-independent attributes.
    pub(crate) fn to_builder(&self) -> Builder {
        Builder {
            cursor: self.cursor,
            kind: self.kind,
            name: self.name.clone(),
            extent: Some(self.extent.clone()),
            is_definition: self.is_definition,
            alias: self.alias.clone(),
            mode: self.mode,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// Assembles a [`Declaration`]; once built, only the selection flags,
/// alias and predecessor set change.
#[derive(Debug, Clone)]
pub(crate) struct Builder {
    cursor: CursorId,
    kind: DeclKind,
    name: String,
    extent: Option<SourceRange>,
    is_definition: bool,
    alias: Option<String>,
    mode: DefinitionMode,
}

impl Builder {
    pub(crate) fn extent(mut self, extent: SourceRange) -> Self {
        self.extent = Some(extent);
        self
    }

    pub(crate) fn definition(mut self, is_definition: bool) -> Self {
        self.is_definition = is_definition;
        self
    }

    pub(crate) fn mode(mut self, mode: DefinitionMode) -> Self {
        self.mode = mode;
        self
    }

    pub(crate) fn build(self, id: DeclId) -> Declaration {
        Declaration {
            id,
            cursor: self.cursor,
            kind: self.kind,
            name: self.name,
            extent: self
                .extent
                .unwrap_or_else(|| SourceRange::new(SourceLocation::unknown(), SourceLocation::unknown())),
            is_definition: self.is_definition,
            alias: self.alias,
            included: false,
            exported: false,
            predecessors: IndexSet::new(),
            mode: self.mode,
        }
    }
}
