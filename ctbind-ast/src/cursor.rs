//! Cursors: the nodes of the parsed declaration tree.

use serde::{Deserialize, Serialize};

use crate::TypeId;

/// Stable identity of a cursor within one translation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CursorId(pub u32);

impl CursorId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind of a cursor, mirroring the subset of clang cursor kinds the
/// generator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorKind {
    TranslationUnit,
    StructDecl,
    UnionDecl,
    EnumDecl,
    EnumConstantDecl,
    FieldDecl,
    FunctionDecl,
    ParmDecl,
    TypedefDecl,
    VarDecl,
    TypeRef,
    MacroDefinition,
    MacroInstantiation,
    InclusionDirective,
    /// Anything the parser exposes that has no dedicated kind here.
    Unexposed,
}

impl CursorKind {
    /// Short lowercase name, used in listings and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            CursorKind::TranslationUnit => "translation unit",
            CursorKind::StructDecl => "struct",
            CursorKind::UnionDecl => "union",
            CursorKind::EnumDecl => "enum",
            CursorKind::EnumConstantDecl => "enum constant",
            CursorKind::FieldDecl => "field",
            CursorKind::FunctionDecl => "function",
            CursorKind::ParmDecl => "parameter",
            CursorKind::TypedefDecl => "typedef",
            CursorKind::VarDecl => "variable",
            CursorKind::TypeRef => "type reference",
            CursorKind::MacroDefinition => "macro",
            CursorKind::MacroInstantiation => "macro instantiation",
            CursorKind::InclusionDirective => "include",
            CursorKind::Unexposed => "unexposed",
        }
    }

    /// Returns true for struct and union declarations.
    pub fn is_record(&self) -> bool {
        matches!(self, CursorKind::StructDecl | CursorKind::UnionDecl)
    }
}

impl std::fmt::Display for CursorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A position in a source file. Lines and columns are 1-based; columns count bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: Some(file.into()),
            line,
            column,
        }
    }

    /// Location without an associated file (builtins, command-line macros).
    pub fn unknown() -> Self {
        Self {
            file: None,
            line: 0,
            column: 0,
        }
    }

    fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.column),
            None => write!(f, "<unknown>:{}:{}", self.line, self.column),
        }
    }
}

/// A half-open source range; `end` points one past the last byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceRange {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    /// Range within a single file.
    pub fn in_file(
        file: &str,
        (start_line, start_column): (u32, u32),
        (end_line, end_column): (u32, u32),
    ) -> Self {
        Self {
            start: SourceLocation::new(file, start_line, start_column),
            end: SourceLocation::new(file, end_line, end_column),
        }
    }

    /// File of the range start.
    pub fn file(&self) -> Option<&str> {
        self.start.file.as_deref()
    }

    /// Returns true if `other` lies entirely within this range.
    pub fn contains(&self, other: &SourceRange) -> bool {
        self.start.file.is_some()
            && self.start.file == other.start.file
            && self.start.position() <= other.start.position()
            && other.end.position() <= self.end.position()
    }
}

/// A node of the parsed declaration tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub kind: CursorKind,
    /// Source spelling; empty for anonymous records and enums.
    #[serde(default)]
    pub spelling: String,
    pub extent: SourceRange,
    /// Type of the declared entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeId>,
    /// Aliased type, for typedef declarations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying_type: Option<TypeId>,
    /// Resolved integral value, for enum constants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_value: Option<i64>,
    #[serde(default)]
    pub is_definition: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CursorId>,
}

impl Cursor {
    pub fn new(kind: CursorKind, spelling: impl Into<String>, extent: SourceRange) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            extent,
            ty: None,
            underlying_type: None,
            enum_value: None,
            is_definition: false,
            children: Vec::new(),
        }
    }

    pub fn with_type(mut self, ty: TypeId) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn with_underlying_type(mut self, ty: TypeId) -> Self {
        self.underlying_type = Some(ty);
        self
    }

    pub fn with_enum_value(mut self, value: i64) -> Self {
        self.enum_value = Some(value);
        self
    }

    /// Mark this cursor as a definition (as opposed to a declaration).
    pub fn definition(mut self) -> Self {
        self.is_definition = true;
        self
    }

    /// Location of the cursor, i.e. the start of its extent.
    pub fn location(&self) -> &SourceLocation {
        &self.extent.start
    }

    /// Returns true for cursors without a spelling.
    pub fn is_anonymous(&self) -> bool {
        self.spelling.is_empty()
    }
}
