//! The type table of a translation unit.

use serde::{Deserialize, Serialize};

use crate::CursorId;

/// Stable identity of a type within one translation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl TypeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind of a parsed type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Void,
    Bool,
    /// Plain `char` on targets where it is signed.
    CharS,
    /// Plain `char` on targets where it is unsigned.
    CharU,
    SChar,
    UChar,
    WChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Float,
    Double,
    LongDouble,
    Pointer,
    ConstantArray,
    FunctionProto,
    /// Type sugar such as `struct Foo` or a typedef name written in source.
    Elaborated,
    Record,
    Enum,
    Typedef,
    Unexposed,
    Invalid,
}

impl TypeKind {
    /// Canonical C spelling of builtin kinds.
    pub fn builtin_spelling(&self) -> Option<&'static str> {
        let spelling = match self {
            TypeKind::Void => "void",
            TypeKind::Bool => "_Bool",
            TypeKind::CharS | TypeKind::CharU => "char",
            TypeKind::SChar => "signed char",
            TypeKind::UChar => "unsigned char",
            TypeKind::WChar => "wchar_t",
            TypeKind::Short => "short",
            TypeKind::UShort => "unsigned short",
            TypeKind::Int => "int",
            TypeKind::UInt => "unsigned int",
            TypeKind::Long => "long",
            TypeKind::ULong => "unsigned long",
            TypeKind::LongLong => "long long",
            TypeKind::ULongLong => "unsigned long long",
            TypeKind::Float => "float",
            TypeKind::Double => "double",
            TypeKind::LongDouble => "long double",
            _ => return None,
        };
        Some(spelling)
    }

    /// Returns true for signed or plain `char`.
    pub fn is_narrow_char(&self) -> bool {
        matches!(self, TypeKind::CharS | TypeKind::SChar)
    }
}

/// A parsed type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    pub kind: TypeKind,
    pub spelling: String,
    /// Pointed-to type, for pointers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointee: Option<TypeId>,
    /// Element type, for arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<TypeId>,
    /// Element count, for constant arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_count: Option<u64>,
    /// Result type, for function prototypes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TypeId>,
    /// Argument types, for function prototypes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<TypeId>,
    /// Declaration naming this type; `None` when no declaration exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration: Option<CursorId>,
}

impl Type {
    pub fn new(kind: TypeKind, spelling: impl Into<String>) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            pointee: None,
            element: None,
            element_count: None,
            result: None,
            arguments: Vec::new(),
            declaration: None,
        }
    }

    /// A builtin type with its canonical spelling.
    pub fn builtin(kind: TypeKind) -> Self {
        Self::new(kind, kind.builtin_spelling().unwrap_or_default())
    }

    pub fn with_declaration(mut self, declaration: CursorId) -> Self {
        self.declaration = Some(declaration);
        self
    }
}
