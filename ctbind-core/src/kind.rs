//! Declaration kinds and struct definition modes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Kind of a declaration tracked by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    Enum,
    Struct,
    Union,
    Typedef,
    Function,
    Macro,
    Field,
    Parameter,
    /// Synthesized placeholder for a pointee without a usable definition.
    Opaque,
    EnumConstant,
}

impl DeclKind {
    /// All kinds, in declaration order.
    pub const ALL: [DeclKind; 10] = [
        DeclKind::Enum,
        DeclKind::Struct,
        DeclKind::Union,
        DeclKind::Typedef,
        DeclKind::Function,
        DeclKind::Macro,
        DeclKind::Field,
        DeclKind::Parameter,
        DeclKind::Opaque,
        DeclKind::EnumConstant,
    ];

    /// Get the name used in manifests and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Enum => "enum",
            DeclKind::Struct => "struct",
            DeclKind::Union => "union",
            DeclKind::Typedef => "typedef",
            DeclKind::Function => "function",
            DeclKind::Macro => "macro",
            DeclKind::Field => "field",
            DeclKind::Parameter => "parameter",
            DeclKind::Opaque => "opaque",
            DeclKind::EnumConstant => "enum_constant",
        }
    }

    /// Returns true for struct and union declarations.
    pub fn is_record(&self) -> bool {
        matches!(self, DeclKind::Struct | DeclKind::Union)
    }

    /// Returns true for kinds that can appear at the top level of a module.
    pub fn is_top_level(&self) -> bool {
        !matches!(
            self,
            DeclKind::Field | DeclKind::Parameter | DeclKind::EnumConstant
        )
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeclKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = DeclKind::ALL.iter().map(DeclKind::as_str).collect();
                format!("unknown declaration kind '{}' (valid: {})", s, valid.join(", "))
            })
    }
}

/// How a struct or union declaration is emitted.
///
/// A forward split produces two declarations from one cursor: a
/// `ForwardOnly` placeholder emitted early and a `DefinitionOnly` field
/// assignment emitted where the original would have been.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DefinitionMode {
    /// Class header together with its field list.
    #[default]
    Full,
    /// Class header with an empty body.
    ForwardOnly,
    /// Field-list assignment onto a previously declared class.
    DefinitionOnly,
}
