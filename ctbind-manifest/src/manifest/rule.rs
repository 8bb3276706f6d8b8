//! Selection rules: `[[include]]`, `[[forward]]` and `[[opaque]]` tables.

use std::fmt;

use ctbind_core::DeclKind;
use serde::Deserialize;

fn default_export() -> bool {
    true
}

/// A top-level declaration named by kind, e.g.
/// `{ kind = "struct", name = "jpeg_compress_struct" }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclRef {
    pub kind: DeclKind,
    pub name: String,
}

impl fmt::Display for DeclRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.name)
    }
}

/// Include every declaration of a kind, or the one with `name`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncludeRule {
    pub kind: DeclKind,

    /// Absent selects every declaration of `kind`.
    pub name: Option<String>,

    /// File filter, overriding `module.header`.
    pub header: Option<String>,

    #[serde(default = "default_export")]
    pub export: bool,

    /// Name to emit instead of the C name. Requires `name`.
    pub alias: Option<String>,

    /// Emit ahead of this declaration.
    pub before: Option<DeclRef>,
}

impl IncludeRule {
    /// Short description for summaries, e.g. `struct 'point'` or `all macros`.
    pub fn describe(&self) -> String {
        match &self.name {
            Some(name) => format!("{} '{}'", self.kind, name),
            None => format!("all {}s", self.kind),
        }
    }
}

/// Split a struct or union into a forward placeholder and a later field
/// assignment.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForwardRule {
    pub kind: DeclKind,
    pub name: String,
    pub before: DeclRef,
    #[serde(default)]
    pub export: bool,
}

/// Emit an empty class for the pointee of a pointer-typed declaration.
///
/// Fields are named `struct.field`, parameters `function.param`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpaqueRule {
    pub kind: DeclKind,
    pub name: String,
    pub before: DeclRef,
    #[serde(default)]
    pub export: bool,
}

impl OpaqueRule {
    /// The owner and member of a field or parameter name.
    pub fn member_path(&self) -> Option<(&str, &str)> {
        self.name.split_once('.')
    }
}
