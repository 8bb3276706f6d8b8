//! Manifest types and parsing for ctbind.toml files.

mod file;
mod parse;
mod rule;
mod validate;

use std::path::PathBuf;

pub use file::CtbindToml;
pub use parse::parse_manifest;
pub use rule::{DeclRef, ForwardRule, IncludeRule, OpaqueRule};
use serde::Deserialize;
pub use validate::ParseContext;

/// Root manifest for ctbind.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Module-wide settings
    #[serde(default)]
    pub module: ModuleConfig,

    /// Native library loaded by the generated module
    pub library: Option<LibraryConfig>,

    /// Declarations to emit, in the order the rules are applied
    #[serde(default, rename = "include")]
    pub includes: Vec<IncludeRule>,

    /// Struct and union forward splits
    #[serde(default, rename = "forward")]
    pub forwards: Vec<ForwardRule>,

    /// Opaque placeholders for pointer targets
    #[serde(default, rename = "opaque")]
    pub opaques: Vec<OpaqueRule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleConfig {
    /// Main header. Rules without a `header` only match declarations
    /// written in this file.
    pub header: Option<String>,

    /// Default output path of the generated module
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryConfig {
    /// Python variable holding the loaded library
    #[serde(default = "default_handle")]
    pub handle: String,

    /// Argument to `cdll.LoadLibrary`
    pub path: String,
}

fn default_handle() -> String {
    "_lib".to_string()
}

impl Manifest {
    /// File filter for a rule: the rule's own header, else the module header.
    pub fn header_for<'a>(&'a self, rule: &'a IncludeRule) -> Option<&'a str> {
        rule.header.as_deref().or(self.module.header.as_deref())
    }

    /// Total number of rules.
    pub fn rule_count(&self) -> usize {
        self.includes.len() + self.forwards.len() + self.opaques.len()
    }
}
