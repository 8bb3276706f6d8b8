//! ctbind.toml parsing and validation.
//!
//! A manifest names the header a module is generated from, the native
//! library its functions are bound through, and the rules selecting which
//! declarations to emit:
//!
//! ```
//! use ctbind_manifest::Manifest;
//!
//! let manifest: Manifest = r#"
//! [module]
//! header = "zlib.h"
//!
//! [library]
//! path = "libz.so.1"
//!
//! [[include]]
//! kind = "function"
//! name = "zlibVersion"
//! "#
//! .parse()
//! .unwrap();
//!
//! assert_eq!(manifest.includes.len(), 1);
//! assert_eq!(manifest.library.unwrap().handle, "_lib");
//! ```
//!
//! Errors are [`miette`] diagnostics pointing into the TOML source.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod manifest;

pub use error::{Error, Result, SourceContext};
pub use manifest::{
    CtbindToml, DeclRef, ForwardRule, IncludeRule, LibraryConfig, Manifest, ModuleConfig,
    OpaqueRule, ParseContext, parse_manifest,
};
