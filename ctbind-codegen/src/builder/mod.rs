//! Code generation building blocks.
//!
//! - [`CodeBuilder`] - Line buffer with indentation and blank-line spacing
//! - [`Indent`] - Indentation configuration

mod code_builder;
mod indent;

pub use code_builder::CodeBuilder;
pub use indent::Indent;
