//! Output sections of a generated module.
//!
//! - [`ImportCollector`] - `from module import ...` statements
//! - [`ExportList`] - the `__all__` list

mod exports;
mod imports;

pub use exports::ExportList;
pub use imports::ImportCollector;
