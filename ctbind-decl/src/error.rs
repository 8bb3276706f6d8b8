use ctbind_core::DeclKind;
use thiserror::Error;

/// Result type for declaration queries and selection changes.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("no {kind} named '{name}'")]
    NoMatch { kind: DeclKind, name: String },

    #[error("{count} declarations match {kind} '{name}', expected exactly one")]
    MultipleMatches {
        kind: DeclKind,
        name: String,
        count: usize,
    },

    #[error("'{name}' is a {kind}, not a struct or union")]
    NotAStructOrUnion { name: String, kind: DeclKind },

    #[error("'{name}' is a {kind}, not a function")]
    NotAFunction { name: String, kind: DeclKind },

    #[error("type of '{name}' is not a pointer")]
    NotAPointer { name: String },

    #[error("pointee of '{name}' has no declaration")]
    NoPointeeDeclaration { name: String },

    #[error("no field '{field}' in '{record}'")]
    NoSuchField { record: String, field: String },

    #[error("no parameter '{parameter}' in function '{function}'")]
    NoSuchParameter { function: String, parameter: String },

    #[error("{count} comments share line {line} of {file}; cannot tell which one belongs to the declaration")]
    AmbiguousComment {
        file: String,
        line: u32,
        count: usize,
    },
}
