use ctbind_core::DeclKind;
use thiserror::Error;

/// Result type for code generation.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot bind function '{function}': no native library is configured")]
    MissingLibrary { function: String },

    #[error("cannot emit {kind} '{name}' as a top-level declaration")]
    UnsupportedKind { name: String, kind: DeclKind },

    #[error("{kind} '{name}' has no type")]
    MissingType { name: String, kind: DeclKind },

    #[error(transparent)]
    Declaration(#[from] ctbind_decl::Error),

    #[error("failed to write generated module: {0}")]
    Io(#[from] std::io::Error),
}
