use thiserror::Error;

use crate::{CursorId, TypeId};

/// Result type for loading translation units.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading a serialized translation unit.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse translation unit JSON")]
    Json(#[from] serde_json::Error),

    #[error("{referrer} refers to missing cursor {missing:?}")]
    DanglingCursor { referrer: String, missing: CursorId },

    #[error("{referrer} refers to missing type {missing:?}")]
    DanglingType { referrer: String, missing: TypeId },
}
