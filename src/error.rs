//! Error taxonomy shared by the interest log and interest lists.

use thiserror::Error as ThisError;

/// Errors surfaced by every core operation.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `NotFound` | A referenced interest, list, or item id does not exist |
/// | `InvalidArgument` | Bad navigation target, duplicate or out-of-range reorder positions, unknown status or direction text, empty type labels, branch position past the end |
/// | `Store` | The underlying SQLite transaction failed; the whole operation is rolled back |
/// | `Serialization` | A JSON column could not be encoded |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The referenced entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind (`"interest"`, `"list"`, `"list item"`).
        kind: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// A caller-supplied argument was rejected before any write happened.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Store failure, propagated unchanged.
    #[error("store failure: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// `true` for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// `true` for [`Error::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
