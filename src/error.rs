use thiserror::Error;

use crate::session::{DUPLICATE_MESSAGE, NO_DATA_MESSAGE};

/// Local, recoverable failures of a scan session.
///
/// None of these end the session. `Display` yields the text shown to
/// the user (or logged, for decode failures).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The decoded text was already recorded.
    #[error("{}", DUPLICATE_MESSAGE)]
    Duplicate(String),

    /// Export was requested with no records.
    #[error("{}", NO_DATA_MESSAGE)]
    NoData,

    /// The camera pipeline failed to decode a frame.
    #[error("Error saat scan: {0}")]
    Decode(String),
}
