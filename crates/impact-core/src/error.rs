//! Shared error type.

use thiserror::Error;

/// The base error type for `impact-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Text that does not name a known value, e.g. an unknown event tag.
    #[error("parse error: {0}")]
    Parse(String),
}
