//! Network error type.

use thiserror::Error;

use impact_core::LinkId;

/// Errors produced by `impact-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("link {link} has invalid length {length_m}")]
    InvalidLength { link: LinkId, length_m: f64 },

    #[error("link {0} is defined more than once")]
    DuplicateLink(LinkId),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
