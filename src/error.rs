use thiserror::Error;

use crate::ident::InvalidIdentifier;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures surfaced by [`Handler::dispatch`](crate::Handler::dispatch).
#[derive(Debug, Error)]
pub enum Error {
    /// The batch could not be packed; nothing was sent.
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifier),

    #[error("failed to encode measurements: {0}")]
    Encode(#[from] serde_json::Error),

    /// Whatever the transport reported, connection errors and non-2xx responses alike.
    #[error("measurement request failed: {0}")]
    Transport(#[source] BoxError),
}
