//! Error types for the star ledger core.

use thiserror::Error;

/// Errors from the cryptographic primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid wallet address")]
    InvalidAddress,

    #[error("signature verification failed")]
    SignatureFailed,
}

/// Errors from decoding a block body back into a star record.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The genesis block carries no caller payload by construction.
    #[error("the genesis block has no star payload")]
    GenesisPayload,

    #[error("payload encoding failed: {0}")]
    Encoding(String),

    #[error("payload decoding failed: {0}")]
    Decoding(String),
}
