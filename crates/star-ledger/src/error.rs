//! Error types for the star ledger.

use serde::{Deserialize, Serialize};
use star_ledger_core::BlockHash;
use thiserror::Error;

/// A single fault discovered during full-chain validation.
///
/// Validation aggregates every fault across the whole chain before
/// returning, so callers can assess total chain health; these are
/// serializable for caller-facing health reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ChainFault {
    /// The block's stored self-hash no longer matches its fields.
    #[error("block {height} failed self-hash validation")]
    Tampered { height: u64 },

    /// The block's previous-hash link does not match its predecessor.
    #[error("block {height} does not link to its predecessor")]
    BrokenLink { height: u64 },
}

impl ChainFault {
    /// The height of the block the fault names.
    pub fn height(&self) -> u64 {
        match self {
            ChainFault::Tampered { height } | ChainFault::BrokenLink { height } => *height,
        }
    }
}

/// Rejection reasons for a star submission. The ledger state is untouched
/// on any of them.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The challenge message does not parse as `address:timestamp:tag`.
    #[error("malformed ownership challenge message")]
    MalformedChallenge,

    /// The challenge is older than the freshness window.
    #[error("ownership challenge expired: {age}s old")]
    ExpiredChallenge { age: i64 },

    /// The signature does not verify for the claimed wallet.
    #[error("unable to verify signature for the claimed wallet")]
    InvalidSignature,

    /// The existing chain failed validation; nothing is appended to an
    /// already-inconsistent chain.
    #[error("chain validation failed with {} fault(s)", .0.len())]
    InvalidChain(Vec<ChainFault>),

    /// The star record could not be encoded into a block body.
    #[error("payload error: {0}")]
    Payload(#[from] star_ledger_core::PayloadError),
}

/// Errors from ledger queries.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No block with the requested hash exists.
    #[error("no block with hash {0}")]
    BlockNotFound(BlockHash),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
