//! Block: one immutable, hash-sealed ledger record.
//!
//! A block is sealed exactly once: height, previous-hash link, time, and
//! body are fixed and the self-hash is computed over them. After sealing,
//! any field change makes `validate` return false.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::canonical::seal_preimage;
use crate::crypto::BlockHash;
use crate::error::PayloadError;
use crate::payload::{decode_record, StarRecord};

/// Body of the genesis block. Not a star record; decoding it is an error.
pub const GENESIS_BODY: &[u8] = b"Genesis Block";

/// An immutable ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain; zero only for the genesis block.
    pub height: u64,

    /// Self-hash of the immediately preceding block; `None` for genesis.
    pub previous_hash: Option<BlockHash>,

    /// Digest over all other fields, computed once at seal time.
    pub hash: BlockHash,

    /// Seal time, whole seconds since epoch.
    pub time: i64,

    /// Opaque, reversibly encoded payload bytes.
    pub body: Bytes,
}

impl Block {
    /// Seal a block: compute the self-hash over the finalized fields.
    ///
    /// Pure function of its inputs, so identical inputs always yield an
    /// identical hash.
    pub fn seal(
        height: u64,
        previous_hash: Option<BlockHash>,
        time: i64,
        body: impl Into<Bytes>,
    ) -> Self {
        let body = body.into();
        let preimage = seal_preimage(
            height,
            previous_hash.as_ref().map(BlockHash::as_bytes),
            time,
            &body,
        );
        let hash = BlockHash::hash(&preimage);

        Self {
            height,
            previous_hash,
            hash,
            time,
            body,
        }
    }

    /// Check whether the block has been tampered with.
    ///
    /// Recomputes the self-hash from the current field values (the stored
    /// hash excluded from the input) and compares it to the stored hash.
    pub fn validate(&self) -> bool {
        let preimage = seal_preimage(
            self.height,
            self.previous_hash.as_ref().map(BlockHash::as_bytes),
            self.time,
            &self.body,
        );
        self.hash == BlockHash::hash(&preimage)
    }

    /// Decode the body back into the structured star record.
    ///
    /// The genesis block carries no star payload; decoding it is a
    /// `GenesisPayload` error, not a normal read path.
    pub fn decode_payload(&self) -> Result<StarRecord, PayloadError> {
        if self.is_genesis() {
            return Err(PayloadError::GenesisPayload);
        }
        decode_record(&self.body)
    }

    /// Whether this is the chain's first block.
    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }
}
