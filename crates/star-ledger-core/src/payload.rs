//! The star payload: the structured data carried by non-genesis blocks.
//!
//! Bodies are stored as opaque bytes; this module is the lossless codec
//! between those bytes and the structured record.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::crypto::WalletAddress;
use crate::error::PayloadError;

/// Star coordinates and story, as supplied by the registering wallet.
///
/// The ledger treats the contents as opaque; only the owning address is
/// interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    /// Declination, e.g. `68° 52' 56.9`.
    pub dec: String,
    /// Right ascension, e.g. `16h 29m 1.0s`.
    pub ra: String,
    /// Free-form story text.
    pub story: String,
}

/// A registered ownership claim: a star bound to its owning wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRecord {
    /// The wallet that proved ownership at submission time.
    pub address: WalletAddress,
    /// The claimed star.
    pub star: Star,
}

/// Encode a star record into opaque body bytes.
pub fn encode_record(record: &StarRecord) -> Result<Bytes, PayloadError> {
    let mut buf = Vec::new();
    ciborium::into_writer(record, &mut buf)
        .map_err(|e| PayloadError::Encoding(e.to_string()))?;
    Ok(Bytes::from(buf))
}

/// Decode opaque body bytes back into a star record.
pub fn decode_record(body: &[u8]) -> Result<StarRecord, PayloadError> {
    ciborium::from_reader(body).map_err(|e| PayloadError::Decoding(e.to_string()))
}
