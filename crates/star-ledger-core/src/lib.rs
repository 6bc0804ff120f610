//! # Star Ledger Core
//!
//! Pure primitives for the star ledger: blocks, sealing, the payload
//! codec, and wallet cryptography.
//!
//! This crate contains no I/O and no chain state. It is pure computation
//! over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`Block`] - One immutable, hash-sealed ledger record
//! - [`BlockHash`] - The block self-hash (Blake3)
//! - [`StarRecord`] - The ownership claim carried by non-genesis blocks
//! - [`WalletAddress`] - An Ed25519 verifying key in its address role
//!
//! ## Sealing
//!
//! Block self-hashes are computed over a canonical CBOR preimage that
//! excludes the stored hash field. See the [`canonical`] module.

pub mod block;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod payload;

pub use block::{Block, GENESIS_BODY};
pub use canonical::seal_preimage;
pub use crypto::{BlockHash, Keypair, WalletAddress, WalletSignature};
pub use error::{CoreError, PayloadError};
pub use payload::{decode_record, encode_record, Star, StarRecord};
