//! # Star Ledger
//!
//! A single-node, append-only ledger of star-ownership claims: immutable
//! hash-sealed blocks, each bound to its predecessor, appended only after
//! a time-bounded signed ownership challenge verifies.
//!
//! ## Overview
//!
//! - **Block**: Immutable once sealed. The self-hash covers every field
//!   except itself, so any mutation is detectable.
//! - **Chain**: Ordered, index-equals-height, append-only. Appends run a
//!   full-chain validation first and abort on any fault.
//! - **Ownership challenge**: A time-stamped string the claimant signs
//!   with their wallet key; freshness (five minutes) is checked before
//!   the signature.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use star_ledger::Ledger;
//! use star_ledger_core::{Keypair, Star};
//!
//! async fn example() {
//!     let ledger = Ledger::new();
//!
//!     // The wallet requests a challenge and signs it externally.
//!     let wallet = Keypair::generate();
//!     let message = ledger.request_ownership_challenge(&wallet.address());
//!     let signature = wallet.sign(message.as_bytes());
//!
//!     let star = Star {
//!         dec: "68° 52' 56.9".into(),
//!         ra: "16h 29m 1.0s".into(),
//!         story: "first light".into(),
//!     };
//!     let block = ledger
//!         .submit_star(&wallet.address(), &message, &signature, star)
//!         .await
//!         .unwrap();
//!     assert_eq!(block.height, 1);
//! }
//! ```

pub mod chain;
pub mod challenge;
pub mod error;

// Re-export the core crate for convenience
pub use star_ledger_core as core;

pub use chain::{Chain, Ledger};
pub use challenge::{issue_challenge, verify_submission, CHALLENGE_TAG, CHALLENGE_WINDOW_SECS};
pub use error::{ChainFault, LedgerError, Result, SubmitError};

// Re-export commonly used core types
pub use star_ledger_core::{
    Block, BlockHash, Keypair, Star, StarRecord, WalletAddress, WalletSignature,
};
