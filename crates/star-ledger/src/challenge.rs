//! Ownership challenge issuance and submission verification.
//!
//! A challenge is a time-stamped string the claimant signs with their
//! wallet key. Verification is stateless: freshness is derived purely
//! from the timestamp embedded in the message, and the current time is
//! threaded in by the caller so the window boundary is deterministic
//! under test.

use star_ledger_core::{WalletAddress, WalletSignature};

use crate::error::SubmitError;

/// Maximum allowed age of a challenge, in seconds. Hard bound: a
/// submission aged exactly this much is rejected.
pub const CHALLENGE_WINDOW_SECS: i64 = 300;

/// Purpose tag embedded in every challenge string.
pub const CHALLENGE_TAG: &str = "starRegistry";

/// Issue a challenge for an address at the given time.
///
/// Format: `<address-hex>:<timestamp>:starRegistry`, timestamp in whole
/// seconds.
pub fn issue_challenge(address: &WalletAddress, now: i64) -> String {
    format!("{}:{}:{}", address.to_hex(), now, CHALLENGE_TAG)
}

/// Verify a signed challenge submission.
///
/// The freshness check runs before the signature check, so an expired
/// message with a bad signature still reports `ExpiredChallenge`.
pub fn verify_submission(
    address: &WalletAddress,
    message: &str,
    signature: &WalletSignature,
    now: i64,
) -> Result<(), SubmitError> {
    let issued_at = parse_challenge_time(message)?;

    let age = now - issued_at;
    if age >= CHALLENGE_WINDOW_SECS {
        return Err(SubmitError::ExpiredChallenge { age });
    }

    address
        .verify(message.as_bytes(), signature)
        .map_err(|_| SubmitError::InvalidSignature)
}

/// Parse the issuance timestamp out of a challenge message.
fn parse_challenge_time(message: &str) -> Result<i64, SubmitError> {
    let mut parts = message.split(':');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_address), Some(timestamp), Some(_tag), None) => timestamp
            .parse()
            .map_err(|_| SubmitError::MalformedChallenge),
        _ => Err(SubmitError::MalformedChallenge),
    }
}
