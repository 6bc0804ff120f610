//! The chain: an ordered, append-only sequence of hash-sealed blocks.
//!
//! [`Chain`] is the pure, synchronous state machine: initialization,
//! validate-then-append, full-chain validation, and lookups. [`Ledger`]
//! wraps it in a `tokio` RwLock to give callers an async, thread-safe
//! surface with single-writer appends.

use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::{debug, info};

use star_ledger_core::{
    encode_record, Block, BlockHash, Star, StarRecord, WalletAddress, WalletSignature,
    GENESIS_BODY,
};

use crate::challenge::{issue_challenge, verify_submission};
use crate::error::{ChainFault, LedgerError, SubmitError};

/// The in-memory block sequence and its invariant checks.
///
/// Index equals height; blocks are never reordered or truncated. All
/// methods are synchronous and CPU-bound.
#[derive(Debug, Default)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Create an empty chain (no genesis yet).
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Seed the chain with its genesis block.
    ///
    /// Idempotent: does nothing once any block exists. Returns whether a
    /// genesis block was created. The genesis append bypasses the normal
    /// precondition since there is nothing yet to validate against.
    pub fn initialize(&mut self, now: i64) -> bool {
        if !self.blocks.is_empty() {
            return false;
        }
        self.blocks.push(Block::seal(0, None, now, GENESIS_BODY));
        true
    }

    /// Append a new block carrying `body`.
    ///
    /// The current chain is fully validated first; on any fault the
    /// append aborts and the complete fault list is returned. Otherwise
    /// the block is sealed with the current tail hash, `now`, and the
    /// next height, then pushed.
    pub fn append(&mut self, body: impl Into<Bytes>, now: i64) -> Result<Block, Vec<ChainFault>> {
        let faults = self.validate();
        if !faults.is_empty() {
            return Err(faults);
        }

        let previous_hash = self.blocks.last().map(|b| b.hash);
        let height = self.blocks.len() as u64;
        let block = Block::seal(height, previous_hash, now, body);
        self.blocks.push(block.clone());
        Ok(block)
    }

    /// Validate every block and link in the chain.
    ///
    /// Runs a complete pass over the whole chain and aggregates all
    /// faults before returning; never early-exits, so the result reflects
    /// total chain health. Empty iff the chain invariants hold.
    pub fn validate(&self) -> Vec<ChainFault> {
        let mut faults = Vec::new();

        for (index, block) in self.blocks.iter().enumerate() {
            if !block.validate() {
                faults.push(ChainFault::Tampered {
                    height: block.height,
                });
            }

            // Every block after genesis must link to its predecessor.
            if index >= 1 {
                let expected = Some(self.blocks[index - 1].hash);
                if block.previous_hash != expected {
                    faults.push(ChainFault::BrokenLink {
                        height: block.height,
                    });
                }
            }
        }

        faults
    }

    /// First block whose stored hash matches, if any. Linear scan.
    pub fn block_by_hash(&self, hash: &BlockHash) -> Option<&Block> {
        self.blocks.iter().find(|b| b.hash == *hash)
    }

    /// Block at the given height; `None` when out of range. An absent
    /// height is an expected, non-exceptional outcome.
    pub fn block_by_height(&self, height: u64) -> Option<&Block> {
        self.blocks.get(height as usize)
    }

    /// All non-genesis blocks whose star record is owned by `address`.
    ///
    /// Per-block decode failures are skipped, never aborting the scan of
    /// the remaining chain.
    pub fn blocks_by_owner(&self, address: &WalletAddress) -> Vec<Block> {
        self.blocks
            .iter()
            .filter(|b| !b.is_genesis())
            .filter(|b| match b.decode_payload() {
                Ok(record) => record.address == *address,
                Err(e) => {
                    debug!(height = b.height, error = %e, "skipping undecodable block in owner scan");
                    false
                }
            })
            .cloned()
            .collect()
    }

    /// Chain height: `-1` before genesis, otherwise the tail height.
    pub fn height(&self) -> i64 {
        self.blocks.len() as i64 - 1
    }

    #[cfg(test)]
    fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}

/// The async, thread-safe ledger facade.
///
/// All mutation runs under a single write guard covering the entire
/// validate-then-append critical section, so concurrent submissions can
/// never interleave the append steps. Reads run concurrently and only
/// ever observe fully sealed blocks.
pub struct Ledger {
    chain: RwLock<Chain>,
}

impl Ledger {
    /// Create a ledger with its genesis block already sealed.
    pub fn new() -> Self {
        let mut chain = Chain::new();
        chain.initialize(now_secs());
        info!(height = chain.height(), "ledger initialized");
        Self {
            chain: RwLock::new(chain),
        }
    }

    /// Seed the genesis block if no block exists yet. Idempotent.
    pub async fn initialize(&self) {
        let mut chain = self.chain.write().await;
        if chain.initialize(now_secs()) {
            info!("genesis block created");
        }
    }

    /// Issue an ownership challenge for `address` at the current time.
    ///
    /// The caller signs the returned string externally and submits it
    /// back through [`Ledger::submit_star`].
    pub fn request_ownership_challenge(&self, address: &WalletAddress) -> String {
        issue_challenge(address, now_secs())
    }

    /// Register a star for `address` after verifying the signed challenge.
    ///
    /// Wall-clock time is sampled once and used for both the freshness
    /// check and the block seal time. On success the sealed block is
    /// returned; on any rejection the chain is untouched.
    pub async fn submit_star(
        &self,
        address: &WalletAddress,
        message: &str,
        signature: &WalletSignature,
        star: Star,
    ) -> Result<Block, SubmitError> {
        let now = now_secs();
        verify_submission(address, message, signature, now)?;

        let record = StarRecord {
            address: *address,
            star,
        };
        let body = encode_record(&record)?;

        let mut chain = self.chain.write().await;
        let block = chain.append(body, now).map_err(SubmitError::InvalidChain)?;
        debug!(height = block.height, owner = %address, "star registered");
        Ok(block)
    }

    /// Look up a block by its self-hash.
    pub async fn block_by_hash(&self, hash: &BlockHash) -> Result<Block, LedgerError> {
        let chain = self.chain.read().await;
        chain
            .block_by_hash(hash)
            .cloned()
            .ok_or(LedgerError::BlockNotFound(*hash))
    }

    /// Look up a block by height; `None` when out of range.
    pub async fn block_by_height(&self, height: u64) -> Option<Block> {
        let chain = self.chain.read().await;
        chain.block_by_height(height).cloned()
    }

    /// All star blocks owned by `address`.
    pub async fn stars_by_owner(&self, address: &WalletAddress) -> Vec<Block> {
        let chain = self.chain.read().await;
        chain.blocks_by_owner(address)
    }

    /// Full-chain health check: the aggregated fault list, empty when
    /// every block and link is intact.
    pub async fn validate_chain(&self) -> Vec<ChainFault> {
        let chain = self.chain.read().await;
        chain.validate()
    }

    /// Current chain height (`0` for a freshly initialized ledger).
    pub async fn chain_height(&self) -> i64 {
        let chain = self.chain.read().await;
        chain.height()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Current wall-clock time in whole seconds since epoch.
fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use proptest::prelude::*;
    use star_ledger_core::Keypair;

    const NOW: i64 = 1_700_000_000;

    fn sample_star(story: &str) -> Star {
        Star {
            dec: "68° 52' 56.9".to_string(),
            ra: "16h 29m 1.0s".to_string(),
            story: story.to_string(),
        }
    }

    fn record_body(keypair: &Keypair, story: &str) -> Bytes {
        encode_record(&StarRecord {
            address: keypair.address(),
            star: sample_star(story),
        })
        .unwrap()
    }

    fn initialized_chain() -> Chain {
        let mut chain = Chain::new();
        chain.initialize(NOW);
        chain
    }

    #[test]
    fn test_initialize_idempotent() {
        let mut chain = Chain::new();
        assert_eq!(chain.height(), -1);

        assert!(chain.initialize(NOW));
        assert_eq!(chain.height(), 0);

        assert!(!chain.initialize(NOW + 10));
        assert_eq!(chain.height(), 0);

        let genesis = chain.block_by_height(0).unwrap();
        assert_eq!(genesis.height, 0);
        assert_eq!(genesis.previous_hash, None);
        assert_eq!(genesis.time, NOW);
    }

    #[test]
    fn test_append_links_to_tail() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let mut chain = initialized_chain();

        let genesis_hash = chain.block_by_height(0).unwrap().hash;
        let block = chain.append(record_body(&keypair, "one"), NOW + 5).unwrap();

        assert_eq!(block.height, 1);
        assert_eq!(block.previous_hash, Some(genesis_hash));
        assert_eq!(block.time, NOW + 5);
        assert!(chain.validate().is_empty());
    }

    #[test]
    fn test_append_refuses_inconsistent_chain() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let mut chain = initialized_chain();
        chain.append(record_body(&keypair, "one"), NOW + 5).unwrap();

        // Tamper, then try to append.
        chain.blocks_mut()[1].body = Bytes::from_static(b"tampered");

        let result = chain.append(record_body(&keypair, "two"), NOW + 10);
        let faults = result.unwrap_err();
        assert_eq!(faults, vec![ChainFault::Tampered { height: 1 }]);
        // Nothing was appended.
        assert_eq!(chain.height(), 1);
    }

    #[test]
    fn test_tampered_body_yields_single_fault() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let mut chain = initialized_chain();
        chain.append(record_body(&keypair, "one"), NOW + 5).unwrap();

        chain.blocks_mut()[1].body = Bytes::from_static(b"tampered");

        // The link fields are untouched, so only the self-hash fault is
        // reported for that height.
        let faults = chain.validate();
        assert_eq!(faults, vec![ChainFault::Tampered { height: 1 }]);
    }

    #[test]
    fn test_broken_link_detected_from_index_one() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let mut chain = initialized_chain();
        let block = chain.append(record_body(&keypair, "one"), NOW + 5).unwrap();

        // Re-seal block 1 with a wrong predecessor hash: self-hash stays
        // consistent, only the link is broken.
        let wrong_prev = BlockHash::from_bytes([0xee; 32]);
        chain.blocks_mut()[1] = Block::seal(1, Some(wrong_prev), block.time, block.body);

        let faults = chain.validate();
        assert_eq!(faults, vec![ChainFault::BrokenLink { height: 1 }]);
    }

    #[test]
    fn test_validation_aggregates_all_faults() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let mut chain = initialized_chain();
        chain.append(record_body(&keypair, "one"), NOW + 5).unwrap();
        chain.append(record_body(&keypair, "two"), NOW + 6).unwrap();
        chain
            .append(record_body(&keypair, "three"), NOW + 7)
            .unwrap();

        // Tampering a body leaves the stored hash (and so the next link)
        // intact; re-sealing with a wrong predecessor breaks only the link.
        chain.blocks_mut()[1].body = Bytes::from_static(b"tampered");
        let block3 = chain.blocks_mut()[3].clone();
        let wrong_prev = BlockHash::from_bytes([0xee; 32]);
        chain.blocks_mut()[3] = Block::seal(3, Some(wrong_prev), block3.time, block3.body);

        let faults = chain.validate();
        assert_eq!(
            faults,
            vec![
                ChainFault::Tampered { height: 1 },
                ChainFault::BrokenLink { height: 3 },
            ]
        );
    }

    #[test]
    fn test_lookup_by_hash_and_height() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let mut chain = initialized_chain();
        let block = chain.append(record_body(&keypair, "one"), NOW + 5).unwrap();

        assert_eq!(chain.block_by_hash(&block.hash), Some(&block));
        assert_eq!(chain.block_by_hash(&BlockHash::ZERO), None);

        assert_eq!(chain.block_by_height(1), Some(&block));
        assert_eq!(chain.block_by_height(5), None);
    }

    #[test]
    fn test_owner_scan_skips_genesis_and_undecodable_blocks() {
        let owner = Keypair::from_seed(&[0x42; 32]);
        let other = Keypair::from_seed(&[0x43; 32]);
        let mut chain = initialized_chain();

        let mine = chain.append(record_body(&owner, "mine"), NOW + 5).unwrap();
        chain
            .append(record_body(&other, "theirs"), NOW + 6)
            .unwrap();
        // A block with an undecodable body must not abort the scan.
        chain.append(&b"junk body"[..], NOW + 7).unwrap();

        let found = chain.blocks_by_owner(&owner.address());
        assert_eq!(found, vec![mine]);

        let none = chain.blocks_by_owner(&Keypair::from_seed(&[0x44; 32]).address());
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_ledger_initialize_idempotent() {
        let ledger = Ledger::new();
        assert_eq!(ledger.chain_height().await, 0);

        ledger.initialize().await;
        assert_eq!(ledger.chain_height().await, 0);
    }

    #[tokio::test]
    async fn test_ledger_rejections_leave_chain_untouched() {
        let ledger = Ledger::new();
        let keypair = Keypair::generate();
        let address = keypair.address();

        // Stale challenge.
        let stale = issue_challenge(&address, now_secs() - 3600);
        let signature = keypair.sign(stale.as_bytes());
        let result = ledger
            .submit_star(&address, &stale, &signature, sample_star("late"))
            .await;
        assert!(matches!(result, Err(SubmitError::ExpiredChallenge { .. })));

        // Fresh challenge, wrong signer.
        let message = ledger.request_ownership_challenge(&address);
        let forged = Keypair::generate().sign(message.as_bytes());
        let result = ledger
            .submit_star(&address, &message, &forged, sample_star("forged"))
            .await;
        assert!(matches!(result, Err(SubmitError::InvalidSignature)));

        assert_eq!(ledger.chain_height().await, 0);
        assert!(ledger.validate_chain().await.is_empty());
    }

    proptest! {
        #[test]
        fn prop_appended_chains_validate_clean(
            seeds in proptest::collection::vec(any::<[u8; 32]>(), 1..8),
        ) {
            let mut chain = initialized_chain();
            let mut expected = Vec::new();

            for (i, seed) in seeds.iter().enumerate() {
                let keypair = Keypair::from_seed(seed);
                let record = StarRecord {
                    address: keypair.address(),
                    star: sample_star(&format!("story {i}")),
                };
                let body = encode_record(&record).unwrap();
                let block = chain.append(body, NOW + i as i64).unwrap();

                prop_assert_eq!(block.height, i as u64 + 1);
                expected.push(record);
            }

            prop_assert!(chain.validate().is_empty());
            prop_assert_eq!(chain.height(), seeds.len() as i64);

            // Every payload round-trips through its block.
            for (i, record) in expected.iter().enumerate() {
                let block = chain.block_by_height(i as u64 + 1).unwrap();
                prop_assert_eq!(&block.decode_payload().unwrap(), record);
            }
        }
    }
}
