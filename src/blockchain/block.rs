use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use super::hasher::{self, meets_difficulty};
use super::transaction::Transaction;

/// Previous-hash sentinel carried by the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Contents of a block
///
/// The genesis block carries a marker instead of transactions, so every other
/// block holds a homogeneous list of transfers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockPayload {
    Genesis,
    Transactions(Vec<Transaction>),
}

impl BlockPayload {
    /// Gets the transactions in this payload (empty for genesis)
    pub fn transactions(&self) -> &[Transaction] {
        match self {
            BlockPayload::Genesis => &[],
            BlockPayload::Transactions(transactions) => transactions,
        }
    }

    pub fn is_genesis(&self) -> bool {
        matches!(self, BlockPayload::Genesis)
    }
}

/// Represents a block in the blockchain
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    /// Index of the block in the chain
    pub index: u64,

    /// Transactions included in this block, or the genesis marker
    pub payload: BlockPayload,

    /// Timestamp when the block was created
    pub timestamp: DateTime<Utc>,

    /// Hash of the previous block
    pub previous_hash: String,

    /// Proof of work counter
    pub nonce: u64,

    /// Cached hash of the fields above
    hash: String,
}

impl Block {
    /// Creates a new unmined block stamped with the current time
    ///
    /// # Arguments
    ///
    /// * `index` - The index of the block in the chain
    /// * `payload` - The transactions (or genesis marker) to include
    /// * `previous_hash` - The hash of the previous block
    pub fn new(index: u64, payload: BlockPayload, previous_hash: String) -> Self {
        Self::with_timestamp(index, payload, Utc::now(), previous_hash)
    }

    /// Creates a new unmined block with an explicit timestamp
    pub fn with_timestamp(
        index: u64,
        payload: BlockPayload,
        timestamp: DateTime<Utc>,
        previous_hash: String,
    ) -> Self {
        let mut block = Block {
            index,
            payload,
            timestamp,
            previous_hash,
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.calculate_hash();
        block
    }

    /// Creates the genesis block
    pub fn genesis() -> Self {
        Self::new(0, BlockPayload::Genesis, GENESIS_PREVIOUS_HASH.to_string())
    }

    /// Calculates the hash of the block from its current fields
    ///
    /// # Returns
    ///
    /// The SHA-256 hash of the block as a hexadecimal string
    pub fn calculate_hash(&self) -> String {
        hasher::calculate_hash(
            self.index,
            &self.payload,
            &self.timestamp,
            &self.previous_hash,
            self.nonce,
        )
    }

    /// Moves the block to a new position and refreshes its hash
    ///
    /// The nonce is kept, so a later `mine` resumes from it.
    pub(crate) fn relink(&mut self, index: u64, previous_hash: String) {
        self.index = index;
        self.previous_hash = previous_hash;
        self.hash = self.calculate_hash();
    }

    /// Gets the stored hash of the block
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Checks the stored hash against a fresh recomputation
    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.calculate_hash()
    }

    /// Gets the transactions in the block (empty for genesis)
    pub fn transactions(&self) -> &[Transaction] {
        self.payload.transactions()
    }

    /// Searches for a nonce whose hash has `difficulty` leading zeros
    ///
    /// Starts from the current nonce and increments by one per attempt. There is
    /// no upper bound on the search.
    ///
    /// # Returns
    ///
    /// The hash of the mined block
    pub fn mine(&mut self, difficulty: usize) -> &str {
        self.hash = self.calculate_hash();
        while !meets_difficulty(&self.hash, difficulty) {
            self.nonce = self.nonce.wrapping_add(1);
            self.hash = self.calculate_hash();
        }

        info!("Block mined: {} (index {}, nonce {})", self.hash, self.index, self.nonce);
        &self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::Address;

    fn transfer(amount: f64) -> Transaction {
        Transaction::new(
            Address("sender".to_string()),
            Address("receiver".to_string()),
            amount,
        )
    }

    #[test]
    fn test_new_block() {
        let payload = BlockPayload::Transactions(vec![transfer(10.0), transfer(20.0)]);

        let block = Block::new(1, payload, "previous_hash".to_string());

        assert_eq!(block.index, 1);
        assert_eq!(block.nonce, 0);
        assert_eq!(block.previous_hash, "previous_hash");
        assert_eq!(block.transactions().len(), 2);
        assert_eq!(block.hash().len(), 64);
        assert!(block.has_valid_hash());
    }

    #[test]
    fn test_genesis_block() {
        let genesis = Block::genesis();

        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert!(genesis.payload.is_genesis());
        assert!(genesis.transactions().is_empty());
        assert!(genesis.has_valid_hash());
    }

    #[test]
    fn test_calculate_hash_is_repeatable() {
        let block = Block::new(
            1,
            BlockPayload::Transactions(vec![transfer(10.0)]),
            "previous_hash".to_string(),
        );

        assert_eq!(block.calculate_hash(), block.calculate_hash());
        assert_eq!(block.calculate_hash(), block.hash());
    }

    #[test]
    fn test_mine_block() {
        let mut block = Block::new(
            1,
            BlockPayload::Transactions(vec![transfer(10.0)]),
            "previous_hash".to_string(),
        );

        let mined_hash = block.mine(2).to_string();

        assert!(mined_hash.starts_with("00"));
        assert_eq!(mined_hash, block.hash());
        assert_eq!(block.hash(), block.calculate_hash());
    }

    #[test]
    fn test_mine_with_zero_difficulty_keeps_nonce() {
        let mut block = Block::new(1, BlockPayload::Transactions(vec![]), "prev".to_string());
        let before = block.hash().to_string();

        block.mine(0);

        assert_eq!(block.nonce, 0);
        assert_eq!(block.hash(), before);
    }

    #[test]
    fn test_mine_resumes_from_current_nonce() {
        let mut block = Block::new(
            1,
            BlockPayload::Transactions(vec![transfer(10.0)]),
            "previous_hash".to_string(),
        );
        block.nonce = 1000;

        block.mine(1);

        assert!(block.nonce >= 1000);
        assert!(block.hash().starts_with('0'));
        assert_eq!(block.hash(), block.calculate_hash());
    }

    #[test]
    fn test_relink_refreshes_hash() {
        let mut block = Block::new(5, BlockPayload::Transactions(vec![]), "stale".to_string());
        block.nonce = 7;

        block.relink(2, "tip".to_string());

        assert_eq!(block.index, 2);
        assert_eq!(block.previous_hash, "tip");
        assert_eq!(block.nonce, 7);
        assert!(block.has_valid_hash());
    }

    #[test]
    fn test_field_change_invalidates_hash() {
        let mut block = Block::new(
            1,
            BlockPayload::Transactions(vec![transfer(10.0)]),
            "previous_hash".to_string(),
        );
        block.mine(1);

        block.payload = BlockPayload::Transactions(vec![transfer(1000.0)]);

        assert!(!block.has_valid_hash());
    }
}
