// Blockchain module
//
// This module contains the core ledger implementation including:
// - Block hashing
// - Block structure and proof of work
// - Blockchain structure (chain, pending queue, wallets)
// - Transaction structure
// - Wallets and addresses

pub mod block;
pub mod chain;
pub mod hasher;
pub mod transaction;
pub mod wallet;

// Re-export main components for easier access
pub use block::{Block, BlockPayload};
pub use chain::{Blockchain, BlockchainError, MiningOutcome};
pub use transaction::{Transaction, TransactionError};
pub use wallet::{Address, Wallet};
