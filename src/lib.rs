//! A minimal single-node proof-of-work ledger.
//!
//! Wallets are registered with a [`Node`], transfers are checked against the
//! committed balances and queued, and mining packages the queue into a new
//! block whose hash carries the configured number of leading zeros.
//!
//! ```rust
//! use pow_ledger::{Blockchain, LedgerConfig, Node, Wallet};
//!
//! let blockchain = Blockchain::with_config(LedgerConfig::default().with_difficulty(1)).unwrap();
//! let node = Node::new(blockchain);
//!
//! let alice = Wallet::with_balance("Alice", 100.0);
//! let bob = Wallet::new("Bob");
//! let (from, to) = (alice.address().clone(), bob.address().clone());
//! node.add_wallet(alice);
//! node.add_wallet(bob);
//!
//! node.create_transaction(from, to, 25.0).unwrap();
//! node.mine_pending_transactions().unwrap();
//! assert!(node.is_chain_valid());
//! ```

pub mod blockchain;
pub mod config;
pub mod node;

pub use blockchain::{
    Address, Block, BlockPayload, Blockchain, BlockchainError, MiningOutcome, Transaction,
    TransactionError, Wallet,
};
pub use config::{AdmissionPolicy, ConfigError, LedgerConfig};
pub use node::Node;
