use log::debug;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::blockchain::{
    Address, Block, Blockchain, BlockchainError, MiningOutcome, Transaction, TransactionError,
    Wallet,
};

/// Caller-facing entry point to a ledger
///
/// Cloning a node shares the same ledger. Every call holds the ledger lock for
/// its full duration, so submissions never interleave with a mining step.
#[derive(Debug, Clone)]
pub struct Node {
    blockchain: Arc<Mutex<Blockchain>>,
}

impl Node {
    pub fn new(blockchain: Blockchain) -> Self {
        Node {
            blockchain: Arc::new(Mutex::new(blockchain)),
        }
    }

    fn ledger(&self) -> MutexGuard<'_, Blockchain> {
        self.blockchain
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a transaction and submits it to the ledger
    ///
    /// # Arguments
    ///
    /// * `sender` - The address of the sender
    /// * `receiver` - The address of the receiver
    /// * `amount` - The amount to transfer
    ///
    /// # Returns
    ///
    /// Ok if the transaction was queued, or the reason it was rejected
    pub fn create_transaction(
        &self,
        sender: Address,
        receiver: Address,
        amount: f64,
    ) -> Result<(), TransactionError> {
        let transaction = Transaction::new(sender, receiver, amount);
        self.ledger().submit_transaction(transaction)
    }

    /// Registers a wallet with the ledger
    pub fn add_wallet(&self, wallet: Wallet) {
        debug!("Registering wallet {}", wallet.address());
        self.ledger().add_wallet(wallet);
    }

    pub fn mine_pending_transactions(&self) -> Result<MiningOutcome, BlockchainError> {
        self.ledger().mine_pending_transactions()
    }

    pub fn is_chain_valid(&self) -> bool {
        self.ledger().is_chain_valid()
    }

    /// Gets a snapshot of the chain
    pub fn chain(&self) -> Vec<Block> {
        self.ledger().chain().to_vec()
    }

    /// Gets a snapshot of the registered wallets
    pub fn wallets(&self) -> Vec<Wallet> {
        self.ledger().wallets().to_vec()
    }

    /// Gets a snapshot of the pending transactions
    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.ledger().pending_transactions().to_vec()
    }

    /// Runs a read-only closure against the ledger
    pub fn inspect<R>(&self, f: impl FnOnce(&Blockchain) -> R) -> R {
        let ledger = self.ledger();
        f(&ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;

    fn test_node() -> Node {
        Node::new(Blockchain::with_config(LedgerConfig::default().with_difficulty(1)).unwrap())
    }

    #[test]
    fn test_forwards_to_ledger() {
        let node = test_node();
        let alice = Wallet::with_balance("Alice", 20.0);
        let bob = Wallet::new("Bob");
        let (from, to) = (alice.address().clone(), bob.address().clone());

        node.add_wallet(alice);
        node.add_wallet(bob);
        node.create_transaction(from.clone(), to.clone(), 5.0).unwrap();

        assert_eq!(node.pending_transactions().len(), 1);
        assert_eq!(node.wallets().len(), 2);

        let outcome = node.mine_pending_transactions().unwrap();
        assert_eq!(outcome.block().map(|b| b.index), Some(1));
        assert_eq!(node.chain().len(), 2);
        assert!(node.pending_transactions().is_empty());
        assert_eq!(node.inspect(|ledger| ledger.wallet(&to).map(Wallet::balance)), Some(5.0));
    }

    #[test]
    fn test_reports_rejection() {
        let node = test_node();
        let alice = Wallet::with_balance("Alice", 1.0);
        let from = alice.address().clone();
        node.add_wallet(alice);

        let result = node.create_transaction(from, Address::from("bob"), 2.0);

        assert!(matches!(result, Err(TransactionError::InsufficientFunds { .. })));
        assert!(node.pending_transactions().is_empty());
    }

    #[test]
    fn test_clones_share_ledger() {
        let node = test_node();
        let other = node.clone();

        other.add_wallet(Wallet::new("Carol"));

        assert_eq!(node.wallets().len(), 1);
    }
}
