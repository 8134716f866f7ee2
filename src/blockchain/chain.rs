use log::{debug, info, warn};
use thiserror::Error;

use std::collections::HashMap;

use super::block::{Block, BlockPayload};
use super::transaction::{Transaction, TransactionError};
use super::wallet::{Address, Wallet};
use crate::config::{AdmissionPolicy, ConfigError, LedgerConfig};

/// Errors that can occur during blockchain operations
#[derive(Debug, Error)]
pub enum BlockchainError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Invalid block: {0}")]
    InvalidBlock(String),

    #[error("Chain is empty")]
    EmptyChain,
}

/// Result of a mining request
#[derive(Debug, Clone)]
pub enum MiningOutcome {
    /// A block was mined and appended to the chain
    Mined(Block),

    /// The pending queue was empty; the chain is unchanged
    NothingToMine,
}

impl MiningOutcome {
    pub fn block(&self) -> Option<&Block> {
        match self {
            MiningOutcome::Mined(block) => Some(block),
            MiningOutcome::NothingToMine => None,
        }
    }
}

/// Represents the blockchain
#[derive(Debug, Clone)]
pub struct Blockchain {
    /// The chain of blocks
    chain: Vec<Block>,

    /// Pending transactions to be included in the next block
    pending_transactions: Vec<Transaction>,

    /// Registered wallets, in registration order
    wallets: Vec<Wallet>,

    /// Position of each wallet in `wallets`
    wallet_index: HashMap<Address, usize>,

    config: LedgerConfig,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Blockchain {
    /// Creates a new blockchain with a genesis block and the default configuration
    pub fn new() -> Self {
        Self::build(LedgerConfig::default())
    }

    /// Creates a new blockchain with a genesis block
    ///
    /// # Arguments
    ///
    /// * `config` - Mining difficulty and admission policy
    ///
    /// # Returns
    ///
    /// A new Blockchain instance, or an error if the configuration is invalid
    pub fn with_config(config: LedgerConfig) -> Result<Self, BlockchainError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: LedgerConfig) -> Self {
        let mut blockchain = Blockchain {
            chain: Vec::new(),
            pending_transactions: Vec::new(),
            wallets: Vec::new(),
            wallet_index: HashMap::new(),
            config,
        };

        blockchain.create_genesis_block();

        blockchain
    }

    /// Creates the genesis block (first block in the chain)
    ///
    /// The genesis block is never mined against the difficulty.
    fn create_genesis_block(&mut self) {
        let genesis_block = Block::genesis();
        debug!("Created genesis block {}", genesis_block.hash());
        self.chain.push(genesis_block);
    }

    /// Gets the last block in the chain
    pub fn latest_block(&self) -> Result<&Block, BlockchainError> {
        self.chain.last().ok_or(BlockchainError::EmptyChain)
    }

    /// Gets the entire blockchain
    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Gets all pending transactions
    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending_transactions
    }

    /// Gets all registered wallets in registration order
    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    /// Looks up a wallet by address
    pub fn wallet(&self, address: &Address) -> Option<&Wallet> {
        self.wallet_index.get(address).map(|&i| &self.wallets[i])
    }

    pub fn difficulty(&self) -> usize {
        self.config.difficulty
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Sum of the balances of every registered wallet
    pub fn total_balance(&self) -> f64 {
        self.wallets.iter().map(Wallet::balance).sum()
    }

    /// Registers a wallet under its address
    ///
    /// # Returns
    ///
    /// The wallet previously registered under the same address, if any
    pub fn add_wallet(&mut self, wallet: Wallet) -> Option<Wallet> {
        let existing = self.wallet_index.get(wallet.address()).copied();
        match existing {
            Some(i) => {
                warn!("Wallet replaced: {}", wallet);
                Some(std::mem::replace(&mut self.wallets[i], wallet))
            }
            None => {
                info!("Wallet added: {}", wallet);
                self.wallet_index
                    .insert(wallet.address().clone(), self.wallets.len());
                self.wallets.push(wallet);
                None
            }
        }
    }

    /// Committed balance plus the net effect of every queued transfer
    /// touching the wallet
    fn running_balance(&self, wallet: &Wallet) -> f64 {
        let address = wallet.address();
        let net: f64 = self
            .pending_transactions
            .iter()
            .map(|tx| {
                let mut delta = 0.0;
                if &tx.receiver == address {
                    delta += tx.amount;
                }
                if &tx.sender == address {
                    delta -= tx.amount;
                }
                delta
            })
            .sum();
        wallet.balance() + net
    }

    /// Checks a transaction against the current ledger state
    ///
    /// The receiver is never checked.
    pub fn validate_transaction(&self, transaction: &Transaction) -> Result<(), TransactionError> {
        transaction.check_amount()?;

        let sender = self
            .wallet(&transaction.sender)
            .ok_or_else(|| TransactionError::UnknownSender(transaction.sender.clone()))?;

        let (sufficient, available) = match self.config.admission {
            AdmissionPolicy::Committed => (
                sender.has_sufficient_funds(transaction.amount),
                sender.balance(),
            ),
            AdmissionPolicy::RunningBalance => {
                let available = self.running_balance(sender);
                (available >= transaction.amount, available)
            }
        };

        if !sufficient {
            return Err(TransactionError::InsufficientFunds {
                required: transaction.amount,
                available,
            });
        }

        Ok(())
    }

    pub fn is_transaction_valid(&self, transaction: &Transaction) -> bool {
        self.validate_transaction(transaction).is_ok()
    }

    /// Adds a transaction to the pending queue if it is valid
    ///
    /// A rejected transaction is dropped; it is not kept for later.
    pub fn submit_transaction(&mut self, transaction: Transaction) -> Result<(), TransactionError> {
        match self.validate_transaction(&transaction) {
            Ok(()) => {
                info!("Transaction created: {}", transaction);
                self.pending_transactions.push(transaction);
                Ok(())
            }
            Err(err) => {
                warn!("Invalid transaction [{}]: {} ({})", err.reason(), transaction, err);
                Err(err)
            }
        }
    }

    /// Mines a new block with the pending transactions
    ///
    /// Builds the block, searches for a nonce, appends it, settles balances and
    /// clears the queue as one step.
    ///
    /// # Returns
    ///
    /// The newly mined block, or `NothingToMine` if the queue is empty
    pub fn mine_pending_transactions(&mut self) -> Result<MiningOutcome, BlockchainError> {
        if self.pending_transactions.is_empty() {
            info!("No transactions to mine");
            return Ok(MiningOutcome::NothingToMine);
        }

        let previous_hash = self.latest_block()?.hash().to_string();
        let transactions = std::mem::take(&mut self.pending_transactions);

        let block = Block::new(
            self.chain.len() as u64,
            BlockPayload::Transactions(transactions),
            previous_hash,
        );

        Ok(MiningOutcome::Mined(self.commit_block(block)))
    }

    /// Links a caller-built block to the tip of the chain, mines it and
    /// appends it
    ///
    /// The block's index and previous hash are overwritten. Its transactions
    /// are settled as they are, without the admission check.
    ///
    /// # Returns
    ///
    /// The mined block as appended to the chain
    pub fn add_block(&mut self, mut block: Block) -> Result<Block, BlockchainError> {
        if block.payload.is_genesis() {
            return Err(BlockchainError::InvalidBlock(
                "genesis payload cannot be appended".to_string(),
            ));
        }

        let previous_hash = self.latest_block()?.hash().to_string();
        block.relink(self.chain.len() as u64, previous_hash);

        Ok(self.commit_block(block))
    }

    // Mines, settles and appends in one step.
    fn commit_block(&mut self, mut block: Block) -> Block {
        block.mine(self.config.difficulty);

        self.update_balances(block.transactions());
        self.chain.push(block.clone());

        info!(
            "Appended block {} with {} transactions",
            block.index,
            block.transactions().len()
        );

        block
    }

    /// Applies a batch of transfers to the wallet balances in order
    ///
    /// Transfers whose sender or receiver is not registered are skipped.
    pub fn update_balances(&mut self, transactions: &[Transaction]) {
        for transaction in transactions {
            let sender = self.wallet_index.get(&transaction.sender).copied();
            let receiver = self.wallet_index.get(&transaction.receiver).copied();

            match (sender, receiver) {
                (Some(sender), Some(receiver)) => {
                    self.wallets[sender].debit(transaction.amount);
                    self.wallets[receiver].credit(transaction.amount);
                }
                _ => warn!("Skipping transfer with unknown endpoint: {}", transaction),
            }
        }
    }

    /// Validates the blockchain
    ///
    /// Every block after genesis must hash to its stored hash and point at the
    /// stored hash of its predecessor.
    ///
    /// # Returns
    ///
    /// true if the blockchain is valid, false otherwise
    pub fn is_chain_valid(&self) -> bool {
        for pair in self.chain.windows(2) {
            let (previous_block, current_block) = (&pair[0], &pair[1]);

            if !current_block.has_valid_hash() {
                warn!("Block {} hash does not match its contents", current_block.index);
                return false;
            }

            if current_block.previous_hash != previous_block.hash() {
                warn!("Block {} is not linked to its predecessor", current_block.index);
                return false;
            }
        }

        true
    }
}
