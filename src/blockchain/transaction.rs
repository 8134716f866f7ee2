use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fmt;

use super::wallet::Address;

/// Reasons a transaction is refused admission to the pending queue
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransactionError {
    #[error("Unknown sender: {0}")]
    UnknownSender(Address),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl TransactionError {
    /// Short label for the kind of rejection
    pub fn reason(&self) -> &'static str {
        match self {
            TransactionError::UnknownSender(_) => "unknown sender",
            TransactionError::InsufficientFunds { .. } => "insufficient funds",
            TransactionError::InvalidAmount(_) => "invalid amount",
        }
    }
}

/// Represents a value transfer between two addresses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender's address
    pub sender: Address,

    /// Receiver's address
    pub receiver: Address,

    /// Amount being transferred
    pub amount: f64,
}

impl Transaction {
    /// Creates a new transaction
    ///
    /// # Arguments
    ///
    /// * `sender` - The address of the sender
    /// * `receiver` - The address of the receiver
    /// * `amount` - The amount to transfer
    pub fn new(sender: Address, receiver: Address, amount: f64) -> Self {
        Transaction {
            sender,
            receiver,
            amount,
        }
    }

    /// Checks that the amount is a finite, strictly positive number
    pub fn check_amount(&self) -> Result<(), TransactionError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(TransactionError::InvalidAmount(format!(
                "Amount must be positive: {}",
                self.amount
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction from {} to {} for {}",
            self.sender, self.receiver, self.amount
        )
    }
}
