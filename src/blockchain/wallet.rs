use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Number of characters in a generated address
pub const ADDRESS_LEN: usize = 16;

/// Represents a wallet address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Generates a random alphanumeric address
    pub fn generate() -> Self {
        let address = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(ADDRESS_LEN)
            .map(char::from)
            .collect();
        Address(address)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Address(s.to_string()))
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address(s.to_string())
    }
}

/// Represents a wallet: a display name, an address and a balance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wallet {
    /// Display label, not used for lookup
    pub username: String,

    address: Address,

    balance: f64,
}

impl Wallet {
    /// Creates a new empty wallet with a freshly generated address
    pub fn new(username: impl Into<String>) -> Self {
        Self::with_balance(username, 0.0)
    }

    /// Creates a new wallet holding an opening balance
    pub fn with_balance(username: impl Into<String>, balance: f64) -> Self {
        Wallet {
            username: username.into(),
            address: Address::generate(),
            balance,
        }
    }

    /// Gets the wallet's address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Derives the wallet's private key from its address
    ///
    /// # Returns
    ///
    /// The SHA-256 hash of the address as a hexadecimal string
    pub fn private_key(&self) -> String {
        hex::encode(Sha256::digest(self.address.as_str().as_bytes()))
    }

    /// Gets the wallet's balance
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Checks if the wallet holds at least `amount`
    pub fn has_sufficient_funds(&self, amount: f64) -> bool {
        self.balance >= amount
    }

    // Balance mutation is reserved for the ledger's settlement step.
    pub(crate) fn credit(&mut self, amount: f64) {
        self.balance += amount;
    }

    pub(crate) fn debit(&mut self, amount: f64) {
        self.balance -= amount;
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wallet(username={}, address={}, balance={})",
            self.username, self.address, self.balance
        )
    }
}
