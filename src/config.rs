//! Ledger configuration

use serde::Deserialize;
use thiserror::Error;

use std::fs;
use std::path::Path;

use crate::blockchain::hasher::HASH_HEX_LEN;

/// Environment variable overriding the mining difficulty
pub const DIFFICULTY_ENV: &str = "LEDGER_DIFFICULTY";

/// Environment variable overriding the admission policy
pub const ADMISSION_ENV: &str = "LEDGER_ADMISSION";

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Difficulty {0} exceeds the hash length of 64")]
    DifficultyTooHigh(usize),
}

/// How a submitted transaction's funds are checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdmissionPolicy {
    /// Check against committed balances only; queued transfers are ignored,
    /// so a sender can overdraw across one unmined batch.
    #[default]
    Committed,

    /// Check against committed balances plus the net effect of every transfer
    /// already queued for the next block.
    RunningBalance,
}

impl std::str::FromStr for AdmissionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "committed" => Ok(AdmissionPolicy::Committed),
            "running-balance" => Ok(AdmissionPolicy::RunningBalance),
            other => Err(ConfigError::InvalidValue {
                name: ADMISSION_ENV,
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Required number of leading zero hex characters in a mined hash
    #[serde(default = "default_difficulty")]
    pub difficulty: usize,

    #[serde(default)]
    pub admission: AdmissionPolicy,
}

fn default_difficulty() -> usize {
    4
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            admission: AdmissionPolicy::default(),
        }
    }
}

impl LedgerConfig {
    pub fn with_difficulty(mut self, difficulty: usize) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_admission(mut self, admission: AdmissionPolicy) -> Self {
        self.admission = admission;
        self
    }

    /// Parses a configuration from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: LedgerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Applies overrides from a variable lookup such as `std::env::var`
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(DIFFICULTY_ENV) {
            self.difficulty = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: DIFFICULTY_ENV,
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup(ADMISSION_ENV) {
            self.admission = value.trim().parse()?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Applies overrides from the process environment
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.difficulty > HASH_HEX_LEN {
            return Err(ConfigError::DifficultyTooHigh(self.difficulty));
        }
        Ok(())
    }
}
