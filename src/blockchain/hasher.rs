use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use super::block::BlockPayload;

/// Length of a rendered block hash (SHA-256 as lowercase hex)
pub const HASH_HEX_LEN: usize = 64;

/// Calculates the digest of a block's fields
///
/// The fields are serialized to a canonical JSON document before hashing, so
/// the same field values always produce the same digest.
///
/// # Returns
///
/// The SHA-256 hash as a lowercase hexadecimal string
pub fn calculate_hash(
    index: u64,
    payload: &BlockPayload,
    timestamp: &DateTime<Utc>,
    previous_hash: &str,
    nonce: u64,
) -> String {
    let block_data = serde_json::json!({
        "index": index,
        "transactions": payload,
        "timestamp": timestamp,
        "previous_hash": previous_hash,
        "nonce": nonce,
    });

    let mut hasher = Sha256::new();
    hasher.update(block_data.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks whether a hash starts with `difficulty` zero characters
pub fn meets_difficulty(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}
