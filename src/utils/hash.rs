// src/utils/hash.rs

//! Content digest helpers.
//!
//! Digests detect content changes between crawls; collision resistance for
//! identity comparison is the only requirement.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::Result;

/// Hex SHA-256 digest of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Hex SHA-256 digest of a file's contents.
pub async fn sha256_file(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(sha256_hex(&bytes))
}
