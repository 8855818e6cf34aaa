use anyhow::{Result, bail};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

pub const DEFAULT_SEED: u64 = 1337;

/// Hash a free-form seed phrase down to a numeric seed.
#[must_use]
pub fn phrase_seed(phrase: &str) -> u64 {
    let digest = Sha256::digest(phrase.trim().to_lowercase().as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Resolve a list of CLI seed arguments into numeric seeds.
///
/// Integers are taken literally (negative values by magnitude); other
/// tokens are treated as seed phrases. Duplicates are dropped in order
/// and an empty list falls back to [`DEFAULT_SEED`].
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seen = HashSet::new();
    let mut seeds = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let seed = if let Ok(value) = token.parse::<i64>() {
            value.unsigned_abs()
        } else if let Ok(value) = token.parse::<u64>() {
            value
        } else if token.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
            phrase_seed(token)
        } else {
            bail!("Unrecognized seed token: {token}");
        };

        if seen.insert(seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }

    Ok(seeds)
}
