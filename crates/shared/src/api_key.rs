use rand::RngCore;
use sha2::{Digest, Sha256};

const KEY_PREFIX: &str = "mnemo_";
const KEY_BYTES: usize = 32;

/// Generate a new raw API key. Shown to the caller exactly once; only the
/// hash is persisted.
#[must_use]
pub fn generate_api_key() -> String {
  let mut bytes = [0u8; KEY_BYTES];
  rand::thread_rng().fill_bytes(&mut bytes);
  format!("{KEY_PREFIX}{}", hex::encode(bytes))
}

/// Hex-encoded SHA-256 hash of a raw API key, as stored in `api_key_hash`.
#[must_use]
pub fn hash_api_key(raw_key: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(raw_key.as_bytes());
  hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_is_deterministic() {
    let key = generate_api_key();
    assert_eq!(hash_api_key(&key), hash_api_key(&key));
  }

  #[test]
  fn different_keys_hash_differently() {
    let a = generate_api_key();
    let b = generate_api_key();
    assert_ne!(a, b);
    assert_ne!(hash_api_key(&a), hash_api_key(&b));
  }

  #[test]
  fn generated_key_has_prefix() {
    assert!(generate_api_key().starts_with(KEY_PREFIX));
  }
}
