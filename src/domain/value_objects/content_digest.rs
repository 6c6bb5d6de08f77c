use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// SHA-256 content digest (32 bytes = 64 hex chars), the storage key for blobs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Create from validated hex string
    pub fn from_hex(hex: String) -> Result<Self, DomainError> {
        if hex.len() != 64 {
            return Err(DomainError::InvalidDigest(format!(
                "expected 64 hex characters, got {}",
                hex.len()
            )));
        }

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidDigest(hex));
        }

        Ok(Self(hex.to_lowercase()))
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// First two hex characters, used as the shard directory name
    pub fn shard(&self) -> &str {
        &self.0[0..2]
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ContentDigest {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_digest_from_hex_valid() {
        let hex = "a".repeat(64);
        let digest = ContentDigest::from_hex(hex.clone()).unwrap();
        assert_eq!(digest.as_hex(), hex);
    }

    #[test]
    fn test_digest_lowercases_input() {
        let hex = "AB".to_string() + &"c".repeat(62);
        let digest = ContentDigest::from_hex(hex).unwrap();
        assert!(digest.as_hex().starts_with("ab"));
    }

    #[test]
    fn test_digest_from_hex_invalid_length() {
        let err = ContentDigest::from_hex("a".repeat(63)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDigest(_)));
    }

    #[test]
    fn test_digest_from_hex_invalid_chars() {
        let err = ContentDigest::from_hex("g".repeat(64)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDigest(_)));
    }

    #[test]
    fn test_digest_shard() {
        let hex = "3f".to_string() + &"0".repeat(62);
        let digest = ContentDigest::from_str(&hex).unwrap();
        assert_eq!(digest.shard(), "3f");
    }
}
