//! `ValidatorKey` (spec.md §3): a fixed-width 336-byte tuple of key
//! material. Key *validity* (curve membership etc.) is a cryptographic
//! oracle's concern; this type only carries bytes and the canonical
//! encode/decode of the tuple layout.

use serde::{Deserialize, Serialize};

use crate::config::VALIDATOR_KEY_SIZE;
use crate::error::CodecError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorKey {
    pub bandersnatch: [u8; 32],
    pub ed25519: [u8; 32],
    pub bls: [u8; 144],
    pub metadata: [u8; 128],
}

impl ValidatorKey {
    #[must_use]
    pub fn to_bytes(&self) -> [u8; VALIDATOR_KEY_SIZE] {
        let mut out = [0u8; VALIDATOR_KEY_SIZE];
        out[0..32].copy_from_slice(&self.bandersnatch);
        out[32..64].copy_from_slice(&self.ed25519);
        out[64..208].copy_from_slice(&self.bls);
        out[208..336].copy_from_slice(&self.metadata);
        out
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, CodecError> {
        if data.len() < VALIDATOR_KEY_SIZE {
            return Err(CodecError::Truncated {
                expected: VALIDATOR_KEY_SIZE,
                got: data.len(),
            });
        }
        let mut bandersnatch = [0u8; 32];
        let mut ed25519 = [0u8; 32];
        let mut bls = [0u8; 144];
        let mut metadata = [0u8; 128];
        bandersnatch.copy_from_slice(&data[0..32]);
        ed25519.copy_from_slice(&data[32..64]);
        bls.copy_from_slice(&data[64..208]);
        metadata.copy_from_slice(&data[208..336]);
        Ok(Self {
            bandersnatch,
            ed25519,
            bls,
            metadata,
        })
    }
}

impl Default for ValidatorKey {
    fn default() -> Self {
        Self {
            bandersnatch: [0u8; 32],
            ed25519: [0u8; 32],
            bls: [0u8; 144],
            metadata: [0u8; 128],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_bytes() {
        let mut key = ValidatorKey::default();
        key.ed25519[0] = 0xab;
        key.bls[143] = 0xcd;
        let bytes = key.to_bytes();
        assert_eq!(bytes.len(), VALIDATOR_KEY_SIZE);
        let decoded = ValidatorKey::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn from_bytes_rejects_short_input() {
        assert!(ValidatorKey::from_bytes(&[0u8; 10]).is_err());
    }
}
