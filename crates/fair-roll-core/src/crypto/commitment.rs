//! Commitment for the commit-reveal scheme.

use super::SecretKey;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Fixed-width encoding of a committed value: 4 bytes, little-endian.
///
/// Generator and verifier must agree on this exactly.
pub fn encode_value(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

fn keyed_mac(key: &SecretKey, value: u32) -> HmacSha256 {
    // HMAC pads or hashes any key length, so new_from_slice never errors
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(&encode_value(value));
    mac
}

/// Commitment = HMAC-SHA256(key, encode(value))
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment([u8; 32]);

impl Commitment {
    /// Commit to `value` under `key`
    pub fn new(key: &SecretKey, value: u32) -> Self {
        Self(keyed_mac(key, value).finalize().into_bytes().into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Verify that the given key and value produce this commitment.
    /// The tag comparison runs in constant time.
    pub fn verify(&self, key: &SecretKey, value: u32) -> bool {
        keyed_mac(key, value).verify_slice(&self.0).is_ok()
    }

    /// Uppercase hex rendering (64 characters)
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

/// Recompute the commitment from revealed material and compare
pub fn verify(commitment: &Commitment, key: &SecretKey, value: u32) -> bool {
    commitment.verify(key, value)
}

/// Verify hex-encoded material from an untrusted source.
///
/// Malformed input is a failed verification, not an error.
pub fn verify_hex(commitment: &str, key: &str, value: u32) -> bool {
    match (commitment.parse::<Commitment>(), key.parse::<SecretKey>()) {
        (Ok(commitment), Ok(key)) => commitment.verify(&key, value),
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseCommitmentError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("expected 32 bytes, got {0}")]
    Length(usize),
}

impl FromStr for Commitment {
    type Err = ParseCommitmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim())?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParseCommitmentError::Length(bytes.len()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode_upper(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_hex().serialize(s)
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(d)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::OsEntropy;

    const ZERO_KEY_COMMIT_4: &str =
        "3DBC85033014CE26B705A5B95FF70816AB9472BD008EF56CADBF538FFE9AFF84";
    const ZERO_KEY_COMMIT_5: &str =
        "10C6D353F0E4D7B21CE3AE24E07A52EF43BC27E4DD143B146E3FB5257478680B";

    fn random_key() -> SecretKey {
        SecretKey::generate(&mut OsEntropy::new()).unwrap()
    }

    #[test]
    fn test_known_answer() {
        let key = SecretKey::from_bytes([0u8; 32]);

        assert_eq!(Commitment::new(&key, 4).to_hex(), ZERO_KEY_COMMIT_4);
        assert_eq!(Commitment::new(&key, 5).to_hex(), ZERO_KEY_COMMIT_5);
    }

    #[test]
    fn test_value_encoding_is_little_endian() {
        assert_eq!(encode_value(4), [4, 0, 0, 0]);
        assert_eq!(encode_value(0x0102_0304), [4, 3, 2, 1]);
    }

    #[test]
    fn test_commitment_verification() {
        let key = random_key();
        let commitment = Commitment::new(&key, 3);

        assert!(commitment.verify(&key, 3));
        assert!(verify(&commitment, &key, 3));
    }

    #[test]
    fn test_different_values_different_commitments() {
        let key = random_key();
        assert_ne!(Commitment::new(&key, 0), Commitment::new(&key, 1));
    }

    #[test]
    fn test_different_keys_different_commitments() {
        assert_ne!(
            Commitment::new(&random_key(), 2),
            Commitment::new(&random_key(), 2)
        );
    }

    #[test]
    fn test_wrong_value_fails_verification() {
        let key = random_key();
        let commitment = Commitment::new(&key, 2);

        assert!(!commitment.verify(&key, 3));
    }

    #[test]
    fn test_flipped_key_byte_fails_verification() {
        let key = random_key();
        let commitment = Commitment::new(&key, 5);

        for i in 0..32 {
            let mut bytes = *key.as_bytes();
            bytes[i] ^= 0x01;
            assert!(!commitment.verify(&SecretKey::from_bytes(bytes), 5));
        }
    }

    #[test]
    fn test_flipped_commitment_byte_fails_verification() {
        let key = random_key();
        let mut bytes = *Commitment::new(&key, 1).as_bytes();
        bytes[31] ^= 0x80;

        assert!(!Commitment::from_bytes(bytes).verify(&key, 1));
    }

    #[test]
    fn test_hex_roundtrip_either_case() {
        let commitment: Commitment = ZERO_KEY_COMMIT_4.parse().unwrap();
        let lower: Commitment = ZERO_KEY_COMMIT_4.to_lowercase().parse().unwrap();

        assert_eq!(commitment, lower);
        assert_eq!(commitment.to_string(), ZERO_KEY_COMMIT_4);
        assert_eq!(commitment.to_hex().len(), 64);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert_eq!(
            "ABCD".parse::<Commitment>(),
            Err(ParseCommitmentError::Length(2))
        );
        assert_eq!(
            "zz".parse::<Commitment>(),
            Err(ParseCommitmentError::Hex(hex::FromHexError::InvalidHexCharacter {
                c: 'z',
                index: 0
            }))
        );
    }

    #[test]
    fn test_verify_hex() {
        let zero_key = "00".repeat(32);

        assert!(verify_hex(ZERO_KEY_COMMIT_4, &zero_key, 4));
        assert!(verify_hex(&ZERO_KEY_COMMIT_4.to_lowercase(), &zero_key, 4));
        assert!(!verify_hex(ZERO_KEY_COMMIT_4, &zero_key, 5));
        assert!(!verify_hex("zz", &zero_key, 4));
        assert!(!verify_hex(ZERO_KEY_COMMIT_4, "00", 4));
    }
}
