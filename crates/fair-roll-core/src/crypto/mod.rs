//! Cryptographic primitives for the fair roll protocol.
//!
//! This module provides:
//! - SecretKey, the per-round HMAC key
//! - Commitment, the HMAC-SHA-256 binding of a committed value

mod commitment;
mod key;

pub use commitment::{encode_value, verify, verify_hex, Commitment, ParseCommitmentError};
pub use key::{ParseKeyError, SecretKey, KEY_LEN};
