//! Error types for the fair roll protocol.

use crate::protocol::RoundPhase;
use thiserror::Error;

/// The secure random source could not supply bytes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entropy source failed: {0}")]
pub struct EntropyError(pub String);

/// Errors from protocol operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Entropy unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Invalid modulus: {0} (must be in 1..=2^31)")]
    InvalidModulus(u32),

    #[error("Invalid contribution: {contribution} is outside [0, {modulus})")]
    InvalidContribution { contribution: u32, modulus: u32 },

    #[error("Cannot {operation} while round is {phase}")]
    ProtocolState {
        operation: &'static str,
        phase: RoundPhase,
    },
}

impl From<EntropyError> for ProtocolError {
    fn from(err: EntropyError) -> Self {
        ProtocolError::EntropyUnavailable(err.0)
    }
}

/// Reasons a revealed round fails an audit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptError {
    #[error("Commitment does not match the revealed key and value")]
    CommitmentMismatch,

    #[error("Modulus {0} is outside 1..=2^31")]
    InvalidModulus(u32),

    #[error("Committed value {value} is outside [0, {modulus})")]
    ValueOutOfRange { value: u32, modulus: u32 },

    #[error("Peer contribution {contribution} is outside [0, {modulus})")]
    ContributionOutOfRange { contribution: u32, modulus: u32 },

    #[error("Result {actual} does not match expected {expected}")]
    ResultMismatch { expected: u32, actual: u32 },
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
