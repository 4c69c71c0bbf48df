//! Protocol messages.

use super::round::combine;
use crate::crypto::{Commitment, SecretKey};
use crate::error::TranscriptError;
use crate::protocol::RoundId;
use crate::rng::SPACE_SIZE;
use serde::{Deserialize, Serialize};

/// Shown to the peer once the host has committed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub round_id: RoundId,
    pub modulus: u32,
    pub commitment: Commitment,
}

/// Everything revealed at the end of a round.
///
/// Enough for any third party to recompute the commitment and the result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round_id: RoundId,
    pub modulus: u32,
    pub committed_value: u32,
    pub secret_key: SecretKey,
    pub commitment: Commitment,
    pub peer_contribution: u32,
    pub result: u32,
}

impl RoundResult {
    /// Audit the transcript: ranges, commitment and combination law
    pub fn check(&self) -> Result<(), TranscriptError> {
        let modulus = self.modulus;
        if modulus == 0 || u64::from(modulus) > SPACE_SIZE {
            return Err(TranscriptError::InvalidModulus(modulus));
        }
        if self.committed_value >= modulus {
            return Err(TranscriptError::ValueOutOfRange {
                value: self.committed_value,
                modulus,
            });
        }
        if self.peer_contribution >= modulus {
            return Err(TranscriptError::ContributionOutOfRange {
                contribution: self.peer_contribution,
                modulus,
            });
        }
        if !self.commitment.verify(&self.secret_key, self.committed_value) {
            return Err(TranscriptError::CommitmentMismatch);
        }

        let expected = combine(self.committed_value, self.peer_contribution, modulus);
        if self.result != expected {
            return Err(TranscriptError::ResultMismatch {
                expected,
                actual: self.result,
            });
        }
        Ok(())
    }

    /// Does the transcript pass [`RoundResult::check`]?
    pub fn verify(&self) -> bool {
        self.check().is_ok()
    }

    /// The announcement this round published before the reveal
    pub fn announcement(&self) -> Announcement {
        Announcement {
            round_id: self.round_id,
            modulus: self.modulus,
            commitment: self.commitment,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
