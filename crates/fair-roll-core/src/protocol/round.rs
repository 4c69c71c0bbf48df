//! One commit-reveal round.
//!
//! The host commits to a hidden value before the peer picks a contribution;
//! the final result is `(value + contribution) mod modulus`. Because the
//! commitment is fixed first and the key is revealed last, neither side can
//! steer the outcome, and anyone can audit it afterwards.

use super::{Announcement, RoundId, RoundPhase, RoundResult};
use crate::config::ProtocolConfig;
use crate::crypto::{Commitment, SecretKey};
use crate::entropy::EntropySource;
use crate::error::{ProtocolError, Result};
use crate::rng::{BoundedRandom, SPACE_SIZE};
use tracing::{debug, warn};

/// `(value + contribution) mod modulus`, computed without overflow
pub fn combine(value: u32, contribution: u32, modulus: u32) -> u32 {
    ((u64::from(value) + u64::from(contribution)) % u64::from(modulus)) as u32
}

/// Host secrets held between commit and reveal
struct Pending {
    modulus: u32,
    value: u32,
    key: SecretKey,
    commitment: Commitment,
}

enum State {
    Idle,
    Committed(Pending),
    Revealed,
}

impl State {
    fn phase(&self) -> RoundPhase {
        match self {
            State::Idle => RoundPhase::Idle,
            State::Committed(_) => RoundPhase::Committed,
            State::Revealed => RoundPhase::Revealed,
        }
    }
}

/// Single-use fair value generator.
///
/// Construct one per round. The key never leaves the instance before
/// [`FairValue::reveal`] and is wiped if the instance is dropped first.
pub struct FairValue<E> {
    round_id: RoundId,
    rng: BoundedRandom<E>,
    state: State,
}

impl<E: EntropySource> FairValue<E> {
    pub fn new(entropy: E) -> Self {
        Self::with_config(entropy, &ProtocolConfig::default())
    }

    pub fn with_config(entropy: E, config: &ProtocolConfig) -> Self {
        Self {
            round_id: RoundId::new(),
            rng: BoundedRandom::with_config(entropy, config),
            state: State::Idle,
        }
    }

    pub fn round_id(&self) -> RoundId {
        self.round_id
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.phase()
    }

    /// Modulus of the pending round
    pub fn modulus(&self) -> Option<u32> {
        match &self.state {
            State::Committed(pending) => Some(pending.modulus),
            _ => None,
        }
    }

    /// Commitment of the pending round
    pub fn commitment(&self) -> Option<Commitment> {
        match &self.state {
            State::Committed(pending) => Some(pending.commitment),
            _ => None,
        }
    }

    /// Message to show the peer while the round is pending
    pub fn announcement(&self) -> Option<Announcement> {
        match &self.state {
            State::Committed(pending) => Some(Announcement {
                round_id: self.round_id,
                modulus: pending.modulus,
                commitment: pending.commitment,
            }),
            _ => None,
        }
    }

    /// Idle -> Committed: pick a hidden value in `[0, modulus)` and commit to it.
    ///
    /// On failure the instance stays Idle.
    pub fn start_round(&mut self, modulus: u32) -> Result<Commitment> {
        if !matches!(self.state, State::Idle) {
            return Err(ProtocolError::ProtocolState {
                operation: "start round",
                phase: self.phase(),
            });
        }
        if modulus == 0 || u64::from(modulus) > SPACE_SIZE {
            return Err(ProtocolError::InvalidModulus(modulus));
        }

        let key = SecretKey::generate(self.rng.entropy_mut())?;
        let value = self.rng.draw(modulus)?;
        let commitment = Commitment::new(&key, value);

        debug!(round_id = %self.round_id, modulus, %commitment, "round committed");

        self.state = State::Committed(Pending {
            modulus,
            value,
            key,
            commitment,
        });
        Ok(commitment)
    }

    /// Committed -> Revealed: combine the peer's contribution and disclose the key.
    ///
    /// An out-of-range contribution is refused and the round stays Committed,
    /// so the caller may ask again.
    pub fn reveal(&mut self, contribution: u32) -> Result<RoundResult> {
        match std::mem::replace(&mut self.state, State::Revealed) {
            State::Committed(pending) if contribution < pending.modulus => {
                let result = combine(pending.value, contribution, pending.modulus);
                debug!(
                    round_id = %self.round_id,
                    value = pending.value,
                    contribution,
                    result,
                    "round revealed"
                );

                Ok(RoundResult {
                    round_id: self.round_id,
                    modulus: pending.modulus,
                    committed_value: pending.value,
                    secret_key: pending.key,
                    commitment: pending.commitment,
                    peer_contribution: contribution,
                    result,
                })
            }
            State::Committed(pending) => {
                let modulus = pending.modulus;
                self.state = State::Committed(pending);
                warn!(round_id = %self.round_id, contribution, modulus, "contribution out of range");
                Err(ProtocolError::InvalidContribution {
                    contribution,
                    modulus,
                })
            }
            other => {
                let phase = other.phase();
                self.state = other;
                Err(ProtocolError::ProtocolState {
                    operation: "reveal",
                    phase,
                })
            }
        }
    }
}
