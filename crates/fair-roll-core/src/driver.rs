//! Round driver.
//!
//! Runs one round against a [`Peer`] in the only order that keeps the draw
//! fair: commit, announce, collect the contribution, reveal.

use crate::config::ProtocolConfig;
use crate::entropy::EntropySource;
use crate::error::Result;
use crate::protocol::{Announcement, FairValue, RoundId, RoundResult};
use std::collections::VecDeque;
use tracing::{info, warn};

/// What the peer does after seeing the commitment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerDecision {
    /// Add this value (must lie in `[0, modulus)`)
    Contribute(u32),
    /// Walk away; the round is discarded unrevealed
    Cancel,
}

/// The other party of a round
pub trait Peer {
    /// Called once the commitment is published and before anything is revealed
    fn contribute(&mut self, announcement: &Announcement) -> PeerDecision;

    /// Called with the revealed round so the peer can audit it
    fn observe_reveal(&mut self, _result: &RoundResult) {}
}

/// How a driven round ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    Completed(RoundResult),
    Cancelled(RoundId),
}

impl RoundOutcome {
    /// The revealed round, if it completed
    pub fn completed(&self) -> Option<&RoundResult> {
        match self {
            RoundOutcome::Completed(result) => Some(result),
            RoundOutcome::Cancelled(_) => None,
        }
    }
}

/// Run a full round for `modulus` against `peer`.
///
/// A fresh [`FairValue`] is built for the round and dropped when it ends, so
/// a cancelled round's key is wiped without ever being shown.
pub fn run_round<E, P>(
    entropy: E,
    config: &ProtocolConfig,
    modulus: u32,
    peer: &mut P,
) -> Result<RoundOutcome>
where
    E: EntropySource,
    P: Peer + ?Sized,
{
    let mut round = FairValue::with_config(entropy, config);
    let commitment = round.start_round(modulus)?;
    let announcement = Announcement {
        round_id: round.round_id(),
        modulus,
        commitment,
    };

    let contribution = match peer.contribute(&announcement) {
        PeerDecision::Contribute(value) => value,
        PeerDecision::Cancel => {
            warn!(round_id = %announcement.round_id, "peer cancelled round");
            return Ok(RoundOutcome::Cancelled(announcement.round_id));
        }
    };

    let result = round.reveal(contribution)?;
    info!(
        round_id = %result.round_id,
        modulus,
        result = result.result,
        "round completed"
    );
    peer.observe_reveal(&result);
    Ok(RoundOutcome::Completed(result))
}

/// Peer that replays a fixed list of decisions and audits every reveal.
///
/// Runs out of decisions by cancelling.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPeer {
    decisions: VecDeque<PeerDecision>,
    announcements: Vec<Announcement>,
    audits: Vec<bool>,
}

impl ScriptedPeer {
    pub fn new(decisions: impl IntoIterator<Item = PeerDecision>) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Peer that contributes each value in turn
    pub fn contributing(values: impl IntoIterator<Item = u32>) -> Self {
        Self::new(values.into_iter().map(PeerDecision::Contribute))
    }

    /// Announcements seen so far
    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }

    /// Audit verdict for each revealed round seen so far
    pub fn audits(&self) -> &[bool] {
        &self.audits
    }
}

impl Peer for ScriptedPeer {
    fn contribute(&mut self, announcement: &Announcement) -> PeerDecision {
        self.announcements.push(announcement.clone());
        self.decisions.pop_front().unwrap_or(PeerDecision::Cancel)
    }

    fn observe_reveal(&mut self, result: &RoundResult) {
        let seen = self
            .announcements
            .iter()
            .any(|a| *a == result.announcement());
        let verdict = seen && result.verify();
        if !verdict {
            warn!(round_id = %result.round_id, "revealed round failed audit");
        }
        self.audits.push(verdict);
    }
}
