//! Commit-reveal rounds.

mod messages;
mod round;
mod types;

pub use messages::{Announcement, RoundResult};
pub use round::{combine, FairValue};
pub use types::{RoundId, RoundPhase};
