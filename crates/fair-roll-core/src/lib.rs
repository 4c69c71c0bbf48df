//! Fair Roll Core Library
//!
//! Verifiable fair random numbers between two parties that do not trust each
//! other. The host commits to a hidden value with an HMAC-SHA-256 tag, the
//! peer adds an openly chosen contribution, and the host then reveals the key
//! so anyone can check the value was fixed before the contribution was known.

pub mod config;
pub mod crypto;
pub mod driver;
pub mod entropy;
pub mod error;
pub mod protocol;
pub mod rng;

pub use config::ProtocolConfig;
pub use crypto::{verify, verify_hex, Commitment, SecretKey};
pub use driver::{run_round, Peer, PeerDecision, RoundOutcome, ScriptedPeer};
pub use entropy::{EntropySource, MockEntropy, OsEntropy};
pub use error::{EntropyError, ProtocolError, Result, TranscriptError};
pub use protocol::{Announcement, FairValue, RoundId, RoundPhase, RoundResult};
pub use rng::BoundedRandom;
