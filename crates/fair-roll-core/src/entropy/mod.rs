//! Secure random byte sources.
//!
//! The protocol never reaches for a global generator: every draw and every
//! key is taken from an [`EntropySource`] handed in by the caller.

mod mock;
mod os;
mod traits;

pub use mock::MockEntropy;
pub use os::OsEntropy;
pub use traits::EntropySource;
