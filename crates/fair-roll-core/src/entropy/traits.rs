//! Entropy source trait definition.

use crate::error::EntropyError;

/// Trait for cryptographically secure byte sources
///
/// Implementations can be:
/// - OsEntropy for production (operating system CSPRNG)
/// - MockEntropy for deterministic tests
///
/// An implementation must fail rather than fall back to a weaker generator.
pub trait EntropySource {
    /// Fill `dest` entirely with random bytes
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), EntropyError>;
}

impl<E: EntropySource + ?Sized> EntropySource for &mut E {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        (**self).fill_bytes(dest)
    }
}
