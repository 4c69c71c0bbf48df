//! Unbiased bounded random integers.
//!
//! Samples are 4 bytes read little-endian and masked to 31 bits, giving a
//! sample space of `2^31` values. A draw below `max` keeps only samples under
//! the largest multiple of `max` that fits in that space and retries the
//! rest, so every result in `[0, max)` is equally likely.

use crate::config::ProtocolConfig;
use crate::entropy::EntropySource;
use crate::error::{ProtocolError, Result};
use tracing::{trace, warn};

/// Bytes drawn per sample
pub const SAMPLE_BYTES: usize = 4;

/// Mask keeping the low 31 bits of a sample
pub const SAMPLE_MASK: u32 = 0x7FFF_FFFF;

/// Number of distinct samples (`SAMPLE_MASK + 1`)
pub const SPACE_SIZE: u64 = 1 << 31;

/// Largest multiple of `max` that fits in the sample space.
/// Samples at or above it are rejected.
pub fn rejection_limit(max: u32) -> u64 {
    let max = u64::from(max);
    (SPACE_SIZE / max) * max
}

/// Interpret raw bytes as a 31-bit sample
pub fn sample_from_bytes(bytes: [u8; SAMPLE_BYTES]) -> u32 {
    u32::from_le_bytes(bytes) & SAMPLE_MASK
}

/// Uniform integers in `[0, max)` from an injected entropy source
#[derive(Debug)]
pub struct BoundedRandom<E> {
    entropy: E,
    max_rejections: u32,
}

impl<E: EntropySource> BoundedRandom<E> {
    /// Create with the default configuration
    pub fn new(entropy: E) -> Self {
        Self::with_config(entropy, &ProtocolConfig::default())
    }

    pub fn with_config(entropy: E, config: &ProtocolConfig) -> Self {
        Self {
            entropy,
            max_rejections: config.max_rejections,
        }
    }

    /// Draw a uniformly distributed integer in `[0, max)`.
    ///
    /// `max` must lie in `1..=2^31`. A source that keeps producing rejected
    /// samples beyond the configured budget is reported as unavailable.
    pub fn draw(&mut self, max: u32) -> Result<u32> {
        if max == 0 || u64::from(max) > SPACE_SIZE {
            return Err(ProtocolError::InvalidModulus(max));
        }
        if max == 1 {
            return Ok(0);
        }

        let limit = rejection_limit(max);
        for attempt in 0..=self.max_rejections {
            let mut buf = [0u8; SAMPLE_BYTES];
            self.entropy.fill_bytes(&mut buf)?;
            let sample = sample_from_bytes(buf);

            if u64::from(sample) < limit {
                return Ok(sample % max);
            }
            trace!(max, attempt, "rejected sample in biased tail");
        }

        warn!(
            max,
            rejections = self.max_rejections,
            "rejection budget exhausted"
        );
        Err(ProtocolError::EntropyUnavailable(format!(
            "{} consecutive samples rejected for max {}",
            u64::from(self.max_rejections) + 1,
            max
        )))
    }

    /// Borrow the underlying source, e.g. to draw key material
    pub fn entropy_mut(&mut self) -> &mut E {
        &mut self.entropy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::{MockEntropy, OsEntropy};

    fn mocked(samples: &[u32]) -> (BoundedRandom<MockEntropy>, MockEntropy) {
        let mock = MockEntropy::new();
        for sample in samples {
            mock.push_sample(*sample);
        }
        (BoundedRandom::new(mock.clone()), mock)
    }

    #[test]
    fn test_rejection_limit() {
        assert_eq!(rejection_limit(1), SPACE_SIZE);
        assert_eq!(rejection_limit(2), SPACE_SIZE);
        assert_eq!(rejection_limit(6), 2_147_483_646);
        assert_eq!(rejection_limit(7), 2_147_483_646);
        assert_eq!(rejection_limit(3), 2_147_483_646);
    }

    #[test]
    fn test_sample_masks_top_bit() {
        assert_eq!(sample_from_bytes([0xFF, 0xFF, 0xFF, 0xFF]), SAMPLE_MASK);
        assert_eq!(sample_from_bytes([0x01, 0x00, 0x00, 0x80]), 1);
        assert_eq!(sample_from_bytes([0x04, 0x03, 0x02, 0x01]), 0x0102_0304);
    }

    #[test]
    fn test_tail_sample_is_discarded() {
        // 0x7FFF_FFFF >= limit(6), 13 % 6 == 1
        let (mut rng, mock) = mocked(&[0x7FFF_FFFF, 13]);

        assert_eq!(rng.draw(6).unwrap(), 1);
        assert_eq!(mock.consumed(), 2 * SAMPLE_BYTES);
        assert_eq!(mock.remaining(), 0);
    }

    #[test]
    fn test_limit_is_exclusive() {
        let limit = rejection_limit(6) as u32;
        let (mut rng, mock) = mocked(&[limit, limit - 1]);

        assert_eq!(rng.draw(6).unwrap(), (limit - 1) % 6);
        assert_eq!(mock.consumed(), 8);
    }

    #[test]
    fn test_high_bit_is_ignored_before_rejection() {
        // masks to 2, well below the limit
        let (mut rng, mock) = mocked(&[0x8000_0002]);

        assert_eq!(rng.draw(7).unwrap(), 2);
        assert_eq!(mock.consumed(), 4);
    }

    #[test]
    fn test_power_of_two_never_rejects() {
        let (mut rng, _) = mocked(&[SAMPLE_MASK]);
        assert_eq!(rng.draw(4).unwrap(), 3);
    }

    #[test]
    fn test_max_one_is_always_zero() {
        let (mut rng, mock) = mocked(&[]);
        for _ in 0..10 {
            assert_eq!(rng.draw(1).unwrap(), 0);
        }
        assert_eq!(mock.consumed(), 0);
    }

    #[test]
    fn test_invalid_max() {
        let (mut rng, _) = mocked(&[]);
        assert_eq!(rng.draw(0), Err(ProtocolError::InvalidModulus(0)));
        assert_eq!(
            rng.draw(0x8000_0001),
            Err(ProtocolError::InvalidModulus(0x8000_0001))
        );
    }

    #[test]
    fn test_full_space_max_accepts_everything() {
        let (mut rng, _) = mocked(&[SAMPLE_MASK]);
        assert_eq!(rng.draw(0x8000_0000).unwrap(), SAMPLE_MASK);
    }

    #[test]
    fn test_borrowed_source() {
        let mut mock = MockEntropy::new();
        mock.push_sample(0x7FFF_FFFF);
        mock.push_sample(20);

        let mut rng = BoundedRandom::new(&mut mock);
        assert_eq!(rng.draw(6).unwrap(), 2);
        drop(rng);

        assert_eq!(mock.consumed(), 2 * SAMPLE_BYTES);
    }

    #[test]
    fn test_exhausted_source_is_unavailable() {
        let (mut rng, _) = mocked(&[]);
        assert!(matches!(
            rng.draw(6),
            Err(ProtocolError::EntropyUnavailable(_))
        ));
    }

    #[test]
    fn test_rejection_budget() {
        let config = ProtocolConfig { max_rejections: 2 };
        let mock = MockEntropy::new();
        for _ in 0..4 {
            mock.push_sample(SAMPLE_MASK);
        }
        let mut rng = BoundedRandom::with_config(mock.clone(), &config);

        assert!(matches!(
            rng.draw(6),
            Err(ProtocolError::EntropyUnavailable(_))
        ));
        // one initial attempt plus two retries
        assert_eq!(mock.consumed(), 3 * SAMPLE_BYTES);
    }

    #[test]
    fn test_uniformity() {
        let mut rng = BoundedRandom::new(OsEntropy::new());

        for max in [2u32, 3, 6, 7] {
            let per_bucket = 10_000u32;
            let mut counts = vec![0u32; max as usize];
            for _ in 0..per_bucket * max {
                counts[rng.draw(max).unwrap() as usize] += 1;
            }

            // 5% is more than five standard deviations for these sizes
            let tolerance = per_bucket / 20;
            for (value, count) in counts.iter().enumerate() {
                assert!(
                    count.abs_diff(per_bucket) <= tolerance,
                    "max {max}: value {value} seen {count} times"
                );
            }
        }
    }
}
