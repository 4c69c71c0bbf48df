//! Protocol configuration.

/// Environment variable overriding the rejection budget
pub const MAX_REJECTIONS_ENV: &str = "FAIR_ROLL_MAX_REJECTIONS";

/// Default number of rejected samples tolerated per draw
pub const DEFAULT_MAX_REJECTIONS: u32 = 128;

/// Tunables shared by every round
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// How many consecutive rejected samples a single draw may discard
    /// before the entropy source is declared broken
    pub max_rejections: u32,
}

impl ProtocolConfig {
    /// Read overrides from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_rejections = lookup(MAX_REJECTIONS_ENV)
            .and_then(|s| s.trim().parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_REJECTIONS);

        Self { max_rejections }
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            max_rejections: DEFAULT_MAX_REJECTIONS,
        }
    }
}
