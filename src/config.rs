use std::time::Duration;

use crate::ai::Difficulty;

/// Self-play settings parsed from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Difficulty for White, as a 1-based index or a level label.
    pub white_level: Difficulty,
    /// Difficulty for Black, as a 1-based index or a level label.
    pub black_level: Difficulty,
    /// RNG seed; a fresh entropy seed is used when unset.
    pub seed: Option<u64>,
    /// Pause before each bot move, in milliseconds.
    pub think_delay_ms: u64,
    /// Stop after this many plies even if the game is not over.
    pub max_plies: usize,
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unparseable values fall back to
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let level = |key: &str, default: Difficulty| {
            lookup(key)
                .and_then(|v| Difficulty::from_str_loose(&v))
                .unwrap_or(default)
        };
        EngineConfig {
            white_level: level("CHESS_WHITE_LEVEL", defaults.white_level),
            black_level: level("CHESS_BLACK_LEVEL", defaults.black_level),
            seed: lookup("CHESS_SEED").and_then(|v| v.trim().parse().ok()),
            think_delay_ms: lookup("CHESS_THINK_MS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.think_delay_ms),
            max_plies: lookup("CHESS_MAX_PLIES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_plies),
        }
    }

    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            white_level: Difficulty::default(),
            black_level: Difficulty::default(),
            seed: None,
            think_delay_ms: 160,
            max_plies: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> EngineConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.white_level.index(), 6);
        assert_eq!(config.black_level.index(), 6);
        assert_eq!(config.seed, None);
        assert_eq!(config.think_delay(), Duration::from_millis(160));
        assert_eq!(config.max_plies, 300);
    }

    #[test]
    fn empty_lookup_gives_defaults() {
        assert_eq!(from_pairs(&[]), EngineConfig::default());
    }

    #[test]
    fn values_are_parsed() {
        let config = from_pairs(&[
            ("CHESS_WHITE_LEVEL", "10"),
            ("CHESS_BLACK_LEVEL", " 2 "),
            ("CHESS_SEED", "1234"),
            ("CHESS_THINK_MS", "0"),
            ("CHESS_MAX_PLIES", "40"),
        ]);
        assert_eq!(config.white_level, Difficulty::MAX);
        assert_eq!(config.black_level.index(), 2);
        assert_eq!(config.seed, Some(1234));
        assert_eq!(config.think_delay_ms, 0);
        assert_eq!(config.max_plies, 40);
    }

    #[test]
    fn levels_accept_labels() {
        let config = from_pairs(&[
            ("CHESS_WHITE_LEVEL", "master"),
            ("CHESS_BLACK_LEVEL", "Average Club"),
        ]);
        assert_eq!(config.white_level, Difficulty::MAX);
        assert_eq!(config.black_level.level().label, "Average Club");
    }

    #[test]
    fn levels_clamp_and_garbage_falls_back() {
        let config = from_pairs(&[
            ("CHESS_WHITE_LEVEL", "0"),
            ("CHESS_BLACK_LEVEL", "hard"),
            ("CHESS_SEED", "-1"),
            ("CHESS_THINK_MS", "soon"),
        ]);
        assert_eq!(config.white_level, Difficulty::MIN);
        assert_eq!(config.black_level, Difficulty::default());
        assert_eq!(config.seed, None);
        assert_eq!(config.think_delay_ms, 160);
    }
}
