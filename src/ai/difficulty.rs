//! Difficulty levels for the bot.
//!
//! Each level pairs a search depth with a randomization policy: the bot picks
//! uniformly among the best `top_pool` moves, and with probability `blunder`
//! it instead picks from the weaker part of the ranking.

use std::fmt;

use serde::Serialize;

/// Tuning parameters for one difficulty level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DifficultyLevel {
    pub label: &'static str,
    /// Nominal strength shown to the player. Informational only.
    pub rating: u32,
    /// Search depth in plies. 0 plays a uniformly random legal move.
    pub depth: u32,
    /// Number of top-ranked moves to choose from.
    pub top_pool: usize,
    /// Probability in `[0, 1]` of picking from the weaker moves instead.
    pub blunder: f64,
}

impl DifficultyLevel {
    pub const fn new(
        label: &'static str,
        rating: u32,
        depth: u32,
        top_pool: usize,
        blunder: f64,
    ) -> Self {
        Self {
            label,
            rating,
            depth,
            top_pool,
            blunder,
        }
    }

    /// Always plays the highest-ranked move.
    pub const fn strongest(depth: u32) -> Self {
        Self::new("Deterministic", 0, depth, 1, 0.0)
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Elo - {}", self.rating, self.label)
    }
}

/// The built-in levels, weakest first.
pub const LEVELS: [DifficultyLevel; 10] = [
    DifficultyLevel::new("Very Easy", 100, 0, 999, 0.72),
    DifficultyLevel::new("Easy", 300, 1, 10, 0.6),
    DifficultyLevel::new("Beginner", 500, 1, 8, 0.5),
    DifficultyLevel::new("Novice", 700, 1, 5, 0.36),
    DifficultyLevel::new("Casual", 900, 1, 3, 0.24),
    DifficultyLevel::new("Average Club", 1100, 2, 8, 0.2),
    DifficultyLevel::new("Intermediate", 1300, 2, 5, 0.12),
    DifficultyLevel::new("Advanced", 1500, 2, 2, 0.08),
    DifficultyLevel::new("Expert", 1700, 3, 3, 0.03),
    DifficultyLevel::new("Master", 1900, 3, 1, 0.0),
];

/// A 1-based index into [`LEVELS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: Difficulty = Difficulty(1);
    pub const MAX: Difficulty = Difficulty(LEVELS.len() as u8);

    /// Level index, clamped into `1..=10`.
    pub fn from_index(index: i64) -> Self {
        Difficulty(index.clamp(1, LEVELS.len() as i64) as u8)
    }

    /// Parse a level index or label (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(index) = s.parse::<i64>() {
            return Some(Self::from_index(index));
        }
        LEVELS
            .iter()
            .position(|level| level.label.eq_ignore_ascii_case(s))
            .map(|i| Difficulty(i as u8 + 1))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn level(self) -> &'static DifficultyLevel {
        &LEVELS[usize::from(self.0) - 1]
    }

    pub fn depth(self) -> u32 {
        self.level().depth
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty(6)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.level(), f)
    }
}
