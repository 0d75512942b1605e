//! Bot move selection.
//!
//! `choose_bot_move` ranks every legal move with a fixed-depth search and
//! then randomizes the pick according to a [`DifficultyLevel`]. `Bot` owns
//! the random number generator so a game can be replayed from a seed.

use std::cmp::Ordering;

use rand::distributions::Standard;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::engine::board::Position;
use crate::engine::game::Game;
use crate::engine::movegen::legal_moves_for;
use crate::engine::types::{ChessError, Color, Move};

use super::difficulty::{Difficulty, DifficultyLevel};
use super::evaluation::is_mate_score;
use super::search::Searcher;

/// Share of the ranking, from the top, that a blunder never picks from.
const BLUNDER_SKIP_PERCENT: usize = 45;

// =========================================================================
// AiEngine trait
// =========================================================================

/// The AI engine interface.
pub trait AiEngine {
    /// Select a move for the side to move in `game`.
    fn best_move(&mut self, game: &Game, difficulty: Difficulty) -> Result<Move, ChessError>;

    /// Human-readable name for this engine.
    fn name(&self) -> &str;
}

// =========================================================================
// Ranking
// =========================================================================

/// A legal move with its search score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: f64,
}

/// Score every legal move of `color` by searching `depth - 1` plies below
/// it, best first. Ties keep generation order.
///
/// Every candidate is searched with a full window, so root siblings never
/// prune each other.
pub fn rank_moves(pos: &Position, color: Color, depth: u32) -> Vec<ScoredMove> {
    let mut searcher = Searcher::new();
    let mut ranked: Vec<ScoredMove> = legal_moves_for(pos, color)
        .into_iter()
        .map(|mv| {
            let score = searcher.minimax(
                &pos.apply_move(mv),
                depth.saturating_sub(1),
                f64::NEG_INFINITY,
                f64::INFINITY,
                color,
            );
            trace!(%mv, score, "candidate scored");
            ScoredMove { mv, score }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let stats = searcher.stats();
    debug!(
        depth,
        candidates = ranked.len(),
        nodes = stats.nodes,
        cutoffs = stats.cutoffs,
        "moves ranked"
    );
    ranked
}

// =========================================================================
// Move selection
// =========================================================================

/// Pick a move for `color` at the given level, or `None` if it has no legal
/// moves.
pub fn choose_bot_move<R: Rng + ?Sized>(
    pos: &Position,
    color: Color,
    level: &DifficultyLevel,
    rng: &mut R,
) -> Option<Move> {
    if level.depth == 0 {
        let moves = legal_moves_for(pos, color);
        if moves.is_empty() {
            return None;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        debug!(%mv, level = level.label, "random move");
        return Some(mv);
    }

    let ranked = rank_moves(pos, color, level.depth);
    if ranked.is_empty() {
        return None;
    }

    let len = ranked.len();
    let roll: f64 = rng.sample(Standard);
    let blunder = roll < level.blunder && len > 2;

    let idx = if blunder {
        let from = blunder_start(len);
        from + rng.gen_range(0..(len - from).max(1))
    } else {
        let pool = level.top_pool.clamp(1, len);
        rng.gen_range(0..pool)
    };

    let ScoredMove { mv, score } = ranked[idx];
    debug!(
        %mv,
        score,
        mate = is_mate_score(score),
        rank = idx,
        blunder,
        level = level.label,
        "bot move chosen"
    );
    Some(mv)
}

/// First ranking index a blunder may pick: ceil(45% of `len`).
fn blunder_start(len: usize) -> usize {
    (len * BLUNDER_SKIP_PERCENT).div_ceil(100)
}

// =========================================================================
// Bot
// =========================================================================

/// A bot player owning its source of randomness.
#[derive(Debug, Clone)]
pub struct Bot<R = StdRng> {
    rng: R,
}

impl Bot<StdRng> {
    /// Reproducible bot: the same seed plays the same moves.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<R: Rng> Bot<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Choose a move for `color` in `pos` with an explicit level.
    pub fn choose(&mut self, pos: &Position, color: Color, level: &DifficultyLevel) -> Option<Move> {
        choose_bot_move(pos, color, level, &mut self.rng)
    }

    /// Choose a move for the side to move in `game`.
    pub fn play(&mut self, game: &Game, level: &DifficultyLevel) -> Result<Move, ChessError> {
        if game.is_game_over() {
            return Err(ChessError::GameOver(game.status().to_string()));
        }
        self.choose(game.position(), game.side_to_move(), level)
            .ok_or_else(|| ChessError::GameOver("no legal moves".to_string()))
    }
}

impl<R: Rng> AiEngine for Bot<R> {
    fn best_move(&mut self, game: &Game, difficulty: Difficulty) -> Result<Move, ChessError> {
        self.play(game, difficulty.level())
    }

    fn name(&self) -> &str {
        "Bot"
    }
}

// =========================================================================
// Tests
// =========================================================================
