//! Fixed-depth minimax with alpha-beta pruning.
//!
//! Scores are always taken from one fixed side (`maximize_for`): plies where
//! that side moves maximize, the others minimize. There is no transposition
//! table, iterative deepening or quiescence; recursion depth is bounded by
//! the requested depth alone.

use std::cmp::Reverse;

use crate::engine::board::Position;
use crate::engine::movegen;
use crate::engine::types::{Color, Move, Square};

use super::evaluation::{static_score, terminal_score};

// =========================================================================
// Move ordering (MVV-LVA)
// =========================================================================

const CAPTURE_VICTIM_WEIGHT: i32 = 12;
const PROMOTION_BONUS: i32 = 800;
const CASTLE_BONUS: i32 = 45;

/// Score a move for ordering. Higher = searched first.
pub fn move_score(pos: &Position, mv: &Move) -> i32 {
    let mut score = 0i32;

    let victim = if mv.en_passant {
        pos.piece_at(Square::new(mv.from.row(), mv.to.col()))
    } else {
        pos.piece_at(mv.to)
    };
    if let Some(victim) = victim {
        let attacker_val = pos.piece_at(mv.from).map_or(0, |p| p.kind.value());
        score += victim.kind.value() * CAPTURE_VICTIM_WEIGHT - attacker_val;
    }

    if mv.promotion.is_some() {
        score += PROMOTION_BONUS;
    }

    if mv.castle.is_some() {
        score += CASTLE_BONUS;
    }

    score
}

/// Sort moves best-first. The sort is stable, so equal scores keep
/// generation order.
pub fn order_moves(pos: &Position, moves: &mut [Move]) {
    moves.sort_by_key(|m| Reverse(move_score(pos, m)));
}

// =========================================================================
// Minimax
// =========================================================================

/// Search statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited, leaves included.
    pub nodes: u64,
    /// Subtrees skipped by a cutoff.
    pub cutoffs: u64,
}

/// A single search run; accumulates statistics across calls.
#[derive(Debug, Default)]
pub struct Searcher {
    stats: SearchStats,
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Alpha-beta minimax. Returns the score of `pos` from `maximize_for`'s
    /// point of view, searched `depth` plies deep.
    pub fn minimax(
        &mut self,
        pos: &Position,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        maximize_for: Color,
    ) -> f64 {
        self.stats.nodes += 1;

        let mut moves = movegen::legal_moves(pos);
        if moves.is_empty() {
            return terminal_score(pos, maximize_for);
        }
        if depth == 0 {
            return static_score(pos, maximize_for, moves.len());
        }

        order_moves(pos, &mut moves);

        if pos.side_to_move == maximize_for {
            let mut best = f64::NEG_INFINITY;
            for (i, &mv) in moves.iter().enumerate() {
                let value = self.minimax(&pos.apply_move(mv), depth - 1, alpha, beta, maximize_for);
                best = best.max(value);
                alpha = alpha.max(best);
                if beta <= alpha {
                    self.note_cutoff(moves.len() - i - 1);
                    break;
                }
            }
            best
        } else {
            let mut best = f64::INFINITY;
            for (i, &mv) in moves.iter().enumerate() {
                let value = self.minimax(&pos.apply_move(mv), depth - 1, alpha, beta, maximize_for);
                best = best.min(value);
                beta = beta.min(best);
                if beta <= alpha {
                    self.note_cutoff(moves.len() - i - 1);
                    break;
                }
            }
            best
        }
    }

    #[inline]
    fn note_cutoff(&mut self, skipped: usize) {
        if skipped > 0 {
            self.stats.cutoffs += 1;
        }
    }
}

/// Alpha-beta minimax without statistics.
pub fn minimax(pos: &Position, depth: u32, alpha: f64, beta: f64, maximize_for: Color) -> f64 {
    Searcher::new().minimax(pos, depth, alpha, beta, maximize_for)
}

// =========================================================================
// Tests
// =========================================================================
