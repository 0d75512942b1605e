//! Static position evaluation.
//!
//! Scores are centipawn-scale `f64` values from a requested side's point of
//! view. Components, summed in this order:
//!   1. Material plus a placement bonus per piece (row-major board walk)
//!   2. Bishop pair
//!   3. Mobility of the side to move
//!
//! The placement bonus is a small geometric formula, not a table: pawns earn
//! credit for advancing, minor pieces and queens for centrality, and rooks
//! and kings a damped centrality. The constants are hand-tuned and must stay
//! exactly as they are for the difficulty levels to play the same.

use crate::engine::board::Position;
use crate::engine::movegen;
use crate::engine::types::{Color, PieceType};

/// Magnitude of a checkmate score; larger than any heuristic total.
pub const MATE: f64 = 100_000.0;

/// Bonus for holding two or more bishops.
const BISHOP_PAIR: f64 = 30.0;

/// Per-legal-move weight of the mobility term.
const MOBILITY_WEIGHT: f64 = 2.0;

/// Share of the centrality bonus given to rooks and kings.
const DAMPED_CENTRALITY: f64 = 0.45;

/// Is this score a checkmate score?
#[inline]
pub fn is_mate_score(score: f64) -> bool {
    score.abs() >= MATE
}

// =========================================================================
// Evaluation
// =========================================================================

/// Evaluate `pos` from `perspective`'s point of view.
///
/// `terminal` means the side to move has no legal moves: the result is then
/// `±MATE` when that side is in check and 0 for stalemate.
pub fn evaluate_position(pos: &Position, perspective: Color, terminal: bool) -> f64 {
    if terminal {
        return terminal_score(pos, perspective);
    }
    let mobility = movegen::legal_moves(pos).len();
    static_score(pos, perspective, mobility)
}

/// Score of a position whose side to move has no legal moves.
pub(crate) fn terminal_score(pos: &Position, perspective: Color) -> f64 {
    let to_move = pos.side_to_move;
    if pos.is_in_check(to_move) {
        if to_move == perspective { -MATE } else { MATE }
    } else {
        0.0
    }
}

/// Heuristic score given the side to move's legal-move count.
pub(crate) fn static_score(pos: &Position, perspective: Color, mobility: usize) -> f64 {
    let mut score = 0.0f64;
    let mut bishops = [0u32; 2];

    for (sq, piece) in pos.pieces() {
        let row = f64::from(sq.row());
        let col = f64::from(sq.col());
        let base = f64::from(piece.kind.value());
        let centrality = 14.0 - (3.5 - row).abs() * 2.0 - (3.5 - col).abs() * 2.0;
        let bonus = match piece.kind {
            PieceType::Pawn => match piece.color {
                Color::White => (6.0 - row) * 6.0,
                Color::Black => (row - 1.0) * 6.0,
            },
            PieceType::Knight | PieceType::Bishop | PieceType::Queen => centrality,
            PieceType::Rook | PieceType::King => centrality * DAMPED_CENTRALITY,
        };
        score += match piece.color {
            Color::White => base + bonus,
            Color::Black => -(base + bonus),
        };
        if piece.kind == PieceType::Bishop {
            bishops[piece.color.index()] += 1;
        }
    }

    if bishops[Color::White.index()] >= 2 {
        score += BISHOP_PAIR;
    }
    if bishops[Color::Black.index()] >= 2 {
        score -= BISHOP_PAIR;
    }

    let sign = match pos.side_to_move {
        Color::White => 1.0,
        Color::Black => -1.0,
    };
    score += sign * mobility as f64 * MOBILITY_WEIGHT;

    match perspective {
        Color::White => score,
        Color::Black => -score,
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn starting_position_is_mobility_only() {
        let p = Position::starting();
        // Material and placement cancel; White to move has 20 moves.
        assert!(approx(evaluate_position(&p, Color::White, false), 40.0));
        assert!(approx(evaluate_position(&p, Color::Black, false), -40.0));
    }

    #[test]
    fn bare_kings_exact() {
        // Kings cancel exactly; White's king has 5 moves.
        let p = pos("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(evaluate_position(&p, Color::White, false), 10.0);
    }

    #[test]
    fn pawn_advance_bonus() {
        // Pawn on e4: 100 + (6 - 4) * 6 = 112; mobility (5 king + 1 pawn) * 2.
        let p = pos("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1");
        let score = evaluate_position(&p, Color::White, false);
        assert!((score - 124.0).abs() < 1e-6, "{score}");

        let further = pos("4k3/8/4P3/8/8/8/8/4K3 w - - 0 1");
        assert!(evaluate_position(&further, Color::White, false) > score);
    }

    #[test]
    fn centrality_favours_center_knight() {
        let center = pos("4k3/8/8/8/3N4/8/8/4K3 b - - 0 1");
        let corner = pos("4k3/8/8/8/8/8/8/N3K3 b - - 0 1");
        // Black to move with the same mobility in both, so only placement differs.
        let diff = evaluate_position(&center, Color::White, false)
            - evaluate_position(&corner, Color::White, false);
        // d4 centrality 12 vs a1 centrality 0.
        assert!((diff - 12.0).abs() < 1e-6, "{diff}");
    }

    #[test]
    fn black_material_is_negative_for_white() {
        let p = pos("3qk3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!(evaluate_position(&p, Color::White, false) < -800.0);
        assert!(evaluate_position(&p, Color::Black, false) > 800.0);
    }

    #[test]
    fn bishop_pair_bonus() {
        let pair = pos("4k3/8/8/8/8/8/8/2B1KB2 b - - 0 1");
        let single = pos("4k3/8/8/8/8/8/8/2N1KB2 b - - 0 1");
        // c1 bishop vs c1 knight share placement; bishop value +15, pair +30.
        let diff = evaluate_position(&pair, Color::White, false)
            - evaluate_position(&single, Color::White, false);
        assert!((diff - 45.0).abs() < 1e-6, "{diff}");
    }

    #[test]
    fn checkmate_score_dominates() {
        let mated = pos("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert_eq!(evaluate_position(&mated, Color::White, true), MATE);
        assert_eq!(evaluate_position(&mated, Color::Black, true), -MATE);
        assert!(is_mate_score(MATE));
        assert!(!is_mate_score(20_000.0));
    }

    #[test]
    fn stalemate_scores_zero() {
        let p = pos("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(evaluate_position(&p, Color::White, true), 0.0);
        assert_eq!(evaluate_position(&p, Color::Black, true), 0.0);
    }
}
