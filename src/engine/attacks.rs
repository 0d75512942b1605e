//! Attack and check detection.
//!
//! Attacks are raw geometry: a square counts as attacked if an enemy piece
//! could reach it in one step, whether or not that piece is pinned. Move
//! generation relies on this to stay free of mutual recursion.
//!
//! The oracle looks outward from the target square (knight jumps, king
//! steps, pawn diagonals, slider rays) instead of enumerating every enemy
//! piece's moves; both views answer the same question.

use crate::engine::board::Position;
use crate::engine::types::{Color, PieceType, Square};

// =========================================================================
// Direction tables (shared with move generation)
// =========================================================================

/// Knight jumps as (row, col) deltas.
pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// King steps as (row, col) deltas.
pub const KING_DELTAS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Bishop ray directions.
pub const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Rook ray directions.
pub const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

// =========================================================================
// Public API
// =========================================================================

/// Is `sq` attacked by any piece of colour `by`?
///
/// The occupant of `sq` itself is not considered.
pub fn is_square_attacked(pos: &Position, sq: Square, by: Color) -> bool {
    let holds = |target: Option<Square>, kinds: &[PieceType]| {
        target
            .and_then(|t| pos.piece_at(t))
            .is_some_and(|p| p.color == by && kinds.contains(&p.kind))
    };

    // Pawns of `by` sit one row "behind" the square, from their point of view.
    let pawn_row = -by.forward();
    if holds(sq.offset(pawn_row, -1), &[PieceType::Pawn])
        || holds(sq.offset(pawn_row, 1), &[PieceType::Pawn])
    {
        return true;
    }

    if KNIGHT_DELTAS
        .iter()
        .any(|&(dr, dc)| holds(sq.offset(dr, dc), &[PieceType::Knight]))
    {
        return true;
    }

    if KING_DELTAS
        .iter()
        .any(|&(dr, dc)| holds(sq.offset(dr, dc), &[PieceType::King]))
    {
        return true;
    }

    ray_hits(pos, sq, by, &ORTHOGONALS, &[PieceType::Rook, PieceType::Queen])
        || ray_hits(pos, sq, by, &DIAGONALS, &[PieceType::Bishop, PieceType::Queen])
}

/// Is `color`'s king attacked by the other side?
///
/// Returns false if `color` has no king on the board.
pub fn is_in_check(pos: &Position, color: Color) -> bool {
    match pos.king_sq(color) {
        Some(king) => is_square_attacked(pos, king, !color),
        None => false,
    }
}

/// Per-king check indicators, indexed by `Color::index()`.
pub fn check_flags(pos: &Position) -> [bool; 2] {
    [
        is_in_check(pos, Color::White),
        is_in_check(pos, Color::Black),
    ]
}

/// Walk each ray from `sq` and report whether the first piece met is one of
/// `by`'s `sliders`.
fn ray_hits(
    pos: &Position,
    sq: Square,
    by: Color,
    dirs: &[(i8, i8)],
    sliders: &[PieceType],
) -> bool {
    for &(dr, dc) in dirs {
        let mut cur = sq.offset(dr, dc);
        while let Some(s) = cur {
            if let Some(p) = pos.piece_at(s) {
                if p.color == by && sliders.contains(&p.kind) {
                    return true;
                }
                break;
            }
            cur = s.offset(dr, dc);
        }
    }
    false
}

// =========================================================================
// Tests
// =========================================================================
