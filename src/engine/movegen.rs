//! Legal move generation.
//!
//! Pipeline:
//!   1. Generate pseudo-legal moves per piece (ignoring self-check).
//!   2. Filter: apply the move to a scratch copy, keep it if the mover's
//!      king is not attacked afterwards.
//!
//! Moves come out in board order (row-major from a8), and per piece in a
//! fixed direction order. Search relies on that order to break ties.

use crate::engine::attacks::{self, DIAGONALS, KING_DELTAS, KNIGHT_DELTAS, ORTHOGONALS};
use crate::engine::board::Position;
use crate::engine::types::{CastleSide, Color, Move, PieceType, Square};

// =========================================================================
// Public API
// =========================================================================

/// Generate all legal moves for the side to move.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    legal_moves_for(pos, pos.side_to_move)
}

/// Generate all legal moves for the pieces of `color`.
pub fn legal_moves_for(pos: &Position, color: Color) -> Vec<Move> {
    let mut legal = Vec::with_capacity(64);
    legal_moves_into(pos, color, &mut legal);
    legal
}

/// Append `color`'s legal moves to `legal`, reusing one scratch buffer for
/// every piece's pseudo-moves.
pub fn legal_moves_into(pos: &Position, color: Color, legal: &mut Vec<Move>) {
    let mut pseudo = Vec::with_capacity(32);
    for (from, piece) in pos.pieces() {
        if piece.color != color {
            continue;
        }
        pseudo.clear();
        pseudo_moves_into(pos, from, false, &mut pseudo);
        for &mv in &pseudo {
            let next = pos.apply_move(mv);
            if !attacks::is_in_check(&next, color) {
                legal.push(mv);
            }
        }
    }
}

/// Generate all legal moves originating from a specific square.
///
/// Empty unless the square holds a piece of the side to move.
pub fn legal_moves_from(pos: &Position, from: Square) -> Vec<Move> {
    let Some(piece) = pos.piece_at(from).filter(|p| p.color == pos.side_to_move) else {
        return Vec::new();
    };
    pseudo_moves(pos, from, false)
        .into_iter()
        .filter(|&mv| !attacks::is_in_check(&pos.apply_move(mv), piece.color))
        .collect()
}

/// Pseudo-legal moves for the piece on `from` (empty if the square is empty).
///
/// With `attacks_only`, pawn pushes, en passant and castling are left out,
/// leaving only the squares the piece threatens.
pub fn pseudo_moves(pos: &Position, from: Square, attacks_only: bool) -> Vec<Move> {
    let mut moves = Vec::with_capacity(32);
    pseudo_moves_into(pos, from, attacks_only, &mut moves);
    moves
}

/// Like [`pseudo_moves`], appending into `moves`.
pub fn pseudo_moves_into(pos: &Position, from: Square, attacks_only: bool, moves: &mut Vec<Move>) {
    let Some(piece) = pos.piece_at(from) else {
        return;
    };
    let us = piece.color;
    match piece.kind {
        PieceType::Pawn => generate_pawn_moves(pos, from, us, attacks_only, moves),
        PieceType::Knight => generate_step_moves(pos, from, us, &KNIGHT_DELTAS, moves),
        PieceType::King => {
            generate_step_moves(pos, from, us, &KING_DELTAS, moves);
            if !attacks_only {
                generate_castling_moves(pos, from, us, moves);
            }
        }
        PieceType::Bishop => generate_slider_moves(pos, from, us, &DIAGONALS, moves),
        PieceType::Rook => generate_slider_moves(pos, from, us, &ORTHOGONALS, moves),
        PieceType::Queen => {
            generate_slider_moves(pos, from, us, &DIAGONALS, moves);
            generate_slider_moves(pos, from, us, &ORTHOGONALS, moves);
        }
    }
}

// =========================================================================
// Pawn moves
// =========================================================================

fn generate_pawn_moves(
    pos: &Position,
    from: Square,
    us: Color,
    attacks_only: bool,
    moves: &mut Vec<Move>,
) {
    let dir = us.forward();
    let (start_row, promo_row) = match us {
        Color::White => (6, 0),
        Color::Black => (1, 7),
    };
    let push = |to: Square| {
        if to.row() == promo_row {
            Move::with_promotion(from, to, PieceType::Queen)
        } else {
            Move::new(from, to)
        }
    };

    // --- Single / double push ---
    if !attacks_only
        && let Some(one) = from.offset(dir, 0)
        && pos.piece_at(one).is_none()
    {
        moves.push(push(one));
        if from.row() == start_row
            && let Some(two) = from.offset(dir * 2, 0)
            && pos.piece_at(two).is_none()
        {
            moves.push(Move::new(from, two));
        }
    }

    // --- Captures and en passant ---
    for dc in [-1, 1] {
        let Some(to) = from.offset(dir, dc) else {
            continue;
        };
        if pos.piece_at(to).is_some_and(|p| p.color != us) {
            moves.push(push(to));
        }
        if !attacks_only
            && let Some(ep) = pos.en_passant
            && ep.square == to
            && ep.pawn_color != us
        {
            moves.push(Move::en_passant(from, to));
        }
    }
}

// =========================================================================
// Knight / king steps
// =========================================================================

fn generate_step_moves(
    pos: &Position,
    from: Square,
    us: Color,
    deltas: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in deltas {
        if let Some(to) = from.offset(dr, dc)
            && pos.piece_at(to).is_none_or(|p| p.color != us)
        {
            moves.push(Move::new(from, to));
        }
    }
}

// =========================================================================
// Slider moves (bishop, rook, queen)
// =========================================================================

fn generate_slider_moves(
    pos: &Position,
    from: Square,
    us: Color,
    dirs: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in dirs {
        let mut cur = from.offset(dr, dc);
        while let Some(to) = cur {
            match pos.piece_at(to) {
                None => moves.push(Move::new(from, to)),
                Some(p) => {
                    if p.color != us {
                        moves.push(Move::new(from, to));
                    }
                    break;
                }
            }
            cur = to.offset(dr, dc);
        }
    }
}

// =========================================================================
// Castling
// =========================================================================

fn generate_castling_moves(pos: &Position, from: Square, us: Color, moves: &mut Vec<Move>) {
    let them = !us;
    let row = us.home_row();
    if from != Square::new(row, 4) || attacks::is_in_check(pos, us) {
        return;
    }

    let empty = |col: u8| pos.piece_at(Square::new(row, col)).is_none();
    let safe = |col: u8| !attacks::is_square_attacked(pos, Square::new(row, col), them);

    // Kingside: f and g must be empty and unattacked.
    if pos.castling_rights.has(us, CastleSide::King)
        && empty(5)
        && empty(6)
        && safe(5)
        && safe(6)
    {
        moves.push(Move::castle(from, CastleSide::King));
    }

    // Queenside: b, c, d must be empty; only c and d need to be unattacked.
    if pos.castling_rights.has(us, CastleSide::Queen)
        && empty(1)
        && empty(2)
        && empty(3)
        && safe(2)
        && safe(3)
    {
        moves.push(Move::castle(from, CastleSide::Queen));
    }
}

// =========================================================================
// Tests
// =========================================================================
