//! Mailbox chess position and the move applier.
//!
//! `Position` stores an 8×8 grid of optional pieces, side to move, castling
//! rights, the en-passant target, and move counters. It is a small `Copy`
//! value: applying a move yields a fresh `Position` and leaves the input
//! untouched, so search can walk the tree without undo bookkeeping.

use crate::engine::attacks;
use crate::engine::types::{
    CastleSide, CastlingRights, ChessError, Color, EnPassant, Move, Piece, PieceType, Square,
};

/// Standard starting position in FEN.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A complete chess position.
///
/// Cells are indexed by `Square` (`row * 8 + col`, row 0 = rank 8).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// Board cells.
    pub board: [Option<Piece>; Square::NUM],

    /// Whose turn it is.
    pub side_to_move: Color,

    /// Castling availability (K/Q/k/q).
    pub castling_rights: CastlingRights,

    /// Square skipped by the last double pawn push, valid for one ply.
    pub en_passant: Option<EnPassant>,

    /// Plies since the last capture or pawn move.
    pub halfmove_clock: u16,

    /// Full-move number (starts at 1, incremented after Black moves).
    pub fullmove_number: u16,
}

// ---------------------------------------------------------------------------
// Construction helpers
// ---------------------------------------------------------------------------

impl Position {
    /// Create an empty board with no pieces.
    ///
    /// The engine expects exactly one king per side. Positions assembled by
    /// hand with [`Position::put`] are not validated; a side without a king is
    /// never reported in check and its behaviour in search is unspecified.
    pub fn empty() -> Self {
        Position {
            board: [None; Square::NUM],
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Standard starting position.
    pub fn starting() -> Self {
        let mut pos = Position::empty();
        const BACK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (col, kind) in BACK.into_iter().enumerate() {
            let col = col as u8;
            pos.put(Square::new(0, col), Piece::new(Color::Black, kind));
            pos.put(Square::new(1, col), Piece::new(Color::Black, PieceType::Pawn));
            pos.put(Square::new(6, col), Piece::new(Color::White, PieceType::Pawn));
            pos.put(Square::new(7, col), Piece::new(Color::White, kind));
        }
        pos.castling_rights = CastlingRights::ALL;
        pos
    }

    /// Place a piece on a square, replacing whatever was there.
    #[inline]
    pub fn put(&mut self, sq: Square, piece: Piece) {
        self.board[sq.index()] = Some(piece);
    }

    /// Empty a square.
    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.board[sq.index()] = None;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// What piece (if any) is on a given square?
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board[sq.index()]
    }

    /// Iterate over every occupied square in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.board
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.map(|p| (Square(i as u8), p)))
    }

    /// Find the king square for the given colour.
    pub fn king_sq(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceType::King);
        self.pieces().find(|&(_, p)| p == king).map(|(sq, _)| sq)
    }

    /// Is `color`'s king attacked by the other side?
    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        attacks::is_in_check(self, color)
    }

    // -----------------------------------------------------------------------
    // Move application
    // -----------------------------------------------------------------------

    /// Produce the position reached by playing `mv`.
    ///
    /// No legality check is done: `mv` must come from the legal move list, or
    /// be a trusted pseudo-legal move during check detection. Anything else
    /// yields a corrupt position.
    pub fn apply_move(&self, mv: Move) -> Position {
        let us = self.side_to_move;
        let mut next = *self;
        next.side_to_move = !us;
        next.en_passant = None;
        next.halfmove_clock = self.halfmove_clock.saturating_add(1);
        if us == Color::Black {
            next.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        let mut moving = next.board[mv.from.index()].take();

        // ---- Capture (en passant takes the pawn beside the origin) ----
        let captured = if mv.en_passant {
            let cap_sq = Square::new(mv.from.row(), mv.to.col());
            next.board[cap_sq.index()].take()
        } else {
            next.board[mv.to.index()]
        };

        // ---- Castling: move the rook ----
        if let (Some(side), Some(piece)) = (mv.castle, moving)
            && piece.kind == PieceType::King
        {
            let row = mv.from.row();
            let (rook_from, rook_to) = side.rook_cols();
            let rook = next.board[Square::new(row, rook_from).index()].take();
            next.board[Square::new(row, rook_to).index()] = rook;
        }

        // ---- Pawn bookkeeping ----
        if let Some(piece) = moving.as_mut()
            && piece.kind == PieceType::Pawn
        {
            next.halfmove_clock = 0;
            if mv.from.row().abs_diff(mv.to.row()) == 2 {
                next.en_passant = Some(EnPassant {
                    square: Square::new((mv.from.row() + mv.to.row()) / 2, mv.from.col()),
                    pawn_color: piece.color,
                });
            }
            if let Some(promo) = mv.promotion {
                piece.kind = promo;
            }
        }

        if captured.is_some() {
            next.halfmove_clock = 0;
        }

        next.board[mv.to.index()] = moving;

        // ---- Castling rights ----
        if let Some(piece) = moving
            && piece.kind == PieceType::King
        {
            next.castling_rights.revoke_all(piece.color);
        }
        revoke_rook_home(&mut next.castling_rights, mv.from);
        revoke_rook_home(&mut next.castling_rights, mv.to);

        next
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Render the board as an 8-line string (rank 8 at top), useful for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for row in 0..8u8 {
            s.push((b'8' - row) as char);
            s.push(' ');
            for col in 0..8u8 {
                let ch = match self.piece_at(Square::new(row, col)) {
                    Some(p) => p.to_char(),
                    None => '.',
                };
                s.push(ch);
                if col < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

/// Convenience wrapper around [`Position::apply_move`].
#[inline]
pub fn apply_move(pos: &Position, mv: Move) -> Position {
    pos.apply_move(mv)
}

/// Any move touching a rook's home square, from or to, drops that right.
fn revoke_rook_home(rights: &mut CastlingRights, sq: Square) {
    for color in [Color::White, Color::Black] {
        if sq.row() != color.home_row() {
            continue;
        }
        for side in [CastleSide::King, CastleSide::Queen] {
            if sq.col() == side.rook_cols().0 {
                rights.revoke(color, side);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// FEN setup notation
// ---------------------------------------------------------------------------

impl Position {
    /// Parse a FEN string into a `Position`.
    ///
    /// Validates all 6 fields and ensures exactly one king per side.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ChessError::InvalidFen(format!(
                "expected 6 fields, got {}",
                fields.len()
            )));
        }

        let mut pos = Position::empty();

        // ----- Field 1: Piece placement (rank 8 first, i.e. row 0) -----
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        for (row, rank_str) in ranks.iter().enumerate() {
            let row = row as u8;
            let mut col: u8 = 0;
            for ch in rank_str.chars() {
                if col > 7 {
                    return Err(ChessError::InvalidFen(format!(
                        "too many squares in rank {}",
                        8 - row
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::InvalidFen(format!(
                            "invalid empty count '{ch}' in rank {}",
                            8 - row
                        )));
                    }
                    col += digit as u8;
                } else if let Some(piece) = PieceType::from_char(ch) {
                    pos.put(Square::new(row, col), piece);
                    col += 1;
                } else {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid character '{ch}' in piece placement"
                    )));
                }
            }
            if col != 8 {
                return Err(ChessError::InvalidFen(format!(
                    "rank {} has {} squares instead of 8",
                    8 - row,
                    col
                )));
            }
        }

        for color in [Color::White, Color::Black] {
            let king = Piece::new(color, PieceType::King);
            let king_count = pos.pieces().filter(|&(_, p)| p == king).count();
            if king_count != 1 {
                return Err(ChessError::InvalidFen(format!(
                    "{color} has {king_count} kings (expected 1)"
                )));
            }
        }

        // ----- Field 2: Side to move -----
        pos.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessError::InvalidFen(format!(
                    "invalid side to move: '{other}'"
                )));
            }
        };

        // ----- Field 3: Castling availability -----
        pos.castling_rights = CastlingRights::from_fen(fields[2]).ok_or_else(|| {
            ChessError::InvalidFen(format!("invalid castling string: '{}'", fields[2]))
        })?;

        // ----- Field 4: En passant target square -----
        if fields[3] != "-" {
            let square = Square::from_algebraic(fields[3]).ok_or_else(|| {
                ChessError::InvalidFen(format!("invalid en passant square: '{}'", fields[3]))
            })?;
            // The pawn that skipped the square belongs to the side that just moved.
            let pawn_color = !pos.side_to_move;
            let expected_row = match pawn_color {
                Color::White => 5,
                Color::Black => 2,
            };
            if square.row() != expected_row {
                return Err(ChessError::InvalidFen(format!(
                    "en passant square {} does not match side to move",
                    fields[3]
                )));
            }
            pos.en_passant = Some(EnPassant { square, pawn_color });
        }

        // ----- Field 5: Halfmove clock -----
        pos.halfmove_clock = fields[4].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid halfmove clock: '{}'", fields[4]))
        })?;

        // ----- Field 6: Fullmove number -----
        pos.fullmove_number = fields[5].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid fullmove number: '{}'", fields[5]))
        })?;
        if pos.fullmove_number == 0 {
            return Err(ChessError::InvalidFen(
                "fullmove number must be >= 1".to_string(),
            ));
        }

        Ok(pos)
    }

    /// Export the position as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(80);

        for row in 0..8u8 {
            let mut empty_count = 0u8;
            for col in 0..8u8 {
                match self.piece_at(Square::new(row, col)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push((b'0' + empty_count) as char);
                            empty_count = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push((b'0' + empty_count) as char);
            }
            if row < 7 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        fen.push_str(&self.castling_rights.to_fen());

        fen.push(' ');
        match self.en_passant {
            Some(ep) => fen.push_str(&ep.square.to_algebraic()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(
            " {} {}",
            self.halfmove_clock, self.fullmove_number
        ));

        fen
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn starting_matches_start_fen() {
        assert_eq!(Position::starting(), pos(START_FEN));
        assert_eq!(Position::starting().to_fen(), START_FEN);
    }

    #[test]
    fn starting_layout() {
        let p = Position::starting();
        assert_eq!(
            p.piece_at(sq("e1")),
            Some(Piece::new(Color::White, PieceType::King))
        );
        assert_eq!(
            p.piece_at(sq("d8")),
            Some(Piece::new(Color::Black, PieceType::Queen))
        );
        assert_eq!(p.piece_at(sq("e4")), None);
        assert_eq!(p.king_sq(Color::Black), Some(sq("e8")));
        assert_eq!(p.pieces().count(), 32);
    }

    #[test]
    fn fen_round_trip() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/pppp1ppp/8/4pP2/8/8/PPPPP1PP/RNBQKBNR w KQkq e6 0 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ] {
            assert_eq!(pos(fen).to_fen(), fen);
        }
    }

    #[test]
    fn fen_rejects_missing_king() {
        assert!(Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        assert!(Position::from_fen("4kk2/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
    }

    #[test]
    fn fen_rejects_malformed_fields() {
        assert!(Position::from_fen("").is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1").is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w Z - 0 1").is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - e4 0 1").is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 0").is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K2 w - - 0 1").is_err());
    }

    #[test]
    fn apply_does_not_mutate_input() {
        let p = Position::starting();
        let before = p;
        let _next = p.apply_move(Move::new(sq("e2"), sq("e4")));
        assert_eq!(p, before);
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let p = Position::starting().apply_move(Move::new(sq("e2"), sq("e4")));
        assert_eq!(
            p.en_passant,
            Some(EnPassant {
                square: sq("e3"),
                pawn_color: Color::White
            })
        );
        assert_eq!(p.side_to_move, Color::Black);
        assert_eq!(p.halfmove_clock, 0);
        assert_eq!(p.fullmove_number, 1);

        let p = p.apply_move(Move::new(sq("g8"), sq("f6")));
        assert_eq!(p.en_passant, None);
        assert_eq!(p.halfmove_clock, 1);
        assert_eq!(p.fullmove_number, 2);
    }

    #[test]
    fn en_passant_removes_captured_pawn() {
        let p = pos("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        let next = p.apply_move(Move::en_passant(sq("e5"), sq("f6")));
        assert_eq!(next.piece_at(sq("f5")), None);
        assert_eq!(next.piece_at(sq("e5")), None);
        assert_eq!(
            next.piece_at(sq("f6")),
            Some(Piece::new(Color::White, PieceType::Pawn))
        );
        assert_eq!(next.halfmove_clock, 0);
    }

    #[test]
    fn castling_relocates_rook_and_revokes_rights() {
        let p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10");
        let ks = p.apply_move(Move::castle(sq("e1"), CastleSide::King));
        assert_eq!(
            ks.piece_at(sq("g1")),
            Some(Piece::new(Color::White, PieceType::King))
        );
        assert_eq!(
            ks.piece_at(sq("f1")),
            Some(Piece::new(Color::White, PieceType::Rook))
        );
        assert_eq!(ks.piece_at(sq("h1")), None);
        assert_eq!(ks.castling_rights.to_fen(), "kq");
        assert_eq!(ks.halfmove_clock, 4);

        let p = p.apply_move(Move::new(sq("a1"), sq("b1")));
        let qs = p.apply_move(Move::castle(sq("e8"), CastleSide::Queen));
        assert_eq!(
            qs.piece_at(sq("d8")),
            Some(Piece::new(Color::Black, PieceType::Rook))
        );
        assert_eq!(qs.piece_at(sq("a8")), None);
        assert_eq!(qs.castling_rights.to_fen(), "K");
        assert_eq!(qs.fullmove_number, 11);
    }

    #[test]
    fn capturing_rook_on_home_square_revokes_right() {
        let p = pos("r3k2r/8/8/8/8/8/6B1/R3K2R w KQkq - 0 1");
        let next = p.apply_move(Move::new(sq("g2"), sq("a8")));
        assert!(!next.castling_rights.has(Color::Black, CastleSide::Queen));
        assert!(next.castling_rights.has(Color::Black, CastleSide::King));
        assert!(next.castling_rights.has(Color::White, CastleSide::King));
        assert_eq!(next.halfmove_clock, 0);
    }

    #[test]
    fn promotion_replaces_pawn() {
        let p = pos("7k/4P3/8/8/8/8/8/4K3 w - - 5 40");
        let next = p.apply_move(Move::with_promotion(sq("e7"), sq("e8"), PieceType::Queen));
        assert_eq!(
            next.piece_at(sq("e8")),
            Some(Piece::new(Color::White, PieceType::Queen))
        );
        assert_eq!(next.halfmove_clock, 0);
    }

    #[test]
    fn board_string_has_rank_labels() {
        let s = Position::starting().board_string();
        let first = s.lines().next().unwrap();
        assert_eq!(first, "8 r n b q k b n r");
        assert!(s.ends_with("  a b c d e f g h"));
    }
}
