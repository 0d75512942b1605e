//! Stateful single-game controller wrapping `Position`.
//!
//! `Game` is the caller that validates moves before they reach the move
//! applier, detects checkmate / stalemate after every move, and keeps the
//! per-king check indicators a board view needs.

use serde::Serialize;
use tracing::{debug, info};

use crate::engine::attacks;
use crate::engine::board::Position;
use crate::engine::movegen;
use crate::engine::types::{ChessError, Color, GameStatus, Move, PieceType, Square};

// =========================================================================
// Game
// =========================================================================

/// One in-memory chess game.
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    status: GameStatus,
    /// Check indicator per king, indexed by `Color::index()`.
    in_check: [bool; 2],
    move_history: Vec<Move>,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::starting())
    }

    /// Create a game from an arbitrary position.
    pub fn from_position(position: Position) -> Self {
        let mut game = Self {
            position,
            status: GameStatus::Active,
            in_check: [false; 2],
            move_history: Vec::new(),
        };
        game.refresh();
        game
    }

    /// Create a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current board position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Current game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    /// Moves played so far, oldest first.
    pub fn move_history(&self) -> &[Move] {
        &self.move_history
    }

    /// The most recent move, if any.
    pub fn last_move(&self) -> Option<Move> {
        self.move_history.last().copied()
    }

    /// Is `color`'s king currently in check?
    pub fn in_check(&self, color: Color) -> bool {
        self.in_check[color.index()]
    }

    /// All legal moves in the current position.
    pub fn legal_moves(&self) -> Vec<Move> {
        movegen::legal_moves(&self.position)
    }

    /// Legal moves from a specific square.
    pub fn legal_moves_from(&self, sq: Square) -> Vec<Move> {
        movegen::legal_moves_from(&self.position, sq)
    }

    /// Resolve coordinate notation (`e2e4`, `e1g1`, `e7e8q`) against the
    /// legal moves, filling in the en-passant and castling flags.
    pub fn parse_move(&self, text: &str) -> Result<Move, ChessError> {
        let text = text.trim();
        let (Some(from), Some(to)) = (text.get(0..2), text.get(2..4)) else {
            return Err(ChessError::InvalidMove {
                mv: text.to_string(),
                reason: "expected coordinate notation like e2e4".into(),
            });
        };
        let from: Square = from.parse()?;
        let to: Square = to.parse()?;
        let promotion = match text.get(4..) {
            None | Some("") => None,
            Some(suffix) => {
                let mut chars = suffix.chars();
                match (chars.next().and_then(PieceType::from_char), chars.next()) {
                    (Some(piece), None) => Some(piece.kind),
                    _ => {
                        return Err(ChessError::InvalidMove {
                            mv: text.to_string(),
                            reason: format!("bad promotion suffix '{suffix}'"),
                        });
                    }
                }
            }
        };

        self.legal_moves_from(from)
            .into_iter()
            .find(|mv| mv.to == to && (promotion.is_none() || mv.promotion == promotion))
            .ok_or_else(|| ChessError::InvalidMove {
                mv: text.to_string(),
                reason: "not a legal move".into(),
            })
    }

    /// Whether the game is over.
    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    // -----------------------------------------------------------------
    // Play
    // -----------------------------------------------------------------

    /// Play a move and return the resulting status.
    ///
    /// Returns `ChessError::GameOver` if the game is already finished, or
    /// `ChessError::InvalidMove` if `mv` is not in the legal move list.
    pub fn play(&mut self, mv: Move) -> Result<GameStatus, ChessError> {
        if self.status.is_game_over() {
            return Err(ChessError::GameOver(self.status.to_string()));
        }

        if !self.legal_moves().contains(&mv) {
            return Err(ChessError::InvalidMove {
                mv: mv.to_string(),
                reason: "not a legal move".into(),
            });
        }

        let mover = self.position.side_to_move;
        self.position = self.position.apply_move(mv);
        self.move_history.push(mv);
        self.refresh();

        debug!(%mv, %mover, status = %self.status, "move applied");
        if self.status.is_game_over() {
            info!(
                status = %self.status,
                plies = self.move_history.len(),
                "game finished"
            );
        }
        Ok(self.status)
    }

    /// `color` gives up; the other side wins and no further moves are
    /// accepted.
    pub fn forfeit(&mut self, color: Color) -> Result<GameStatus, ChessError> {
        if self.status.is_game_over() {
            return Err(ChessError::GameOver(self.status.to_string()));
        }
        self.status = GameStatus::Forfeit { winner: !color };
        info!(
            status = %self.status,
            plies = self.move_history.len(),
            "game finished"
        );
        Ok(self.status)
    }

    // -----------------------------------------------------------------
    // Status detection
    // -----------------------------------------------------------------

    fn refresh(&mut self) {
        self.in_check = attacks::check_flags(&self.position);
        self.status = self.compute_status();
    }

    fn compute_status(&self) -> GameStatus {
        let to_move = self.position.side_to_move;
        let in_check = self.in_check[to_move.index()];

        if self.legal_moves().is_empty() {
            return if in_check {
                GameStatus::Checkmate { winner: !to_move }
            } else {
                GameStatus::Stalemate
            };
        }

        if in_check {
            GameStatus::Check
        } else {
            GameStatus::Active
        }
    }

    // -----------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------

    /// Read-only view of the game for rendering or debugging.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            coordinate_system: COORDINATE_SYSTEM,
            fen: self.position.to_fen(),
            turn: self.position.side_to_move,
            status: self.status,
            in_check: InCheck {
                white: self.in_check(Color::White),
                black: self.in_check(Color::Black),
            },
            last_move: self.last_move().map(MoveView::from),
            plies: self.move_history.len(),
            pieces: self
                .position
                .pieces()
                .map(|(sq, p)| PieceView {
                    color: p.color,
                    kind: p.kind,
                    row: sq.row(),
                    col: sq.col(),
                })
                .collect(),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// GameSnapshot
// =========================================================================

const COORDINATE_SYSTEM: &str =
    "row 0 is rank 8 (black home rank), row 7 is rank 1 (white home rank); col 0 is the a-file";

/// Serializable picture of a game.
#[derive(Clone, Debug, Serialize)]
pub struct GameSnapshot {
    pub coordinate_system: &'static str,
    pub fen: String,
    pub turn: Color,
    pub status: GameStatus,
    pub in_check: InCheck,
    pub last_move: Option<MoveView>,
    pub plies: usize,
    pub pieces: Vec<PieceView>,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct InCheck {
    pub white: bool,
    pub black: bool,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct SquareView {
    pub row: u8,
    pub col: u8,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct MoveView {
    pub from: SquareView,
    pub to: SquareView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceType>,
}

impl From<Move> for MoveView {
    fn from(mv: Move) -> Self {
        MoveView {
            from: SquareView {
                row: mv.from.row(),
                col: mv.from.col(),
            },
            to: SquareView {
                row: mv.to.row(),
                col: mv.to.col(),
            },
            promotion: mv.promotion,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct PieceView {
    pub color: Color,
    pub kind: PieceType,
    pub row: u8,
    pub col: u8,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn play(g: &mut Game, from: &str, to: &str) -> GameStatus {
        g.play(Move::new(sq(from), sq(to))).unwrap()
    }

    #[test]
    fn new_game_is_active() {
        let g = Game::new();
        assert_eq!(g.status(), GameStatus::Active);
        assert!(!g.is_game_over());
        assert_eq!(g.side_to_move(), Color::White);
        assert_eq!(g.last_move(), None);
    }

    #[test]
    fn game_from_invalid_fen() {
        assert!(Game::from_fen("invalid").is_err());
    }

    #[test]
    fn play_e2e4() {
        let mut g = Game::new();
        assert_eq!(play(&mut g, "e2", "e4"), GameStatus::Active);
        assert_eq!(g.side_to_move(), Color::Black);
        assert_eq!(g.last_move(), Some(Move::new(sq("e2"), sq("e4"))));
        assert_eq!(g.move_history().len(), 1);
    }

    #[test]
    fn illegal_move_rejected_and_position_kept() {
        let mut g = Game::new();
        let before = *g.position();
        let err = g.play(Move::new(sq("e2"), sq("e5"))).unwrap_err();
        assert!(matches!(err, ChessError::InvalidMove { .. }));
        assert_eq!(*g.position(), before);
    }

    #[test]
    fn move_with_wrong_flags_rejected() {
        let mut g = Game::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
            .unwrap();
        // exf6 must carry the en-passant flag.
        assert!(g.play(Move::new(sq("e5"), sq("f6"))).is_err());
        assert!(g.play(Move::en_passant(sq("e5"), sq("f6"))).is_ok());
    }

    #[test]
    fn fools_mate_ends_game() {
        let mut g = Game::new();
        play(&mut g, "f2", "f3");
        play(&mut g, "e7", "e5");
        play(&mut g, "g2", "g4");
        let status = play(&mut g, "d8", "h4");
        assert_eq!(
            status,
            GameStatus::Checkmate {
                winner: Color::Black
            }
        );
        assert!(g.in_check(Color::White));
        assert!(!g.in_check(Color::Black));

        let err = g.play(Move::new(sq("e2"), sq("e4"))).unwrap_err();
        assert!(matches!(err, ChessError::GameOver(_)));
    }

    #[test]
    fn check_status_and_indicator() {
        let mut g = Game::new();
        play(&mut g, "e2", "e4");
        play(&mut g, "f7", "f6");
        assert_eq!(play(&mut g, "d1", "h5"), GameStatus::Check);
        assert!(g.in_check(Color::Black));
    }

    #[test]
    fn parse_coordinate_moves() {
        let g = Game::from_fen("r3k3/1P6/8/3pP3/8/8/8/4K2R w Kq d6 0 1").unwrap();
        assert_eq!(
            g.parse_move("e5d6").unwrap(),
            Move::en_passant(sq("e5"), sq("d6"))
        );
        assert_eq!(
            g.parse_move("e1g1").unwrap(),
            Move::castle(sq("e1"), crate::engine::types::CastleSide::King)
        );
        assert_eq!(
            g.parse_move("b7a8q").unwrap(),
            Move::with_promotion(sq("b7"), sq("a8"), PieceType::Queen)
        );
        assert_eq!(g.parse_move("b7b8").unwrap().promotion, Some(PieceType::Queen));

        assert!(matches!(g.parse_move("b7b8n"), Err(ChessError::InvalidMove { .. })));
        assert!(matches!(g.parse_move("e5"), Err(ChessError::InvalidMove { .. })));
        assert!(matches!(g.parse_move("i9e4"), Err(ChessError::InvalidSquare(_))));
        assert!(matches!(g.parse_move("e1e3"), Err(ChessError::InvalidMove { .. })));
    }

    #[test]
    fn forfeit_ends_the_game() {
        let mut g = Game::new();
        play(&mut g, "e2", "e4");
        let status = g.forfeit(Color::Black).unwrap();
        assert_eq!(
            status,
            GameStatus::Forfeit {
                winner: Color::White
            }
        );
        assert!(g.is_game_over());

        let err = g.play(Move::new(sq("e7"), sq("e5"))).unwrap_err();
        assert!(matches!(err, ChessError::GameOver(_)));
        assert!(matches!(g.forfeit(Color::White), Err(ChessError::GameOver(_))));
        assert_eq!(g.move_history().len(), 1);

        let json = serde_json::to_value(g.snapshot()).unwrap();
        assert_eq!(json["status"]["state"], "forfeit");
        assert_eq!(json["status"]["winner"], "white");
    }

    #[test]
    fn no_forfeit_after_checkmate() {
        let mut g = Game::new();
        play(&mut g, "f2", "f3");
        play(&mut g, "e7", "e5");
        play(&mut g, "g2", "g4");
        play(&mut g, "d8", "h4");
        assert!(matches!(g.forfeit(Color::White), Err(ChessError::GameOver(_))));
        assert_eq!(
            g.status(),
            GameStatus::Checkmate {
                winner: Color::Black
            }
        );
    }

    #[test]
    fn stalemate_detected_on_construction() {
        let g = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(g.status(), GameStatus::Stalemate);
        assert!(g.is_game_over());
    }

    #[test]
    fn snapshot_serializes() {
        let mut g = Game::new();
        play(&mut g, "e2", "e4");
        let snap = g.snapshot();
        assert_eq!(snap.pieces.len(), 32);
        assert_eq!(snap.turn, Color::Black);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["turn"], "black");
        assert_eq!(json["status"]["state"], "active");
        assert_eq!(json["last_move"]["from"]["row"], 6);
        assert_eq!(json["last_move"]["to"]["row"], 4);
        assert_eq!(json["in_check"]["white"], false);
    }
}
