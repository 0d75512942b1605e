pub mod attacks;
pub mod board;
pub mod game;
pub mod movegen;
pub mod types;

pub use attacks::{is_in_check, is_square_attacked};
pub use board::{Position, START_FEN, apply_move};
pub use game::{Game, GameSnapshot};
pub use movegen::{legal_moves, legal_moves_for, legal_moves_from, pseudo_moves};
pub use types::*;
