pub mod difficulty;
pub mod engine;
pub mod evaluation;
pub mod search;

pub use difficulty::{Difficulty, DifficultyLevel, LEVELS};
pub use engine::{AiEngine, Bot, ScoredMove, choose_bot_move, rank_moves};
pub use evaluation::{MATE, evaluate_position};
pub use search::{SearchStats, Searcher, minimax, order_moves};
