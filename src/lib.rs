//! An 8×8 mailbox chess engine with a difficulty-graded bot.
//!
//! [`engine`] holds the rules: positions, move generation and the game
//! controller. [`ai`] holds evaluation, search and bot move selection.

pub mod ai;
pub mod config;
pub mod engine;
