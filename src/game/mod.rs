//! Reversi rules engine: board representation, colors, legal-move generation
//! and winner determination.

mod board;
mod color;

pub use board::{Board, Cell, GRID_SIZE, NUM_CELLS};
pub use color::Color;
