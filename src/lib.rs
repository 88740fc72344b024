//! # ML Reversi
//!
//! Two Reversi (Othello) players learn a position value function by
//! temporal-difference self-play on a small multilayer perceptron, and are
//! measured against an alpha-beta minimax opponent with a positional
//! heuristic.
//!
//! ## Modules
//!
//! - [`game`]: Rules engine: board, colors, legal moves, winner
//! - [`ai`]: Agent trait, heuristics, search, MLP, TD and minimax agents
//! - [`training`]: Game driver, epoch trainer, match metrics
//! - [`checkpoint`]: Model file persistence and validation
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod game;
pub mod training;
