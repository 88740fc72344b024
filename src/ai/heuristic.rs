use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::game::{Board, Cell, Color, GRID_SIZE};

/// Positional weights from Binkley's Othello evaluation. Corners are worth
/// the most, squares next to corners are penalized.
pub const BINKLEY_WEIGHTS: [[f64; GRID_SIZE]; GRID_SIZE] = [
    [100.0, -25.0, 10.0, 5.0, 5.0, 10.0, -25.0, 100.0],
    [-25.0, -25.0, 2.0, 2.0, 2.0, 2.0, -25.0, -25.0],
    [10.0, 2.0, 5.0, 1.0, 1.0, 5.0, 2.0, 10.0],
    [5.0, 2.0, 1.0, 2.0, 2.0, 1.0, 2.0, 5.0],
    [5.0, 2.0, 1.0, 2.0, 2.0, 1.0, 2.0, 5.0],
    [10.0, 2.0, 5.0, 1.0, 1.0, 5.0, 2.0, 10.0],
    [-25.0, -25.0, 2.0, 2.0, 2.0, 2.0, -25.0, -25.0],
    [100.0, -25.0, 10.0, 5.0, 5.0, 10.0, -25.0, 100.0],
];

pub const DEFAULT_NOISE_STD: f64 = 10.0;

/// Trait for evaluating a board position from a player's perspective.
pub trait Heuristic {
    fn evaluate(&mut self, board: &Board, player: Color) -> f64;

    fn name(&self) -> &str;
}

/// Which heuristic a minimax player should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicKind {
    Simple,
    Binkley,
}

impl HeuristicKind {
    pub fn build(self, noise_std: f64, rng: StdRng) -> Box<dyn Heuristic> {
        match self {
            HeuristicKind::Simple => Box::new(SimpleHeuristic),
            HeuristicKind::Binkley => Box::new(BinkleyHeuristic::new(noise_std, rng)),
        }
    }
}

/// Sum of `weight(row, col)` over the board: +w for `player`'s tokens, -w for
/// the opponent's, nothing for empty cells.
fn weighted_sum(board: &Board, player: Color, weight: impl Fn(usize, usize) -> f64) -> f64 {
    let own = player.to_cell();
    let mut score = 0.0;
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            match board.get(row, col) {
                Cell::Empty => {}
                c if c == own => score += weight(row, col),
                _ => score -= weight(row, col),
            }
        }
    }
    score
}

/// Token differential: player's tokens minus opponent's tokens.
pub fn simple_score(board: &Board, player: Color) -> f64 {
    weighted_sum(board, player, |_, _| 1.0)
}

/// Binkley positional score without noise.
pub fn binkley_score(board: &Board, player: Color) -> f64 {
    weighted_sum(board, player, |row, col| BINKLEY_WEIGHTS[row][col])
}

/// Naive piece-count heuristic.
pub struct SimpleHeuristic;

impl Heuristic for SimpleHeuristic {
    fn evaluate(&mut self, board: &Board, player: Color) -> f64 {
        simple_score(board, player)
    }

    fn name(&self) -> &str {
        "simple"
    }
}

/// Binkley positional weights plus zero-mean Gaussian noise, so that repeated
/// games against the same minimax player do not all follow one line.
pub struct BinkleyHeuristic {
    noise: Option<Normal<f64>>,
    rng: StdRng,
}

impl BinkleyHeuristic {
    /// A non-positive or non-finite `noise_std` disables the noise.
    pub fn new(noise_std: f64, rng: StdRng) -> Self {
        let noise = if noise_std > 0.0 {
            Normal::new(0.0, noise_std).ok()
        } else {
            None
        };
        BinkleyHeuristic { noise, rng }
    }

    pub fn with_seed(noise_std: f64, seed: u64) -> Self {
        Self::new(noise_std, StdRng::seed_from_u64(seed))
    }
}

impl Default for BinkleyHeuristic {
    fn default() -> Self {
        Self::new(DEFAULT_NOISE_STD, StdRng::from_os_rng())
    }
}

impl Heuristic for BinkleyHeuristic {
    fn evaluate(&mut self, board: &Board, player: Color) -> f64 {
        let score = binkley_score(board, player);
        match &self.noise {
            Some(normal) => score + normal.sample(&mut self.rng),
            None => score,
        }
    }

    fn name(&self) -> &str {
        "binkley"
    }
}
