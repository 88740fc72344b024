use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::heuristic::{Heuristic, HeuristicKind, DEFAULT_NOISE_STD};
use super::search::alpha_beta;
use crate::game::Board;

/// Settings for a fixed-depth minimax opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimaxConfig {
    pub ply: usize,
    pub heuristic: HeuristicKind,
    /// Standard deviation of the Binkley evaluation noise. Ignored by `simple`.
    pub noise_std: f64,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        MinimaxConfig {
            ply: 3,
            heuristic: HeuristicKind::Binkley,
            noise_std: DEFAULT_NOISE_STD,
        }
    }
}

impl MinimaxConfig {
    pub fn build(&self, rng: StdRng) -> MinimaxAgent {
        MinimaxAgent::new(self.ply, self.heuristic.build(self.noise_std, rng))
    }
}

/// Alpha-beta player that scores every leaf from its own point of view.
pub struct MinimaxAgent {
    ply: usize,
    heuristic: Box<dyn Heuristic>,
    name: String,
}

impl MinimaxAgent {
    pub fn new(ply: usize, heuristic: Box<dyn Heuristic>) -> Self {
        let name = format!("Minimax({ply}, {})", heuristic.name());
        MinimaxAgent {
            ply,
            heuristic,
            name,
        }
    }

    pub fn ply(&self) -> usize {
        self.ply
    }
}

impl Agent for MinimaxAgent {
    fn play_turn(&mut self, board: &Board) -> Option<Board> {
        let player = board.turn_color();
        let heuristic = &mut self.heuristic;
        let mut eval = |leaf: &Board| heuristic.evaluate(leaf, player);
        // Depth 0 would evaluate the root without choosing a move
        let depth = self.ply.max(1);
        alpha_beta(board, depth, f64::NEG_INFINITY, f64::INFINITY, true, &mut eval).best
    }

    fn name(&self) -> &str {
        &self.name
    }
}
