use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::agent::Agent;
use crate::game::Board;

/// An agent that selects uniformly at random among legal moves.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn play_turn(&mut self, board: &Board) -> Option<Board> {
        let children = board.children();
        if children.is_empty() {
            return None;
        }
        let mut chosen = children[self.rng.random_range(0..children.len())];
        chosen.swap_turn();
        Some(chosen)
    }

    fn name(&self) -> &str {
        "Random"
    }
}
