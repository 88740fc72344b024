use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::mlp::{Activation, Mlp, MlpConfig};
use super::state_encoding::{extract_input, InputEncoding};
use super::symmetry::Symmetry;
use crate::game::{Board, Color};

/// Value-network and exploration hyperparameters of a TD agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TdConfig {
    pub activation: Activation,
    pub input_per_cell: InputEncoding,
    pub hidden_layer_sizes: Vec<usize>,
    pub learning_rate: f64,
    /// Exploration rate at the start of a learning session.
    pub epsilon_start: f64,
}

impl Default for TdConfig {
    fn default() -> Self {
        TdConfig {
            activation: Activation::Tanh,
            input_per_cell: InputEncoding::Signed,
            hidden_layer_sizes: vec![50],
            learning_rate: 0.02,
            epsilon_start: 0.1,
        }
    }
}

impl TdConfig {
    pub fn mlp_config(&self) -> MlpConfig {
        let mut layer_sizes = vec![self.input_per_cell.input_size()];
        layer_sizes.extend(&self.hidden_layer_sizes);
        layer_sizes.push(1);
        MlpConfig {
            layer_sizes,
            activation: self.activation,
            learning_rate: self.learning_rate,
        }
    }
}

/// Reversi player that learns a position value function by temporal
/// differences.
///
/// Each move is chosen one ply deep: every child is encoded from the mover's
/// point of view and scored by the network. While learning, the value of the
/// chosen child becomes the training target for the previous chosen child,
/// and the final outcome (+1 win, -1 loss, 0 draw) is the target for the last
/// one. Every update is applied to the position and its seven symmetric
/// images.
pub struct TdAgent {
    network: Mlp,
    encoding: InputEncoding,
    epsilon_start: f64,
    symmetries: Vec<Symmetry>,
    previous_input: Option<Vec<f64>>,
    learning: bool,
    session_games: usize,
    games_played: usize,
    rng: StdRng,
    degenerate: bool,
    name: String,
}

impl TdAgent {
    /// Fresh network, OS-seeded.
    pub fn new(config: TdConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Fresh network; initial weights and exploration draws follow `seed`.
    pub fn with_seed(config: TdConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: TdConfig, mut rng: StdRng) -> Self {
        let network = config.mlp_config().init(&mut rng);
        Self::from_network(&config, network, rng)
    }

    /// Wrap an existing network, e.g. one loaded from a model file. The
    /// configured learning rate replaces the one stored with the network.
    pub fn from_network(config: &TdConfig, mut network: Mlp, rng: StdRng) -> Self {
        debug_assert_eq!(network.input_size(), config.input_per_cell.input_size());
        if network.learning_rate() != config.learning_rate {
            log::info!(
                "learning rate {} -> {}",
                network.learning_rate(),
                config.learning_rate
            );
            network.set_learning_rate(config.learning_rate);
        }
        TdAgent {
            network,
            encoding: config.input_per_cell,
            epsilon_start: config.epsilon_start,
            symmetries: Symmetry::non_identity(),
            previous_input: None,
            learning: true,
            session_games: 0,
            games_played: 0,
            rng,
            degenerate: false,
            name: "TD".to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn network(&self) -> &Mlp {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Mlp {
        &mut self.network
    }

    pub fn into_network(self) -> Mlp {
        self.network
    }

    pub fn encoding(&self) -> InputEncoding {
        self.encoding
    }

    /// Games completed with learning on since the session started.
    pub fn games_played(&self) -> usize {
        self.games_played
    }

    /// Reset the exploration schedule for a session of `games` learning games.
    pub fn start_learning_session(&mut self, games: usize) {
        self.session_games = games;
        self.games_played = 0;
    }

    /// Linearly decaying exploration rate, zero once the session is over.
    pub fn epsilon(&self) -> f64 {
        if self.session_games == 0 {
            return 0.0;
        }
        let progress = self.games_played as f64 / self.session_games as f64;
        self.epsilon_start * (1.0 - progress).max(0.0)
    }

    /// Network value of `board` as seen by `perspective`.
    pub fn value(&self, board: &Board, perspective: Color) -> f64 {
        self.network
            .evaluate(&extract_input(board, perspective, self.encoding))
    }

    /// Train on `input` and its seven symmetric images, all with `target`.
    pub fn learn_from_board(&mut self, input: &[f64], target: f64) {
        let mut samples = Vec::with_capacity(self.symmetries.len() + 1);
        samples.push((input.to_vec(), target));
        for symmetry in &self.symmetries {
            samples.push((symmetry.apply(input), target));
        }
        self.network.learn_batch(&samples);
    }

    fn check_finite(&mut self, value: f64) {
        if !value.is_finite() && !self.degenerate {
            log::error!(
                "{} produced a non-finite value ({value}) after {} games",
                self.name,
                self.games_played
            );
            self.degenerate = true;
        }
    }
}

/// Check that `network` is a well-formed value network for `encoding`: one
/// input per encoded feature and a single output.
pub fn check_value_network(network: &Mlp, encoding: InputEncoding) -> Result<(), String> {
    network.validate_shape()?;
    if network.input_size() != encoding.input_size() {
        return Err(format!(
            "input size {} does not match {}",
            network.input_size(),
            encoding.input_size()
        ));
    }
    if network.output_size() != 1 {
        return Err(format!(
            "value network must have one output, found {}",
            network.output_size()
        ));
    }
    Ok(())
}

impl Agent for TdAgent {
    fn play_turn(&mut self, board: &Board) -> Option<Board> {
        let player = board.turn_color();
        let children = board.children();
        if children.is_empty() {
            return None;
        }

        let epsilon = self.epsilon();
        let draw: f64 = self.rng.random_range(0.0..1.0);

        let (index, input, value) = if self.learning && draw < epsilon {
            let index = self.rng.random_range(0..children.len());
            let input = extract_input(&children[index], player, self.encoding);
            let value = self.network.evaluate(&input);
            (index, input, value)
        } else {
            let mut inputs: Vec<Vec<f64>> = children
                .iter()
                .map(|child| extract_input(child, player, self.encoding))
                .collect();
            let values: Vec<f64> = inputs.iter().map(|x| self.network.evaluate(x)).collect();

            // First maximum wins; NaN never compares greater
            let mut best = 0;
            for (i, &v) in values.iter().enumerate().skip(1) {
                if v > values[best] || (values[best].is_nan() && !v.is_nan()) {
                    best = i;
                }
            }
            (best, inputs.swap_remove(best), values[best])
        };

        self.check_finite(value);

        if self.learning {
            if let Some(previous) = self.previous_input.take() {
                self.learn_from_board(&previous, value);
            }
            self.previous_input = Some(input);
        }

        let mut chosen = children[index];
        chosen.swap_turn();
        Some(chosen)
    }

    fn on_game_over(&mut self, final_board: &Board, our_color: Color) {
        if self.learning {
            let outcome = match final_board.winner() {
                Some(winner) if winner == our_color => 1.0,
                Some(_) => -1.0,
                None => 0.0,
            };
            if let Some(previous) = self.previous_input.take() {
                self.learn_from_board(&previous, outcome);
            }
            self.games_played += 1;
        }
        self.previous_input = None;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_learning(&mut self, learning: bool) {
        self.learning = learning;
    }

    fn is_degenerate(&self) -> bool {
        self.degenerate
    }
}
