use std::io::Write;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::ai::td::check_value_network;
use crate::ai::{Agent, BinkleyHeuristic, MinimaxAgent, MinimaxConfig, Mlp, RandomAgent, TdAgent};
use crate::checkpoint::{now_timestamp, CheckpointMetadata, ModelStore};
use crate::config::AppConfig;
use crate::error::{CheckpointError, TrainingError};
use crate::training::game::{derive_seed, run_games};
use crate::training::metrics::{format_remaining, EpochReport, EpochTimer, PlyReport};

/// Epoch schedule and evaluation sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub num_epochs: usize,
    pub learning_games_per_epoch: usize,
    pub testing_games_per_epoch: usize,
    /// Games per network and depth in test mode.
    pub test_games_per_ply: usize,
    pub test_max_ply: usize,
    /// Base seed for every RNG of a run. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            num_epochs: 300,
            learning_games_per_epoch: 150,
            testing_games_per_epoch: 50,
            test_games_per_ply: 100,
            test_max_ply: 6,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentKind {
    Minimax,
    Random,
}

/// Opponent the first network is measured against after every epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub opponent: OpponentKind,
    pub minimax: MinimaxConfig,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig {
            opponent: OpponentKind::Minimax,
            minimax: MinimaxConfig::default(),
        }
    }
}

// RNG streams derived from the base seed
const STREAM_OPPONENT: u64 = 2;
const STREAM_TEST: u64 = 100;

fn rng_for(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(derive_seed(seed, stream)),
        None => StdRng::from_os_rng(),
    }
}

/// Trains two TD networks against each other and validates the first one
/// against a fixed opponent after every epoch.
pub struct Trainer {
    config: AppConfig,
    networks: [TdAgent; 2],
    opponent: Box<dyn Agent>,
    store: ModelStore,
}

impl Trainer {
    /// Start from freshly initialized networks.
    pub fn new(config: AppConfig) -> Self {
        let seed = config.training.seed;
        let networks = [0u64, 1].map(|i| match seed {
            Some(seed) => TdAgent::with_seed(config.network.clone(), derive_seed(seed, i)),
            None => TdAgent::new(config.network.clone()),
        });
        Self::assemble(config, networks)
    }

    /// Continue from existing networks, e.g. loaded from model files. Each
    /// must match the configured input encoding and have a single output.
    pub fn with_networks(config: AppConfig, networks: [Mlp; 2]) -> Result<Self, TrainingError> {
        for (index, network) in networks.iter().enumerate() {
            check_value_network(network, config.network.input_per_cell)
                .map_err(|reason| TrainingError::IncompatibleNetwork { index, reason })?;
        }
        let seed = config.training.seed;
        let [first, second] = networks;
        let networks = [
            TdAgent::from_network(&config.network, first, rng_for(seed, 0)),
            TdAgent::from_network(&config.network, second, rng_for(seed, 1)),
        ];
        Ok(Self::assemble(config, networks))
    }

    /// Load both networks from the model files named by the checkpoint
    /// settings.
    pub fn resume(config: AppConfig) -> Result<Self, TrainingError> {
        let store = ModelStore::new(config.checkpoint.clone());
        let encoding = config.network.input_per_cell;
        let first = store.load(0, encoding)?;
        let second = store.load(1, encoding)?;
        log::info!(
            "resuming from {} (epoch {}) and {} (epoch {})",
            store.path_for(0).display(),
            first.metadata.epoch,
            store.path_for(1).display(),
            second.metadata.epoch
        );
        Self::with_networks(config, [first.network, second.network])
    }

    fn assemble(config: AppConfig, networks: [TdAgent; 2]) -> Self {
        let [first, second] = networks;
        let networks = [first.with_name("TD#0"), second.with_name("TD#1")];

        let seed = config.training.seed;
        let opponent: Box<dyn Agent> = match config.validation.opponent {
            OpponentKind::Minimax => Box::new(
                config
                    .validation
                    .minimax
                    .build(rng_for(seed, STREAM_OPPONENT)),
            ),
            OpponentKind::Random => Box::new(match seed {
                Some(seed) => RandomAgent::with_seed(derive_seed(seed, STREAM_OPPONENT)),
                None => RandomAgent::new(),
            }),
        };
        let store = ModelStore::new(config.checkpoint.clone());

        Trainer {
            config,
            networks,
            opponent,
            store,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn networks(&self) -> &[TdAgent; 2] {
        &self.networks
    }

    pub fn into_networks(self) -> [TdAgent; 2] {
        self.networks
    }

    /// Run the learning session. Writes two report lines per epoch to `out`:
    /// the win rates and the remaining-time estimate.
    pub fn train(&mut self, out: &mut dyn Write) -> Result<Vec<EpochReport>, TrainingError> {
        let t = self.config.training.clone();
        let session_games = t.num_epochs * t.learning_games_per_epoch;
        for network in &mut self.networks {
            network.start_learning_session(session_games);
        }

        log::info!(
            "Training for {} epochs: {} learning games and {} games vs {} per epoch",
            t.num_epochs,
            t.learning_games_per_epoch,
            t.testing_games_per_epoch,
            self.opponent.name()
        );

        let mut timer = EpochTimer::new();
        let mut reports = Vec::with_capacity(t.num_epochs);

        for epoch in 0..t.num_epochs {
            let [first, second] = &mut self.networks;
            first.set_learning(true);
            second.set_learning(true);
            let adversarial = run_games(first, second, t.learning_games_per_epoch)?;

            first.set_learning(false);
            let testing = run_games(first, self.opponent.as_mut(), t.testing_games_per_epoch)?;
            let epsilon = first.epsilon();

            let duration = timer.finish_epoch();
            let report = EpochReport {
                epoch,
                adversarial,
                testing,
                duration,
            };

            writeln!(out, "{report}")?;
            let remaining = timer.estimate_remaining(t.num_epochs - epoch - 1);
            writeln!(out, "{}", format_remaining(remaining))?;
            out.flush()?;

            if self.config.checkpoint.enabled {
                self.save_networks(&report)?;
            }

            log::info!(
                "Epoch {}/{} | adversarial: {:.3} | testing: {:.3} | eps: {:.4} | {:.1}s",
                epoch + 1,
                t.num_epochs,
                report.adversarial_rate(),
                report.testing_rate(),
                epsilon,
                duration.as_secs_f64()
            );
            reports.push(report);
        }

        log::info!("Training complete after {} epochs", t.num_epochs);
        Ok(reports)
    }

    /// Play both networks against minimax opponents of increasing depth and
    /// write one `<ply> <rate0> <rate1>` line per depth.
    pub fn test(&mut self, out: &mut dyn Write) -> Result<Vec<PlyReport>, TrainingError> {
        let t = self.config.training.clone();
        let noise_std = self.config.validation.minimax.noise_std;
        let mut rows = Vec::with_capacity(t.test_max_ply);

        for network in &mut self.networks {
            network.set_learning(false);
        }

        for ply in 1..=t.test_max_ply {
            let heuristic = BinkleyHeuristic::new(
                noise_std,
                rng_for(t.seed, STREAM_TEST + ply as u64),
            );
            let mut opponent = MinimaxAgent::new(ply, Box::new(heuristic));
            let mut rates = [0.0; 2];
            for (rate, network) in rates.iter_mut().zip(self.networks.iter_mut()) {
                *rate = run_games(network, &mut opponent, t.test_games_per_ply)?.win_rate();
            }

            let row = PlyReport { ply, rates };
            writeln!(out, "{row}")?;
            out.flush()?;
            log::info!(
                "{} at depth {ply}: {:.3} / {:.3}",
                opponent.name(),
                rates[0],
                rates[1]
            );
            rows.push(row);
        }

        Ok(rows)
    }

    fn save_networks(&self, report: &EpochReport) -> Result<(), CheckpointError> {
        let timestamp = now_timestamp();
        for (index, network) in self.networks.iter().enumerate() {
            let metadata = CheckpointMetadata {
                epoch: report.epoch + 1,
                timestamp,
                adversarial_rate: report.adversarial_rate(),
                testing_rate: report.testing_rate(),
                training_steps: network.network().update_count(),
            };
            self.store.save(index, network, metadata)?;
        }
        Ok(())
    }
}
