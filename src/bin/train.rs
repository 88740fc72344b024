use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ml_reversi::config::AppConfig;
use ml_reversi::training::trainer::Trainer;

/// Train two Reversi value networks by TD self-play.
#[derive(Parser)]
#[command(name = "train", about = "Train Reversi TD-learning agents")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of training epochs
    #[arg(long)]
    epochs: Option<usize>,

    /// Override learning rate
    #[arg(long)]
    lr: Option<f64>,

    /// Base seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Continue from the saved model files instead of fresh networks
    #[arg(long)]
    resume: bool,

    /// Play the networks against minimax at increasing depth after training
    #[arg(long)]
    test: bool,

    /// Skip training and only run the depth test (implies --resume)
    #[arg(long, conflicts_with = "test")]
    test_only: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    // Load configuration
    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(epochs) = cli.epochs {
        app_config.training.num_epochs = epochs;
    }
    if let Some(lr) = cli.lr {
        app_config.network.learning_rate = lr;
    }
    if cli.seed.is_some() {
        app_config.training.seed = cli.seed;
    }
    app_config
        .validate()
        .context("validating configuration with command-line overrides")?;

    let mut trainer = if cli.resume || cli.test_only {
        Trainer::resume(app_config).context("loading saved networks")?
    } else {
        Trainer::new(app_config)
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if !cli.test_only {
        trainer.train(&mut out).context("training")?;
    }
    if cli.test || cli.test_only {
        trainer.test(&mut out).context("testing against minimax")?;
    }

    out.flush().context("flushing report")?;
    Ok(())
}
