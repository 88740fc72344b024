use std::path::Path;

use crate::ai::TdConfig;
use crate::checkpoint::CheckpointConfig;
use crate::error::ConfigError;
use crate::training::trainer::{TrainerConfig, ValidationConfig};

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub network: TdConfig,
    pub training: TrainerConfig,
    pub validation: ValidationConfig,
    pub checkpoint: CheckpointConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let net = &self.network;
        if !(net.learning_rate > 0.0 && net.learning_rate.is_finite()) {
            return Err(ConfigError::Validation(
                "network.learning_rate must be > 0".into(),
            ));
        }
        if net.hidden_layer_sizes.contains(&0) {
            return Err(ConfigError::Validation(
                "network.hidden_layer_sizes must not contain 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&net.epsilon_start) {
            return Err(ConfigError::Validation(
                "network.epsilon_start must be in [0, 1]".into(),
            ));
        }

        let training = &self.training;
        if training.num_epochs == 0 {
            return Err(ConfigError::Validation(
                "training.num_epochs must be > 0".into(),
            ));
        }
        if training.learning_games_per_epoch == 0 {
            return Err(ConfigError::Validation(
                "training.learning_games_per_epoch must be > 0".into(),
            ));
        }
        if training.testing_games_per_epoch == 0 {
            return Err(ConfigError::Validation(
                "training.testing_games_per_epoch must be > 0".into(),
            ));
        }
        if training.test_games_per_ply == 0 {
            return Err(ConfigError::Validation(
                "training.test_games_per_ply must be > 0".into(),
            ));
        }
        if training.test_max_ply == 0 {
            return Err(ConfigError::Validation(
                "training.test_max_ply must be >= 1".into(),
            ));
        }

        let minimax = &self.validation.minimax;
        if minimax.ply == 0 {
            return Err(ConfigError::Validation(
                "validation.minimax.ply must be >= 1".into(),
            ));
        }
        if !(minimax.noise_std >= 0.0 && minimax.noise_std.is_finite()) {
            return Err(ConfigError::Validation(
                "validation.minimax.noise_std must be >= 0".into(),
            ));
        }

        if !self.checkpoint.filename_template.contains("%d") {
            return Err(ConfigError::Validation(
                "checkpoint.filename_template must contain %d".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        // Every field of the default config has a TOML representation
        toml::to_string_pretty(&AppConfig::default()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Activation, HeuristicKind, InputEncoding};
    use crate::training::trainer::OpponentKind;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_defaults_match_training_schedule() {
        let config = AppConfig::default();
        assert_eq!(config.training.num_epochs, 300);
        assert_eq!(config.training.learning_games_per_epoch, 150);
        assert_eq!(config.training.testing_games_per_epoch, 50);
        assert_eq!(config.network.hidden_layer_sizes, vec![50]);
        assert_eq!(config.network.activation, Activation::Tanh);
        assert_eq!(config.validation.opponent, OpponentKind::Minimax);
        assert_eq!(config.validation.minimax.ply, 3);
        assert_eq!(config.validation.minimax.heuristic, HeuristicKind::Binkley);
        assert_eq!(config.checkpoint.filename_template, "othello_%d.nnet");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[network]
learning_rate = 0.001
input_per_cell = 3
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!((config.network.learning_rate - 0.001).abs() < 1e-9);
        assert_eq!(config.network.input_per_cell, InputEncoding::OccupancyWithEmpty);
        // Other fields should be defaults
        assert!((config.network.epsilon_start - 0.1).abs() < 1e-12);
        assert_eq!(config.training.num_epochs, 300);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_nested_validation_section() {
        let toml_str = r#"
[validation]
opponent = "random"

[validation.minimax]
heuristic = "simple"
ply = 2
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.validation.opponent, OpponentKind::Random);
        assert_eq!(config.validation.minimax.heuristic, HeuristicKind::Simple);
        assert_eq!(config.validation.minimax.ply, 2);
        assert!((config.validation.minimax.noise_std - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_unsupported_input_per_cell_fails_to_parse() {
        let result: Result<AppConfig, _> = toml::from_str("[network]\ninput_per_cell = 4\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_zero_epochs() {
        let mut config = AppConfig::default();
        config.training.num_epochs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_games() {
        let mut config = AppConfig::default();
        config.training.learning_games_per_epoch = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.training.testing_games_per_epoch = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_lr() {
        let mut config = AppConfig::default();
        config.network.learning_rate = -0.001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_hidden_layer() {
        let mut config = AppConfig::default();
        config.network.hidden_layer_sizes = vec![20, 0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_accepts_no_hidden_layer() {
        let mut config = AppConfig::default();
        config.network.hidden_layer_sizes.clear();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_epsilon_out_of_range() {
        let mut config = AppConfig::default();
        config.network.epsilon_start = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_ply() {
        let mut config = AppConfig::default();
        config.validation.minimax.ply = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_noise() {
        let mut config = AppConfig::default();
        config.validation.minimax.noise_std = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_template_without_index() {
        let mut config = AppConfig::default();
        config.checkpoint.filename_template = "othello.nnet".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.training.num_epochs, 300);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[training]
num_epochs = 5
seed = 42
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.training.num_epochs, 5);
        assert_eq!(config.training.seed, Some(42));
        // Others are defaults
        assert!((config.network.learning_rate - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[training]\nnum_epochs = 0\n").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = AppConfig::load(Path::new("definitely/missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("[network]"));
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config, AppConfig::default());
    }
}
