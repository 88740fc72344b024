use std::path::PathBuf;

/// Rejected move from externally supplied coordinates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("illegal move at row {row}, col {col}")]
    IllegalMove { row: usize, col: usize },

    #[error("position row {row}, col {col} is off the board")]
    OutOfBounds { row: usize, col: usize },
}

/// Errors that can occur while saving or loading model files.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("failed to read model file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse model file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("malformed model in {path}: {reason}")]
    MalformedModel { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during training.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("network of {agent} produced a non-finite value after {games_played} games")]
    NumericDegeneracy { agent: String, games_played: usize },

    #[error("network {index} does not fit the configuration: {reason}")]
    IncompatibleNetwork { index: usize, reason: String },

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
