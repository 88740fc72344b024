use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ai::{Agent, InputEncoding, TdAgent};
use crate::checkpoint::metadata::{CheckpointMetadata, ModelFile};
use crate::error::CheckpointError;

/// Where and whether value networks are saved.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    /// File name with `%d` standing for the network index.
    pub filename_template: String,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        CheckpointConfig {
            enabled: true,
            dir: PathBuf::from("."),
            filename_template: "othello_%d.nnet".to_string(),
        }
    }
}

/// Seconds since the Unix epoch, 0 if the clock is before it.
pub fn now_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Saves and loads the per-index model files of a training run.
pub struct ModelStore {
    config: CheckpointConfig,
}

impl ModelStore {
    pub fn new(config: CheckpointConfig) -> Self {
        ModelStore { config }
    }

    pub fn path_for(&self, index: usize) -> PathBuf {
        let name = self
            .config
            .filename_template
            .replace("%d", &index.to_string());
        self.config.dir.join(name)
    }

    /// Save the network of `agent` as model `index`.
    pub fn save(
        &self,
        index: usize,
        agent: &TdAgent,
        metadata: CheckpointMetadata,
    ) -> Result<PathBuf, CheckpointError> {
        let path = self.path_for(index);
        let model = ModelFile::new(agent.network().clone(), agent.encoding(), metadata);
        write_model(&path, &model)?;
        log::debug!("saved {} to {}", agent.name(), path.display());
        Ok(path)
    }

    /// Load model `index`, requiring it to use `expected` input encoding.
    pub fn load(&self, index: usize, expected: InputEncoding) -> Result<ModelFile, CheckpointError> {
        load_model(&self.path_for(index), Some(expected))
    }
}

/// Write `model` as pretty JSON to `<path>.tmp`, then rename over `path`.
pub fn write_model(path: &Path, model: &ModelFile) -> Result<(), CheckpointError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp: OsString = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let json = serde_json::to_string_pretty(model)?;
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Read and validate a model file.
pub fn load_model(
    path: &Path,
    expected: Option<InputEncoding>,
) -> Result<ModelFile, CheckpointError> {
    let json = fs::read_to_string(path).map_err(|e| CheckpointError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let model: ModelFile = serde_json::from_str(&json).map_err(|e| CheckpointError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    model
        .validate(expected)
        .map_err(|reason| CheckpointError::MalformedModel {
            path: path.to_path_buf(),
            reason,
        })?;
    Ok(model)
}
