use serde::{Deserialize, Serialize};

use crate::ai::td::check_value_network;
use crate::ai::{Activation, InputEncoding, Mlp};
use crate::game::GRID_SIZE;

pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Training progress recorded alongside a saved network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    pub epoch: usize,
    pub timestamp: u64,
    pub adversarial_rate: f64,
    pub testing_rate: f64,
    /// Single-sample network updates applied so far.
    pub training_steps: u64,
}

/// On-disk representation of one value network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub format_version: u32,
    pub grid_size: usize,
    /// Kept as a plain count so that an unsupported value is reported as a
    /// malformed model rather than a parse failure.
    pub input_per_cell: usize,
    pub activation: Activation,
    pub network: Mlp,
    #[serde(default)]
    pub metadata: CheckpointMetadata,
}

impl ModelFile {
    pub fn new(network: Mlp, encoding: InputEncoding, metadata: CheckpointMetadata) -> Self {
        ModelFile {
            format_version: MODEL_FORMAT_VERSION,
            grid_size: GRID_SIZE,
            input_per_cell: encoding.per_cell(),
            activation: network.activation(),
            network,
            metadata,
        }
    }

    /// Check the model against the board geometry and, when given, the
    /// encoding the caller intends to use. Returns the model's encoding.
    pub fn validate(&self, expected: Option<InputEncoding>) -> Result<InputEncoding, String> {
        if self.format_version == 0 || self.format_version > MODEL_FORMAT_VERSION {
            return Err(format!("unsupported format version {}", self.format_version));
        }
        if self.grid_size != GRID_SIZE {
            return Err(format!(
                "grid size {} does not match {GRID_SIZE}",
                self.grid_size
            ));
        }
        let encoding = InputEncoding::try_from(self.input_per_cell)?;
        if let Some(expected) = expected {
            if expected != encoding {
                return Err(format!(
                    "model uses {} inputs per cell, configuration expects {}",
                    encoding.per_cell(),
                    expected.per_cell()
                ));
            }
        }
        check_value_network(&self.network, encoding)?;
        if self.activation != self.network.activation() {
            return Err("activation does not match the network".to_string());
        }
        Ok(encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MlpConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn model(encoding: InputEncoding) -> ModelFile {
        let network = MlpConfig {
            layer_sizes: vec![encoding.input_size(), 5, 1],
            activation: Activation::Tanh,
            learning_rate: 0.02,
        }
        .init(&mut StdRng::seed_from_u64(0));
        ModelFile::new(network, encoding, CheckpointMetadata::default())
    }

    #[test]
    fn test_new_model_validates() {
        let m = model(InputEncoding::Occupancy);
        assert_eq!(m.input_per_cell, 2);
        assert_eq!(m.validate(None), Ok(InputEncoding::Occupancy));
        assert_eq!(
            m.validate(Some(InputEncoding::Occupancy)),
            Ok(InputEncoding::Occupancy)
        );
    }

    #[test]
    fn test_rejects_wrong_grid_size() {
        let mut m = model(InputEncoding::Signed);
        m.grid_size = 6;
        assert!(m.validate(None).unwrap_err().contains("grid size"));
    }

    #[test]
    fn test_rejects_unexpected_encoding() {
        let m = model(InputEncoding::Signed);
        assert!(m.validate(Some(InputEncoding::OccupancyWithEmpty)).is_err());
    }

    #[test]
    fn test_rejects_input_size_mismatch() {
        let mut m = model(InputEncoding::Signed);
        m.input_per_cell = 2;
        assert!(m.validate(None).unwrap_err().contains("input size"));
    }

    #[test]
    fn test_rejects_unsupported_input_per_cell() {
        let mut m = model(InputEncoding::Signed);
        m.input_per_cell = 4;
        assert!(m.validate(None).is_err());
    }

    #[test]
    fn test_metadata_defaults_when_missing() {
        let m = model(InputEncoding::Signed);
        let mut value = serde_json::to_value(&m).unwrap();
        value.as_object_mut().unwrap().remove("metadata");
        let parsed: ModelFile = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.metadata, CheckpointMetadata::default());
    }
}
