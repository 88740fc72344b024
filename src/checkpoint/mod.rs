//! Value-network persistence: one JSON model file per network, written
//! atomically and validated on load.

mod manager;
mod metadata;

pub use manager::{load_model, now_timestamp, write_model, CheckpointConfig, ModelStore};
pub use metadata::{CheckpointMetadata, ModelFile, MODEL_FORMAT_VERSION};
