//! Training infrastructure: game driver, two-network TD trainer with periodic
//! validation, and match metrics.

pub mod game;
pub mod metrics;
pub mod trainer;
