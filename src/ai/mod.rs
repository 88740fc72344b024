mod agent;
pub mod heuristic;
pub mod minimax;
pub mod mlp;
mod random;
pub mod search;
pub mod state_encoding;
pub mod symmetry;
pub mod td;

pub use agent::Agent;
pub use heuristic::{BinkleyHeuristic, Heuristic, HeuristicKind, SimpleHeuristic};
pub use minimax::{MinimaxAgent, MinimaxConfig};
pub use mlp::{Activation, Mlp, MlpConfig};
pub use random::RandomAgent;
pub use search::{alpha_beta, minimax, SearchResult, Searchable};
pub use state_encoding::{extract_input, InputEncoding};
pub use symmetry::Symmetry;
pub use td::{TdAgent, TdConfig};
