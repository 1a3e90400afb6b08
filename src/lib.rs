//! Q-learning agents for grid worlds: exact (tabular) values or linear function approximation
//! over hand-crafted features, with epsilon-greedy action selection.

/// Agent lifecycle contract and episode bookkeeping
pub mod agent;

/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Data structures
pub mod ds;

/// Environment contracts
pub mod env;

pub mod error;

/// Transitions
pub mod exp;

/// Exploration policies
pub mod exploration;

/// Feature extractors
pub mod features;

/// Grid geometry and grid-world snapshots
pub mod grid;

/// Value stores
pub mod value;

mod util;

pub use error::{Error, Result};
