//! Error types for the crate

use thiserror::Error;

/// Errors surfaced by agents, value stores and environment helpers
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("illegal action {action} in state {state}")]
    IllegalAction { state: String, action: String },

    #[error("invalid probability {0} (must be in the interval [0, 1])")]
    InvalidProbability(f64),

    #[error("invalid decay parameters: {0}")]
    InvalidDecay(String),

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("transition model for action {action} in state {state} is not a distribution")]
    InvalidTransitionModel { state: String, action: String },
}

impl Error {
    pub(crate) fn illegal_action(state: &impl std::fmt::Debug, action: &impl std::fmt::Debug) -> Self {
        Self::IllegalAction {
            state: format!("{state:?}"),
            action: format!("{action:?}"),
        }
    }
}

/// Convenience type alias for results using the crate's [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
