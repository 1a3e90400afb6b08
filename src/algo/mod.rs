pub mod q_learning;

pub use q_learning::{ApproximateQAgent, QAgent, QAgentConfig, QTableAgent};
