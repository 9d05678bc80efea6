use std::io;

use thiserror::Error;

/// Errors raised while training, evaluating or persisting an agent
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode or decode checkpoint: {0}")]
    Checkpoint(#[from] bincode::Error),

    #[error("failed to parse config: {0}")]
    Config(#[from] serde_yaml::Error),

    /// A loaded action-value table does not match the configured discretization
    #[error("action table shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid bins: {0}")]
    InvalidBins(String),

    #[error("invalid decay: {0}")]
    InvalidDecay(String),

    #[error("environment error: {0}")]
    Environment(String),

    #[error("failed to draw plot: {0}")]
    Plot(String),

    /// The user aborted the run from the renderer
    #[error("interrupted by user")]
    Interrupted,

    #[error("rendering requires the `viz` feature")]
    RenderUnavailable,
}

pub type Result<T> = std::result::Result<T, Error>;
