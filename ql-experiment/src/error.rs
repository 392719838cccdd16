use thiserror::Error;

/// Failures raised by the experiment driver itself.
///
/// Errors coming from an [Environment](crate::prelude::Environment) or an [Agent](crate::prelude::Agent)
/// are passed through unchanged as [anyhow::Error].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExperimentError {
    /// Invalid construction parameter, e.g. an unknown resize method
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The driver was used out of order, e.g. an observation was requested before the frame buffer was primed
    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("agent chose action index {index}, but only {legal} legal actions exist")]
    IllegalActionIndex { index: usize, legal: usize },

    #[error("environment delivered a screen of {actual} bytes, expected {expected}")]
    ScreenSize { expected: usize, actual: usize },
}

impl ExperimentError {
    pub fn configuration(msg: impl Into<String>) -> Self { ExperimentError::Configuration(msg.into()) }

    pub fn precondition(msg: impl Into<String>) -> Self { ExperimentError::Precondition(msg.into()) }
}
