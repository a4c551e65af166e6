use thiserror::Error;

/// Result type for simulation operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors that can occur while configuring or running a simulation
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration failed validation or could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// More unique coordinates were requested than the square holds
    #[error("Cannot draw {requested} unique samples from a square of {available} cells")]
    SampleCapacity { requested: usize, available: usize },

    /// Coordinate lies outside the coded square
    #[error("Coordinate ({row}, {col}) is outside the {side}x{side} square")]
    CoordinateOutOfRange { row: usize, col: usize, side: usize },

    /// Reading a configuration file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
