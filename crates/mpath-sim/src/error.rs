//! Scenario error types

use mpath_core::ChannelError;
use thiserror::Error;

/// Result type for scenario operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors that can occur while setting up or running a scenario
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Scene rejected by the analysis engine
    #[error("invalid scene: {0}")]
    Channel(#[from] ChannelError),

    /// Duration or step unusable
    #[error("invalid scenario timing: {0}")]
    InvalidTiming(String),

    /// Requested time is outside the region where the receiver stays between the walls
    #[error("receiver leaves the scene at t = {boundary_s:.3} s (requested t = {time_s:.3} s)")]
    OutOfBounds { time_s: f64, boundary_s: f64 },
}
