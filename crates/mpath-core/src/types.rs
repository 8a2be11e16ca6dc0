//! Core types and constants for multipath channel analysis
//!
//! ## Unit System
//!
//! Every quantity in this crate uses one consistent set of units so that a
//! single propagation constant serves every formula:
//!
//! | Quantity          | Unit  |
//! |-------------------|-------|
//! | Distance          | m     |
//! | Carrier frequency | MHz   |
//! | Time / delay      | µs    |
//! | Velocity          | m/s   |
//! | Doppler shift     | Hz    |
//! | Bandwidth         | MHz   |
//!
//! With `c` in m/µs, `f·Δd/c` is dimensionless (cycles), `d/c` is in µs and
//! `f·v/c` comes out in Hz (MHz·µs cancels, leaving 1/s).
//!
//! ```text
//!   Left wall        Transmitter          Receiver          Right wall
//!      |                 T ------- r -------> R                  |
//!      |<------- d ----->|                                       |
//! ```

use serde::{Deserialize, Serialize};

/// Propagation speed in m/µs.
///
/// Pedagogical approximation of the speed of light (299.792458 m/µs).
pub const SPEED_OF_LIGHT_M_PER_US: f64 = 300.0;

/// Result type for channel analysis operations
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Errors that can occur during channel analysis
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChannelError {
    #[error("Invalid geometry: receiver distance r = {r} m must satisfy 0 < r < d (d = {d} m)")]
    InvalidGeometry { d: f64, r: f64 },

    #[error("Invalid carrier frequency: {0} MHz. Must be finite and positive")]
    InvalidFrequency(f64),

    #[error("Invalid velocity: {0} m/s. Must be finite")]
    InvalidVelocity(f64),

    #[error("Coherence bandwidth undefined: delay spread is zero")]
    DivisionUndefined,
}

/// Direction of receiver motion along the transmitter-receiver axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Receiver moves towards the transmitter (r shrinks)
    Approaching,
    /// Receiver moves away from the transmitter (r grows)
    Receding,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Receding
    }
}

impl Direction {
    /// Sign of dr/dt for this direction
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Approaching => -1.0,
            Direction::Receding => 1.0,
        }
    }

    /// The opposite direction
    pub fn reversed(self) -> Self {
        match self {
            Direction::Approaching => Direction::Receding,
            Direction::Receding => Direction::Approaching,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Approaching => write!(f, "approaching"),
            Direction::Receding => write!(f, "receding"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "approaching" | "left" => Ok(Direction::Approaching),
            "receding" | "right" => Ok(Direction::Receding),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// Propagation delay in µs for a path of `distance_m` metres
#[inline]
pub fn propagation_delay_us(distance_m: f64) -> f64 {
    distance_m / SPEED_OF_LIGHT_M_PER_US
}

/// Round to two decimal places for display
#[inline]
pub fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
