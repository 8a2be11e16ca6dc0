//! Receiver trajectory
//!
//! The receiver moves at constant speed along the transmitter axis:
//!
//! ```text
//! r(t) = r0 + σ |v| t        σ = +1 receding, -1 approaching
//! ```
//!
//! The motion is only meaningful while the receiver stays strictly between
//! the transmitter and the wall, i.e. `0 < r(t) < d`.

use mpath_core::SceneParameters;
use serde::{Deserialize, Serialize};

/// State of the receiver at a given time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryState {
    pub time_s: f64,
    /// Transmitter-receiver distance in metres
    pub receiver_distance_m: f64,
    /// Signed dr/dt in m/s
    pub velocity_mps: f64,
}

/// Constant-velocity receiver motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReceiverTrajectory {
    /// r at t = 0 in metres
    pub start_m: f64,
    /// Signed dr/dt in m/s
    pub velocity_mps: f64,
    /// Wall distance d in metres
    pub wall_distance_m: f64,
}

impl ReceiverTrajectory {
    pub fn from_scene(params: &SceneParameters) -> Self {
        Self {
            start_m: params.receiver_distance_m,
            velocity_mps: params.direction.sign() * params.speed_mps(),
            wall_distance_m: params.wall_distance_m,
        }
    }

    /// Receiver state at time `t_s`
    pub fn state_at(&self, t_s: f64) -> TrajectoryState {
        TrajectoryState {
            time_s: t_s,
            receiver_distance_m: self.start_m + self.velocity_mps * t_s,
            velocity_mps: self.velocity_mps,
        }
    }

    /// Time until the receiver reaches the transmitter or the wall.
    ///
    /// `None` for a stationary receiver.
    pub fn time_to_boundary(&self) -> Option<f64> {
        if self.velocity_mps > 0.0 {
            Some((self.wall_distance_m - self.start_m) / self.velocity_mps)
        } else if self.velocity_mps < 0.0 {
            Some(self.start_m / -self.velocity_mps)
        } else {
            None
        }
    }

    /// Whether the receiver is strictly inside the scene at `t_s`
    pub fn is_inside(&self, t_s: f64) -> bool {
        let r = self.state_at(t_s).receiver_distance_m;
        r > 0.0 && r < self.wall_distance_m
    }
}
