//! Scene parameters
//!
//! A `SceneParameters` value is one snapshot of everything the surrounding
//! application lets the user edit: wall distance, receiver distance, carrier
//! frequency, receiver motion and which walls are present. The engine only
//! ever reads it; every edit produces a new value and a fresh analysis.
//!
//! ## Example
//!
//! ```rust
//! use mpath_core::{Direction, SceneParameters};
//!
//! let params = SceneParameters::builder()
//!     .wall_distance(20.0)
//!     .receiver_distance(10.0)
//!     .carrier_frequency_mhz(900.0)
//!     .velocity(15.0, Direction::Approaching)
//!     .left_wall(false)
//!     .build();
//!
//! assert!(params.validate().is_ok());
//! assert!(params.is_moving());
//! ```

use crate::types::{ChannelError, ChannelResult, Direction};
use serde::{Deserialize, Serialize};

/// Motion class of the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionClass {
    /// velocity == 0
    Stationary,
    /// velocity != 0
    Moving,
}

impl MotionClass {
    /// Classify a velocity in m/s
    pub fn of(velocity_mps: f64) -> Self {
        if velocity_mps == 0.0 {
            MotionClass::Stationary
        } else {
            MotionClass::Moving
        }
    }
}

/// Geometry, motion and carrier inputs for one analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneParameters {
    /// Distance `d` from transmitter to each wall in metres
    pub wall_distance_m: f64,
    /// Baseline transmitter-receiver distance `r` in metres
    pub receiver_distance_m: f64,
    /// Carrier frequency `f` in MHz
    pub carrier_frequency_mhz: f64,
    /// Receiver speed in m/s (0 = stationary). Only the magnitude is used.
    pub velocity_mps: f64,
    /// Sense of motion, meaningful only when velocity != 0
    pub direction: Direction,
    /// Left wall present
    pub left_wall_active: bool,
    /// Right wall present
    pub right_wall_active: bool,
}

impl Default for SceneParameters {
    fn default() -> Self {
        Self {
            wall_distance_m: 20.0,
            receiver_distance_m: 10.0,
            carrier_frequency_mhz: 900.0,
            velocity_mps: 0.0,
            direction: Direction::Receding,
            left_wall_active: true,
            right_wall_active: true,
        }
    }
}

impl SceneParameters {
    /// Create a builder starting from the default scene
    pub fn builder() -> SceneParametersBuilder {
        SceneParametersBuilder::default()
    }

    /// Check the scene invariants.
    ///
    /// Geometry must satisfy `0 < r < d`, the carrier must be finite and
    /// positive and the velocity finite. Values are never clamped.
    pub fn validate(&self) -> ChannelResult<()> {
        let d = self.wall_distance_m;
        let r = self.receiver_distance_m;
        // NaN fails both comparisons and lands here too
        if !(r > 0.0 && d > r) || !d.is_finite() {
            return Err(ChannelError::InvalidGeometry { d, r });
        }
        let f = self.carrier_frequency_mhz;
        if !(f > 0.0 && f.is_finite()) {
            return Err(ChannelError::InvalidFrequency(f));
        }
        if !self.velocity_mps.is_finite() {
            return Err(ChannelError::InvalidVelocity(self.velocity_mps));
        }
        Ok(())
    }

    /// Receiver speed magnitude in m/s
    #[inline]
    pub fn speed_mps(&self) -> f64 {
        self.velocity_mps.abs()
    }

    /// Stationary or moving
    pub fn motion(&self) -> MotionClass {
        MotionClass::of(self.velocity_mps)
    }

    pub fn is_moving(&self) -> bool {
        self.motion() == MotionClass::Moving
    }

    /// Number of active reflectors (0, 1 or 2)
    pub fn reflector_count(&self) -> usize {
        usize::from(self.left_wall_active) + usize::from(self.right_wall_active)
    }

    /// Same scene with the receiver moved to `receiver_distance_m`
    pub fn with_receiver_distance(mut self, receiver_distance_m: f64) -> Self {
        self.receiver_distance_m = receiver_distance_m;
        self
    }
}

/// Builder for SceneParameters
#[derive(Debug, Clone, Default)]
pub struct SceneParametersBuilder {
    params: SceneParameters,
}

impl SceneParametersBuilder {
    pub fn wall_distance(mut self, d_m: f64) -> Self {
        self.params.wall_distance_m = d_m;
        self
    }

    pub fn receiver_distance(mut self, r_m: f64) -> Self {
        self.params.receiver_distance_m = r_m;
        self
    }

    pub fn carrier_frequency_mhz(mut self, f_mhz: f64) -> Self {
        self.params.carrier_frequency_mhz = f_mhz;
        self
    }

    pub fn velocity(mut self, velocity_mps: f64, direction: Direction) -> Self {
        self.params.velocity_mps = velocity_mps;
        self.params.direction = direction;
        self
    }

    pub fn stationary(mut self) -> Self {
        self.params.velocity_mps = 0.0;
        self
    }

    pub fn left_wall(mut self, active: bool) -> Self {
        self.params.left_wall_active = active;
        self
    }

    pub fn right_wall(mut self, active: bool) -> Self {
        self.params.right_wall_active = active;
        self
    }

    pub fn walls(self, left: bool, right: bool) -> Self {
        self.left_wall(left).right_wall(right)
    }

    pub fn build(self) -> SceneParameters {
        self.params
    }
}
