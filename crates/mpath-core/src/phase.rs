//! Phase & Interference Analyzer
//!
//! For a reflected path of length `dist`, the carrier phase lags the direct
//! path (length `r`) by
//!
//! ```text
//! Δθ = 2π f (dist - r) / c
//! ```
//!
//! which gives `4π f (d - r) / c` for the left wall (`2d - r`) and
//! `8π f (d - r) / c` for the right wall (`4d - 3r`). Phase is reported as a
//! multiple of π. An even multiple lines the reflection up with the direct
//! signal (constructive), anything else is treated as destructive.
//!
//! Classification always uses the exact multiple. Only the display value is
//! rounded, so a multiple such as 119.996 stays destructive even though it
//! displays as 120.00.

use crate::paths::{reflected_paths, PathKind, PropagationPath};
use crate::params::SceneParameters;
use crate::types::{round_2dp, SPEED_OF_LIGHT_M_PER_US};
use serde::{Deserialize, Serialize};

/// Interference between a reflected path and the direct path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterferenceClass {
    Constructive,
    Destructive,
}

impl InterferenceClass {
    /// Classify an unrounded phase multiple of π.
    pub fn classify(multiple_of_pi: f64) -> Self {
        if multiple_of_pi.rem_euclid(2.0) == 0.0 {
            InterferenceClass::Constructive
        } else {
            InterferenceClass::Destructive
        }
    }

    pub fn is_constructive(self) -> bool {
        self == InterferenceClass::Constructive
    }
}

impl std::fmt::Display for InterferenceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterferenceClass::Constructive => write!(f, "Constructive Interference"),
            InterferenceClass::Destructive => write!(f, "Destructive Interference"),
        }
    }
}

/// Phase difference of one reflected path against the direct path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseDifference {
    pub path: PathKind,
    /// Δθ / π, unrounded
    pub multiple_of_pi: f64,
    pub class: InterferenceClass,
}

impl PhaseDifference {
    pub fn new(path: PathKind, multiple_of_pi: f64) -> Self {
        Self {
            path,
            multiple_of_pi,
            class: InterferenceClass::classify(multiple_of_pi),
        }
    }

    /// Δθ in radians
    pub fn radians(&self) -> f64 {
        self.multiple_of_pi * std::f64::consts::PI
    }

    /// Δθ / π rounded to two decimals, for display only
    pub fn display_multiple(&self) -> f64 {
        round_2dp(self.multiple_of_pi)
    }
}

/// Δθ / π for a path of `distance_m` against a direct path of
/// `receiver_distance_m` at `carrier_frequency_mhz`.
#[inline]
pub fn phase_multiple(carrier_frequency_mhz: f64, distance_m: f64, receiver_distance_m: f64) -> f64 {
    2.0 * carrier_frequency_mhz * (distance_m - receiver_distance_m) / SPEED_OF_LIGHT_M_PER_US
}

/// Δθ / π of a wall reflection in closed form: `k f (d - r) / c` with
/// `k = 4` for the left wall and `k = 8` for the right wall.
///
/// Works from `d - r` directly. Going through the path lengths first
/// (`2d - r`, `4d - 3r`) adds rounding error that can move an even
/// multiple off the integer and flip its class.
pub fn reflection_phase_multiple(kind: PathKind, params: &SceneParameters) -> f64 {
    let excess = params.wall_distance_m - params.receiver_distance_m;
    kind.phase_factor() * params.carrier_frequency_mhz * excess / SPEED_OF_LIGHT_M_PER_US
}

/// Phase difference and interference class for every reflected path.
///
/// Returns an empty vector when no wall is active.
pub fn analyze_phases(params: &SceneParameters, paths: &[PropagationPath]) -> Vec<PhaseDifference> {
    reflected_paths(paths)
        .map(|path| PhaseDifference::new(path.kind, reflection_phase_multiple(path.kind, params)))
        .collect()
}

/// Class that drives the illustrative waveform: the first reflected path
/// in resolver order (left wall before right wall).
pub fn dominant_class(phases: &[PhaseDifference]) -> Option<InterferenceClass> {
    phases.first().map(|p| p.class)
}
