//! Delay Spread & Coherence Bandwidth Estimator
//!
//! Delay spread is the arrival-time gap between the latest reflected path
//! and the direct path:
//!
//! ```text
//! T_d = max(dist_reflected) / c - r / c        (µs)
//! B_c = 1 / T_d                                (MHz)
//! ```
//!
//! With no wall active there is nothing to spread and no result is produced.
//! A zero delay spread leaves the coherence bandwidth undefined; that is
//! reported as a value, never as an infinity that could leak into further
//! arithmetic.

use crate::paths::{direct_path, reflected_paths, PathKind, PropagationPath};
use crate::types::{round_2dp, ChannelError, ChannelResult};
use serde::{Deserialize, Serialize};

/// Coherence bandwidth, or the lack of one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CoherenceBandwidth {
    Finite { mhz: f64 },
    Undefined,
}

impl CoherenceBandwidth {
    pub fn mhz(&self) -> Option<f64> {
        match self {
            CoherenceBandwidth::Finite { mhz } => Some(*mhz),
            CoherenceBandwidth::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, CoherenceBandwidth::Finite { .. })
    }
}

impl From<ChannelResult<f64>> for CoherenceBandwidth {
    fn from(result: ChannelResult<f64>) -> Self {
        match result {
            Ok(mhz) => CoherenceBandwidth::Finite { mhz },
            Err(_) => CoherenceBandwidth::Undefined,
        }
    }
}

impl std::fmt::Display for CoherenceBandwidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoherenceBandwidth::Finite { mhz } => write!(f, "{} MHz", round_2dp(*mhz)),
            CoherenceBandwidth::Undefined => write!(f, "undefined"),
        }
    }
}

/// Delay spread and the coherence bandwidth derived from it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelaySpread {
    /// Reflected path that arrives last
    pub latest_path: PathKind,
    /// T_d in µs
    pub delay_spread_us: f64,
    pub coherence_bandwidth: CoherenceBandwidth,
}

/// Coherence bandwidth in MHz for a delay spread in µs.
///
/// Fails with `DivisionUndefined` when the delay spread is zero or not a
/// finite positive number.
pub fn coherence_bandwidth_mhz(delay_spread_us: f64) -> ChannelResult<f64> {
    if delay_spread_us > 0.0 && delay_spread_us.is_finite() {
        Ok(1.0 / delay_spread_us)
    } else {
        Err(ChannelError::DivisionUndefined)
    }
}

/// Estimate delay spread over a resolved path set.
///
/// Returns `None` when only the direct path is present.
pub fn estimate_delay_spread(paths: &[PropagationPath]) -> Option<DelaySpread> {
    let direct = direct_path(paths)?;
    let latest = reflected_paths(paths).max_by(|a, b| a.delay_us().total_cmp(&b.delay_us()))?;

    let delay_spread_us = latest.delay_us() - direct.delay_us();
    let coherence_bandwidth = CoherenceBandwidth::from(coherence_bandwidth_mhz(delay_spread_us));
    if !coherence_bandwidth.is_defined() {
        tracing::debug!(delay_spread_us, "zero delay spread, coherence bandwidth undefined");
    }

    Some(DelaySpread {
        latest_path: latest.kind,
        delay_spread_us,
        coherence_bandwidth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SceneParameters;
    use crate::paths::resolve_paths;
    use approx::assert_relative_eq;

    fn spread_for(left: bool, right: bool) -> Option<DelaySpread> {
        let params = SceneParameters::builder().walls(left, right).build();
        estimate_delay_spread(&resolve_paths(&params).unwrap())
    }

    #[test]
    fn test_no_reflector_suppresses_result() {
        assert!(spread_for(false, false).is_none());
    }

    #[test]
    fn test_left_wall_only() {
        // (2d - r - r) / c = 20 / 300 µs
        let spread = spread_for(true, false).unwrap();
        assert_eq!(spread.latest_path, PathKind::LeftReflection);
        assert_relative_eq!(spread.delay_spread_us, 20.0 / 300.0, epsilon = 1e-12);
        assert_relative_eq!(spread.coherence_bandwidth.mhz().unwrap(), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_right_wall_uses_larger_distance() {
        let right_only = spread_for(false, true).unwrap();
        let both = spread_for(true, true).unwrap();

        // (4d - 3r - r) / c = 40 / 300 µs
        assert_relative_eq!(right_only.delay_spread_us, 40.0 / 300.0, epsilon = 1e-12);
        assert_eq!(both.latest_path, PathKind::RightReflection);
        assert_relative_eq!(both.delay_spread_us, right_only.delay_spread_us);
        assert_relative_eq!(both.coherence_bandwidth.mhz().unwrap(), 7.5, epsilon = 1e-9);
    }

    #[test]
    fn test_reciprocal_relationship() {
        for (d, r) in [(20.0, 10.0), (50.0, 3.0), (7.0, 6.5)] {
            let params = SceneParameters::builder()
                .wall_distance(d)
                .receiver_distance(r)
                .build();
            let spread = estimate_delay_spread(&resolve_paths(&params).unwrap()).unwrap();
            let bc = spread.coherence_bandwidth.mhz().unwrap();
            assert_relative_eq!(bc * spread.delay_spread_us, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_delay_spread_is_undefined() {
        assert_eq!(coherence_bandwidth_mhz(0.0), Err(ChannelError::DivisionUndefined));
        assert_eq!(coherence_bandwidth_mhz(f64::NAN), Err(ChannelError::DivisionUndefined));
        let bc = CoherenceBandwidth::from(coherence_bandwidth_mhz(0.0));
        assert_eq!(bc, CoherenceBandwidth::Undefined);
        assert_eq!(bc.mhz(), None);
        assert_eq!(bc.to_string(), "undefined");
    }

    #[test]
    fn test_display() {
        let bc = CoherenceBandwidth::Finite { mhz: 15.0 };
        assert_eq!(bc.to_string(), "15 MHz");
    }
}
