//! Doppler Spread Calculator
//!
//! In this model the direct path and the left-wall reflection always change
//! length at the same rate, so they share one Doppler shift. The right-wall
//! reflection changes length the opposite way. The spread between the most
//! and least shifted paths is therefore either zero or `2 f |v| / c`:
//!
//! ```text
//! velocity   right wall   spread
//! --------   ----------   ----------
//! 0          any          0
//! != 0       inactive     0
//! != 0       active       2 f |v| / c
//! ```
//!
//! Direction of motion only flips the sign of the individual shifts, never
//! the size of the spread.

use crate::paths::{PathKind, PropagationPath};
use crate::params::SceneParameters;
use crate::types::SPEED_OF_LIGHT_M_PER_US;
use serde::{Deserialize, Serialize};

/// Which Doppler formula applies to a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DopplerRegime {
    /// Receiver at rest
    Stationary,
    /// Receiver moving, every active path shifts the same way
    CommonShift,
    /// Receiver moving with the right-wall path shifting against the direct path
    OpposingShift,
}

impl DopplerRegime {
    /// Regime for a motion state and right-wall presence
    pub fn select(moving: bool, right_wall_active: bool) -> Self {
        match (moving, right_wall_active) {
            (false, _) => DopplerRegime::Stationary,
            (true, false) => DopplerRegime::CommonShift,
            (true, true) => DopplerRegime::OpposingShift,
        }
    }

    /// Regime for a scene
    pub fn for_scene(params: &SceneParameters) -> Self {
        Self::select(params.is_moving(), params.right_wall_active)
    }

    /// Doppler spread in Hz under this regime
    pub fn spread_hz(self, carrier_frequency_mhz: f64, speed_mps: f64) -> f64 {
        match self {
            DopplerRegime::Stationary | DopplerRegime::CommonShift => 0.0,
            DopplerRegime::OpposingShift => {
                2.0 * carrier_frequency_mhz * speed_mps / SPEED_OF_LIGHT_M_PER_US
            }
        }
    }
}

/// Doppler spread in Hz for a scene
pub fn doppler_spread_hz(params: &SceneParameters) -> f64 {
    DopplerRegime::for_scene(params).spread_hz(params.carrier_frequency_mhz, params.speed_mps())
}

/// Per-path Doppler shift in Hz, in resolver order
pub fn path_shifts_hz(paths: &[PropagationPath]) -> Vec<(PathKind, f64)> {
    paths.iter().map(|p| (p.kind, p.doppler_shift_hz())).collect()
}

/// Spread measured directly from the per-path shifts (max - min)
pub fn measured_spread_hz(paths: &[PropagationPath]) -> f64 {
    let (min, max) = paths
        .iter()
        .map(PropagationPath::doppler_shift_hz)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s), hi.max(s)));
    if paths.is_empty() {
        0.0
    } else {
        max - min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::resolve_paths;
    use crate::types::Direction;
    use approx::assert_relative_eq;

    const WALLS: [(bool, bool); 4] = [(false, false), (true, false), (false, true), (true, true)];

    #[test]
    fn test_stationary_is_zero_for_every_configuration() {
        for (left, right) in WALLS {
            let params = SceneParameters::builder().walls(left, right).stationary().build();
            assert_eq!(doppler_spread_hz(&params), 0.0);
            assert_eq!(DopplerRegime::for_scene(&params), DopplerRegime::Stationary);
        }
    }

    #[test]
    fn test_no_right_wall_is_zero_for_every_velocity() {
        for v in [-30.0, -1.0, 0.5, 15.0, 120.0] {
            for left in [false, true] {
                let params = SceneParameters::builder()
                    .walls(left, false)
                    .velocity(v, Direction::Receding)
                    .build();
                assert_eq!(doppler_spread_hz(&params), 0.0);
            }
        }
    }

    #[test]
    fn test_right_wall_spread() {
        for direction in [Direction::Approaching, Direction::Receding] {
            let params = SceneParameters::builder()
                .velocity(15.0, direction)
                .walls(false, true)
                .build();
            // 2 * 900 * 15 / 300
            assert_relative_eq!(doppler_spread_hz(&params), 90.0);
        }
    }

    #[test]
    fn test_regime_matches_measured_shifts() {
        for (left, right) in WALLS {
            for v in [0.0, 7.5, -20.0] {
                for direction in [Direction::Approaching, Direction::Receding] {
                    let params = SceneParameters::builder()
                        .walls(left, right)
                        .velocity(v, direction)
                        .build();
                    let paths = resolve_paths(&params).unwrap();
                    assert_relative_eq!(
                        doppler_spread_hz(&params),
                        measured_spread_hz(&paths),
                        epsilon = 1e-9
                    );
                }
            }
        }
    }

    #[test]
    fn test_path_shifts_order() {
        let params = SceneParameters::builder()
            .velocity(30.0, Direction::Approaching)
            .build();
        let paths = resolve_paths(&params).unwrap();
        let shifts = path_shifts_hz(&paths);
        assert_eq!(shifts.len(), 3);
        assert_eq!(shifts[0].0, PathKind::Direct);
        // approaching: direct shortens, frequency rises by f v / c = 90 Hz
        assert_relative_eq!(shifts[0].1, 90.0);
        assert_relative_eq!(shifts[2].1, -90.0);
    }
}
