//! Scenario engine: time-stepped channel snapshots
//!
//! Evaluates every resolved path at successive instants: the path length
//! follows its time-dependent distance expression, each path contributes a
//! complex gain `a_p(t) * exp(-j 2π f d_p(t) / c)`, and the received field
//! is their superposition.

use super::config::ScenarioConfig;
use super::trajectory::ReceiverTrajectory;
use crate::error::{SimError, SimResult};
use mpath_core::types::propagation_delay_us;
use mpath_core::{
    direct_path, phase_multiple, reflection_phase_multiple, ChannelAnalysis, ChannelAnalyzer,
    PathKind, PhaseDifference, PropagationPath, SceneParameters, SPEED_OF_LIGHT_M_PER_US,
};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Transmit constant for the 1/distance amplitude model
const TX_AMPLITUDE: f64 = 1.0;

/// Upper bound on snapshots reserved up front by `run`
const PREALLOC_LIMIT: usize = 4096;

/// One path at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSnapshot {
    pub kind: PathKind,
    pub distance_m: f64,
    pub delay_us: f64,
    pub doppler_shift_hz: f64,
    /// Complex baseband gain of the path
    pub gain: Complex64,
    /// Phase against the direct path; `None` for the direct path itself
    pub phase: Option<PhaseDifference>,
}

/// Channel state at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSnapshot {
    pub time_s: f64,
    pub receiver_distance_m: f64,
    /// Direct path first, then reflections in resolver order
    pub paths: Vec<PathSnapshot>,
    /// Instantaneous delay spread in µs, `None` without reflections
    pub delay_spread_us: Option<f64>,
    /// |Σ gains|
    pub received_magnitude: f64,
}

impl ChannelSnapshot {
    pub fn direct(&self) -> Option<&PathSnapshot> {
        self.paths.iter().find(|p| p.kind == PathKind::Direct)
    }
}

/// Steps a receiver through a scene and snapshots the channel
#[derive(Debug, Clone)]
pub struct ScenarioEngine {
    params: SceneParameters,
    config: ScenarioConfig,
    analyzer: ChannelAnalyzer,
    trajectory: ReceiverTrajectory,
    paths: Vec<PropagationPath>,
}

impl ScenarioEngine {
    /// Validate the scene and timing and resolve the paths at t = 0
    pub fn new(params: SceneParameters, config: ScenarioConfig) -> SimResult<Self> {
        Self::with_analyzer(params, config, ChannelAnalyzer::default())
    }

    pub fn with_analyzer(
        params: SceneParameters,
        config: ScenarioConfig,
        analyzer: ChannelAnalyzer,
    ) -> SimResult<Self> {
        config.validate()?;
        let paths = mpath_core::resolve_paths(&params)?;
        let trajectory = ReceiverTrajectory::from_scene(&params);

        tracing::debug!(
            paths = paths.len(),
            duration_s = config.duration_s,
            step_s = config.step_s,
            velocity_mps = trajectory.velocity_mps,
            "scenario engine ready"
        );

        Ok(Self {
            params,
            config,
            analyzer,
            trajectory,
            paths,
        })
    }

    pub fn params(&self) -> &SceneParameters {
        &self.params
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn trajectory(&self) -> &ReceiverTrajectory {
        &self.trajectory
    }

    /// Full closed-form analysis at t = 0
    pub fn baseline(&self) -> SimResult<ChannelAnalysis> {
        Ok(self.analyzer.analyze(&self.params)?)
    }

    /// Channel snapshot at `t_s` seconds.
    ///
    /// Fails with `OutOfBounds` once the receiver has reached the
    /// transmitter or the wall.
    pub fn snapshot_at(&self, t_s: f64) -> SimResult<ChannelSnapshot> {
        if !(t_s >= 0.0 && t_s.is_finite()) {
            return Err(SimError::InvalidTiming(format!(
                "snapshot time must be non-negative, got {} s",
                t_s
            )));
        }
        if !self.trajectory.is_inside(t_s) {
            return Err(SimError::OutOfBounds {
                time_s: t_s,
                boundary_s: self.trajectory.time_to_boundary().unwrap_or(t_s),
            });
        }

        let f = self.params.carrier_frequency_mhz;
        let state = self.trajectory.state_at(t_s);
        let direct = direct_path(&self.paths);
        let direct_distance = direct
            .map(|p| p.distance_at(t_s))
            .unwrap_or(state.receiver_distance_m);
        let direct_rate = direct.map_or(state.velocity_mps, |p| p.distance.rate_mps);

        let paths: Vec<PathSnapshot> = self
            .paths
            .iter()
            .map(|path| {
                let distance_m = path.distance_at(t_s);
                let carrier_phase = -2.0 * PI * f * distance_m / SPEED_OF_LIGHT_M_PER_US;
                // closed form at t = 0 plus the drift of the path-length excess
                let phase = path.is_reflected().then(|| {
                    let drift_m = (path.distance.rate_mps - direct_rate) * t_s;
                    let multiple = reflection_phase_multiple(path.kind, &self.params)
                        + phase_multiple(f, drift_m, 0.0);
                    PhaseDifference::new(path.kind, multiple)
                });

                PathSnapshot {
                    kind: path.kind,
                    distance_m,
                    delay_us: propagation_delay_us(distance_m),
                    doppler_shift_hz: path.doppler_shift_hz(),
                    gain: Complex64::from_polar(path.amplitude(TX_AMPLITUDE, t_s), carrier_phase),
                    phase,
                }
            })
            .collect();

        let direct_delay = propagation_delay_us(direct_distance);
        let delay_spread_us = paths
            .iter()
            .filter(|p| p.phase.is_some())
            .map(|p| p.delay_us)
            .max_by(f64::total_cmp)
            .map(|latest| latest - direct_delay);

        let received_magnitude = paths.iter().map(|p| p.gain).sum::<Complex64>().norm();

        Ok(ChannelSnapshot {
            time_s: t_s,
            receiver_distance_m: state.receiver_distance_m,
            paths,
            delay_spread_us,
            received_magnitude,
        })
    }

    /// Snapshots at t = 0, step, ... up to the duration.
    ///
    /// Stops early when the receiver reaches a boundary.
    pub fn run(&self) -> Vec<ChannelSnapshot> {
        let steps = self.config.num_steps();
        let mut snapshots = Vec::with_capacity(self.expected_snapshots().min(PREALLOC_LIMIT));

        for i in 0..steps {
            let t = self.config.time_of(i);
            match self.snapshot_at(t) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => {
                    tracing::warn!(time_s = t, error = %e, "scenario stopped early");
                    break;
                }
            }
        }

        snapshots
    }

    /// Snapshots `run` will produce: the configured steps, cut short at
    /// the boundary for a moving receiver.
    pub fn expected_snapshots(&self) -> usize {
        let steps = self.config.num_steps();
        match self.trajectory.time_to_boundary() {
            Some(boundary_s) => {
                // last step strictly before the boundary
                let inside = ((boundary_s / self.config.step_s).ceil() as usize).max(1);
                inside.min(steps)
            }
            None => steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mpath_core::{Direction, InterferenceClass};

    fn moving_scene(velocity: f64, direction: Direction) -> SceneParameters {
        SceneParameters::builder()
            .wall_distance(20.0)
            .receiver_distance(10.0)
            .carrier_frequency_mhz(900.0)
            .velocity(velocity, direction)
            .build()
    }

    #[test]
    fn test_stationary_run() {
        let engine = ScenarioEngine::new(SceneParameters::default(), ScenarioConfig::default()).unwrap();
        let snapshots = engine.run();
        assert_eq!(snapshots.len(), 11);

        let first = &snapshots[0];
        let last = &snapshots[10];
        assert_relative_eq!(last.time_s, 1.0, epsilon = 1e-12);
        assert_eq!(first.receiver_distance_m, last.receiver_distance_m);
        for (a, b) in first.paths.iter().zip(&last.paths) {
            assert_eq!(a.distance_m, b.distance_m);
            assert_eq!(a.doppler_shift_hz, 0.0);
        }
    }

    #[test]
    fn test_snapshot_at_zero_matches_baseline() {
        let engine = ScenarioEngine::new(moving_scene(2.0, Direction::Receding), ScenarioConfig::default()).unwrap();
        let baseline = engine.baseline().unwrap();
        let snapshot = engine.snapshot_at(0.0).unwrap();

        assert_eq!(snapshot.paths.len(), baseline.paths.len());
        for (snap, path) in snapshot.paths.iter().zip(&baseline.paths) {
            assert_eq!(snap.kind, path.kind);
            assert_relative_eq!(snap.distance_m, path.base_distance_m);
            assert_relative_eq!(snap.delay_us, path.delay_us());
        }

        let phases: Vec<_> = snapshot.paths.iter().filter_map(|p| p.phase).collect();
        assert_eq!(phases.len(), baseline.phases.len());
        for (now, base) in phases.iter().zip(&baseline.phases) {
            assert_relative_eq!(now.multiple_of_pi, base.multiple_of_pi, epsilon = 1e-9);
            assert_eq!(now.class, InterferenceClass::Constructive);
        }

        let spread = baseline.delay_spread.unwrap();
        assert_relative_eq!(snapshot.delay_spread_us.unwrap(), spread.delay_spread_us, epsilon = 1e-12);
    }

    #[test]
    fn test_path_lengths_follow_motion() {
        let engine = ScenarioEngine::new(moving_scene(2.0, Direction::Receding), ScenarioConfig::default()).unwrap();
        let snapshot = engine.snapshot_at(0.5).unwrap();

        assert_relative_eq!(snapshot.receiver_distance_m, 11.0);
        let distances: Vec<f64> = snapshot.paths.iter().map(|p| p.distance_m).collect();
        // r + vt, 2d - r + vt, 4d - 3r - vt
        assert_relative_eq!(distances[0], 11.0);
        assert_relative_eq!(distances[1], 31.0);
        assert_relative_eq!(distances[2], 49.0);
        assert_relative_eq!(snapshot.delay_spread_us.unwrap(), 38.0 / 300.0, epsilon = 1e-12);
    }

    #[test]
    fn test_doppler_shifts_per_path() {
        let engine = ScenarioEngine::new(moving_scene(2.0, Direction::Receding), ScenarioConfig::default()).unwrap();
        let snapshot = engine.snapshot_at(0.0).unwrap();

        // f v / c = 900 * 2 / 300
        assert_relative_eq!(snapshot.paths[0].doppler_shift_hz, -6.0);
        assert_relative_eq!(snapshot.paths[2].doppler_shift_hz, 6.0);
    }

    #[test]
    fn test_received_magnitude_is_superposition() {
        let engine = ScenarioEngine::new(SceneParameters::default(), ScenarioConfig::default()).unwrap();
        let snapshot = engine.snapshot_at(0.0).unwrap();

        let sum: Complex64 = snapshot.paths.iter().map(|p| p.gain).sum();
        assert_relative_eq!(snapshot.received_magnitude, sum.norm());
        // whole-wavelength path lengths: 1/10 - 1/30 - 1/50
        assert_relative_eq!(snapshot.received_magnitude, 0.1 - 1.0 / 30.0 - 0.02, epsilon = 1e-9);

        for p in &snapshot.paths {
            assert_relative_eq!(p.gain.norm(), 1.0 / p.distance_m, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_direct_only_snapshot() {
        let params = SceneParameters::builder().walls(false, false).build();
        let engine = ScenarioEngine::new(params, ScenarioConfig::default()).unwrap();
        let snapshot = engine.snapshot_at(0.3).unwrap();

        assert_eq!(snapshot.paths.len(), 1);
        assert!(snapshot.direct().unwrap().phase.is_none());
        assert!(snapshot.delay_spread_us.is_none());
        assert_relative_eq!(snapshot.received_magnitude, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_run_stops_at_boundary() {
        // reaches the wall after (20 - 10) / 20 = 0.5 s
        let engine = ScenarioEngine::new(moving_scene(20.0, Direction::Receding), ScenarioConfig::default()).unwrap();
        let snapshots = engine.run();

        assert!(!snapshots.is_empty());
        assert!(snapshots.len() < 11);
        assert!(snapshots.iter().all(|s| s.receiver_distance_m < 20.0));

        match engine.snapshot_at(0.6) {
            Err(SimError::OutOfBounds { boundary_s, .. }) => assert_relative_eq!(boundary_s, 0.5),
            other => panic!("expected OutOfBounds, got {:?}", other),
        }
    }

    #[test]
    fn test_long_duration_stops_at_boundary() {
        let config = ScenarioConfig {
            duration_s: 1e12,
            step_s: 0.1,
        };
        let engine = ScenarioEngine::new(moving_scene(20.0, Direction::Receding), config).unwrap();
        assert!(engine.expected_snapshots() <= 6);

        let snapshots = engine.run();
        assert!(!snapshots.is_empty());
        assert!(snapshots.len() <= 6);
        assert!(snapshots.iter().all(|s| s.receiver_distance_m < 20.0));
    }

    #[test]
    fn test_expected_snapshots() {
        let engine = ScenarioEngine::new(SceneParameters::default(), ScenarioConfig::default()).unwrap();
        assert_eq!(engine.expected_snapshots(), 11);

        // boundary at 2 s, steps of 0.5 s: 0.0, 0.5, 1.0, 1.5
        let config = ScenarioConfig {
            duration_s: 3.0,
            step_s: 0.5,
        };
        let engine = ScenarioEngine::new(moving_scene(5.0, Direction::Approaching), config).unwrap();
        assert_eq!(engine.expected_snapshots(), 4);
        assert_eq!(engine.run().len(), 4);
    }

    #[test]
    fn test_decimal_geometry_phase_matches_baseline() {
        let params = SceneParameters::builder()
            .wall_distance(1.2)
            .receiver_distance(0.2)
            .carrier_frequency_mhz(900.0)
            .velocity(0.5, Direction::Receding)
            .build();
        let engine = ScenarioEngine::new(params, ScenarioConfig::default()).unwrap();
        let baseline = engine.baseline().unwrap();
        let snapshot = engine.snapshot_at(0.0).unwrap();

        let phases: Vec<_> = snapshot.paths.iter().filter_map(|p| p.phase).collect();
        assert_eq!(phases, baseline.phases);
        assert!(phases.iter().all(|p| p.class == InterferenceClass::Constructive));

        // left excess stays 2(d - r); right excess shrinks by 2vt
        let later = engine.snapshot_at(0.3).unwrap();
        let left = later.paths[1].phase.unwrap();
        assert_eq!(left.multiple_of_pi, 12.0);
        let right = later.paths[2].phase.unwrap();
        // 24 - 2 * 900 * (2 * 0.5 * 0.3) / 300
        assert_relative_eq!(right.multiple_of_pi, 22.2, epsilon = 1e-9);
    }

    #[test]
    fn test_approaching_boundary() {
        // reaches the transmitter after 10 / 5 = 2 s
        let config = ScenarioConfig {
            duration_s: 3.0,
            step_s: 0.5,
        };
        let engine = ScenarioEngine::new(moving_scene(5.0, Direction::Approaching), config).unwrap();
        let snapshots = engine.run();

        assert_eq!(snapshots.len(), 4);
        assert_relative_eq!(snapshots[3].receiver_distance_m, 2.5);
    }

    #[test]
    fn test_rejects_invalid_setup() {
        let bad_scene = SceneParameters::builder().receiver_distance(25.0).build();
        assert!(matches!(
            ScenarioEngine::new(bad_scene, ScenarioConfig::default()),
            Err(SimError::Channel(_))
        ));

        let bad_timing = ScenarioConfig {
            duration_s: 1.0,
            step_s: 0.0,
        };
        assert!(matches!(
            ScenarioEngine::new(SceneParameters::default(), bad_timing),
            Err(SimError::InvalidTiming(_))
        ));

        let engine = ScenarioEngine::new(SceneParameters::default(), ScenarioConfig::default()).unwrap();
        assert!(engine.snapshot_at(-1.0).is_err());
    }
}
