//! Scenario configuration
//!
//! Defines how long a motion scenario runs and how often it is sampled.

use crate::error::{SimError, SimResult};
use mpath_core::ScenarioTiming;
use serde::{Deserialize, Serialize};

/// Configuration for the scenario engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Scenario duration in seconds
    pub duration_s: f64,
    /// Time between snapshots in seconds
    pub step_s: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            duration_s: 1.0,
            step_s: 0.1,
        }
    }
}

impl From<ScenarioTiming> for ScenarioConfig {
    fn from(timing: ScenarioTiming) -> Self {
        Self {
            duration_s: timing.duration_s,
            step_s: timing.step_s,
        }
    }
}

impl ScenarioConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.duration_s > 0.0 && self.duration_s.is_finite()) {
            return Err(SimError::InvalidTiming(format!(
                "duration must be positive, got {} s",
                self.duration_s
            )));
        }
        if !(self.step_s > 0.0 && self.step_s.is_finite()) {
            return Err(SimError::InvalidTiming(format!(
                "step must be positive, got {} s",
                self.step_s
            )));
        }
        Ok(())
    }

    /// Number of snapshots from t = 0 to the last step not past the duration
    pub fn num_steps(&self) -> usize {
        // tolerance keeps the endpoint when step divides duration exactly;
        // the float-to-int cast saturates for absurd ratios
        let whole_steps = (self.duration_s / self.step_s + 1e-9).floor() as usize;
        whole_steps.saturating_add(1)
    }

    /// Time of snapshot `i` in seconds
    #[inline]
    pub fn time_of(&self, i: usize) -> f64 {
        i as f64 * self.step_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ScenarioConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.num_steps(), 11);
    }

    #[test]
    fn test_partial_last_step() {
        let cfg = ScenarioConfig {
            duration_s: 1.0,
            step_s: 0.3,
        };
        // 0.0, 0.3, 0.6, 0.9
        assert_eq!(cfg.num_steps(), 4);
    }

    #[test]
    fn test_invalid_timing() {
        let cfg = ScenarioConfig {
            duration_s: 0.0,
            step_s: 0.1,
        };
        assert!(matches!(cfg.validate(), Err(SimError::InvalidTiming(_))));

        let cfg = ScenarioConfig {
            duration_s: 1.0,
            step_s: f64::NAN,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_step_count_saturates() {
        let cfg = ScenarioConfig {
            duration_s: 1e300,
            step_s: 1e-300,
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.num_steps(), usize::MAX);
    }

    #[test]
    fn test_from_timing() {
        let cfg = ScenarioConfig::from(ScenarioTiming {
            duration_s: 3.0,
            step_s: 0.5,
        });
        assert_eq!(cfg.num_steps(), 7);
    }
}
