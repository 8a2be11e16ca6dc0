//! # Multipath Channel Analysis Engine
//!
//! Closed-form analysis of a teaching scene with one transmitter, one
//! receiver on a line, and up to two reflecting walls. From a
//! [`SceneParameters`] snapshot the engine derives:
//!
//! - **Propagation paths**: direct, left-wall and right-wall reflections
//! - **Phase difference**: each reflection against the direct path, as a
//!   multiple of π, with a constructive/destructive class
//! - **Doppler spread**: frequency spread caused by receiver motion
//! - **Delay spread** and **coherence bandwidth**
//! - **Waveform samples** for the "signals at receiver" chart
//!
//! Everything is a pure function of the scene; there is no state between
//! calls and no I/O.
//!
//! ## Example
//!
//! ```rust
//! use mpath_core::{analyze, Direction, InterferenceClass, SceneParameters};
//!
//! let params = SceneParameters::builder()
//!     .wall_distance(20.0)
//!     .receiver_distance(10.0)
//!     .carrier_frequency_mhz(900.0)
//!     .velocity(15.0, Direction::Approaching)
//!     .build();
//!
//! let analysis = analyze(&params).unwrap();
//! assert_eq!(analysis.phases[0].class, InterferenceClass::Constructive);
//! assert_eq!(analysis.doppler_spread_hz, 90.0);
//! ```

pub mod analysis;
pub mod cases;
pub mod config;
pub mod delay_spread;
pub mod doppler;
pub mod logging;
pub mod params;
pub mod paths;
pub mod phase;
pub mod types;
pub mod waveform;

pub use analysis::{analyze, ChannelAnalysis, ChannelAnalyzer};
pub use cases::{case_table, CaseKey, ChannelCase, DelaySpreadRule};
pub use config::{ConfigError, MpathConfig, ScenarioTiming};
pub use delay_spread::{coherence_bandwidth_mhz, estimate_delay_spread, CoherenceBandwidth, DelaySpread};
pub use doppler::{doppler_spread_hz, DopplerRegime};
pub use params::{MotionClass, SceneParameters, SceneParametersBuilder};
pub use paths::{direct_path, resolve_paths, DistanceExpr, PathKind, PropagationPath};
pub use phase::{
    analyze_phases, phase_multiple, reflection_phase_multiple, InterferenceClass, PhaseDifference,
};
pub use types::{ChannelError, ChannelResult, Direction, SPEED_OF_LIGHT_M_PER_US};
pub use waveform::{generate_samples, WaveformConfig, WaveformSample, WaveformSamples, MIN_STEP_RAD};

/// Prelude for common imports
pub mod prelude {
    pub use crate::analysis::{analyze, ChannelAnalysis, ChannelAnalyzer};
    pub use crate::params::SceneParameters;
    pub use crate::paths::{PathKind, PropagationPath};
    pub use crate::phase::InterferenceClass;
    pub use crate::types::{ChannelError, ChannelResult, Direction};
}
