//! # Receiver Motion Scenarios
//!
//! Moves the receiver along the transmitter axis and evaluates the channel
//! at regular instants. Each snapshot carries the time-dependent path
//! lengths, per-path Doppler shifts, complex path gains and the resulting
//! received field, so a presentation layer can animate fading as the
//! receiver walks through the interference pattern.
//!
//! ```rust
//! use mpath_core::{Direction, SceneParameters};
//! use mpath_sim::scenario::{ScenarioConfig, ScenarioEngine};
//!
//! let params = SceneParameters::builder()
//!     .velocity(2.0, Direction::Receding)
//!     .build();
//! let engine = ScenarioEngine::new(params, ScenarioConfig::default()).unwrap();
//! let snapshots = engine.run();
//! assert_eq!(snapshots.len(), 11);
//! ```

pub mod error;
pub mod scenario;

pub use error::{SimError, SimResult};
pub use scenario::{ChannelSnapshot, PathSnapshot, ReceiverTrajectory, ScenarioConfig, ScenarioEngine};
