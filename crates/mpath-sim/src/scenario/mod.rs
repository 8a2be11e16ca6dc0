//! Receiver motion scenario engine
//!
//! Steps time, moves the receiver along its trajectory and evaluates the
//! channel at each instant.

pub mod config;
pub mod engine;
pub mod trajectory;

pub use config::ScenarioConfig;
pub use engine::{ChannelSnapshot, PathSnapshot, ScenarioEngine};
pub use trajectory::{ReceiverTrajectory, TrajectoryState};
