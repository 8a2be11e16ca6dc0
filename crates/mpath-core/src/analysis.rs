//! Channel analysis engine
//!
//! Ties the components together. One call to [`ChannelAnalyzer::analyze`]
//! takes a scene snapshot through every stage:
//!
//! ```text
//!                      ┌──────────────────────┐
//!   SceneParameters ──▶│ Path Resolver        │
//!                      └──────────┬───────────┘
//!                                 │ paths
//!          ┌──────────────────────┼───────────────────────┐
//!          ▼                      ▼                       ▼
//!   ┌─────────────┐      ┌────────────────┐      ┌─────────────────┐
//!   │ Phase       │      │ Doppler        │      │ Delay spread /  │
//!   │ analyzer    │      │ spread         │      │ coherence BW    │
//!   └──────┬──────┘      └────────────────┘      └─────────────────┘
//!          │ interference class
//!          ▼
//!   ┌─────────────┐
//!   │ Waveform    │
//!   │ generator   │
//!   └─────────────┘
//! ```
//!
//! The analyzer holds only generator settings; it keeps no state between
//! calls and every result is recomputed from the scene.

use crate::cases::ChannelCase;
use crate::delay_spread::{estimate_delay_spread, DelaySpread};
use crate::doppler::doppler_spread_hz;
use crate::params::SceneParameters;
use crate::paths::{resolve_paths, PropagationPath};
use crate::phase::{analyze_phases, dominant_class, PhaseDifference};
use crate::types::ChannelResult;
use crate::waveform::{reflected_trace_label, WaveformConfig, WaveformSample, WaveformSamples};
use serde::{Deserialize, Serialize};

/// Everything the engine derives from one scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelAnalysis {
    /// Scene the analysis was computed from
    pub params: SceneParameters,
    /// Case table row for the scene
    pub case: ChannelCase,
    /// Active paths, direct first
    pub paths: Vec<PropagationPath>,
    /// One entry per reflected path
    pub phases: Vec<PhaseDifference>,
    /// Doppler spread in Hz
    pub doppler_spread_hz: f64,
    /// Absent when no wall is active
    pub delay_spread: Option<DelaySpread>,
    /// Chart samples, absent when no wall is active
    pub waveform: Option<Vec<WaveformSample>>,
    /// Legend for the reflected trace
    pub reflected_label: Option<String>,
}

impl ChannelAnalysis {
    /// True when only the direct path reaches the receiver
    pub fn is_direct_only(&self) -> bool {
        self.paths.len() == 1
    }
}

/// Stateless analysis engine
#[derive(Debug, Clone, Default)]
pub struct ChannelAnalyzer {
    waveform: WaveformConfig,
}

impl ChannelAnalyzer {
    pub fn new(waveform: WaveformConfig) -> Self {
        Self { waveform }
    }

    pub fn waveform_config(&self) -> &WaveformConfig {
        &self.waveform
    }

    /// Run every stage for `params`.
    ///
    /// Fails only on invalid input (`InvalidGeometry`, `InvalidFrequency`,
    /// `InvalidVelocity`). An undefined coherence bandwidth is reported
    /// inside the result.
    pub fn analyze(&self, params: &SceneParameters) -> ChannelResult<ChannelAnalysis> {
        let paths = resolve_paths(params)?;
        let case = ChannelCase::for_scene(params);

        let phases = analyze_phases(params, &paths);
        let doppler_spread_hz = doppler_spread_hz(params);
        let delay_spread = estimate_delay_spread(&paths);

        let waveform = dominant_class(&phases)
            .map(|class| WaveformSamples::new(class, self.waveform).to_vec());
        let reflected_label =
            reflected_trace_label(params.left_wall_active, params.right_wall_active).map(String::from);

        tracing::debug!(
            paths = paths.len(),
            doppler_spread_hz,
            delay_spread_us = delay_spread.map(|s| s.delay_spread_us),
            doppler = ?case.doppler,
            "channel analysed"
        );

        Ok(ChannelAnalysis {
            params: *params,
            case,
            paths,
            phases,
            doppler_spread_hz,
            delay_spread,
            waveform,
            reflected_label,
        })
    }
}

/// Analyse `params` with default generator settings
pub fn analyze(params: &SceneParameters) -> ChannelResult<ChannelAnalysis> {
    ChannelAnalyzer::default().analyze(params)
}
