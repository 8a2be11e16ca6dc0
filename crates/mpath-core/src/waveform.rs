//! Waveform Sample Generator
//!
//! Produces the "signals at receiver" chart data: one period of the direct
//! signal next to a reflected copy whose polarity and size depend only on
//! the interference class. This is a qualitative picture, not a physical
//! superposition; the phase magnitude plays no part.
//!
//! ```text
//! direct(t)    = sin(t)
//! reflected(t) =  0.7 sin(t)   constructive
//! reflected(t) = -0.6 sin(t)   destructive
//! ```
//!
//! Samples are taken at `t_i = i * step` for every `t_i <= 2π`.

use crate::phase::InterferenceClass;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Finest sample step accepted, about 6.3k samples per period
pub const MIN_STEP_RAD: f64 = 1e-3;

/// One chart point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformSample {
    /// Time axis in radians of carrier phase
    pub time: f64,
    pub direct_amplitude: f64,
    pub reflected_amplitude: f64,
}

/// Waveform generator settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformConfig {
    /// Sample step in radians
    pub step_rad: f64,
    /// Reflected gain for constructive interference
    pub constructive_gain: f64,
    /// Reflected gain for destructive interference
    pub destructive_gain: f64,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            step_rad: 0.1,
            constructive_gain: 0.7,
            destructive_gain: -0.6,
        }
    }
}

impl WaveformConfig {
    /// Reflected gain for a class
    pub fn gain(&self, class: InterferenceClass) -> f64 {
        match class {
            InterferenceClass::Constructive => self.constructive_gain,
            InterferenceClass::Destructive => self.destructive_gain,
        }
    }

    /// Whether `step_rad` lies in `[MIN_STEP_RAD, 2π]`
    pub fn has_valid_step(&self) -> bool {
        (MIN_STEP_RAD..=TAU).contains(&self.step_rad)
    }

    /// Number of samples in `[0, 2π]`, zero for an unusable step
    pub fn sample_count(&self) -> usize {
        if !self.has_valid_step() {
            return 0;
        }
        // small tolerance so a step that divides 2π exactly keeps its endpoint
        let whole_steps = (TAU / self.step_rad + 1e-9).floor() as usize;
        whole_steps.saturating_add(1)
    }
}

/// Direct-path amplitude at `t`
#[inline]
pub fn direct_amplitude(t: f64) -> f64 {
    t.sin()
}

/// Reflected-path amplitude at `t` with the default gains
#[inline]
pub fn reflected_amplitude(class: InterferenceClass, t: f64) -> f64 {
    WaveformConfig::default().gain(class) * t.sin()
}

/// A restartable, finite run of waveform samples.
///
/// Cheap to copy; every call to [`WaveformSamples::iter`] starts again at
/// `t = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformSamples {
    class: InterferenceClass,
    config: WaveformConfig,
}

impl WaveformSamples {
    pub fn new(class: InterferenceClass, config: WaveformConfig) -> Self {
        Self { class, config }
    }

    pub fn class(&self) -> InterferenceClass {
        self.class
    }

    pub fn len(&self) -> usize {
        self.config.sample_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample `i`, if in range
    pub fn get(&self, i: usize) -> Option<WaveformSample> {
        if i >= self.len() {
            return None;
        }
        let time = i as f64 * self.config.step_rad;
        Some(WaveformSample {
            time,
            direct_amplitude: direct_amplitude(time),
            reflected_amplitude: self.config.gain(self.class) * time.sin(),
        })
    }

    pub fn iter(&self) -> WaveformIter {
        WaveformIter {
            samples: *self,
            index: 0,
        }
    }

    pub fn to_vec(&self) -> Vec<WaveformSample> {
        self.iter().collect()
    }
}

impl IntoIterator for WaveformSamples {
    type Item = WaveformSample;
    type IntoIter = WaveformIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over [`WaveformSamples`]
#[derive(Debug, Clone)]
pub struct WaveformIter {
    samples: WaveformSamples,
    index: usize,
}

impl Iterator for WaveformIter {
    type Item = WaveformSample;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.samples.get(self.index)?;
        self.index += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WaveformIter {}

/// Samples for `class` with the default 0.1 rad step
pub fn generate_samples(class: InterferenceClass) -> WaveformSamples {
    WaveformSamples::new(class, WaveformConfig::default())
}

/// Legend for the reflected trace given which walls are active
pub fn reflected_trace_label(left_wall_active: bool, right_wall_active: bool) -> Option<&'static str> {
    match (left_wall_active, right_wall_active) {
        (true, true) => Some("Reflected from Wall"),
        (true, false) => Some("Reflected from Left Wall"),
        (false, true) => Some("Reflected from Right Wall"),
        (false, false) => None,
    }
}
