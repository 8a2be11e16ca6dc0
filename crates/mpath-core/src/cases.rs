//! Scene case table
//!
//! The analysis branches on three inputs: left wall, right wall, and whether
//! the receiver moves. That is eight cases. Listing them in one table keeps
//! the state space enumerable and lets every case be tested directly.
//!
//! ```text
//! left  right  motion      doppler         delay spread
//! ----  -----  ----------  --------------  ------------
//! no    no     stationary  Stationary      Suppressed
//! no    no     moving      CommonShift     Suppressed
//! yes   no     stationary  Stationary      LeftWall
//! yes   no     moving      CommonShift     LeftWall
//! no    yes    stationary  Stationary      RightWall
//! no    yes    moving      OpposingShift   RightWall
//! yes   yes    stationary  Stationary      RightWall
//! yes   yes    moving      OpposingShift   RightWall
//! ```

use crate::doppler::DopplerRegime;
use crate::params::{MotionClass, SceneParameters};
use serde::{Deserialize, Serialize};

/// Which path sets the delay spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelaySpreadRule {
    /// No reflector; delay spread and coherence bandwidth are not shown
    Suppressed,
    /// `T_d = (2d - r)/c - r/c`
    LeftWall,
    /// `T_d = (4d - 3r)/c - r/c`
    RightWall,
}

impl DelaySpreadRule {
    /// Formula shown next to the numeric value
    pub fn formula(self) -> Option<&'static str> {
        match self {
            DelaySpreadRule::Suppressed => None,
            DelaySpreadRule::LeftWall => Some("T_d = (2d-r)/c - r/c"),
            DelaySpreadRule::RightWall => Some("T_d = (4d-3r)/c - r/c"),
        }
    }
}

/// Key into the case table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseKey {
    pub left_wall_active: bool,
    pub right_wall_active: bool,
    pub motion: MotionClass,
}

impl CaseKey {
    pub fn for_scene(params: &SceneParameters) -> Self {
        Self {
            left_wall_active: params.left_wall_active,
            right_wall_active: params.right_wall_active,
            motion: params.motion(),
        }
    }
}

/// One row of the case table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelCase {
    pub key: CaseKey,
    pub doppler: DopplerRegime,
    pub delay_spread: DelaySpreadRule,
}

impl ChannelCase {
    /// Look up the row for a key
    pub fn lookup(key: CaseKey) -> Self {
        let moving = key.motion == MotionClass::Moving;
        let doppler = DopplerRegime::select(moving, key.right_wall_active);
        let delay_spread = match (key.left_wall_active, key.right_wall_active) {
            (false, false) => DelaySpreadRule::Suppressed,
            (true, false) => DelaySpreadRule::LeftWall,
            (_, true) => DelaySpreadRule::RightWall,
        };
        Self {
            key,
            doppler,
            delay_spread,
        }
    }

    pub fn for_scene(params: &SceneParameters) -> Self {
        Self::lookup(CaseKey::for_scene(params))
    }

    /// Whether the scene has any reflected path to analyse
    pub fn has_reflections(&self) -> bool {
        self.key.left_wall_active || self.key.right_wall_active
    }
}

/// All eight rows, ordered by (left, right, motion)
pub fn case_table() -> Vec<ChannelCase> {
    let mut table = Vec::with_capacity(8);
    for left_wall_active in [false, true] {
        for right_wall_active in [false, true] {
            for motion in [MotionClass::Stationary, MotionClass::Moving] {
                table.push(ChannelCase::lookup(CaseKey {
                    left_wall_active,
                    right_wall_active,
                    motion,
                }));
            }
        }
    }
    table
}
