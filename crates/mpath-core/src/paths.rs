//! Propagation Path Resolver
//!
//! Enumerates the propagation paths that reach the receiver for a given
//! scene. The direct path always exists; each active wall adds one
//! reflected path.
//!
//! ## Path Geometry
//!
//! ```text
//! Path             Base distance   Moving (receding)   Moving (approaching)
//! ---------------  -------------   -----------------   --------------------
//! Direct           r               r + vt              r - vt
//! LeftReflection   2d - r          2d - r + vt         2d - r - vt
//! RightReflection  4d - 3r         4d - 3r - vt        4d - 3r + vt
//! ```
//!
//! The right-wall reflection shortens while the direct path lengthens and
//! vice versa, which is why it is the only path whose Doppler shift differs
//! from the direct path.

use crate::params::SceneParameters;
use crate::types::{propagation_delay_us, ChannelResult, SPEED_OF_LIGHT_M_PER_US};
use serde::{Deserialize, Serialize};

/// Which route a signal takes from transmitter to receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PathKind {
    /// Line of sight
    Direct,
    /// Bounce off the left wall
    LeftReflection,
    /// Bounce off the right wall
    RightReflection,
}

impl PathKind {
    pub fn is_reflected(self) -> bool {
        !matches!(self, PathKind::Direct)
    }

    /// Sign of this path's length change relative to the receiver motion.
    ///
    /// Direct and left-wall paths grow when the receiver recedes; the
    /// right-wall path shrinks.
    fn rate_sign(self) -> f64 {
        match self {
            PathKind::Direct | PathKind::LeftReflection => 1.0,
            PathKind::RightReflection => -1.0,
        }
    }

    /// Δθ / π per unit of `f (d - r) / c` against the direct path
    pub fn phase_factor(self) -> f64 {
        match self {
            PathKind::Direct => 0.0,
            PathKind::LeftReflection => 4.0,
            PathKind::RightReflection => 8.0,
        }
    }

    /// Symbolic base distance in terms of `d` and `r`
    pub fn base_symbol(self) -> &'static str {
        match self {
            PathKind::Direct => "r",
            PathKind::LeftReflection => "2d-r",
            PathKind::RightReflection => "4d-3r",
        }
    }

    /// Human-readable name
    pub fn label(self) -> &'static str {
        match self {
            PathKind::Direct => "Direct",
            PathKind::LeftReflection => "Left wall reflection",
            PathKind::RightReflection => "Right wall reflection",
        }
    }
}

impl std::fmt::Display for PathKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Time-dependent path length `base + rate * t`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceExpr {
    /// Length at t = 0 in metres
    pub base_m: f64,
    /// Rate of change in m/s (signed)
    pub rate_mps: f64,
    /// Path the expression belongs to, for the symbolic base term
    kind: PathKind,
}

impl DistanceExpr {
    /// Path length at time `t_s` seconds
    #[inline]
    pub fn at(&self, t_s: f64) -> f64 {
        self.base_m + self.rate_mps * t_s
    }

    /// Symbolic form for equation display: `r`, `2d-r+vt`, `4d-3r-vt`, ...
    pub fn symbolic(&self) -> String {
        let base = self.kind.base_symbol();
        if self.rate_mps > 0.0 {
            format!("{}+vt", base)
        } else if self.rate_mps < 0.0 {
            format!("{}-vt", base)
        } else {
            base.to_string()
        }
    }
}

/// One resolved propagation path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropagationPath {
    pub kind: PathKind,
    /// Geometry-only, velocity-independent length in metres
    pub base_distance_m: f64,
    /// Length as a function of time
    pub distance: DistanceExpr,
    /// Carrier frequency in MHz, carried for per-path shifts
    carrier_frequency_mhz: f64,
}

impl PropagationPath {
    fn new(kind: PathKind, base_distance_m: f64, params: &SceneParameters) -> Self {
        let rate_mps = kind.rate_sign() * params.direction.sign() * params.speed_mps();
        Self {
            kind,
            base_distance_m,
            distance: DistanceExpr {
                base_m: base_distance_m,
                rate_mps,
                kind,
            },
            carrier_frequency_mhz: params.carrier_frequency_mhz,
        }
    }

    /// Propagation delay in µs at t = 0
    #[inline]
    pub fn delay_us(&self) -> f64 {
        propagation_delay_us(self.base_distance_m)
    }

    /// Path length in metres at `t_s` seconds
    #[inline]
    pub fn distance_at(&self, t_s: f64) -> f64 {
        self.distance.at(t_s)
    }

    /// Doppler shift of this path in Hz.
    ///
    /// A lengthening path lowers the received frequency: `-f * rate / c`.
    pub fn doppler_shift_hz(&self) -> f64 {
        let shift = -self.carrier_frequency_mhz * self.distance.rate_mps / SPEED_OF_LIGHT_M_PER_US;
        // avoid reporting -0.0 for stationary receivers
        if shift == 0.0 {
            0.0
        } else {
            shift
        }
    }

    /// Received field amplitude at `t_s` for transmit constant `alpha`.
    ///
    /// Amplitude falls off as 1/distance; a wall reflection inverts it.
    pub fn amplitude(&self, alpha: f64, t_s: f64) -> f64 {
        let magnitude = alpha / self.distance_at(t_s);
        if self.kind.is_reflected() {
            -magnitude
        } else {
            magnitude
        }
    }

    pub fn is_reflected(&self) -> bool {
        self.kind.is_reflected()
    }
}

/// Resolve the active propagation paths for a scene.
///
/// Always returns the direct path first, then the left and right wall
/// reflections when their walls are active. Fails with `InvalidGeometry`
/// unless `0 < r < d`.
pub fn resolve_paths(params: &SceneParameters) -> ChannelResult<Vec<PropagationPath>> {
    params.validate()?;

    let d = params.wall_distance_m;
    let r = params.receiver_distance_m;

    let mut paths = Vec::with_capacity(1 + params.reflector_count());
    paths.push(PropagationPath::new(PathKind::Direct, r, params));
    if params.left_wall_active {
        paths.push(PropagationPath::new(PathKind::LeftReflection, 2.0 * d - r, params));
    }
    if params.right_wall_active {
        paths.push(PropagationPath::new(PathKind::RightReflection, 4.0 * d - 3.0 * r, params));
    }

    tracing::trace!(count = paths.len(), d, r, "resolved propagation paths");
    Ok(paths)
}

/// The direct path of a resolved set
pub fn direct_path(paths: &[PropagationPath]) -> Option<&PropagationPath> {
    paths.iter().find(|p| p.kind == PathKind::Direct)
}

/// Reflected paths of a resolved set, in resolver order
pub fn reflected_paths(paths: &[PropagationPath]) -> impl Iterator<Item = &PropagationPath> {
    paths.iter().filter(|p| p.is_reflected())
}
