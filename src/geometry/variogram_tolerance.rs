use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SemivariogramError;

/// Widening (degrees) applied on both sides of every angular window so that pairs sitting
/// on a window edge are not lost to floating point error.
pub const ANGLE_BUFFER: f64 = 0.01;

/// How pair directions are filtered when binning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VariogramKind {
    /// Every pair contributes regardless of its direction.
    #[default]
    #[serde(rename = "omnidirectional")]
    Omnidirectional,
    /// Undirected: `d` and `d + 180` are treated as the same direction.
    #[serde(rename = "directional")]
    Directional,
    /// Directed: only pairs pointing towards `d` contribute.
    #[serde(rename = "directional+orientational")]
    DirectionalOrientational,
}

impl VariogramKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            VariogramKind::Omnidirectional => "omnidirectional",
            VariogramKind::Directional => "directional",
            VariogramKind::DirectionalOrientational => "directional+orientational",
        }
    }

    /// Heading used when plotting semivariograms of this kind.
    pub fn title(&self) -> &'static str {
        match self {
            VariogramKind::Omnidirectional => "Omnidirectional Semivariogram",
            VariogramKind::Directional => "Directional Semivariograms",
            VariogramKind::DirectionalOrientational => {
                "Directional and Orientational Semivariograms"
            }
        }
    }
}

impl fmt::Display for VariogramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for VariogramKind {
    type Err = SemivariogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "omnidirectional" => Ok(VariogramKind::Omnidirectional),
            "directional" => Ok(VariogramKind::Directional),
            "directional+orientational" => Ok(VariogramKind::DirectionalOrientational),
            _ => Err(SemivariogramError::InvalidMode(s.to_string())),
        }
    }
}

/// Angular window of `half_width` either side of `center` on the (-180, 180] circle.
///
/// Both edges are open. A window that wraps past the seam keeps 180 itself, so due west is
/// never lost to the split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularWindow {
    pub center: f64,
    pub half_width: f64,
}

impl AngularWindow {
    /// Window of one sided `tolerance` around `center`, widened by [`ANGLE_BUFFER`].
    pub fn new(center: f64, tolerance: f64) -> Self {
        Self {
            center,
            half_width: tolerance + ANGLE_BUFFER,
        }
    }

    pub fn lower(&self) -> f64 {
        self.center - self.half_width
    }

    pub fn upper(&self) -> f64 {
        self.center + self.half_width
    }

    /// Tests `angle` (already in (-180, 180]) against the window, splitting it at the seam.
    #[inline(always)]
    pub fn contains(&self, angle: f64) -> bool {
        let lo = self.lower();
        let hi = self.upper();

        if hi > 180.0 {
            // [lo, 180] and [-180, hi - 360]
            (lo < angle && angle <= 180.0) || angle < hi - 360.0
        } else if lo < -180.0 {
            // [lo + 360, 180] and [-180, hi]
            angle > lo + 360.0 || angle < hi
        } else {
            lo < angle && angle < hi
        }
    }
}

/// A requested direction, its one sided tolerance and the filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionSpec {
    pub direction: f64,
    pub tolerance: f64,
    pub kind: VariogramKind,
}

impl DirectionSpec {
    pub fn new(direction: f64, tolerance: f64, kind: VariogramKind) -> Self {
        Self {
            direction,
            tolerance,
            kind,
        }
    }

    pub fn omnidirectional() -> Self {
        Self::new(0.0, 180.0, VariogramKind::Omnidirectional)
    }

    /// The opposite direction, kept inside (-180, 180].
    pub fn fold_direction(&self) -> f64 {
        if self.direction < 0.0 {
            self.direction + 180.0
        } else {
            self.direction - 180.0
        }
    }

    /// Angular windows that are binned for this direction, as drawn on a direction rose.
    pub fn windows(&self) -> Vec<AngularWindow> {
        match self.kind {
            VariogramKind::Omnidirectional => vec![AngularWindow::new(0.0, 180.0)],
            VariogramKind::Directional => vec![
                AngularWindow::new(self.direction, self.tolerance),
                AngularWindow::new(self.fold_direction(), self.tolerance),
            ],
            VariogramKind::DirectionalOrientational => {
                vec![AngularWindow::new(self.direction, self.tolerance)]
            }
        }
    }

    #[inline(always)]
    pub fn contains_angle(&self, angle: f64) -> bool {
        match self.kind {
            VariogramKind::Omnidirectional => true,
            VariogramKind::Directional => {
                AngularWindow::new(self.direction, self.tolerance).contains(angle)
                    || AngularWindow::new(self.fold_direction(), self.tolerance).contains(angle)
            }
            VariogramKind::DirectionalOrientational => {
                AngularWindow::new(self.direction, self.tolerance).contains(angle)
            }
        }
    }
}
