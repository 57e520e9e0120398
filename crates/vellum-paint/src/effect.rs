//! Stroke path effects.

use serde::{Deserialize, Serialize};

use crate::error::{PaintError, PaintResult};

/// A dash pattern for strokes.
///
/// Intervals alternate between "on" and "off" lengths, starting with "on".
/// `phase` offsets into the pattern.
///
/// ```
/// use vellum_paint::DashEffect;
///
/// let dash = DashEffect::new(vec![4.0, 2.0], 1.0)?;
/// assert_eq!(dash.pattern_length(), 6.0);
/// assert!(DashEffect::new(vec![4.0], 0.0).is_err());
/// # Ok::<(), vellum_paint::PaintError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDashEffect", into = "RawDashEffect")]
pub struct DashEffect {
    intervals: Vec<f32>,
    phase: f32,
}

/// Unvalidated serde form of a [`DashEffect`].
#[derive(Serialize, Deserialize)]
struct RawDashEffect {
    intervals: Vec<f32>,
    #[serde(default)]
    phase: f32,
}

impl TryFrom<RawDashEffect> for DashEffect {
    type Error = PaintError;

    fn try_from(raw: RawDashEffect) -> PaintResult<Self> {
        DashEffect::new(raw.intervals, raw.phase)
    }
}

impl From<DashEffect> for RawDashEffect {
    fn from(dash: DashEffect) -> Self {
        Self {
            intervals: dash.intervals,
            phase: dash.phase,
        }
    }
}

impl DashEffect {
    /// Create a dash pattern.
    pub fn new(intervals: Vec<f32>, phase: f32) -> PaintResult<Self> {
        let count = intervals.len();
        let valid = count >= 2
            && count % 2 == 0
            && intervals.iter().all(|v| v.is_finite() && *v >= 0.0)
            && intervals.iter().sum::<f32>() > 0.0;
        if !valid {
            return Err(PaintError::InvalidDash { count });
        }
        let phase = if phase.is_finite() { phase } else { 0.0 };
        Ok(Self { intervals, phase })
    }

    #[inline]
    pub fn intervals(&self) -> &[f32] {
        &self.intervals
    }

    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Sum of all intervals.
    pub fn pattern_length(&self) -> f32 {
        self.intervals.iter().sum()
    }

    /// A copy with every interval and the phase multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            intervals: self.intervals.iter().map(|v| v * factor).collect(),
            phase: self.phase * factor,
        }
    }
}
