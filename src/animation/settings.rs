use crate::foundation::error::{SweepError, SweepResult};

/// Upper bound on table sizes and marching steps per segment.
pub const MAX_SAMPLES: usize = 10_000_000;

/// How the center curve maps timeline time onto its Hermite segments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retiming {
    /// Closed-form exponential-ratio remap of the local parameter. Exact for geometric zoom
    /// within a segment and free of numerical integration.
    #[default]
    ExpRatio,
    /// Arc-length marching towards a target derived from the radius integral table.
    ArcLength,
    /// No re-timing: the Hermite parameter is the raw local time.
    Linear,
}

/// Tuning knobs for the curve engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CurveSettings {
    pub retiming: Retiming,
    /// Multiplier applied to velocity handles (after radius scaling) to obtain Hermite tangents.
    /// `3.0` makes a handle of length `h` behave like a cubic Bézier control point at distance `h`.
    pub tangent_scale: f64,
    /// Samples in the radius integral table.
    pub integral_samples: usize,
    /// Samples per segment when measuring Hermite arc length.
    pub length_samples: usize,
    /// Local-parameter step used by arc-length marching.
    pub arc_step: f64,
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            retiming: Retiming::ExpRatio,
            tangent_scale: 3.0,
            integral_samples: 1000,
            length_samples: 1000,
            arc_step: 1e-4,
        }
    }
}

impl CurveSettings {
    pub fn validate(&self) -> SweepResult<()> {
        if !self.tangent_scale.is_finite() || self.tangent_scale < 0.0 {
            return Err(SweepError::configuration(
                "tangent_scale must be finite and >= 0",
            ));
        }
        if !(1..=MAX_SAMPLES).contains(&self.integral_samples) {
            return Err(SweepError::configuration(format!(
                "integral_samples must be within 1..={MAX_SAMPLES}"
            )));
        }
        if !(1..=MAX_SAMPLES).contains(&self.length_samples) {
            return Err(SweepError::configuration(format!(
                "length_samples must be within 1..={MAX_SAMPLES}"
            )));
        }
        let min_step = 1.0 / MAX_SAMPLES as f64;
        if !self.arc_step.is_finite() || self.arc_step < min_step || self.arc_step > 1.0 {
            return Err(SweepError::configuration(format!(
                "arc_step must be within [{min_step:e}, 1]"
            )));
        }
        Ok(())
    }

    /// Number of marching steps per segment; the effective step divides `[0, 1]` evenly.
    pub(crate) fn arc_steps(&self) -> u32 {
        (1.0 / self.arc_step).ceil().clamp(1.0, f64::from(u32::MAX)) as u32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/settings.rs"]
mod tests;
