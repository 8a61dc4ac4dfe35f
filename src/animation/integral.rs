use crate::{
    animation::{radius::RadiusCurve, settings::MAX_SAMPLES},
    foundation::error::{SweepError, SweepResult},
};

/// Cumulative integral of the radius curve, sampled on a uniform partition of `[0, 1]`.
///
/// Entry `i` holds the trapezoidal integral of `radius` over `[0, i / n]`. Because the radius is
/// strictly positive the table is non-decreasing, and lookups are a single linear interpolation.
#[derive(Clone, Debug)]
pub struct RadiusIntegralTable {
    cumulative: Vec<f64>,
    radius_revision: u64,
}

impl RadiusIntegralTable {
    /// `intervals` is clamped to `1..=MAX_SAMPLES`.
    pub fn build(radius: &RadiusCurve, intervals: usize) -> Self {
        let n = intervals.clamp(1, MAX_SAMPLES);
        let dt = 1.0 / n as f64;

        let mut cumulative = Vec::with_capacity(n + 1);
        cumulative.push(0.0);
        let mut acc = 0.0;
        let mut prev = radius.get_radius(0.0);
        for i in 1..=n {
            let r = radius.get_radius(i as f64 * dt);
            acc += 0.5 * (prev + r) * dt;
            cumulative.push(acc);
            prev = r;
        }

        tracing::debug!(intervals = n, total = acc, "rebuilt radius integral table");
        Self {
            cumulative,
            radius_revision: radius.revision(),
        }
    }

    /// Recompute the table with the given spacing between samples.
    pub fn invalidate(&mut self, radius: &RadiusCurve, sample_spacing: f64) -> SweepResult<()> {
        *self = Self::build(radius, intervals_for_spacing(sample_spacing)?);
        Ok(())
    }

    /// Whether the table was built from the radius curve's current keyframes.
    pub fn is_current(&self, radius: &RadiusCurve) -> bool {
        self.radius_revision == radius.revision()
    }

    pub fn intervals(&self) -> usize {
        self.cumulative.len() - 1
    }

    /// Integral of the radius over `[0, 1]`.
    pub fn total(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    /// Integrated radius over `[0, t]`; `t` is clamped to `[0, 1]`.
    pub fn integral_at(&self, t: f64) -> f64 {
        let n = self.intervals();
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return self.total();
        }
        let x = t * n as f64;
        let i = (x.floor() as usize).min(n - 1);
        let frac = x - i as f64;
        let a = self.cumulative[i];
        let b = self.cumulative[i + 1];
        a + (b - a) * frac
    }
}

/// Number of table intervals needed for samples at most `sample_spacing` apart.
pub(crate) fn intervals_for_spacing(sample_spacing: f64) -> SweepResult<usize> {
    if !sample_spacing.is_finite() || sample_spacing <= 0.0 || sample_spacing > 1.0 {
        return Err(SweepError::configuration(
            "integral sample spacing must be within (0, 1]",
        ));
    }
    let intervals = (1.0 / sample_spacing).ceil();
    if intervals > MAX_SAMPLES as f64 {
        return Err(SweepError::configuration(format!(
            "integral sample spacing {sample_spacing:e} needs more than {MAX_SAMPLES} samples"
        )));
    }
    Ok(intervals as usize)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/integral.rs"]
mod tests;
