use crate::{
    animation::keyframe::{Keyframe, Position, Timeline},
    foundation::{
        error::{SweepError, SweepResult},
        math::{catmull_rom, reflect_linear},
    },
};

/// Zoom radius over time: a Catmull-Rom spline through the logarithms of the radius keys.
///
/// Working in log-space keeps the zoom rate geometric between keys, so a sweep from `1.0` down to
/// `1e-10` spends comparable time on every decade instead of collapsing in the first frames.
/// Phantom endpoints are log-space reflections, which keeps them strictly positive.
#[derive(Clone, Debug)]
pub struct RadiusCurve {
    timeline: Timeline<f64>,
}

impl RadiusCurve {
    /// A constant-radius curve with one key at `t = 0`.
    pub fn new(radius: f64) -> SweepResult<Self> {
        validate_radius(radius)?;
        Ok(Self {
            timeline: Timeline::new(0.0, radius)?,
        })
    }

    pub fn from_keys(keys: Vec<Keyframe<f64>>) -> SweepResult<Self> {
        for k in &keys {
            validate_radius(k.value)?;
        }
        Ok(Self {
            timeline: Timeline::from_keys(keys)?,
        })
    }

    pub fn timeline(&self) -> &Timeline<f64> {
        &self.timeline
    }

    pub fn revision(&self) -> u64 {
        self.timeline.revision()
    }

    pub fn add_keyframe(&mut self, t: f64, radius: f64) -> SweepResult<usize> {
        validate_radius(radius)?;
        self.timeline.add(t, radius)
    }

    pub fn remove_keyframe(&mut self, index: usize) -> SweepResult<Keyframe<f64>> {
        self.timeline.remove(index)
    }

    pub fn set_keyframe_time(&mut self, index: usize, t: f64) -> SweepResult<usize> {
        self.timeline.set_time(index, t)
    }

    pub fn set_keyframe_value(&mut self, index: usize, radius: f64) -> SweepResult<()> {
        validate_radius(radius)?;
        self.timeline.set_value(index, radius)
    }

    /// Radius at `t`. Always strictly positive; exact at (and beyond) the keys.
    pub fn get_radius(&self, t: f64) -> f64 {
        let keys = self.timeline.keys();
        match self.timeline.position(t) {
            Position::Key(i) => keys[i].value,
            Position::Segment { index: i, u } => {
                let l1 = keys[i].value.ln();
                let l2 = keys[i + 1].value.ln();
                let l0 = match i.checked_sub(1) {
                    Some(prev) => keys[prev].value.ln(),
                    None => reflect_linear(l1, l2),
                };
                let l3 = match keys.get(i + 2) {
                    Some(next) => next.value.ln(),
                    None => reflect_linear(l2, l1),
                };
                catmull_rom(l0, l1, l2, l3, u).exp()
            }
        }
    }
}

fn validate_radius(radius: f64) -> SweepResult<()> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(SweepError::domain(format!(
            "radius keyframes must be finite and > 0, got {radius}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/radius.rs"]
mod tests;
