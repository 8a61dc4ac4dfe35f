use std::fmt::Debug;

use crate::{
    animation::keyframe::{Keyframe, Position, Timeline},
    foundation::{
        core::{Rgb, Vec2},
        error::{SweepError, SweepResult},
        math::{SplineValue, catmull_rom, reflect_linear},
    },
};

/// Values a [`LinearCurve`] can animate.
pub trait CurveValue: SplineValue + Debug {
    fn is_finite_value(&self) -> bool;
}

impl CurveValue for f64 {
    fn is_finite_value(&self) -> bool {
        self.is_finite()
    }
}

impl CurveValue for Vec2 {
    fn is_finite_value(&self) -> bool {
        self.is_finite()
    }
}

impl CurveValue for Rgb {
    fn is_finite_value(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

/// Catmull-Rom spline in linear space with reflected phantom endpoints.
///
/// Used for shader parameters (`f64`), colors (per channel) and shader constants (`Vec2`).
#[derive(Clone, Debug)]
pub struct LinearCurve<T> {
    timeline: Timeline<T>,
}

/// A float shader parameter over time.
pub type ScalarCurve = LinearCurve<f64>;

impl<T: CurveValue> LinearCurve<T> {
    /// A constant curve with one key at `t = 0`.
    pub fn new(value: T) -> SweepResult<Self> {
        validate_value(&value)?;
        Ok(Self {
            timeline: Timeline::new(0.0, value)?,
        })
    }

    pub fn from_keys(keys: Vec<Keyframe<T>>) -> SweepResult<Self> {
        for k in &keys {
            validate_value(&k.value)?;
        }
        Ok(Self {
            timeline: Timeline::from_keys(keys)?,
        })
    }

    pub fn timeline(&self) -> &Timeline<T> {
        &self.timeline
    }

    pub fn revision(&self) -> u64 {
        self.timeline.revision()
    }

    pub fn add_keyframe(&mut self, t: f64, value: T) -> SweepResult<usize> {
        validate_value(&value)?;
        self.timeline.add(t, value)
    }

    pub fn remove_keyframe(&mut self, index: usize) -> SweepResult<Keyframe<T>> {
        self.timeline.remove(index)
    }

    pub fn set_keyframe_time(&mut self, index: usize, t: f64) -> SweepResult<usize> {
        self.timeline.set_time(index, t)
    }

    pub fn set_keyframe_value(&mut self, index: usize, value: T) -> SweepResult<()> {
        validate_value(&value)?;
        self.timeline.set_value(index, value)
    }

    pub fn get_value(&self, t: f64) -> T {
        let keys = self.timeline.keys();
        match self.timeline.position(t) {
            Position::Key(i) => keys[i].value,
            Position::Segment { index: i, u } => {
                let p1 = keys[i].value;
                let p2 = keys[i + 1].value;
                let p0 = match i.checked_sub(1) {
                    Some(prev) => keys[prev].value,
                    None => reflect_linear(p1, p2),
                };
                let p3 = match keys.get(i + 2) {
                    Some(next) => next.value,
                    None => reflect_linear(p2, p1),
                };
                catmull_rom(p0, p1, p2, p3, u)
            }
        }
    }
}

fn validate_value<T: CurveValue>(value: &T) -> SweepResult<()> {
    if !value.is_finite_value() {
        return Err(SweepError::domain(format!(
            "keyframe values must be finite, got {value:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/scalar.rs"]
mod tests;
