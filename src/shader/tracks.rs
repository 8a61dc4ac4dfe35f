use crate::{
    animation::{
        keyframe::{Keyframe, Position, Timeline},
        scalar::{LinearCurve, ScalarCurve},
    },
    foundation::{
        core::Rgb,
        error::{SweepError, SweepResult},
    },
    shader::uniform::{ParamValue, Uniform},
};

/// Keyframe track for one uniform. Each variant interpolates the way its type allows.
#[derive(Clone, Debug)]
pub enum UniformTrack {
    /// Catmull-Rom in linear space.
    Float(ScalarCurve),
    /// Per-channel Catmull-Rom in linear space.
    Color(LinearCurve<Rgb>),
    /// Steps: holds the last key at or before `t`.
    Bool(Timeline<bool>),
}

impl UniformTrack {
    /// A track with a single key at `t = 0` holding the uniform's current value.
    pub fn seed(uniform: &Uniform) -> SweepResult<Self> {
        Ok(match uniform.value() {
            ParamValue::Float(v) => Self::Float(ScalarCurve::new(v)?),
            ParamValue::Color(c) => Self::Color(LinearCurve::new(c)?),
            ParamValue::Bool(b) => Self::Bool(Timeline::new(0.0, b)?),
        })
    }

    /// A track of `uniform`'s type holding `keys`. Every key must match that type.
    pub fn from_keys(uniform: &Uniform, keys: Vec<Keyframe<ParamValue>>) -> SweepResult<Self> {
        let seeded = Self::seed(uniform)?;
        Ok(match seeded {
            Self::Float(_) => {
                let typed = typed_keys(&seeded, &keys, ParamValue::as_float)?;
                Self::Float(ScalarCurve::from_keys(typed)?)
            }
            Self::Color(_) => {
                let typed = typed_keys(&seeded, &keys, ParamValue::as_color)?;
                Self::Color(LinearCurve::from_keys(typed)?)
            }
            Self::Bool(_) => {
                let typed = typed_keys(&seeded, &keys, ParamValue::as_bool)?;
                Self::Bool(Timeline::from_keys(typed)?)
            }
        })
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Color(_) => "color",
            Self::Bool(_) => "bool",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Float(c) => c.timeline().len(),
            Self::Color(c) => c.timeline().len(),
            Self::Bool(tl) => tl.len(),
        }
    }

    /// Always `false`: a track keeps at least one key. Present alongside [`Self::len`].
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<Keyframe<ParamValue>> {
        match self {
            Self::Float(c) => wrap(c.timeline().keys(), ParamValue::Float),
            Self::Color(c) => wrap(c.timeline().keys(), ParamValue::Color),
            Self::Bool(tl) => wrap(tl.keys(), ParamValue::Bool),
        }
    }

    pub fn sample(&self, t: f64) -> ParamValue {
        match self {
            Self::Float(c) => ParamValue::Float(c.get_value(t)),
            Self::Color(c) => ParamValue::Color(c.get_value(t)),
            Self::Bool(tl) => {
                let keys = tl.keys();
                let i = match tl.position(t) {
                    Position::Key(i) | Position::Segment { index: i, .. } => i,
                };
                ParamValue::Bool(keys[i].value)
            }
        }
    }

    pub fn add_keyframe(&mut self, t: f64, value: ParamValue) -> SweepResult<usize> {
        match (self, value) {
            (Self::Float(c), ParamValue::Float(v)) => c.add_keyframe(t, v),
            (Self::Color(c), ParamValue::Color(v)) => c.add_keyframe(t, v),
            (Self::Bool(tl), ParamValue::Bool(v)) => tl.add(t, v),
            (track, value) => Err(mismatch(track, value)),
        }
    }

    pub fn remove_keyframe(&mut self, index: usize) -> SweepResult<()> {
        match self {
            Self::Float(c) => c.remove_keyframe(index).map(drop),
            Self::Color(c) => c.remove_keyframe(index).map(drop),
            Self::Bool(tl) => tl.remove(index).map(drop),
        }
    }

    pub fn set_keyframe_time(&mut self, index: usize, t: f64) -> SweepResult<usize> {
        match self {
            Self::Float(c) => c.set_keyframe_time(index, t),
            Self::Color(c) => c.set_keyframe_time(index, t),
            Self::Bool(tl) => tl.set_time(index, t),
        }
    }

    pub fn set_keyframe_value(&mut self, index: usize, value: ParamValue) -> SweepResult<()> {
        match (self, value) {
            (Self::Float(c), ParamValue::Float(v)) => c.set_keyframe_value(index, v),
            (Self::Color(c), ParamValue::Color(v)) => c.set_keyframe_value(index, v),
            (Self::Bool(tl), ParamValue::Bool(v)) => tl.set_value(index, v),
            (track, value) => Err(mismatch(track, value)),
        }
    }
}

fn wrap<T: Copy>(keys: &[Keyframe<T>], f: fn(T) -> ParamValue) -> Vec<Keyframe<ParamValue>> {
    keys.iter().map(|k| Keyframe::new(k.t, f(k.value))).collect()
}

fn typed_keys<T>(
    track: &UniformTrack,
    keys: &[Keyframe<ParamValue>],
    f: fn(ParamValue) -> Option<T>,
) -> SweepResult<Vec<Keyframe<T>>> {
    keys.iter()
        .map(|k| {
            f(k.value)
                .map(|v| Keyframe::new(k.t, v))
                .ok_or_else(|| mismatch(track, k.value))
        })
        .collect()
}

fn mismatch(track: &UniformTrack, value: ParamValue) -> SweepError {
    SweepError::configuration(format!(
        "cannot key a {} value on a {} track",
        value.type_name(),
        track.type_name()
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/shader/tracks.rs"]
mod tests;
