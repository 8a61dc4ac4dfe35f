use crate::foundation::{
    core::Vec2,
    error::{SweepError, SweepResult},
    math::map_range,
};

/// An authored `(t, value)` anchor on a timeline. `t` is normalized to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    pub t: f64,
    pub value: T,
}

impl<T> Keyframe<T> {
    pub fn new(t: f64, value: T) -> Self {
        Self { t, value }
    }
}

/// Camera center keyframe value: a position plus a velocity handle.
///
/// `vel` is measured in view radii at the keyframe; a zero handle makes the key a plain anchor
/// (zero tangent, the camera eases in and out of it).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CenterKey {
    pub pos: Vec2,
    #[serde(default)]
    pub vel: Vec2,
}

impl CenterKey {
    pub fn anchor(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
        }
    }
}

/// Where a timeline query falls relative to the keyframes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// Outside the key span, exactly on a key, or a single-key timeline: use this key's value.
    Key(usize),
    /// Strictly inside segment `index` (between keys `index` and `index + 1`) at local `u`.
    Segment { index: usize, u: f64 },
}

/// Non-empty, strictly ascending sequence of keyframes for one animated quantity.
///
/// Every structural edit bumps [`Timeline::revision`], which dependent caches compare against to
/// decide whether they must be rebuilt.
#[derive(Clone, Debug)]
pub struct Timeline<T> {
    keys: Vec<Keyframe<T>>,
    revision: u64,
}

impl<T> Timeline<T> {
    pub fn new(t: f64, value: T) -> SweepResult<Self> {
        validate_time(t)?;
        Ok(Self {
            keys: vec![Keyframe { t, value }],
            revision: 0,
        })
    }

    /// Build a timeline from keys in any order. Keys are sorted by `t`.
    pub fn from_keys(mut keys: Vec<Keyframe<T>>) -> SweepResult<Self> {
        if keys.is_empty() {
            return Err(SweepError::configuration(
                "timeline must have at least one keyframe",
            ));
        }
        for k in &keys {
            validate_time(k.t)?;
        }
        keys.sort_by(|a, b| a.t.total_cmp(&b.t));
        if keys.windows(2).any(|w| w[0].t == w[1].t) {
            return Err(SweepError::configuration(
                "timeline keyframes must have distinct times",
            ));
        }
        Ok(Self { keys, revision: 0 })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    pub fn get(&self, index: usize) -> Option<&Keyframe<T>> {
        self.keys.get(index)
    }

    pub fn first(&self) -> &Keyframe<T> {
        &self.keys[0]
    }

    pub fn last(&self) -> &Keyframe<T> {
        &self.keys[self.keys.len() - 1]
    }

    /// Number of segments between consecutive keys.
    pub fn segment_count(&self) -> usize {
        self.keys.len() - 1
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Insert a keyframe, returning its index after sorting.
    pub fn add(&mut self, t: f64, value: T) -> SweepResult<usize> {
        validate_time(t)?;
        let index = self.keys.partition_point(|k| k.t < t);
        if self.keys.get(index).is_some_and(|k| k.t == t) {
            return Err(SweepError::configuration(format!(
                "a keyframe already exists at t={t}"
            )));
        }
        self.keys.insert(index, Keyframe { t, value });
        self.touch();
        Ok(index)
    }

    pub fn remove(&mut self, index: usize) -> SweepResult<Keyframe<T>> {
        self.check_index(index)?;
        if self.keys.len() == 1 {
            return Err(SweepError::configuration(
                "cannot remove the last keyframe of a timeline",
            ));
        }
        let key = self.keys.remove(index);
        self.touch();
        Ok(key)
    }

    /// Move a keyframe in time, returning its new index after re-sorting.
    pub fn set_time(&mut self, index: usize, t: f64) -> SweepResult<usize> {
        self.check_index(index)?;
        validate_time(t)?;
        if self
            .keys
            .iter()
            .enumerate()
            .any(|(i, k)| i != index && k.t == t)
        {
            return Err(SweepError::configuration(format!(
                "a keyframe already exists at t={t}"
            )));
        }
        let mut key = self.keys.remove(index);
        key.t = t;
        let new_index = self.keys.partition_point(|k| k.t < t);
        self.keys.insert(new_index, key);
        self.touch();
        Ok(new_index)
    }

    pub fn set_value(&mut self, index: usize, value: T) -> SweepResult<()> {
        self.check_index(index)?;
        self.keys[index].value = value;
        self.touch();
        Ok(())
    }

    /// Locate `t` on the timeline. Out-of-span (and NaN) queries clamp to the boundary keys.
    pub fn position(&self, t: f64) -> Position {
        let last = self.keys.len() - 1;
        if last == 0 || t.is_nan() || t <= self.keys[0].t {
            return Position::Key(0);
        }
        if t >= self.keys[last].t {
            return Position::Key(last);
        }

        let index = self.keys.partition_point(|k| k.t <= t) - 1;
        let a = self.keys[index].t;
        if a == t {
            return Position::Key(index);
        }
        let b = self.keys[index + 1].t;
        Position::Segment {
            index,
            u: map_range(t, a, b, 0.0, 1.0),
        }
    }

    fn check_index(&self, index: usize) -> SweepResult<()> {
        if index >= self.keys.len() {
            return Err(SweepError::configuration(format!(
                "keyframe index {index} out of range (len {})",
                self.keys.len()
            )));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn validate_time(t: f64) -> SweepResult<()> {
    if !t.is_finite() || !(0.0..=1.0).contains(&t) {
        return Err(SweepError::configuration(format!(
            "keyframe time must be within [0, 1], got {t}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframe.rs"]
mod tests;
