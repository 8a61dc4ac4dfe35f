use std::{collections::BTreeMap, f64::consts::TAU};

use crate::{foundation::core::Rgb, shader::uniform::ParamValue};

/// Iterations covered by one palette period at `frequency = 1`.
const BAND_ITERATIONS: f64 = 64.0;

/// Built-in cosine palette, parameterized by the default color function's uniforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CosinePalette {
    pub frequency: f64,
    pub phase: f64,
    pub tint: Rgb,
    pub invert: bool,
}

impl Default for CosinePalette {
    fn default() -> Self {
        Self {
            frequency: 1.0,
            phase: 0.0,
            tint: Rgb::new(0.5, 0.6, 0.8),
            invert: false,
        }
    }
}

impl CosinePalette {
    /// Read `frequency`, `phase`, `tint` and `invert` from pushed parameters; anything missing or
    /// of the wrong type keeps its default.
    pub fn from_params(params: &BTreeMap<String, ParamValue>) -> Self {
        let d = Self::default();
        let get = |name: &str| params.get(name).copied();
        Self {
            frequency: get("frequency")
                .and_then(ParamValue::as_float)
                .unwrap_or(d.frequency),
            phase: get("phase").and_then(ParamValue::as_float).unwrap_or(d.phase),
            tint: get("tint").and_then(ParamValue::as_color).unwrap_or(d.tint),
            invert: get("invert").and_then(ParamValue::as_bool).unwrap_or(d.invert),
        }
    }

    /// Color for a (possibly fractional) escape count.
    pub fn color(&self, iterations: f64) -> Rgb {
        let x = self.frequency * iterations / BAND_ITERATIONS + self.phase;
        let wave = |offset: f64| 0.5 + 0.5 * (TAU * (x + offset)).cos();
        let base = Rgb::new(wave(0.0), wave(1.0 / 3.0), wave(2.0 / 3.0));
        let c = (base * 0.65 + self.tint * 0.35).clamped();
        if self.invert { Rgb::WHITE - c } else { c }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/palette.rs"]
mod tests;
