use crate::foundation::{
    core::{Rgb, Vec2},
    error::{SweepError, SweepResult},
};

/// Which escape-time set to draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalKind {
    /// `z₀ = 0`, `c` = the plane point.
    #[default]
    Mandelbrot,
    /// `z₀` = the plane point, `c` = the `c` shader constant.
    Julia,
}

/// Iteration and shading settings of the reference renderer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FractalSettings {
    pub kind: FractalKind,
    pub max_iterations: u32,
    pub escape_radius: f64,
    /// Power in `z ← z^exponent + c`.
    pub exponent: u32,
    /// Fractional (continuous) iteration counts instead of integer bands.
    pub smooth: bool,
    /// Color of points that never escape.
    pub set_color: Rgb,
    /// Stop accumulating after this many passes; `0` means never stop.
    pub max_epochs: u32,
    /// Julia constant used until a `c` shader constant is pushed.
    pub julia_c: Vec2,
    /// Rayon worker threads; `None` uses the global pool.
    pub threads: Option<usize>,
}

impl Default for FractalSettings {
    fn default() -> Self {
        Self {
            kind: FractalKind::Mandelbrot,
            max_iterations: 500,
            escape_radius: 256.0,
            exponent: 2,
            smooth: true,
            set_color: Rgb::BLACK,
            max_epochs: 0,
            julia_c: Vec2::new(-0.8, 0.156),
            threads: None,
        }
    }
}

impl FractalSettings {
    pub fn validate(&self) -> SweepResult<()> {
        if self.max_iterations == 0 {
            return Err(SweepError::configuration("max_iterations must be > 0"));
        }
        if !self.escape_radius.is_finite() || self.escape_radius <= 2.0 {
            return Err(SweepError::configuration(
                "escape_radius must be finite and > 2",
            ));
        }
        if self.exponent < 2 {
            return Err(SweepError::configuration("exponent must be >= 2"));
        }
        if !self.julia_c.is_finite() {
            return Err(SweepError::configuration("julia_c must be finite"));
        }
        if self.threads == Some(0) {
            return Err(SweepError::configuration(
                "threads must be >= 1 when set",
            ));
        }
        Ok(())
    }

    /// Iterate from plane point `p`; `None` when the orbit stays bounded.
    ///
    /// The returned count is fractional when [`Self::smooth`] is set.
    pub fn escape_time(&self, p: Vec2, julia_c: Vec2) -> Option<f64> {
        let (mut z, c) = match self.kind {
            FractalKind::Mandelbrot => (Vec2::ZERO, p),
            FractalKind::Julia => (p, julia_c),
        };
        let bailout = self.escape_radius * self.escape_radius;

        for n in 0..self.max_iterations {
            z = complex_pow(z, self.exponent) + c;
            let norm2 = z.x * z.x + z.y * z.y;
            if norm2 > bailout {
                let n = f64::from(n);
                if !self.smooth {
                    return Some(n);
                }
                // log|z| = log(norm2) / 2
                let log_z = 0.5 * norm2.ln();
                let nu = (log_z / self.escape_radius.ln()).ln() / f64::from(self.exponent).ln();
                return Some((n + 1.0 - nu).max(0.0));
            }
        }
        None
    }
}

fn complex_mul(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x * b.x - a.y * b.y, a.x * b.y + a.y * b.x)
}

fn complex_pow(z: Vec2, exponent: u32) -> Vec2 {
    let mut acc = z;
    for _ in 1..exponent {
        acc = complex_mul(acc, z);
    }
    acc
}

#[cfg(test)]
#[path = "../../tests/unit/render/fractal.rs"]
mod tests;
