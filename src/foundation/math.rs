use std::ops::{Add, Mul, Sub};

/// Values that can be combined linearly by the spline kernels.
pub trait SplineValue:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f64, Output = Self>
{
}

impl<T> SplineValue for T where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T>
{
}

/// Affine map of `x` from `[x0, x1]` onto `[y0, y1]`.
pub(crate) fn map_range(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    y0 + ((y1 - y0) / (x1 - x0)) * (x - x0)
}

/// Below this distance from 1 a radius ratio is treated as constant zoom.
const UNIT_RATIO_EPS: f64 = 1e-12;

/// Exponential-ratio reparameterization `(r^u - 1) / (r - 1)`.
///
/// Maps `[0, 1]` onto itself monotonically for any `r > 0` and reduces to the identity when
/// `r == 1`. For a radius that changes geometrically by a factor `r` over a segment, this is the
/// normalized integral of the radius, i.e. the fraction of the segment's "view-relative" distance
/// covered at local time `u`.
pub fn exp_interp(r: f64, u: f64) -> f64 {
    if !r.is_finite() || r <= 0.0 || (r - 1.0).abs() < UNIT_RATIO_EPS {
        return u;
    }
    // expm1 keeps precision when r is close to 1.
    let ln_r = r.ln();
    (u * ln_r).exp_m1() / ln_r.exp_m1()
}

/// Uniform Catmull-Rom segment between `p1` and `p2`.
pub fn catmull_rom<T: SplineValue>(p0: T, p1: T, p2: T, p3: T, u: f64) -> T {
    let u2 = u * u;
    let u3 = u2 * u;

    let m1 = (p2 - p0) * 0.5;
    let m2 = (p3 - p1) * 0.5;

    hermite(p1, m1, p2, m2, u2, u3, u)
}

/// Cubic Hermite curve with explicit endpoint tangents, evaluated at `u`.
pub fn cubic_hermite<T: SplineValue>(p0: T, m0: T, p1: T, m1: T, u: f64) -> T {
    let u2 = u * u;
    let u3 = u2 * u;
    hermite(p0, m0, p1, m1, u2, u3, u)
}

/// Derivative of [`cubic_hermite`] with respect to `u`.
pub fn cubic_hermite_derivative<T: SplineValue>(p0: T, m0: T, p1: T, m1: T, u: f64) -> T {
    let u2 = u * u;
    let d00 = 6.0 * u2 - 6.0 * u;
    let d10 = 3.0 * u2 - 4.0 * u + 1.0;
    let d01 = -6.0 * u2 + 6.0 * u;
    let d11 = 3.0 * u2 - 2.0 * u;
    p0 * d00 + m0 * d10 + p1 * d01 + m1 * d11
}

fn hermite<T: SplineValue>(p0: T, m0: T, p1: T, m1: T, u2: f64, u3: f64, u: f64) -> T {
    let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
    let h10 = u3 - 2.0 * u2 + u;
    let h01 = -2.0 * u3 + 3.0 * u2;
    let h11 = u3 - u2;
    p0 * h00 + m0 * h10 + p1 * h01 + m1 * h11
}

/// Reflect `neighbor` through `edge`: the phantom control point for linear quantities.
pub fn reflect_linear<T: SplineValue>(edge: T, neighbor: T) -> T {
    edge * 2.0 - neighbor
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
