use crate::configurationerror::ConfigurationError;
use crate::math::curve::curve::Curve;

/// Parametric membership function over a scalar domain.
///
/// Only the validating constructors build these, so every value carries
/// ordered parameters and `evaluate` always lands in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MembershipFunction {
    /// 1 up to `a`, quadratic spline down to 0 at `b`.
    ZShaped { a: f64, b: f64 },
    /// 0 up to `a`, quadratic spline up to 1 at `b`.
    SShaped { a: f64, b: f64 },
    /// Peak 1 at `b`, zero outside `[a, c]`.
    Triangular { a: f64, b: f64, c: f64 }
}

fn all_finite(params: &[f64]) -> bool {
    params.iter().all(|p| p.is_finite())
}

impl MembershipFunction {
    pub fn z_shaped(a: f64, b: f64) -> Result<MembershipFunction, ConfigurationError> {
        if !all_finite(&[a, b]) || a >= b {
            return Err(ConfigurationError::NonMonotonicParameters { shape: "z-shaped", params: vec![a, b] });
        }
        Ok(MembershipFunction::ZShaped { a, b })
    }

    pub fn s_shaped(a: f64, b: f64) -> Result<MembershipFunction, ConfigurationError> {
        if !all_finite(&[a, b]) || a >= b {
            return Err(ConfigurationError::NonMonotonicParameters { shape: "s-shaped", params: vec![a, b] });
        }
        Ok(MembershipFunction::SShaped { a, b })
    }

    pub fn triangular(a: f64, b: f64, c: f64) -> Result<MembershipFunction, ConfigurationError> {
        if !all_finite(&[a, b, c]) || a > b || b > c {
            return Err(ConfigurationError::NonMonotonicParameters { shape: "triangular", params: vec![a, b, c] });
        }
        Ok(MembershipFunction::Triangular { a, b, c })
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let y = match *self {
            MembershipFunction::ZShaped { a, b } => z_spline(x, a, b),
            MembershipFunction::SShaped { a, b } => 1.0 - z_spline(x, a, b),
            MembershipFunction::Triangular { a, b, c } => triangle(x, a, b, c)
        };
        y.clamp(0.0, 1.0)
    }
}

impl Curve for MembershipFunction {
    fn value(&self, x: f64) -> f64 {
        self.evaluate(x)
    }
}

fn z_spline(x: f64, a: f64, b: f64) -> f64 {
    if x <= a {
        1.0
    } else if x >= b {
        0.0
    } else if x <= 0.5 * (a + b) {
        let t = (x - a) / (b - a);
        1.0 - 2.0 * t * t
    } else {
        let t = (x - b) / (b - a);
        2.0 * t * t
    }
}

// Zero-width ramps never get divided through: the strict inequalities below
// leave them empty and the peak check turns them into exact steps.
fn triangle(x: f64, a: f64, b: f64, c: f64) -> f64 {
    if x == b {
        1.0
    } else if a < x && x < b {
        (x - a) / (b - a)
    } else if b < x && x < c {
        (c - x) / (c - b)
    } else {
        0.0
    }
}
