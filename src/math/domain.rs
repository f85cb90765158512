use serde::Deserialize;

use crate::configurationerror::ConfigurationError;

/// Closed interval `[lo, hi]` a variable lives on.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "[f64; 2]")]
pub struct Domain {
    lo: f64,
    hi: f64
}

impl Domain {
    pub fn new(lo: f64, hi: f64) -> Result<Domain, ConfigurationError> {
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(ConfigurationError::InvalidDomain { lo, hi });
        }
        Ok(Domain { lo, hi })
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn midpoint(&self) -> f64 {
        0.5 * (self.lo + self.hi)
    }

    pub fn contains(&self, x: f64) -> bool {
        self.lo <= x && x <= self.hi
    }

    /// Nearest point of the domain. NaN maps to the lower edge.
    pub fn clamp(&self, x: f64) -> f64 {
        if x.is_nan() {
            self.lo
        } else {
            x.clamp(self.lo, self.hi)
        }
    }

    /// Position of `x` in the domain, `0` at `lo` and `1` at `hi`.
    pub fn normalize(&self, x: f64) -> f64 {
        (self.clamp(x) - self.lo) / self.width()
    }

    pub fn linspace(&self, n: usize) -> Vec<f64> {
        linspace(self.lo, self.hi, n)
    }
}

/// `n` evenly spaced samples from `lo` to `hi`, both ends included exactly.
/// A single sample sits at `lo`.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let last = (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { hi } else { lo + (hi - lo) * (i as f64) / last })
                .collect()
        }
    }
}

impl TryFrom<[f64; 2]> for Domain {
    type Error = ConfigurationError;

    fn try_from(bounds: [f64; 2]) -> Result<Self, Self::Error> {
        Domain::new(bounds[0], bounds[1])
    }
}
