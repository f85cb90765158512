use serde::Deserialize;

/// Fuzzy AND. The OR operator is the dual t-conorm of the chosen t-norm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum TNorm {
    /// AND = min, OR = max
    Minimum,
    /// AND = product, OR = probabilistic sum
    Product
}

impl TNorm {
    #[inline]
    pub fn and(&self, a: f64, b: f64) -> f64 {
        match self {
            TNorm::Minimum => a.min(b),
            TNorm::Product => a * b
        }
    }

    #[inline]
    pub fn or(&self, a: f64, b: f64) -> f64 {
        match self {
            TNorm::Minimum => a.max(b),
            TNorm::Product => a + b - a * b
        }
    }

    #[inline]
    pub fn not(&self, a: f64) -> f64 {
        1.0 - a
    }

    /// Identity element of `and`.
    pub fn and_identity(&self) -> f64 {
        1.0
    }

    /// Identity element of `or`.
    pub fn or_identity(&self) -> f64 {
        0.0
    }
}
