use crate::math::curve::curve::Curve;

/// Piecewise-linear curve through `(xs[i], ys[i])`.
///
/// Mamdani aggregation produces one of these over the output domain; the
/// defuzzifiers integrate it segment by segment, treating each segment as
/// exactly linear.
#[derive(Clone, Debug, PartialEq)]
pub struct SampledCurve {
    xs: Vec<f64>,
    ys: Vec<f64>
}

impl SampledCurve {
    /// `None` unless there are at least two samples, as many ys as xs, and
    /// strictly increasing xs.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Option<SampledCurve> {
        if xs.len() < 2 || xs.len() != ys.len() {
            return None;
        }
        if xs.windows(2).any(|w| !(w[0] < w[1])) {
            return None;
        }
        Some(SampledCurve { xs, ys })
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn ys_mut(&mut self) -> &mut [f64] {
        &mut self.ys
    }

    pub fn min_x(&self) -> f64 {
        self.xs[0]
    }

    pub fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    pub fn max_y(&self) -> f64 {
        self.ys.iter().copied().fold(0.0, f64::max)
    }

    /// True when no sample rises above zero.
    pub fn is_zero(&self) -> bool {
        self.ys.iter().all(|&y| y <= 0.0)
    }

    pub fn segment_areas(&self) -> impl Iterator<Item = f64> + '_ {
        self.xs
            .windows(2)
            .zip(self.ys.windows(2))
            .map(|(x, y)| 0.5 * (x[1] - x[0]) * (y[0] + y[1]))
    }

    pub fn area(&self) -> f64 {
        self.segment_areas().sum()
    }

    /// Integral of `x * y(x)`.
    pub fn first_moment(&self) -> f64 {
        self.xs
            .windows(2)
            .zip(self.ys.windows(2))
            .map(|(x, y)| {
                let h = x[1] - x[0];
                h / 6.0 * (x[0] * (2.0 * y[0] + y[1]) + x[1] * (y[0] + 2.0 * y[1]))
            })
            .sum()
    }

    fn find_segment(&self, x: f64) -> usize {
        let last = self.xs.len() - 2;
        if x <= self.min_x() {
            0
        } else if x >= self.max_x() {
            last
        } else {
            (self.xs.partition_point(|&xi| xi <= x) - 1).min(last)
        }
    }
}

impl Curve for SampledCurve {
    /// Linear interpolation between samples; flat extension outside.
    fn value(&self, x: f64) -> f64 {
        if x <= self.min_x() {
            return self.ys[0];
        }
        if x >= self.max_x() {
            return self.ys[self.ys.len() - 1];
        }
        let i = self.find_segment(x);
        let t = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        self.ys[i] + t * (self.ys[i + 1] - self.ys[i])
    }
}
