use serde::Deserialize;

use crate::math::curve::sampledcurve::SampledCurve;

/// Samples within this distance of the peak count as maxima.
const MAXIMUM_TOLERANCE: f64 = 1e-12;

/// Turns an aggregated output curve into one crisp value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
pub enum DefuzzificationMethod {
    /// Centre of area.
    #[default]
    Centroid,
    /// Smallest x splitting the area into equal halves.
    Bisector,
    /// Mean of all x where the curve peaks, plateaus included.
    MeanOfMaximum,
    SmallestOfMaximum,
    LargestOfMaximum
}

impl DefuzzificationMethod {
    /// `None` when the curve is identically zero; the caller decides the
    /// fallback.
    pub fn defuzzify(&self, curve: &SampledCurve) -> Option<f64> {
        if curve.is_zero() {
            return None;
        }
        match self {
            DefuzzificationMethod::Centroid => centroid(curve),
            DefuzzificationMethod::Bisector => bisector(curve),
            DefuzzificationMethod::MeanOfMaximum => {
                let maxima = maxima(curve);
                Some(maxima.iter().sum::<f64>() / maxima.len() as f64)
            },
            DefuzzificationMethod::SmallestOfMaximum => maxima(curve).first().copied(),
            DefuzzificationMethod::LargestOfMaximum => maxima(curve).last().copied()
        }
    }
}

fn centroid(curve: &SampledCurve) -> Option<f64> {
    let area = curve.area();
    if area > 0.0 {
        Some(curve.first_moment() / area)
    } else {
        None
    }
}

fn bisector(curve: &SampledCurve) -> Option<f64> {
    let half = 0.5 * curve.area();
    if half <= 0.0 {
        return None;
    }
    let xs = curve.xs();
    let ys = curve.ys();
    let mut accumulated = 0.0;
    for (i, segment) in curve.segment_areas().enumerate() {
        if accumulated + segment >= half {
            let need = half - accumulated;
            let h = xs[i + 1] - xs[i];
            return Some(xs[i] + split_offset(ys[i], ys[i + 1], h, need));
        }
        accumulated += segment;
    }
    Some(curve.max_x())
}

// Offset t in [0, h] where the area under the linear segment from y0 to y1
// reaches `need`: y0 t + (y1 - y0) t^2 / 2h = need, solved in the
// cancellation-free form.
fn split_offset(y0: f64, y1: f64, h: f64, need: f64) -> f64 {
    if need <= 0.0 {
        return 0.0;
    }
    let slope_term = (y1 - y0) / (2.0 * h);
    let discriminant = (y0 * y0 + 4.0 * slope_term * need).max(0.0);
    let denominator = y0 + discriminant.sqrt();
    if denominator <= 0.0 {
        return h;
    }
    (2.0 * need / denominator).clamp(0.0, h)
}

fn maxima(curve: &SampledCurve) -> Vec<f64> {
    let peak = curve.max_y();
    curve
        .xs()
        .iter()
        .zip(curve.ys())
        .filter(|&(_, &y)| (peak - y).abs() <= MAXIMUM_TOLERANCE)
        .map(|(&x, _)| x)
        .collect()
}
