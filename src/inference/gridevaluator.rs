use rayon::prelude::*;
use tracing::info;

use crate::configurationerror::ConfigurationError;
use crate::inference::inferenceengine::InferenceEngine;
use crate::inference::riskinput::RiskInput;
use crate::math::domain::linspace;

/// Evenly spaced sample points, both ends included.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridAxis {
    min: f64,
    max: f64,
    points: usize
}

impl GridAxis {
    pub fn new(min: f64, max: f64, points: usize) -> Result<GridAxis, ConfigurationError> {
        if points == 0 {
            return Err(ConfigurationError::InvalidGridAxis("axis needs at least one point".to_owned()));
        }
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ConfigurationError::InvalidGridAxis(format!("invalid axis range [{}, {}]", min, max)));
        }
        Ok(GridAxis { min, max, points })
    }

    pub fn heart_rate() -> GridAxis {
        GridAxis { min: 30.0, max: 200.0, points: 151 }
    }

    pub fn symptoms() -> GridAxis {
        GridAxis { min: 0.0, max: 10.0, points: 101 }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn points(&self) -> usize {
        self.points
    }

    pub fn values(&self) -> Vec<f64> {
        linspace(self.min, self.max, self.points)
    }
}

/// Risk over an HR x Symptoms grid; `values[symptom_index][hr_index]`.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskSurface {
    heart_rates: Vec<f64>,
    symptoms: Vec<f64>,
    values: Vec<Vec<f64>>
}

impl RiskSurface {
    pub fn heart_rates(&self) -> &[f64] {
        &self.heart_rates
    }

    pub fn symptoms(&self) -> &[f64] {
        &self.symptoms
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn value(&self, symptom_index: usize, hr_index: usize) -> Option<f64> {
        self.values.get(symptom_index).and_then(|row| row.get(hr_index)).copied()
    }

    pub fn min(&self) -> f64 {
        self.values.iter().flatten().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().flatten().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridEvaluator {
    heart_rate_axis: GridAxis,
    symptoms_axis: GridAxis
}

impl Default for GridEvaluator {
    fn default() -> Self {
        GridEvaluator::new(GridAxis::heart_rate(), GridAxis::symptoms())
    }
}

impl GridEvaluator {
    pub fn new(heart_rate_axis: GridAxis, symptoms_axis: GridAxis) -> GridEvaluator {
        GridEvaluator { heart_rate_axis, symptoms_axis }
    }

    pub fn heart_rate_axis(&self) -> &GridAxis {
        &self.heart_rate_axis
    }

    pub fn symptoms_axis(&self) -> &GridAxis {
        &self.symptoms_axis
    }

    /// One row per symptoms value, evaluated in parallel.
    pub fn evaluate(&self, engine: &dyn InferenceEngine, age: f64, is_athlete: bool) -> RiskSurface {
        let heart_rates = self.heart_rate_axis.values();
        let symptoms = self.symptoms_axis.values();
        let values: Vec<Vec<f64>> = symptoms
            .par_iter()
            .map(|&s| {
                heart_rates
                    .iter()
                    .map(|&hr| engine.risk(&RiskInput::new(hr, s, age, is_athlete)))
                    .collect::<Vec<f64>>()
            })
            .collect();
        info!(
            engine = engine.name(),
            rows = symptoms.len(),
            columns = heart_rates.len(),
            "evaluated risk surface"
        );
        RiskSurface { heart_rates, symptoms, values }
    }
}
