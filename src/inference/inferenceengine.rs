use crate::configurationerror::ConfigurationError;
use crate::fuzzy::variable::Variable;
use crate::inference::inferenceoutcome::InferenceOutcome;
use crate::inference::riskinput::RiskInput;

/// A configured engine mapping one input to a crisp risk.
///
/// Engines hold only immutable configuration, so a single instance can be
/// shared across threads and called concurrently.
pub trait InferenceEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, input: &RiskInput) -> InferenceOutcome;

    fn risk(&self, input: &RiskInput) -> f64 {
        self.evaluate(input).risk()
    }
}

/// Value returned when no rule fires: `fallback` if given, else the output
/// midpoint. Must lie inside the output domain.
pub fn validate_fallback(fallback: Option<f64>, output: &Variable) -> Result<f64, ConfigurationError> {
    let domain = output.domain();
    let value = fallback.unwrap_or_else(|| domain.midpoint());
    if !value.is_finite() || !domain.contains(value) {
        return Err(ConfigurationError::InvalidFallback { value, lo: domain.lo(), hi: domain.hi() });
    }
    Ok(value)
}
