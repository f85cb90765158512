use serde::Deserialize;
use tracing::{
    debug,
    info,
    trace
};

use crate::configurationerror::ConfigurationError;
use crate::fuzzy::fuzzifier::{
    Fuzzification,
    Fuzzifier
};
use crate::fuzzy::norm::TNorm;
use crate::fuzzy::rule::rule::BoundRule;
use crate::fuzzy::rule::rulebase::RuleBase;
use crate::fuzzy::variable::Variable;
use crate::inference::inferenceengine::{
    validate_fallback,
    InferenceEngine
};
use crate::inference::inferenceoutcome::{
    InferenceOutcome,
    RuleFiring,
    RuleOutput
};
use crate::inference::riskinput::RiskInput;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SugenoOptions {
    t_norm: TNorm,
    fallback: Option<f64>
}

impl Default for SugenoOptions {
    fn default() -> Self {
        SugenoOptions {
            t_norm: TNorm::Product,
            fallback: None
        }
    }
}

impl SugenoOptions {
    pub fn with_t_norm(mut self, t_norm: TNorm) -> Self {
        self.t_norm = t_norm;
        self
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn t_norm(&self) -> TNorm {
        self.t_norm
    }

    pub fn fallback(&self) -> Option<f64> {
        self.fallback
    }
}

/// Takagi-Sugeno inference: the crisp output is the strength-weighted mean
/// of every rule's numeric output.
#[derive(Clone, Debug)]
pub struct SugenoEngine {
    fuzzifier: Fuzzifier,
    output: Variable,
    rules: Vec<BoundRule>,
    options: SugenoOptions,
    fallback: f64
}

impl SugenoEngine {
    pub fn new(fuzzifier: Fuzzifier,
               output: Variable,
               rule_base: &RuleBase,
               options: SugenoOptions) -> Result<SugenoEngine, ConfigurationError> {
        let fallback = validate_fallback(options.fallback, &output)?;
        let rules = rule_base.bind_numeric(&fuzzifier)?;
        info!(rules = rules.len(), t_norm = ?options.t_norm, "built Sugeno engine");
        Ok(SugenoEngine { fuzzifier, output, rules, options, fallback })
    }

    pub fn fuzzifier(&self) -> &Fuzzifier {
        &self.fuzzifier
    }

    pub fn output(&self) -> &Variable {
        &self.output
    }

    pub fn options(&self) -> &SugenoOptions {
        &self.options
    }

    pub fn fallback(&self) -> f64 {
        self.fallback
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn infer(&self, fuzzification: &Fuzzification) -> InferenceOutcome {
        let grades = fuzzification.grades();
        let inputs = fuzzification.normalized_inputs();
        let norm = self.options.t_norm;

        let mut weight_sum = 0.0;
        let mut weighted_sum = 0.0;
        let mut firings = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let strength = rule.firing_strength(grades, norm);
            // binding guarantees a numeric consequent
            let value = rule.consequent().output(inputs).unwrap_or(0.0);
            let contribution = strength * value;
            trace!(rule = rule.label(), strength, value, "fired rule");
            weight_sum += strength;
            weighted_sum += contribution;
            firings.push(RuleFiring::new(rule.label(), strength, RuleOutput::Numeric { value, contribution }));
        }

        let (risk, fallback_used) = if weight_sum > 0.0 {
            (self.output.domain().clamp(weighted_sum / weight_sum), false)
        } else {
            debug!(fallback = self.fallback, "no Sugeno rule fired, using fallback");
            (self.fallback, true)
        };
        InferenceOutcome::new(risk, fallback_used, *fuzzification.band(), firings)
    }
}

impl InferenceEngine for SugenoEngine {
    fn name(&self) -> &'static str {
        "sugeno"
    }

    fn evaluate(&self, input: &RiskInput) -> InferenceOutcome {
        self.infer(&self.fuzzifier.fuzzify_input(input))
    }
}
