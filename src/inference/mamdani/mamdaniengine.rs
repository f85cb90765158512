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
use crate::fuzzy::variable::{
    TermShape,
    Variable
};
use crate::inference::inferenceengine::{
    validate_fallback,
    InferenceEngine
};
use crate::inference::inferenceoutcome::{
    InferenceOutcome,
    RuleFiring,
    RuleOutput
};
use crate::inference::mamdani::defuzzification::DefuzzificationMethod;
use crate::inference::riskinput::RiskInput;
use crate::math::curve::curve::Curve;
use crate::math::curve::sampledcurve::SampledCurve;

// ─────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────

/// `resolution` is the number of samples over the output domain. Cost per
/// evaluation grows linearly with it; the default of 1001 puts the centroid
/// within about 1e-4 of the exact integral for the reference rule base.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MamdaniOptions {
    t_norm: TNorm,
    defuzzification: DefuzzificationMethod,
    resolution: usize,
    fallback: Option<f64>
}

impl Default for MamdaniOptions {
    fn default() -> Self {
        MamdaniOptions {
            t_norm: TNorm::Minimum,
            defuzzification: DefuzzificationMethod::Centroid,
            resolution: 1001,
            fallback: None
        }
    }
}

impl MamdaniOptions {
    pub fn with_t_norm(mut self, t_norm: TNorm) -> Self {
        self.t_norm = t_norm;
        self
    }

    pub fn with_defuzzification(mut self, defuzzification: DefuzzificationMethod) -> Self {
        self.defuzzification = defuzzification;
        self
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Value returned when no rule fires. Defaults to the output midpoint.
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn t_norm(&self) -> TNorm {
        self.t_norm
    }

    pub fn defuzzification(&self) -> DefuzzificationMethod {
        self.defuzzification
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn fallback(&self) -> Option<f64> {
        self.fallback
    }
}

// ─────────────────────────────────────────────
// Outcome
// ─────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct MamdaniOutcome {
    outcome: InferenceOutcome,
    aggregated: SampledCurve
}

impl MamdaniOutcome {
    pub fn outcome(&self) -> &InferenceOutcome {
        &self.outcome
    }

    pub fn aggregated(&self) -> &SampledCurve {
        &self.aggregated
    }

    pub fn into_outcome(self) -> InferenceOutcome {
        self.outcome
    }
}

// ─────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────

/// Fuzzify, fire, clip each consequent at its rule's strength, aggregate by
/// max, defuzzify.
#[derive(Clone, Debug)]
pub struct MamdaniEngine {
    fuzzifier: Fuzzifier,
    output: Variable,
    rules: Vec<BoundRule>,
    options: MamdaniOptions,
    fallback: f64,
    grid: SampledCurve,
    term_names: Vec<String>,
    term_samples: Vec<Vec<f64>>
}

impl MamdaniEngine {
    pub fn new(fuzzifier: Fuzzifier,
               output: Variable,
               rule_base: &RuleBase,
               options: MamdaniOptions) -> Result<MamdaniEngine, ConfigurationError> {
        if options.resolution < 3 {
            return Err(ConfigurationError::InvalidResolution(options.resolution));
        }
        let fallback = validate_fallback(options.fallback, &output)?;
        let rules = rule_base.bind_fuzzy(&fuzzifier, &output)?;

        let xs = output.domain().linspace(options.resolution);
        let mut term_samples = Vec::with_capacity(output.terms().len());
        for (term, shape) in output.terms().iter() {
            match shape {
                TermShape::Fixed(membership_function) => term_samples.push(membership_function.sample(&xs)),
                TermShape::Banded(_) => return Err(ConfigurationError::BandAnchoredTerm {
                    variable: output.name().to_owned(),
                    term: term.to_owned()
                })
            }
        }
        let term_names = output.terms().names().map(str::to_owned).collect();
        let zeros = vec![0.0; xs.len()];
        let grid = SampledCurve::new(xs, zeros)
            .ok_or(ConfigurationError::InvalidResolution(options.resolution))?;

        info!(
            rules = rules.len(),
            resolution = options.resolution,
            t_norm = ?options.t_norm,
            defuzzification = ?options.defuzzification,
            "built Mamdani engine"
        );
        Ok(MamdaniEngine { fuzzifier, output, rules, options, fallback, grid, term_names, term_samples })
    }

    pub fn fuzzifier(&self) -> &Fuzzifier {
        &self.fuzzifier
    }

    pub fn output(&self) -> &Variable {
        &self.output
    }

    pub fn options(&self) -> &MamdaniOptions {
        &self.options
    }

    pub fn fallback(&self) -> f64 {
        self.fallback
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Pointwise max over rules of `min(consequent(x), strength)`.
    /// `strengths` is aligned with the bound rules.
    pub fn aggregate(&self, strengths: &[f64]) -> SampledCurve {
        let mut aggregated = self.grid.clone();
        let ys = aggregated.ys_mut();
        for (rule, &strength) in self.rules.iter().zip(strengths) {
            if strength <= 0.0 {
                continue;
            }
            let Some(term_index) = rule.consequent().term_index() else {
                continue;
            };
            for (y, &mu) in ys.iter_mut().zip(&self.term_samples[term_index]) {
                *y = y.max(mu.min(strength));
            }
        }
        aggregated
    }

    pub fn infer(&self, fuzzification: &Fuzzification) -> MamdaniOutcome {
        let grades = fuzzification.grades();
        let norm = self.options.t_norm;
        let strengths: Vec<f64> = self.rules
            .iter()
            .map(|rule| rule.firing_strength(grades, norm))
            .collect();

        let firings = self.rules
            .iter()
            .zip(&strengths)
            .map(|(rule, &strength)| {
                let term = rule.consequent()
                    .term_index()
                    .and_then(|i| self.term_names.get(i))
                    .cloned()
                    .unwrap_or_default();
                trace!(rule = rule.label(), strength, term = %term, "fired rule");
                RuleFiring::new(rule.label(), strength, RuleOutput::Term(term))
            })
            .collect();

        let aggregated = self.aggregate(&strengths);
        let (risk, fallback_used) = match self.options.defuzzification.defuzzify(&aggregated) {
            Some(x) => (self.output.domain().clamp(x), false),
            None => {
                debug!(fallback = self.fallback, "no Mamdani rule fired, using fallback");
                (self.fallback, true)
            }
        };

        MamdaniOutcome {
            outcome: InferenceOutcome::new(risk, fallback_used, *fuzzification.band(), firings),
            aggregated
        }
    }

    pub fn evaluate_detailed(&self, input: &RiskInput) -> MamdaniOutcome {
        self.infer(&self.fuzzifier.fuzzify_input(input))
    }
}

impl InferenceEngine for MamdaniEngine {
    fn name(&self) -> &'static str {
        "mamdani"
    }

    fn evaluate(&self, input: &RiskInput) -> InferenceOutcome {
        self.evaluate_detailed(input).into_outcome()
    }
}
