use crate::fuzzy::ageband::AgeBand;

/// What a rule produced in one evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum RuleOutput {
    /// Mamdani: the output term clipped at the firing strength.
    Term(String),
    /// Sugeno: crisp output `z` and its weighted share `strength * z`.
    Numeric { value: f64, contribution: f64 }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuleFiring {
    label: String,
    strength: f64,
    output: RuleOutput
}

impl RuleFiring {
    pub fn new(label: &str, strength: f64, output: RuleOutput) -> RuleFiring {
        RuleFiring { label: label.to_owned(), strength, output }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn output(&self) -> &RuleOutput {
        &self.output
    }

    pub fn value(&self) -> Option<f64> {
        match self.output {
            RuleOutput::Numeric { value, .. } => Some(value),
            RuleOutput::Term(_) => None
        }
    }

    pub fn contribution(&self) -> Option<f64> {
        match self.output {
            RuleOutput::Numeric { contribution, .. } => Some(contribution),
            RuleOutput::Term(_) => None
        }
    }
}

/// Crisp risk plus the per-rule trace behind it.
#[derive(Clone, Debug, PartialEq)]
pub struct InferenceOutcome {
    risk: f64,
    fallback_used: bool,
    band: AgeBand,
    firings: Vec<RuleFiring>
}

impl InferenceOutcome {
    pub fn new(risk: f64, fallback_used: bool, band: AgeBand, firings: Vec<RuleFiring>) -> InferenceOutcome {
        InferenceOutcome { risk, fallback_used, band, firings }
    }

    pub fn risk(&self) -> f64 {
        self.risk
    }

    /// True when no rule fired and the configured fallback was returned.
    pub fn fallback_used(&self) -> bool {
        self.fallback_used
    }

    pub fn band(&self) -> &AgeBand {
        &self.band
    }

    pub fn firings(&self) -> &[RuleFiring] {
        &self.firings
    }

    pub fn firing(&self, label: &str) -> Option<&RuleFiring> {
        self.firings.iter().find(|firing| firing.label == label)
    }

    pub fn total_strength(&self) -> f64 {
        self.firings.iter().map(RuleFiring::strength).sum()
    }
}
