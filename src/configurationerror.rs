use thiserror::Error;

/// Everything that can go wrong while building a fuzzy system.
///
/// Evaluation itself never fails: out-of-domain inputs are clamped and silent
/// rule bases fall back to a configured value. Only structurally invalid
/// configuration ends up here, at construction time.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("invalid domain [{lo}, {hi}]: bounds must be finite with lo < hi")]
    InvalidDomain { lo: f64, hi: f64 },

    #[error("non-monotonic {shape} parameters {params:?}")]
    NonMonotonicParameters { shape: &'static str, params: Vec<f64> },

    #[error("invalid age band policy: {0}")]
    InvalidBandPolicy(String),

    #[error("name '{0}' declared more than once")]
    DuplicateName(String),

    #[error("key '{0}' not found")]
    NameNotFound(String),

    #[error("variable '{0}' declares no terms")]
    EmptyVariable(String),

    #[error("term '{term}' of variable '{variable}' is anchored to the heart-rate band")]
    BandAnchoredTerm { variable: String, term: String },

    #[error("variable '{0}' cannot be normalised by the heart-rate band")]
    BandNormalization(String),

    #[error("rule references undeclared variable '{0}'")]
    UnknownVariable(String),

    #[error("rule references undeclared term '{term}' of variable '{variable}'")]
    UnknownTerm { variable: String, term: String },

    #[error("rule '{label}' has weight {weight}, expected a value in [0, 1]")]
    InvalidWeight { label: String, weight: f64 },

    #[error("curve resolution {0} is too coarse, at least 3 samples are required")]
    InvalidResolution(usize),

    #[error("fallback value {value} lies outside the output domain [{lo}, {hi}]")]
    InvalidFallback { value: f64, lo: f64, hi: f64 },

    #[error("rule '{label}': {reason}")]
    ConsequentMismatch { label: String, reason: String },

    #[error("empty {0} clause in rule antecedent")]
    EmptyClause(&'static str),

    #[error("rule base contains no rules")]
    EmptyRuleBase,

    #[error("invalid grid axis: {0}")]
    InvalidGridAxis(String),
}
