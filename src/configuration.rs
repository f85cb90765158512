use std::collections::HashMap;
use std::fs::File;
use std::io::{
    BufReader,
    Read
};
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::configurationerror::ConfigurationError;
use crate::fuzzy::ageband::AgeBandPolicy;
use crate::fuzzy::fuzzifier::Fuzzifier;
use crate::fuzzy::membershipfunction::MembershipFunction;
use crate::fuzzy::rule::antecedent::Antecedent;
use crate::fuzzy::rule::consequent::Consequent;
use crate::fuzzy::rule::rule::Rule;
use crate::fuzzy::rule::rulebase::RuleBase;
use crate::fuzzy::variable::{
    BandAnchor,
    Normalization,
    TermShape,
    Variable
};
use crate::inference::mamdani::mamdaniengine::{
    MamdaniEngine,
    MamdaniOptions
};
use crate::inference::sugeno::sugenoengine::{
    SugenoEngine,
    SugenoOptions
};
use crate::manager::manager::{
    parse_json_value,
    Manager
};
use crate::math::domain::Domain;

// ─────────────────────────────────────────────
// JSON
// ─────────────────────────────────────────────

#[derive(Deserialize)]
enum ShapeType {
    ZShaped,
    SShaped,
    Triangular,
    BelowBand,
    WithinBand,
    AboveBand
}

#[derive(Deserialize)]
struct ShapeTypedObject {
    shape_type: ShapeType
}

#[derive(Deserialize)]
struct SplineJsonProp {
    a: f64,
    b: f64
}

#[derive(Deserialize)]
struct TriangularJsonProp {
    a: f64,
    b: f64,
    c: f64
}

fn get_term_shape_from_json(json_value: serde_json::Value) -> Result<TermShape, ConfigurationError> {
    let typed_object: ShapeTypedObject = parse_json_value(json_value.clone())?;
    let shape = match typed_object.shape_type {
        ShapeType::ZShaped => {
            let json_prop: SplineJsonProp = parse_json_value(json_value)?;
            TermShape::Fixed(MembershipFunction::z_shaped(json_prop.a, json_prop.b)?)
        },
        ShapeType::SShaped => {
            let json_prop: SplineJsonProp = parse_json_value(json_value)?;
            TermShape::Fixed(MembershipFunction::s_shaped(json_prop.a, json_prop.b)?)
        },
        ShapeType::Triangular => {
            let json_prop: TriangularJsonProp = parse_json_value(json_value)?;
            TermShape::Fixed(MembershipFunction::triangular(json_prop.a, json_prop.b, json_prop.c)?)
        },
        ShapeType::BelowBand => TermShape::Banded(BandAnchor::BelowBand),
        ShapeType::WithinBand => TermShape::Banded(BandAnchor::WithinBand),
        ShapeType::AboveBand => TermShape::Banded(BandAnchor::AboveBand)
    };
    Ok(shape)
}

#[derive(Deserialize)]
struct VariableJsonProp {
    name: String,
    domain: Domain,
    #[serde(default)]
    normalization: Normalization,
    terms: Vec<serde_json::Value>
}

fn get_variable_from_json(json_value: serde_json::Value) -> Result<Variable, ConfigurationError> {
    let json_prop: VariableJsonProp = parse_json_value(json_value)?;
    let mut terms = Manager::new();
    terms.insert_obj_from_json_vec(&json_prop.terms, get_term_shape_from_json)?;
    if terms.is_empty() {
        return Err(ConfigurationError::EmptyVariable(json_prop.name));
    }
    Ok(Variable::from_terms(&json_prop.name, json_prop.domain, terms).with_normalization(json_prop.normalization))
}

#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default)]
    band_policy: AgeBandPolicy,
    heart_rate: serde_json::Value,
    symptoms: serde_json::Value,
    risk: serde_json::Value,
    rules: Vec<serde_json::Value>,
    #[serde(default)]
    sugeno_rules: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    sugeno_term_values: Option<HashMap<String, f64>>,
    #[serde(default)]
    mamdani: MamdaniOptions,
    #[serde(default)]
    sugeno: SugenoOptions
}

// ─────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────

/// Variables, rule bases and engine options of one risk model.
///
/// Sugeno rules are either given explicitly or derived from the Mamdani
/// rules by replacing every output term with a constant.
#[derive(Clone, Debug)]
pub struct FuzzySystemConfiguration {
    band_policy: AgeBandPolicy,
    heart_rate: Variable,
    symptoms: Variable,
    risk: Variable,
    rules: RuleBase,
    sugeno_rules: Option<RuleBase>,
    mamdani_options: MamdaniOptions,
    sugeno_options: SugenoOptions
}

impl FuzzySystemConfiguration {
    /// The cardiac risk knowledge base: age-banded HR terms, fixed symptom
    /// and risk terms, ten rules, and Sugeno constants low 2, medium 5,
    /// high 8.5.
    pub fn reference() -> Result<FuzzySystemConfiguration, ConfigurationError> {
        let heart_rate = Variable::new("hr", Domain::new(30.0, 200.0)?)
            .with_normalization(Normalization::Band)
            .with_term("low", TermShape::Banded(BandAnchor::BelowBand))?
            .with_term("normal", TermShape::Banded(BandAnchor::WithinBand))?
            .with_term("high", TermShape::Banded(BandAnchor::AboveBand))?;
        let symptoms = Variable::new("symptoms", Domain::new(0.0, 10.0)?)
            .with_fixed_term("low", MembershipFunction::z_shaped(2.0, 4.0)?)?
            .with_fixed_term("medium", MembershipFunction::triangular(3.0, 5.0, 7.0)?)?
            .with_fixed_term("high", MembershipFunction::s_shaped(6.0, 8.0)?)?;
        let risk = Variable::new("risk", Domain::new(0.0, 10.0)?)
            .with_fixed_term("low", MembershipFunction::triangular(0.0, 0.0, 4.0)?)?
            .with_fixed_term("medium", MembershipFunction::triangular(2.0, 5.0, 8.0)?)?
            .with_fixed_term("high", MembershipFunction::triangular(6.0, 10.0, 10.0)?)?;

        let when = |hr: &str, sym: &str| Antecedent::and(vec![
            Antecedent::is("hr", hr),
            Antecedent::is("symptoms", sym)
        ]);
        let rules = RuleBase::new(vec![
            Rule::new("H1", when("low", "medium"), Consequent::term("high")),
            Rule::new("H2", when("low", "high"), Consequent::term("high")),
            Rule::new("H3", when("high", "medium"), Consequent::term("high")),
            Rule::new("H4", when("high", "high"), Consequent::term("high")),
            Rule::new("H5", when("normal", "high"), Consequent::term("high")),
            Rule::new("M1", when("low", "low"), Consequent::term("medium")),
            Rule::new("M2", when("high", "low"), Consequent::term("medium")),
            Rule::new("M3", when("normal", "medium"), Consequent::term("medium")),
            Rule::new(
                "M4",
                Antecedent::or(vec![Antecedent::is("hr", "low"), Antecedent::is("hr", "high")]),
                Consequent::term("medium")
            ).with_weight(0.5),
            Rule::new("L1", when("normal", "low"), Consequent::term("low")),
        ])?;
        let term_values = HashMap::from([
            ("low".to_owned(), 2.0),
            ("medium".to_owned(), 5.0),
            ("high".to_owned(), 8.5)
        ]);
        let sugeno_rules = rules.with_constant_consequents(&term_values)?;

        Ok(FuzzySystemConfiguration {
            band_policy: AgeBandPolicy::default(),
            heart_rate,
            symptoms,
            risk,
            rules,
            sugeno_rules: Some(sugeno_rules),
            mamdani_options: MamdaniOptions::default(),
            sugeno_options: SugenoOptions::default()
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<FuzzySystemConfiguration, ConfigurationError> {
        let json_prop: ConfigurationJsonProp = serde_json::from_reader(reader)?;
        Self::from_json_prop(json_prop)
    }

    pub fn from_file<P: AsRef<Path>>(file_path: P) -> Result<FuzzySystemConfiguration, ConfigurationError> {
        let file = File::open(file_path.as_ref())?;
        let configuration = Self::from_reader(BufReader::new(file))?;
        info!(path = %file_path.as_ref().display(), "loaded configuration file");
        Ok(configuration)
    }

    pub fn from_json_str(json: &str) -> Result<FuzzySystemConfiguration, ConfigurationError> {
        let json_prop: ConfigurationJsonProp = serde_json::from_str(json)?;
        Self::from_json_prop(json_prop)
    }

    fn from_json_prop(json_prop: ConfigurationJsonProp) -> Result<FuzzySystemConfiguration, ConfigurationError> {
        let heart_rate = get_variable_from_json(json_prop.heart_rate)?;
        let symptoms = get_variable_from_json(json_prop.symptoms)?;
        let risk = get_variable_from_json(json_prop.risk)?;
        let rules = RuleBase::from_json_vec(&json_prop.rules)?;
        let sugeno_rules = match (json_prop.sugeno_rules, json_prop.sugeno_term_values) {
            (Some(json_vec), _) => Some(RuleBase::from_json_vec(&json_vec)?),
            (None, Some(term_values)) => Some(rules.with_constant_consequents(&term_values)?),
            (None, None) => None
        };

        let configuration = FuzzySystemConfiguration {
            band_policy: json_prop.band_policy,
            heart_rate,
            symptoms,
            risk,
            rules,
            sugeno_rules,
            mamdani_options: json_prop.mamdani,
            sugeno_options: json_prop.sugeno
        };
        // fail at load time rather than at first use
        let fuzzifier = configuration.fuzzifier()?;
        configuration.rules.bind_fuzzy(&fuzzifier, &configuration.risk)?;
        if let Some(sugeno_rules) = &configuration.sugeno_rules {
            sugeno_rules.bind_numeric(&fuzzifier)?;
        }
        info!(
            rules = configuration.rules.len(),
            sugeno_rules = configuration.sugeno_rules.as_ref().map_or(0, RuleBase::len),
            "loaded fuzzy system configuration"
        );
        Ok(configuration)
    }

    pub fn with_mamdani_options(mut self, options: MamdaniOptions) -> Self {
        self.mamdani_options = options;
        self
    }

    pub fn with_sugeno_options(mut self, options: SugenoOptions) -> Self {
        self.sugeno_options = options;
        self
    }

    pub fn band_policy(&self) -> &AgeBandPolicy {
        &self.band_policy
    }

    pub fn heart_rate(&self) -> &Variable {
        &self.heart_rate
    }

    pub fn symptoms(&self) -> &Variable {
        &self.symptoms
    }

    pub fn risk(&self) -> &Variable {
        &self.risk
    }

    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    pub fn sugeno_rules(&self) -> Option<&RuleBase> {
        self.sugeno_rules.as_ref()
    }

    pub fn mamdani_options(&self) -> &MamdaniOptions {
        &self.mamdani_options
    }

    pub fn sugeno_options(&self) -> &SugenoOptions {
        &self.sugeno_options
    }

    pub fn fuzzifier(&self) -> Result<Fuzzifier, ConfigurationError> {
        Fuzzifier::new(self.band_policy.clone(), self.heart_rate.clone(), self.symptoms.clone())
    }

    pub fn mamdani_engine(&self) -> Result<MamdaniEngine, ConfigurationError> {
        MamdaniEngine::new(self.fuzzifier()?, self.risk.clone(), &self.rules, self.mamdani_options)
    }

    pub fn sugeno_engine(&self) -> Result<SugenoEngine, ConfigurationError> {
        let rules = self.sugeno_rules
            .as_ref()
            .ok_or_else(|| ConfigurationError::NameNotFound("sugeno_rules".to_owned()))?;
        SugenoEngine::new(self.fuzzifier()?, self.risk.clone(), rules, self.sugeno_options)
    }
}
