use serde::Deserialize;

use crate::configurationerror::ConfigurationError;
use crate::fuzzy::fuzzifier::Grades;
use crate::fuzzy::norm::TNorm;
use crate::fuzzy::rule::antecedent::{
    Antecedent,
    BoundAntecedent
};
use crate::fuzzy::rule::consequent::{
    BoundConsequent,
    Consequent
};
use crate::manager::manager::parse_json_value;

/// IF antecedent THEN consequent, scaled by `weight`.
///
/// A weight below one models partial "baseline" rules; it multiplies the
/// firing strength and needs no special handling elsewhere.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    label: String,
    antecedent: Antecedent,
    consequent: Consequent,
    weight: f64
}

impl Rule {
    pub fn new(label: &str, antecedent: Antecedent, consequent: Consequent) -> Rule {
        Rule {
            label: label.to_owned(),
            antecedent,
            consequent,
            weight: 1.0
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Rule {
        self.weight = weight;
        self
    }

    pub fn with_consequent(mut self, consequent: Consequent) -> Rule {
        self.consequent = consequent;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn antecedent(&self) -> &Antecedent {
        &self.antecedent
    }

    pub fn consequent(&self) -> &Consequent {
        &self.consequent
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn validate_weight(&self) -> Result<(), ConfigurationError> {
        if !(0.0..=1.0).contains(&self.weight) {
            return Err(ConfigurationError::InvalidWeight { label: self.label.clone(), weight: self.weight });
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct RuleJsonProp {
    name: String,
    antecedent: Antecedent,
    consequent: Consequent,
    #[serde(default = "default_weight")]
    weight: f64
}

fn default_weight() -> f64 {
    1.0
}

pub fn get_rule_from_json(json_value: serde_json::Value) -> Result<Rule, ConfigurationError> {
    let json_prop: RuleJsonProp = parse_json_value(json_value)?;
    Ok(Rule::new(&json_prop.name, json_prop.antecedent, json_prop.consequent).with_weight(json_prop.weight))
}

/// Rule with antecedent and consequent resolved to positions.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundRule {
    label: String,
    antecedent: BoundAntecedent,
    consequent: BoundConsequent,
    weight: f64
}

impl BoundRule {
    pub fn new(label: &str, antecedent: BoundAntecedent, consequent: BoundConsequent, weight: f64) -> BoundRule {
        BoundRule { label: label.to_owned(), antecedent, consequent, weight }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn consequent(&self) -> &BoundConsequent {
        &self.consequent
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    pub fn firing_strength(&self, grades: &Grades, norm: TNorm) -> f64 {
        self.weight * self.antecedent.fire(grades, norm)
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn weight_defaults_to_one() {
        let rule = get_rule_from_json(json!({
            "name": "L1",
            "antecedent": {"is": {"variable": "hr", "term": "normal"}},
            "consequent": {"term": "low"}
        })).unwrap();
        assert_eq!(rule.label(), "L1");
        assert_eq!(rule.weight(), 1.0);
    }

    #[test]
    fn weight_outside_unit_interval_is_invalid() {
        let rule = Rule::new("M4", Antecedent::is("hr", "low"), Consequent::term("medium"));
        assert!(rule.clone().with_weight(0.5).validate_weight().is_ok());
        assert!(rule.clone().with_weight(1.5).validate_weight().is_err());
        assert!(rule.clone().with_weight(-0.1).validate_weight().is_err());
        assert!(rule.with_weight(f64::NAN).validate_weight().is_err());
    }
}
