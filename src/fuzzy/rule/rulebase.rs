use std::collections::HashMap;

use nalgebra::DVector;

use crate::configurationerror::ConfigurationError;
use crate::fuzzy::fuzzifier::Fuzzifier;
use crate::fuzzy::rule::consequent::{
    BoundConsequent,
    Consequent
};
use crate::fuzzy::rule::rule::{
    get_rule_from_json,
    BoundRule,
    Rule
};
use crate::fuzzy::variable::Variable;
use crate::manager::manager::Manager;

/// Ordered rules with unique labels and weights in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct RuleBase {
    rules: Manager<Rule>
}

impl RuleBase {
    pub fn new(rules: Vec<Rule>) -> Result<RuleBase, ConfigurationError> {
        let mut manager = Manager::new();
        for rule in rules {
            let label = rule.label().to_owned();
            manager.insert(&label, rule)?;
        }
        Self::from_manager(manager)
    }

    pub fn from_json_vec(json_vec: &[serde_json::Value]) -> Result<RuleBase, ConfigurationError> {
        let mut manager = Manager::new();
        manager.insert_obj_from_json_vec(json_vec, get_rule_from_json)?;
        Self::from_manager(manager)
    }

    fn from_manager(rules: Manager<Rule>) -> Result<RuleBase, ConfigurationError> {
        if rules.is_empty() {
            return Err(ConfigurationError::EmptyRuleBase);
        }
        for rule in rules.values() {
            rule.validate_weight()?;
        }
        Ok(RuleBase { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    pub fn get(&self, label: &str) -> Result<&Rule, ConfigurationError> {
        self.rules.get(label)
    }

    /// Zero-order Sugeno copy of a term-consequent rule base: every
    /// `Term(t)` becomes `Constant(values[t])`. Numeric consequents are
    /// kept as they are.
    pub fn with_constant_consequents(&self, values: &HashMap<String, f64>) -> Result<RuleBase, ConfigurationError> {
        let rules = self.rules()
            .map(|rule| match rule.consequent() {
                Consequent::Term(term) => values
                    .get(term)
                    .map(|&value| rule.clone().with_consequent(Consequent::Constant(value)))
                    .ok_or_else(|| ConfigurationError::ConsequentMismatch {
                        label: rule.label().to_owned(),
                        reason: format!("no constant given for term '{}'", term)
                    }),
                _ => Ok(rule.clone())
            })
            .collect::<Result<Vec<Rule>, ConfigurationError>>()?;
        RuleBase::new(rules)
    }

    /// Binds for Mamdani inference: every consequent must name a fixed term
    /// of `output`.
    pub fn bind_fuzzy(&self, fuzzifier: &Fuzzifier, output: &Variable) -> Result<Vec<BoundRule>, ConfigurationError> {
        self.rules()
            .map(|rule| {
                let term_index = match rule.consequent() {
                    Consequent::Term(term) => {
                        output.fixed_membership_function(term)?;
                        output.term_index(term).ok_or_else(|| ConfigurationError::UnknownTerm {
                            variable: output.name().to_owned(),
                            term: term.clone()
                        })?
                    },
                    _ => return Err(ConfigurationError::ConsequentMismatch {
                        label: rule.label().to_owned(),
                        reason: "Mamdani inference needs a fuzzy term consequent".to_owned()
                    })
                };
                Self::bind_rule(rule, fuzzifier, BoundConsequent::Term(term_index))
            })
            .collect()
    }

    /// Binds for Sugeno inference: every consequent must be a finite constant
    /// or a linear expression over declared inputs.
    pub fn bind_numeric(&self, fuzzifier: &Fuzzifier) -> Result<Vec<BoundRule>, ConfigurationError> {
        self.rules()
            .map(|rule| {
                let mismatch = |reason: String| ConfigurationError::ConsequentMismatch {
                    label: rule.label().to_owned(),
                    reason
                };
                let consequent = match rule.consequent() {
                    Consequent::Term(term) => {
                        return Err(mismatch(format!("Sugeno inference needs a numeric consequent, found term '{}'", term)));
                    },
                    Consequent::Constant(value) => {
                        if !value.is_finite() {
                            return Err(mismatch(format!("constant {} is not finite", value)));
                        }
                        BoundConsequent::Constant(*value)
                    },
                    Consequent::Linear(expression) => {
                        let mut coefficients = DVector::zeros(fuzzifier.inputs().len());
                        for (variable, &coefficient) in expression.coefficients() {
                            let index = fuzzifier.input_index(variable)?;
                            coefficients[index] = coefficient;
                        }
                        if !expression.intercept().is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                            return Err(mismatch("linear expression has non-finite parameters".to_owned()));
                        }
                        BoundConsequent::Linear { intercept: expression.intercept(), coefficients }
                    }
                };
                Self::bind_rule(rule, fuzzifier, consequent)
            })
            .collect()
    }

    fn bind_rule(rule: &Rule, fuzzifier: &Fuzzifier, consequent: BoundConsequent) -> Result<BoundRule, ConfigurationError> {
        let antecedent = rule
            .antecedent()
            .bind(&|variable: &str, term: &str| fuzzifier.locate(variable, term))?;
        Ok(BoundRule::new(rule.label(), antecedent, consequent, rule.weight()))
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::configuration::FuzzySystemConfiguration;
    use crate::fuzzy::rule::antecedent::Antecedent;
    use crate::fuzzy::rule::consequent::LinearExpression;

    fn rule(label: &str, consequent: Consequent) -> Rule {
        Rule::new(
            label,
            Antecedent::and(vec![Antecedent::is("hr", "normal"), Antecedent::is("symptoms", "low")]),
            consequent
        )
    }

    #[test]
    fn rejects_duplicate_labels_and_empty_bases() {
        let result = RuleBase::new(vec![rule("L1", Consequent::term("low")), rule("L1", Consequent::term("high"))]);
        assert!(matches!(result, Err(ConfigurationError::DuplicateName(_))));
        assert!(matches!(RuleBase::new(vec![]), Err(ConfigurationError::EmptyRuleBase)));
    }

    #[test]
    fn rejects_bad_weights() {
        let result = RuleBase::new(vec![rule("L1", Consequent::term("low")).with_weight(2.0)]);
        assert!(matches!(result, Err(ConfigurationError::InvalidWeight { .. })));
    }

    #[test]
    fn fuzzy_binding_checks_output_terms() {
        let configuration = FuzzySystemConfiguration::reference().unwrap();
        let fuzzifier = configuration.fuzzifier().unwrap();
        let risk = configuration.risk();

        let base = RuleBase::new(vec![rule("L1", Consequent::term("low"))]).unwrap();
        let bound = base.bind_fuzzy(&fuzzifier, risk).unwrap();
        assert_eq!(bound[0].consequent(), &BoundConsequent::Term(0));

        let base = RuleBase::new(vec![rule("X", Consequent::term("extreme"))]).unwrap();
        assert!(matches!(base.bind_fuzzy(&fuzzifier, risk), Err(ConfigurationError::UnknownTerm { .. })));

        let base = RuleBase::new(vec![rule("X", Consequent::Constant(3.0))]).unwrap();
        assert!(matches!(base.bind_fuzzy(&fuzzifier, risk), Err(ConfigurationError::ConsequentMismatch { .. })));
    }

    #[test]
    fn numeric_binding_aligns_coefficients_with_inputs() {
        let fuzzifier = FuzzySystemConfiguration::reference().unwrap().fuzzifier().unwrap();
        let linear = LinearExpression::new(1.0).with_coefficient("symptoms", 4.0);
        let base = RuleBase::new(vec![rule("S1", Consequent::Linear(linear))]).unwrap();
        let bound = base.bind_numeric(&fuzzifier).unwrap();
        assert_eq!(
            bound[0].consequent(),
            &BoundConsequent::Linear { intercept: 1.0, coefficients: DVector::from_vec(vec![0.0, 4.0]) }
        );

        let unknown = LinearExpression::new(1.0).with_coefficient("spo2", 4.0);
        let base = RuleBase::new(vec![rule("S1", Consequent::Linear(unknown))]).unwrap();
        assert!(matches!(base.bind_numeric(&fuzzifier), Err(ConfigurationError::UnknownVariable(_))));

        let base = RuleBase::new(vec![rule("S1", Consequent::term("low"))]).unwrap();
        assert!(matches!(base.bind_numeric(&fuzzifier), Err(ConfigurationError::ConsequentMismatch { .. })));
    }

    #[test]
    fn antecedents_must_reference_declared_inputs() {
        let fuzzifier = FuzzySystemConfiguration::reference().unwrap().fuzzifier().unwrap();
        let base = RuleBase::new(vec![Rule::new("B", Antecedent::is("hr", "racing"), Consequent::Constant(1.0))]).unwrap();
        assert!(matches!(base.bind_numeric(&fuzzifier), Err(ConfigurationError::UnknownTerm { .. })));
    }

    #[test]
    fn constant_consequents_from_term_values() {
        let base = RuleBase::new(vec![
            rule("L1", Consequent::term("low")),
            rule("H1", Consequent::term("high")),
        ]).unwrap();
        let values = HashMap::from([("low".to_owned(), 2.0), ("high".to_owned(), 8.5)]);
        let sugeno = base.with_constant_consequents(&values).unwrap();
        assert_eq!(sugeno.get("H1").unwrap().consequent(), &Consequent::Constant(8.5));

        let partial = HashMap::from([("low".to_owned(), 2.0)]);
        assert!(base.with_constant_consequents(&partial).is_err());
    }

    #[test]
    fn loads_from_json() {
        let base = RuleBase::from_json_vec(&[
            json!({"name": "M4",
                   "antecedent": {"or": [{"is": {"variable": "hr", "term": "low"}},
                                         {"is": {"variable": "hr", "term": "high"}}]},
                   "consequent": {"term": "medium"},
                   "weight": 0.5}),
        ]).unwrap();
        assert_eq!(base.len(), 1);
        assert_eq!(base.get("M4").unwrap().weight(), 0.5);
    }
}
