use serde::Deserialize;

use crate::configurationerror::ConfigurationError;
use crate::fuzzy::fuzzifier::Grades;
use crate::fuzzy::norm::TNorm;

/// IF-part of a rule, referring to terms by name.
///
/// JSON form is externally tagged:
/// `{"and": [{"is": {"variable": "hr", "term": "low"}}, {"not": {...}}]}`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Antecedent {
    Is { variable: String, term: String },
    Not(Box<Antecedent>),
    And(Vec<Antecedent>),
    Or(Vec<Antecedent>)
}

impl Antecedent {
    pub fn is(variable: &str, term: &str) -> Antecedent {
        Antecedent::Is { variable: variable.to_owned(), term: term.to_owned() }
    }

    pub fn not(inner: Antecedent) -> Antecedent {
        Antecedent::Not(Box::new(inner))
    }

    pub fn and(parts: Vec<Antecedent>) -> Antecedent {
        Antecedent::And(parts)
    }

    pub fn or(parts: Vec<Antecedent>) -> Antecedent {
        Antecedent::Or(parts)
    }

    /// Resolves every `(variable, term)` leaf to positions through `locate`.
    pub fn bind<F>(&self, locate: &F) -> Result<BoundAntecedent, ConfigurationError>
        where F: Fn(&str, &str) -> Result<(usize, usize), ConfigurationError> {
        match self {
            Antecedent::Is { variable, term } => {
                let (variable_index, term_index) = locate(variable, term)?;
                Ok(BoundAntecedent::Is { variable_index, term_index })
            },
            Antecedent::Not(inner) => Ok(BoundAntecedent::Not(Box::new(inner.bind(locate)?))),
            Antecedent::And(parts) => {
                if parts.is_empty() {
                    return Err(ConfigurationError::EmptyClause("and"));
                }
                Ok(BoundAntecedent::And(Self::bind_all(parts, locate)?))
            },
            Antecedent::Or(parts) => {
                if parts.is_empty() {
                    return Err(ConfigurationError::EmptyClause("or"));
                }
                Ok(BoundAntecedent::Or(Self::bind_all(parts, locate)?))
            }
        }
    }

    fn bind_all<F>(parts: &[Antecedent], locate: &F) -> Result<Vec<BoundAntecedent>, ConfigurationError>
        where F: Fn(&str, &str) -> Result<(usize, usize), ConfigurationError> {
        parts.iter().map(|part| part.bind(locate)).collect()
    }

    /// Firing strength looked up by name. Unknown variables or terms are
    /// configuration errors.
    pub fn fire(&self, grades: &Grades, norm: TNorm) -> Result<f64, ConfigurationError> {
        let bound = self.bind(&|variable: &str, term: &str| grades.locate(variable, term))?;
        Ok(bound.fire(grades, norm))
    }
}

/// Antecedent whose leaves already point into a `Grades` layout.
#[derive(Clone, Debug, PartialEq)]
pub enum BoundAntecedent {
    Is { variable_index: usize, term_index: usize },
    Not(Box<BoundAntecedent>),
    And(Vec<BoundAntecedent>),
    Or(Vec<BoundAntecedent>)
}

impl BoundAntecedent {
    pub fn fire(&self, grades: &Grades, norm: TNorm) -> f64 {
        match self {
            BoundAntecedent::Is { variable_index, term_index } => grades.grade_at(*variable_index, *term_index),
            BoundAntecedent::Not(inner) => norm.not(inner.fire(grades, norm)),
            BoundAntecedent::And(parts) => parts
                .iter()
                .fold(norm.and_identity(), |acc, part| norm.and(acc, part.fire(grades, norm))),
            BoundAntecedent::Or(parts) => parts
                .iter()
                .fold(norm.or_identity(), |acc, part| norm.or(acc, part.fire(grades, norm)))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::FuzzySystemConfiguration;
    use crate::inference::riskinput::RiskInput;

    fn fuzzy_grades(heart_rate: f64, symptoms: f64) -> Grades {
        FuzzySystemConfiguration::reference().unwrap()
            .fuzzifier()
            .unwrap()
            .fuzzify_input(&RiskInput::new(heart_rate, symptoms, 30.0, false))
            .grades()
            .clone()
    }

    #[test]
    fn conjunction_under_both_norms() {
        // hr low = 1.0, symptoms high = 0.5
        let grades = fuzzy_grades(40.0, 7.0);
        let rule = Antecedent::and(vec![Antecedent::is("hr", "low"), Antecedent::is("symptoms", "high")]);
        assert_eq!(rule.fire(&grades, TNorm::Minimum).unwrap(), 0.5);
        assert_eq!(rule.fire(&grades, TNorm::Product).unwrap(), 0.5);
    }

    #[test]
    fn disjunction_under_both_norms() {
        // hr high ~ 0.944, symptoms low = 1.0 at (110, 2); symptoms medium = 0
        let grades = fuzzy_grades(110.0, 2.0);
        let high = grades.grade("hr", "high").unwrap();
        let rule = Antecedent::or(vec![Antecedent::is("hr", "high"), Antecedent::is("hr", "low")]);
        assert_eq!(rule.fire(&grades, TNorm::Minimum).unwrap(), high);
        assert!((rule.fire(&grades, TNorm::Product).unwrap() - high).abs() < 1e-12);

        let grades = fuzzy_grades(75.0, 4.0);
        let rule = Antecedent::or(vec![Antecedent::is("hr", "normal"), Antecedent::is("symptoms", "medium")]);
        // 0.75 and 0.5
        assert_eq!(rule.fire(&grades, TNorm::Minimum).unwrap(), 0.75);
        assert!((rule.fire(&grades, TNorm::Product).unwrap() - 0.875).abs() < 1e-12);
    }

    #[test]
    fn negation() {
        let grades = fuzzy_grades(75.0, 1.0);
        let rule = Antecedent::not(Antecedent::is("hr", "normal"));
        assert_eq!(rule.fire(&grades, TNorm::Minimum).unwrap(), 0.25);
    }

    #[test]
    fn unknown_leaves_are_configuration_errors() {
        let grades = fuzzy_grades(75.0, 1.0);
        let rule = Antecedent::and(vec![Antecedent::is("hr", "low"), Antecedent::is("spo2", "low")]);
        assert!(matches!(rule.fire(&grades, TNorm::Minimum), Err(ConfigurationError::UnknownVariable(_))));
        let rule = Antecedent::is("hr", "racing");
        assert!(matches!(rule.fire(&grades, TNorm::Minimum), Err(ConfigurationError::UnknownTerm { .. })));
    }

    #[test]
    fn empty_clauses_are_rejected() {
        let grades = fuzzy_grades(75.0, 1.0);
        assert!(matches!(
            Antecedent::and(vec![]).fire(&grades, TNorm::Minimum),
            Err(ConfigurationError::EmptyClause("and"))
        ));
    }

    #[test]
    fn parses_nested_json() {
        let json = r#"{"or": [
            {"is": {"variable": "hr", "term": "low"}},
            {"not": {"is": {"variable": "hr", "term": "normal"}}}
        ]}"#;
        let antecedent: Antecedent = serde_json::from_str(json).unwrap();
        assert_eq!(
            antecedent,
            Antecedent::or(vec![
                Antecedent::is("hr", "low"),
                Antecedent::not(Antecedent::is("hr", "normal")),
            ])
        );
    }
}
