use std::collections::HashMap;

use nalgebra::DVector;
use serde::Deserialize;

/// First-order Sugeno output `intercept + sum(coefficient * normalized input)`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LinearExpression {
    intercept: f64,
    #[serde(default)]
    coefficients: HashMap<String, f64>
}

impl LinearExpression {
    pub fn new(intercept: f64) -> LinearExpression {
        LinearExpression { intercept, coefficients: HashMap::new() }
    }

    pub fn with_coefficient(mut self, variable: &str, coefficient: f64) -> LinearExpression {
        self.coefficients.insert(variable.to_owned(), coefficient);
        self
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &HashMap<String, f64> {
        &self.coefficients
    }
}

/// THEN-part of a rule.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consequent {
    /// Mamdani: a term of the output variable.
    Term(String),
    /// Zero-order Sugeno.
    Constant(f64),
    /// First-order Sugeno.
    Linear(LinearExpression)
}

impl Consequent {
    pub fn term(term: &str) -> Consequent {
        Consequent::Term(term.to_owned())
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Consequent::Term(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BoundConsequent {
    Term(usize),
    Constant(f64),
    Linear { intercept: f64, coefficients: DVector<f64> }
}

impl BoundConsequent {
    /// Crisp rule output `z`, `None` for fuzzy-term consequents.
    pub fn output(&self, normalized_inputs: &DVector<f64>) -> Option<f64> {
        match self {
            BoundConsequent::Term(_) => None,
            BoundConsequent::Constant(value) => Some(*value),
            BoundConsequent::Linear { intercept, coefficients } => Some(intercept + coefficients.dot(normalized_inputs))
        }
    }

    pub fn term_index(&self) -> Option<usize> {
        match self {
            BoundConsequent::Term(index) => Some(*index),
            _ => None
        }
    }
}
