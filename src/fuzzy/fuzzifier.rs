use nalgebra::DVector;
use tracing::trace;

use crate::configurationerror::ConfigurationError;
use crate::fuzzy::ageband::{
    AgeBand,
    AgeBandPolicy,
    AgeBandResolver
};
use crate::fuzzy::variable::{
    Normalization,
    Variable
};
use crate::inference::riskinput::RiskInput;

// ─────────────────────────────────────────────
// Grades
// ─────────────────────────────────────────────

/// Membership grade of one crisp value in each term of a variable.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableGrades {
    variable: String,
    terms: Vec<String>,
    grades: Vec<f64>
}

impl VariableGrades {
    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn grade(&self, term: &str) -> Option<f64> {
        self.terms
            .iter()
            .position(|t| t == term)
            .map(|i| self.grades[i])
    }

    pub fn grades(&self) -> &[f64] {
        &self.grades
    }
}

/// Grades of every input variable, in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct Grades {
    variables: Vec<VariableGrades>
}

impl Grades {
    pub fn new(variables: Vec<VariableGrades>) -> Grades {
        Grades { variables }
    }

    pub fn variables(&self) -> &[VariableGrades] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&VariableGrades> {
        self.variables.iter().find(|v| v.variable == name)
    }

    pub fn grade(&self, variable: &str, term: &str) -> Option<f64> {
        self.variable(variable).and_then(|v| v.grade(term))
    }

    /// Positional lookup for rules bound against the same inputs. A missing
    /// position reads as zero membership.
    #[inline]
    pub fn grade_at(&self, variable_index: usize, term_index: usize) -> f64 {
        self.variables
            .get(variable_index)
            .and_then(|v| v.grades.get(term_index))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn locate(&self, variable: &str, term: &str) -> Result<(usize, usize), ConfigurationError> {
        let variable_index = self.variables
            .iter()
            .position(|v| v.variable == variable)
            .ok_or_else(|| ConfigurationError::UnknownVariable(variable.to_owned()))?;
        let term_index = self.variables[variable_index]
            .terms
            .iter()
            .position(|t| t == term)
            .ok_or_else(|| ConfigurationError::UnknownTerm {
                variable: variable.to_owned(),
                term: term.to_owned()
            })?;
        Ok((variable_index, term_index))
    }
}

// ─────────────────────────────────────────────
// Fuzzification
// ─────────────────────────────────────────────

/// Per-call state the band-anchored terms are built from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuzzificationContext {
    band: AgeBand,
    shoulder_width: f64
}

impl FuzzificationContext {
    pub fn new(band: AgeBand, shoulder_width: f64) -> FuzzificationContext {
        FuzzificationContext { band, shoulder_width }
    }

    pub fn band(&self) -> &AgeBand {
        &self.band
    }

    pub fn shoulder_width(&self) -> f64 {
        self.shoulder_width
    }
}

/// Grades `crisp` against every term of `variable`. The value is clamped to
/// the variable's domain first.
pub fn fuzzify(variable: &Variable, crisp: f64, context: &FuzzificationContext) -> VariableGrades {
    let x = variable.domain().clamp(crisp);
    let grades = variable
        .membership_functions(&context.band, context.shoulder_width)
        .iter()
        .map(|membership_function| membership_function.evaluate(x))
        .collect();
    VariableGrades {
        variable: variable.name().to_owned(),
        terms: variable.terms().names().map(str::to_owned).collect(),
        grades
    }
}

/// Everything an inference engine needs from one evaluation call.
#[derive(Clone, Debug, PartialEq)]
pub struct Fuzzification {
    band: AgeBand,
    grades: Grades,
    normalized_inputs: DVector<f64>
}

impl Fuzzification {
    pub fn band(&self) -> &AgeBand {
        &self.band
    }

    pub fn grades(&self) -> &Grades {
        &self.grades
    }

    pub fn normalized_inputs(&self) -> &DVector<f64> {
        &self.normalized_inputs
    }
}

// ─────────────────────────────────────────────
// Fuzzifier
// ─────────────────────────────────────────────

/// Heart rate and symptoms inputs plus the band policy for heart rate.
#[derive(Clone, Debug)]
pub struct Fuzzifier {
    resolver: AgeBandResolver,
    inputs: Vec<Variable>
}

impl Fuzzifier {
    pub fn new(policy: AgeBandPolicy, heart_rate: Variable, symptoms: Variable) -> Result<Fuzzifier, ConfigurationError> {
        if heart_rate.name() == symptoms.name() {
            return Err(ConfigurationError::DuplicateName(heart_rate.name().to_owned()));
        }
        for variable in [&heart_rate, &symptoms] {
            if variable.terms().is_empty() {
                return Err(ConfigurationError::EmptyVariable(variable.name().to_owned()));
            }
        }
        // bands are resolved from heart rate only
        if let Some((term, _)) = symptoms.terms().iter().find(|(_, shape)| shape.is_banded()) {
            return Err(ConfigurationError::BandAnchoredTerm {
                variable: symptoms.name().to_owned(),
                term: term.to_owned()
            });
        }
        if symptoms.normalization() == Normalization::Band {
            return Err(ConfigurationError::BandNormalization(symptoms.name().to_owned()));
        }
        let resolver = AgeBandResolver::new(policy, *heart_rate.domain())?;
        Ok(Fuzzifier { resolver, inputs: vec![heart_rate, symptoms] })
    }

    pub fn resolver(&self) -> &AgeBandResolver {
        &self.resolver
    }

    pub fn inputs(&self) -> &[Variable] {
        &self.inputs
    }

    pub fn heart_rate(&self) -> &Variable {
        &self.inputs[0]
    }

    pub fn symptoms(&self) -> &Variable {
        &self.inputs[1]
    }

    pub fn input_index(&self, variable: &str) -> Result<usize, ConfigurationError> {
        self.inputs
            .iter()
            .position(|v| v.name() == variable)
            .ok_or_else(|| ConfigurationError::UnknownVariable(variable.to_owned()))
    }

    pub fn locate(&self, variable: &str, term: &str) -> Result<(usize, usize), ConfigurationError> {
        let variable_index = self.input_index(variable)?;
        let term_index = self.inputs[variable_index]
            .term_index(term)
            .ok_or_else(|| ConfigurationError::UnknownTerm {
                variable: variable.to_owned(),
                term: term.to_owned()
            })?;
        Ok((variable_index, term_index))
    }

    pub fn context(&self, input: &RiskInput) -> FuzzificationContext {
        let band = self.resolver.resolve(input.age(), input.is_athlete());
        FuzzificationContext::new(band, self.resolver.shoulder_width())
    }

    pub fn fuzzify_input(&self, input: &RiskInput) -> Fuzzification {
        let context = self.context(input);
        let crisp = [input.heart_rate(), input.symptoms()];
        let grades = Grades::new(
            self.inputs
                .iter()
                .zip(crisp)
                .map(|(variable, x)| fuzzify(variable, x, &context))
                .collect()
        );
        let normalized_inputs = DVector::from_iterator(
            self.inputs.len(),
            self.inputs
                .iter()
                .zip(crisp)
                .map(|(variable, x)| variable.normalize(x, &context.band))
        );
        trace!(band_lo = context.band.lo(), band_hi = context.band.hi(), ?grades, "fuzzified input");
        Fuzzification { band: context.band, grades, normalized_inputs }
    }
}
