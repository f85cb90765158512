use serde::Deserialize;

use crate::configurationerror::ConfigurationError;
use crate::fuzzy::ageband::AgeBand;
use crate::fuzzy::membershipfunction::MembershipFunction;
use crate::manager::manager::Manager;
use crate::math::domain::Domain;

/// Term placement relative to the subject's normal HR band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum BandAnchor {
    /// Z-shaped, full at `lo - shoulder`, gone at `lo`.
    BelowBand,
    /// Triangular over `[lo, hi]`, peak at the band midpoint.
    WithinBand,
    /// S-shaped, starts at `hi`, full at `hi + shoulder`.
    AboveBand
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TermShape {
    Fixed(MembershipFunction),
    Banded(BandAnchor)
}

impl TermShape {
    /// Membership function for this term in one evaluation. Banded shapes
    /// are rebuilt from the band every time.
    pub fn instantiate(&self, band: &AgeBand, shoulder_width: f64) -> MembershipFunction {
        match *self {
            TermShape::Fixed(membership_function) => membership_function,
            TermShape::Banded(BandAnchor::BelowBand) => MembershipFunction::ZShaped {
                a: band.lo() - shoulder_width,
                b: band.lo()
            },
            TermShape::Banded(BandAnchor::WithinBand) => MembershipFunction::Triangular {
                a: band.lo(),
                b: band.midpoint(),
                c: band.hi()
            },
            TermShape::Banded(BandAnchor::AboveBand) => MembershipFunction::SShaped {
                a: band.hi(),
                b: band.hi() + shoulder_width
            }
        }
    }

    pub fn is_banded(&self) -> bool {
        matches!(self, TermShape::Banded(_))
    }
}

/// How a crisp input is scaled before entering a first-order consequent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
pub enum Normalization {
    /// `(x - domain.lo) / domain.width`, in `[0, 1]`.
    #[default]
    Domain,
    /// `(x - band.lo) / band.width`, unbounded outside the band.
    Band
}

/// A named axis (HR, Symptoms, Risk) with its ordered terms.
#[derive(Clone, Debug)]
pub struct Variable {
    name: String,
    domain: Domain,
    terms: Manager<TermShape>,
    normalization: Normalization
}

impl Variable {
    pub fn new(name: &str, domain: Domain) -> Variable {
        Variable {
            name: name.to_owned(),
            domain,
            terms: Manager::new(),
            normalization: Normalization::default()
        }
    }

    pub fn from_terms(name: &str, domain: Domain, terms: Manager<TermShape>) -> Variable {
        Variable {
            name: name.to_owned(),
            domain,
            terms,
            normalization: Normalization::default()
        }
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Variable {
        self.normalization = normalization;
        self
    }

    pub fn with_term(mut self, term: &str, shape: TermShape) -> Result<Variable, ConfigurationError> {
        self.terms.insert(term, shape)?;
        Ok(self)
    }

    pub fn with_fixed_term(self, term: &str, membership_function: MembershipFunction) -> Result<Variable, ConfigurationError> {
        self.with_term(term, TermShape::Fixed(membership_function))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn terms(&self) -> &Manager<TermShape> {
        &self.terms
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.terms.index_of(term)
    }

    pub fn is_band_anchored(&self) -> bool {
        self.terms.values().any(TermShape::is_banded)
    }

    /// The term's membership function when it does not depend on the band.
    pub fn fixed_membership_function(&self, term: &str) -> Result<MembershipFunction, ConfigurationError> {
        match self.terms.get(term) {
            Ok(TermShape::Fixed(membership_function)) => Ok(*membership_function),
            Ok(TermShape::Banded(_)) => Err(ConfigurationError::BandAnchoredTerm {
                variable: self.name.clone(),
                term: term.to_owned()
            }),
            Err(_) => Err(ConfigurationError::UnknownTerm {
                variable: self.name.clone(),
                term: term.to_owned()
            })
        }
    }

    pub fn membership_functions(&self, band: &AgeBand, shoulder_width: f64) -> Vec<MembershipFunction> {
        self.terms
            .values()
            .map(|shape| shape.instantiate(band, shoulder_width))
            .collect()
    }

    pub fn normalize(&self, crisp: f64, band: &AgeBand) -> f64 {
        match self.normalization {
            Normalization::Domain => self.domain.normalize(crisp),
            Normalization::Band => band.position(self.domain.clamp(crisp))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::ageband::{AgeBandPolicy, AgeBandResolver};

    fn adult_band() -> AgeBand {
        let domain = Domain::new(30.0, 200.0).unwrap();
        AgeBandResolver::new(AgeBandPolicy::default(), domain)
            .unwrap()
            .resolve(30.0, false)
    }

    fn heart_rate() -> Variable {
        Variable::new("hr", Domain::new(30.0, 200.0).unwrap())
            .with_normalization(Normalization::Band)
            .with_term("low", TermShape::Banded(BandAnchor::BelowBand)).unwrap()
            .with_term("normal", TermShape::Banded(BandAnchor::WithinBand)).unwrap()
            .with_term("high", TermShape::Banded(BandAnchor::AboveBand)).unwrap()
    }

    #[test]
    fn banded_terms_follow_the_band() {
        let functions = heart_rate().membership_functions(&adult_band(), 12.0);
        assert_eq!(functions, vec![
            MembershipFunction::ZShaped { a: 48.0, b: 60.0 },
            MembershipFunction::Triangular { a: 60.0, b: 80.0, c: 100.0 },
            MembershipFunction::SShaped { a: 100.0, b: 112.0 },
        ]);
    }

    #[test]
    fn duplicate_terms_are_rejected() {
        let result = heart_rate().with_term("low", TermShape::Banded(BandAnchor::BelowBand));
        assert!(matches!(result, Err(ConfigurationError::DuplicateName(_))));
    }

    #[test]
    fn fixed_shape_lookup() {
        let risk = Variable::new("risk", Domain::new(0.0, 10.0).unwrap())
            .with_fixed_term("low", MembershipFunction::triangular(0.0, 0.0, 4.0).unwrap())
            .unwrap();
        assert!(risk.fixed_membership_function("low").is_ok());
        assert!(matches!(
            risk.fixed_membership_function("high"),
            Err(ConfigurationError::UnknownTerm { .. })
        ));
        assert!(matches!(
            heart_rate().fixed_membership_function("normal"),
            Err(ConfigurationError::BandAnchoredTerm { variable, term }) if variable == "hr" && term == "normal"
        ));
        assert!(heart_rate().is_band_anchored());
        assert!(!risk.is_band_anchored());
    }

    #[test]
    fn normalization_modes() {
        let band = adult_band();
        assert_eq!(heart_rate().normalize(110.0, &band), 1.25);
        assert_eq!(heart_rate().normalize(10.0, &band), -0.75);
        let symptoms = Variable::new("symptoms", Domain::new(0.0, 10.0).unwrap());
        assert_eq!(symptoms.normalize(7.0, &band), 0.7);
    }
}
