use serde::Deserialize;
use tracing::debug;

use crate::configurationerror::ConfigurationError;
use crate::math::domain::Domain;

// ─────────────────────────────────────────────
// AgeBand
// ─────────────────────────────────────────────

/// Resting heart-rate range considered normal for one subject, `lo < hi`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgeBand {
    lo: f64,
    hi: f64
}

impl AgeBand {
    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn midpoint(&self) -> f64 {
        0.5 * (self.lo + self.hi)
    }

    /// Where `x` sits relative to the band: 0 at `lo`, 1 at `hi`, unbounded
    /// outside.
    pub fn position(&self, x: f64) -> f64 {
        (x - self.lo) / self.width()
    }
}

// ─────────────────────────────────────────────
// Policy
// ─────────────────────────────────────────────

/// Band for every age strictly below `upper_age`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct AgeBracket {
    upper_age: f64,
    lo: f64,
    hi: f64
}

impl AgeBracket {
    pub fn new(upper_age: f64, lo: f64, hi: f64) -> AgeBracket {
        AgeBracket { upper_age, lo, hi }
    }

    pub fn upper_age(&self) -> f64 {
        self.upper_age
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }
}

/// Trained adults get a lower floor for the normal band.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AthleteAdjustment {
    min_age: f64,
    lo_reduction: f64,
    lo_floor: f64
}

impl AthleteAdjustment {
    pub fn new(min_age: f64, lo_reduction: f64, lo_floor: f64) -> AthleteAdjustment {
        AthleteAdjustment { min_age, lo_reduction, lo_floor }
    }

    pub fn min_age(&self) -> f64 {
        self.min_age
    }

    pub fn lo_reduction(&self) -> f64 {
        self.lo_reduction
    }

    pub fn lo_floor(&self) -> f64 {
        self.lo_floor
    }
}

impl Default for AthleteAdjustment {
    fn default() -> Self {
        AthleteAdjustment::new(15.0, 15.0, 40.0)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgeBandPolicy {
    shoulder_width: f64,
    min_band_width: f64,
    brackets: Vec<AgeBracket>,
    adult_band: [f64; 2],
    athlete: AthleteAdjustment
}

impl Default for AgeBandPolicy {
    fn default() -> Self {
        AgeBandPolicy {
            shoulder_width: 12.0,
            min_band_width: 10.0,
            brackets: vec![
                AgeBracket::new(0.42, 100.0, 160.0),
                AgeBracket::new(1.0, 80.0, 140.0),
                AgeBracket::new(3.0, 80.0, 130.0),
                AgeBracket::new(6.0, 80.0, 120.0),
                AgeBracket::new(11.0, 70.0, 110.0),
                AgeBracket::new(15.0, 60.0, 105.0),
            ],
            adult_band: [60.0, 100.0],
            athlete: AthleteAdjustment::default()
        }
    }
}

impl AgeBandPolicy {
    pub fn with_shoulder_width(mut self, shoulder_width: f64) -> Self {
        self.shoulder_width = shoulder_width;
        self
    }

    pub fn with_min_band_width(mut self, min_band_width: f64) -> Self {
        self.min_band_width = min_band_width;
        self
    }

    pub fn with_brackets(mut self, brackets: Vec<AgeBracket>) -> Self {
        self.brackets = brackets;
        self
    }

    pub fn with_adult_band(mut self, lo: f64, hi: f64) -> Self {
        self.adult_band = [lo, hi];
        self
    }

    pub fn with_athlete_adjustment(mut self, athlete: AthleteAdjustment) -> Self {
        self.athlete = athlete;
        self
    }

    pub fn shoulder_width(&self) -> f64 {
        self.shoulder_width
    }

    pub fn min_band_width(&self) -> f64 {
        self.min_band_width
    }

    pub fn brackets(&self) -> &[AgeBracket] {
        &self.brackets
    }

    pub fn adult_band(&self) -> (f64, f64) {
        (self.adult_band[0], self.adult_band[1])
    }

    pub fn athlete(&self) -> &AthleteAdjustment {
        &self.athlete
    }

    fn validate(&self, hr_domain: &Domain) -> Result<(), ConfigurationError> {
        let invalid = |reason: String| Err(ConfigurationError::InvalidBandPolicy(reason));

        if !(self.shoulder_width.is_finite() && self.shoulder_width > 0.0) {
            return invalid(format!("shoulder width {} must be positive", self.shoulder_width));
        }
        if !(self.min_band_width.is_finite() && self.min_band_width > 0.0 && self.min_band_width < hr_domain.width()) {
            return invalid(format!(
                "minimum band width {} must lie in (0, {})",
                self.min_band_width,
                hr_domain.width()
            ));
        }
        let (adult_lo, adult_hi) = self.adult_band();
        if !(adult_lo.is_finite() && adult_hi.is_finite() && adult_lo < adult_hi) {
            return invalid(format!("adult band [{}, {}] is not ordered", adult_lo, adult_hi));
        }
        let mut previous_age = 0.0;
        for bracket in &self.brackets {
            if !(bracket.upper_age.is_finite() && bracket.upper_age > previous_age) {
                return invalid(format!("bracket ages must increase, found {} after {}", bracket.upper_age, previous_age));
            }
            if !(bracket.lo.is_finite() && bracket.hi.is_finite() && bracket.lo < bracket.hi) {
                return invalid(format!("bracket below age {} has unordered band [{}, {}]", bracket.upper_age, bracket.lo, bracket.hi));
            }
            previous_age = bracket.upper_age;
        }
        let athlete = &self.athlete;
        if ![athlete.min_age, athlete.lo_reduction, athlete.lo_floor].iter().all(|v| v.is_finite() && *v >= 0.0) {
            return invalid("athlete adjustment values must be finite and non-negative".to_owned());
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Resolver
// ─────────────────────────────────────────────

/// Maps `(age, is_athlete)` to the subject's normal HR band.
#[derive(Clone, Debug)]
pub struct AgeBandResolver {
    policy: AgeBandPolicy,
    hr_domain: Domain
}

impl AgeBandResolver {
    pub fn new(policy: AgeBandPolicy, hr_domain: Domain) -> Result<AgeBandResolver, ConfigurationError> {
        policy.validate(&hr_domain)?;
        Ok(AgeBandResolver { policy, hr_domain })
    }

    pub fn policy(&self) -> &AgeBandPolicy {
        &self.policy
    }

    pub fn shoulder_width(&self) -> f64 {
        self.policy.shoulder_width
    }

    pub fn hr_domain(&self) -> &Domain {
        &self.hr_domain
    }

    /// Negative or NaN ages count as newborn. The result always satisfies
    /// `domain.lo <= lo < hi <= domain.hi`.
    pub fn resolve(&self, age: f64, is_athlete: bool) -> AgeBand {
        let age = if age.is_nan() { 0.0 } else { age.max(0.0) };

        let (mut lo, hi) = self.policy
            .brackets
            .iter()
            .find(|bracket| age < bracket.upper_age)
            .map(|bracket| (bracket.lo, bracket.hi))
            .unwrap_or_else(|| self.policy.adult_band());

        let athlete = &self.policy.athlete;
        if is_athlete && age >= athlete.min_age {
            lo = athlete.lo_floor.max(lo - athlete.lo_reduction);
        }

        self.fit_into_domain(lo, hi)
    }

    fn fit_into_domain(&self, lo: f64, hi: f64) -> AgeBand {
        let domain = &self.hr_domain;
        let min_width = self.policy.min_band_width;
        let mut lo = domain.clamp(lo);
        let mut hi = domain.clamp(hi);

        if hi - lo < min_width {
            debug!(lo, hi, min_width, "widening collapsed heart-rate band");
            let mid = 0.5 * (lo + hi);
            lo = mid - 0.5 * min_width;
            hi = mid + 0.5 * min_width;
            if lo < domain.lo() {
                hi += domain.lo() - lo;
                lo = domain.lo();
            }
            if hi > domain.hi() {
                lo -= hi - domain.hi();
                hi = domain.hi();
            }
        }

        AgeBand { lo: lo.max(domain.lo()), hi: hi.min(domain.hi()) }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn hr_domain() -> Domain {
        Domain::new(30.0, 200.0).unwrap()
    }

    fn resolver() -> AgeBandResolver {
        AgeBandResolver::new(AgeBandPolicy::default(), hr_domain()).unwrap()
    }

    fn bounds(band: AgeBand) -> (f64, f64) {
        (band.lo(), band.hi())
    }

    #[test]
    fn default_brackets() {
        let resolver = resolver();
        assert_eq!(bounds(resolver.resolve(0.2, false)), (100.0, 160.0));
        assert_eq!(bounds(resolver.resolve(0.5, false)), (80.0, 140.0));
        assert_eq!(bounds(resolver.resolve(2.0, false)), (80.0, 130.0));
        assert_eq!(bounds(resolver.resolve(4.0, false)), (80.0, 120.0));
        assert_eq!(bounds(resolver.resolve(8.0, false)), (70.0, 110.0));
        assert_eq!(bounds(resolver.resolve(12.0, false)), (60.0, 105.0));
        assert_eq!(bounds(resolver.resolve(30.0, false)), (60.0, 100.0));
    }

    #[test]
    fn bracket_upper_bound_is_exclusive() {
        let resolver = resolver();
        assert_eq!(bounds(resolver.resolve(15.0, false)), (60.0, 100.0));
        assert_eq!(bounds(resolver.resolve(14.999, false)), (60.0, 105.0));
    }

    #[test]
    fn athletes_get_lower_floor_only_as_adults() {
        let resolver = resolver();
        assert_eq!(bounds(resolver.resolve(30.0, true)), (45.0, 100.0));
        assert_eq!(bounds(resolver.resolve(12.0, true)), (60.0, 105.0));
    }

    #[test]
    fn athlete_floor_applies() {
        let policy = AgeBandPolicy::default().with_adult_band(50.0, 90.0);
        let resolver = AgeBandResolver::new(policy, hr_domain()).unwrap();
        assert_eq!(bounds(resolver.resolve(40.0, true)), (40.0, 90.0));
    }

    #[test]
    fn negative_and_nan_ages_are_newborns() {
        let resolver = resolver();
        assert_eq!(bounds(resolver.resolve(-3.0, false)), (100.0, 160.0));
        assert_eq!(bounds(resolver.resolve(f64::NAN, true)), (100.0, 160.0));
        assert_eq!(bounds(resolver.resolve(f64::INFINITY, false)), (60.0, 100.0));
    }

    #[test]
    fn collapsed_band_is_widened_symmetrically() {
        let policy = AgeBandPolicy::default()
            .with_brackets(vec![])
            .with_adult_band(78.0, 82.0);
        let resolver = AgeBandResolver::new(policy, hr_domain()).unwrap();
        assert_eq!(bounds(resolver.resolve(30.0, false)), (75.0, 85.0));
    }

    #[test]
    fn widened_band_is_pushed_back_into_domain() {
        let policy = AgeBandPolicy::default()
            .with_brackets(vec![])
            .with_adult_band(210.0, 240.0);
        let resolver = AgeBandResolver::new(policy, hr_domain()).unwrap();
        assert_eq!(bounds(resolver.resolve(30.0, false)), (190.0, 200.0));

        let policy = AgeBandPolicy::default()
            .with_brackets(vec![])
            .with_adult_band(10.0, 32.0);
        let resolver = AgeBandResolver::new(policy, hr_domain()).unwrap();
        assert_eq!(bounds(resolver.resolve(30.0, false)), (30.0, 40.0));
    }

    #[test]
    fn invalid_policies_are_rejected() {
        let domain = hr_domain();
        let cases = vec![
            AgeBandPolicy::default().with_shoulder_width(0.0),
            AgeBandPolicy::default().with_min_band_width(0.0),
            AgeBandPolicy::default().with_min_band_width(500.0),
            AgeBandPolicy::default().with_adult_band(100.0, 60.0),
            AgeBandPolicy::default().with_brackets(vec![
                AgeBracket::new(3.0, 80.0, 130.0),
                AgeBracket::new(1.0, 80.0, 140.0),
            ]),
            AgeBandPolicy::default().with_athlete_adjustment(AthleteAdjustment::new(15.0, -1.0, 40.0)),
        ];
        for policy in cases {
            assert!(matches!(
                AgeBandResolver::new(policy, domain),
                Err(ConfigurationError::InvalidBandPolicy(_))
            ));
        }
    }

    #[test]
    fn position_relative_to_band() {
        let band = resolver().resolve(30.0, false);
        assert_eq!(band.position(60.0), 0.0);
        assert_eq!(band.position(80.0), 0.5);
        assert_eq!(band.position(120.0), 1.5);
        assert_eq!(band.midpoint(), 80.0);
    }

    #[test]
    fn policy_from_partial_json() {
        let policy: AgeBandPolicy = serde_json::from_str(r#"{"shoulder_width": 8.0}"#).unwrap();
        assert_eq!(policy.shoulder_width(), 8.0);
        assert_eq!(policy.min_band_width(), 10.0);
        assert_eq!(policy.brackets().len(), 6);
    }
}
