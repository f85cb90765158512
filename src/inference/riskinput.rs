use serde::Deserialize;

/// One evaluation request.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct RiskInput {
    heart_rate: f64,
    symptoms: f64,
    age: f64,
    #[serde(default)]
    is_athlete: bool
}

impl RiskInput {
    pub fn new(heart_rate: f64, symptoms: f64, age: f64, is_athlete: bool) -> RiskInput {
        RiskInput { heart_rate, symptoms, age, is_athlete }
    }

    /// Thirty-year-old non-athlete, the reference subject profile.
    pub fn adult(heart_rate: f64, symptoms: f64) -> RiskInput {
        RiskInput::new(heart_rate, symptoms, 30.0, false)
    }

    pub fn heart_rate(&self) -> f64 {
        self.heart_rate
    }

    pub fn symptoms(&self) -> f64 {
        self.symptoms
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn is_athlete(&self) -> bool {
        self.is_athlete
    }
}
