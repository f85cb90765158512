use std::path::PathBuf;

use fuzzyrisk::configuration::FuzzySystemConfiguration;
use fuzzyrisk::fuzzy::norm::TNorm;
use fuzzyrisk::inference::inferenceengine::InferenceEngine;
use fuzzyrisk::inference::mamdani::defuzzification::DefuzzificationMethod;
use fuzzyrisk::inference::mamdani::mamdaniengine::{
    MamdaniEngine,
    MamdaniOptions
};
use fuzzyrisk::inference::riskinput::RiskInput;
use fuzzyrisk::inference::sugeno::sugenoengine::{
    SugenoEngine,
    SugenoOptions
};

const TOLERANCE: f64 = 1e-2;

fn mamdani(t_norm: TNorm) -> MamdaniEngine {
    FuzzySystemConfiguration::reference()
        .unwrap()
        .with_mamdani_options(MamdaniOptions::default().with_t_norm(t_norm))
        .mamdani_engine()
        .unwrap()
}

fn sugeno(t_norm: TNorm) -> SugenoEngine {
    FuzzySystemConfiguration::reference()
        .unwrap()
        .with_sugeno_options(SugenoOptions::default().with_t_norm(t_norm))
        .sugeno_engine()
        .unwrap()
}

fn shipped_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config").join("reference.json")
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!((actual - expected).abs() < TOLERANCE, "{}: expected {}, got {}", what, expected, actual);
}

#[test]
fn sanity_points_for_every_engine() {
    let cases = [
        ((40.0, 2.0), [5.0, 5.0, 5.0, 5.0]),
        ((40.0, 7.0), [6.3225, 6.3225, 6.75, 6.75]),
        ((75.0, 1.0), [1.4, 1.4, 2.0, 2.0]),
        ((110.0, 2.0), [5.0, 5.0, 5.0, 5.0]),
        ((110.0, 7.0), [6.3561, 6.3111, 6.8, 6.75]),
    ];
    let engines: [Box<dyn InferenceEngine>; 4] = [
        Box::new(mamdani(TNorm::Minimum)),
        Box::new(mamdani(TNorm::Product)),
        Box::new(sugeno(TNorm::Minimum)),
        Box::new(sugeno(TNorm::Product)),
    ];
    for ((hr, symptoms), expected) in cases {
        let input = RiskInput::adult(hr, symptoms);
        for (engine, expected) in engines.iter().zip(expected) {
            let what = format!("{} at hr {} symptoms {}", engine.name(), hr, symptoms);
            assert_close(engine.risk(&input), expected, &what);
        }
    }
}

#[test]
fn sanity_bands_are_ordered() {
    // low-risk case below the medium cases, high-symptom cases above them
    for engine in [Box::new(mamdani(TNorm::Minimum)) as Box<dyn InferenceEngine>, Box::new(sugeno(TNorm::Product))] {
        let low = engine.risk(&RiskInput::adult(75.0, 1.0));
        let medium = engine.risk(&RiskInput::adult(40.0, 2.0));
        let high = engine.risk(&RiskInput::adult(110.0, 7.0));
        assert!(low < medium && medium < high, "{}: {} {} {}", engine.name(), low, medium, high);
    }
}

#[test]
fn t_norms_agree_where_grades_are_crisp() {
    for (hr, symptoms) in [(40.0, 2.0), (75.0, 1.0), (40.0, 7.0)] {
        let input = RiskInput::adult(hr, symptoms);
        assert!((mamdani(TNorm::Minimum).risk(&input) - mamdani(TNorm::Product).risk(&input)).abs() < 1e-9);
        assert!((sugeno(TNorm::Minimum).risk(&input) - sugeno(TNorm::Product).risk(&input)).abs() < 1e-9);
    }
}

#[test]
fn band_edge_heart_rate_fires_nothing() {
    for symptoms in [0.0, 2.0, 5.0, 7.0, 10.0] {
        let input = RiskInput::adult(60.0, symptoms);
        for engine in [Box::new(mamdani(TNorm::Minimum)) as Box<dyn InferenceEngine>, Box::new(sugeno(TNorm::Product))] {
            let outcome = engine.evaluate(&input);
            assert!(outcome.fallback_used(), "{} at symptoms {}", engine.name(), symptoms);
            assert_eq!(outcome.risk(), 5.0);
        }
    }
}

#[test]
fn mean_of_maximum_on_a_symmetric_plateau() {
    let engine = FuzzySystemConfiguration::reference()
        .unwrap()
        .with_mamdani_options(MamdaniOptions::default().with_defuzzification(DefuzzificationMethod::MeanOfMaximum))
        .mamdani_engine()
        .unwrap();
    assert!((engine.risk(&RiskInput::adult(110.0, 2.0)) - 5.0).abs() < 1e-9);
}

#[test]
fn athletes_tolerate_lower_heart_rates() {
    let engine = mamdani(TNorm::Minimum);
    let athlete = engine.evaluate(&RiskInput::new(50.0, 1.0, 30.0, true));
    let regular = engine.evaluate(&RiskInput::new(50.0, 1.0, 30.0, false));
    assert_eq!(athlete.band().lo(), 45.0);
    assert_eq!(regular.band().lo(), 60.0);
    assert!(athlete.risk() < regular.risk());
}

#[test]
fn children_tolerate_higher_heart_rates() {
    let engine = sugeno(TNorm::Product);
    let child = engine.evaluate(&RiskInput::new(110.0, 1.0, 5.0, false));
    let adult = engine.evaluate(&RiskInput::adult(110.0, 1.0));
    assert_eq!((child.band().lo(), child.band().hi()), (80.0, 120.0));
    assert!(child.risk() < adult.risk());
}

#[test]
fn repeated_evaluation_is_identical() {
    let engine = mamdani(TNorm::Minimum);
    let input = RiskInput::new(93.5, 6.2, 41.0, false);
    let first = engine.evaluate(&input);
    for _ in 0..5 {
        assert_eq!(engine.evaluate(&input), first);
    }
}

#[test]
fn shipped_json_matches_the_built_in_configuration() {
    let loaded = FuzzySystemConfiguration::from_file(shipped_config()).unwrap();
    let built = FuzzySystemConfiguration::reference().unwrap();
    assert_eq!(loaded.band_policy(), built.band_policy());
    assert_eq!(loaded.rules().len(), built.rules().len());

    let pairs = [
        (loaded.mamdani_engine().unwrap(), built.mamdani_engine().unwrap()),
    ];
    let sugeno_pairs = [
        (loaded.sugeno_engine().unwrap(), built.sugeno_engine().unwrap()),
    ];
    for hr in [35.0, 58.0, 75.0, 99.0, 104.0, 130.0, 190.0] {
        for symptoms in [0.5, 3.5, 5.0, 6.5, 9.0] {
            for age in [0.2, 4.0, 30.0] {
                let input = RiskInput::new(hr, symptoms, age, false);
                for (a, b) in &pairs {
                    assert_eq!(a.evaluate(&input), b.evaluate(&input));
                }
                for (a, b) in &sugeno_pairs {
                    assert_eq!(a.evaluate(&input), b.evaluate(&input));
                }
            }
        }
    }
}
