use std::env;

use tracing::error;
use tracing_subscriber::EnvFilter;

use fuzzyrisk::configuration::FuzzySystemConfiguration;
use fuzzyrisk::configurationerror::ConfigurationError;
use fuzzyrisk::inference::gridevaluator::GridEvaluator;
use fuzzyrisk::inference::inferenceengine::InferenceEngine;
use fuzzyrisk::inference::riskinput::RiskInput;

const SANITY_CASES: [(f64, f64); 5] = [
    (40.0, 2.0),
    (40.0, 7.0),
    (75.0, 1.0),
    (110.0, 2.0),
    (110.0, 7.0)
];

fn run() -> Result<(), ConfigurationError> {
    let configuration = match env::args().nth(1) {
        Some(path) => FuzzySystemConfiguration::from_file(path)?,
        None => FuzzySystemConfiguration::reference()?
    };
    let mamdani = configuration.mamdani_engine()?;
    let sugeno = configuration.sugeno_engine()?;
    let engines: [&dyn InferenceEngine; 2] = [&mamdani, &sugeno];

    println!("{:>6} {:>9} {:>9} {:>9}", "HR", "Symptoms", "Mamdani", "Sugeno");
    for (hr, symptoms) in SANITY_CASES {
        let input = RiskInput::adult(hr, symptoms);
        println!(
            "{:>6.1} {:>9.1} {:>9.3} {:>9.3}",
            hr,
            symptoms,
            mamdani.risk(&input),
            sugeno.risk(&input)
        );
    }

    let evaluator = GridEvaluator::default();
    for engine in engines {
        let surface = evaluator.evaluate(engine, 30.0, false);
        println!(
            "{} surface over {}x{} points: risk in [{:.3}, {:.3}]",
            engine.name(),
            surface.heart_rates().len(),
            surface.symptoms().len(),
            surface.min(),
            surface.max()
        );
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run() {
        error!(%err, "risk demo failed");
        std::process::exit(1);
    }
}
