//! Drive every detector over a synthetic prequential stream
//!
//! The stream simulates the correctness of an online classifier whose
//! accuracy changes abruptly at known positions. Each detector runs behind a
//! `TimedDetector` and is reset whenever it reports a drift, the way an
//! evaluation harness resets the paired learner.
//!
//! ```text
//! RUST_LOG=debug cargo run --example prequential_stream
//! ```

use anyhow::Result;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Bernoulli;
use robust_drift::{Detector, DetectorConfig, DriftDetector, TimedDetector};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Accuracy of the simulated classifier per concept
const CONCEPTS: [(usize, f64); 4] = [(5_000, 0.92), (5_000, 0.65), (5_000, 0.88), (5_000, 0.55)];

/// Detections within this many observations after a change count as true positives
const ACCEPTANCE: usize = 250;

fn generate_stream(seed: u64) -> Result<(Vec<bool>, Vec<usize>)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut stream = Vec::new();
    let mut changes = Vec::new();
    for (length, accuracy) in CONCEPTS {
        if !stream.is_empty() {
            changes.push(stream.len());
        }
        let bernoulli = Bernoulli::new(accuracy)?;
        stream.extend((0..length).map(|_| bernoulli.sample(&mut rng)));
    }
    Ok((stream, changes))
}

struct Report {
    name: String,
    detections: Vec<usize>,
    runtime_ms: f64,
}

fn evaluate(mut detector: TimedDetector<Detector>, stream: &[bool]) -> Report {
    let mut detections = Vec::new();
    for (i, &is_correct) in stream.iter().enumerate() {
        if detector.detect(is_correct).drift {
            detections.push(i);
            detector.reset();
        }
    }
    Report {
        name: detector.file_stem(),
        detections,
        runtime_ms: detector.runtime().total_ms(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (stream, changes) = generate_stream(2024)?;
    info!(observations = stream.len(), ?changes, "generated stream");

    println!("{:<42} {:>6} {:>6} {:>10}", "detector", "TP", "FP", "time (ms)");
    for config in DetectorConfig::all_defaults() {
        let detector = TimedDetector::new(config.build()?);
        let report = evaluate(detector, &stream);

        let true_positives = changes
            .iter()
            .filter(|&&change| report.detections.iter().any(|&d| d >= change && d < change + ACCEPTANCE))
            .count();
        let false_positives = report.detections.len().saturating_sub(true_positives);

        info!(detector = %report.name, detections = ?report.detections, "finished");
        println!(
            "{:<42} {:>6} {:>6} {:>10.3}",
            report.name, true_positives, false_positives, report.runtime_ms
        );
    }
    Ok(())
}
