//! Sweep the confidence threshold and watch precision trade against recall.

use det_eval::dataset::InMemorySource;
use det_eval::detector::FixtureDetector;
use det_eval::evaluator::{evaluate_at_confidence_thresholds, EvaluationConfig};
use det_eval::threshold::generate_threshold_range;
use det_eval::types::{BoundingBox, Detection, GroundTruth, ImageSample, LabelMap};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut labels = LabelMap::new();
    labels.insert(1, "person");

    // One image, two objects, detections of decreasing confidence: a solid
    // hit, a borderline hit, and a stray box
    let samples = vec![ImageSample::new(
        1,
        vec![
            GroundTruth::new(BoundingBox::new(0.0, 0.0, 50.0, 50.0), 1),
            GroundTruth::new(BoundingBox::new(100.0, 100.0, 150.0, 150.0), 1),
        ],
    )];
    let detector = FixtureDetector::new().with_response(
        1,
        vec![
            Detection::new(BoundingBox::new(1.0, 1.0, 51.0, 51.0), 1, 0.92),
            Detection::new(BoundingBox::new(102.0, 102.0, 152.0, 152.0), 1, 0.55),
            Detection::new(BoundingBox::new(300.0, 300.0, 350.0, 350.0), 1, 0.40),
        ],
    );

    let mut source = InMemorySource::new(samples);
    let thresholds = generate_threshold_range(0.1, 0.9, 9)?;
    let sweep = evaluate_at_confidence_thresholds(
        &mut source,
        &detector,
        &labels,
        &EvaluationConfig::default(),
        &thresholds,
    )?;

    println!("threshold  precision  recall  f1");
    for (threshold, eval) in &sweep {
        println!(
            "{:>9.2}  {:>9.2}  {:>6.2}  {:>4.2}",
            threshold,
            eval.precision(),
            eval.recall(),
            eval.f1()
        );
    }

    Ok(())
}
