//! Main evaluation orchestrator: pulls samples, runs the detector, and
//! aggregates the tally.

use crate::dataset::DatasetSource;
use crate::detector::Detector;
use crate::error::{DetEvalError, Result};
use crate::matching::match_image;
use crate::metrics::precision_recall::calculate_f1_score;
use crate::stats::RunStats;
use crate::threshold::{filter_by_confidence, validate_threshold};
use crate::types::{EvaluationTally, LabelMap};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// Configuration for one evaluation run.
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// Minimum detector score for a prediction to be considered.
    pub confidence_threshold: f64,
    /// A detection counts as found only when its best overlap is strictly
    /// greater than this.
    pub iou_threshold: f64,
    /// Upper bound on samples pulled from the source; the run stops earlier
    /// if the source is exhausted.
    pub num_samples: usize,
    /// When false (the default), per-image false negatives are approximated
    /// as the ground-truth count minus the image's true positives, without
    /// tracking which boxes were actually matched. When true, ground-truth
    /// boxes never claimed by a true positive are counted instead; the two
    /// modes diverge once several detections claim the same box.
    pub exact_false_negatives: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            iou_threshold: 0.5,
            num_samples: 10,
            exact_false_negatives: false,
        }
    }
}

impl EvaluationConfig {
    /// Validate threshold ranges and the sample bound.
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.confidence_threshold)?;
        validate_threshold(self.iou_threshold)?;
        if self.num_samples == 0 {
            return Err(DetEvalError::InvalidConfig(
                "num_samples must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-image evaluation result.
#[derive(Debug, Clone)]
pub struct ImageResult {
    pub image_id: u64,
    pub ground_truth_count: usize,
    pub tally: EvaluationTally,
}

/// Result of one evaluation run: aggregate tally, per-image results, and
/// run statistics.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Aggregate counters across all processed samples.
    pub tally: EvaluationTally,
    /// Per-image counters, in processing order.
    pub per_image: Vec<ImageResult>,
    /// Kept detections per class id.
    pub class_detections: BTreeMap<u64, usize>,
    /// Bookkeeping counters for the run.
    pub stats: RunStats,
}

impl Evaluation {
    /// Aggregate precision, 0.0 when no detections were kept.
    pub fn precision(&self) -> f64 {
        self.tally.precision()
    }

    /// Aggregate recall, 0.0 when there was no ground truth.
    pub fn recall(&self) -> f64 {
        self.tally.recall()
    }

    /// Aggregate F1 score.
    pub fn f1(&self) -> f64 {
        calculate_f1_score(self.precision(), self.recall())
    }
}

/// Evaluate a detector against a dataset source.
///
/// The source is rewound first, then up to `config.num_samples` samples are
/// processed sequentially. Per image: detections below the confidence
/// threshold are discarded, the survivors are matched against ground truth
/// by highest IoU, and true/false positives are tallied. False negatives
/// default to the ground-truth count minus the image's true positives
/// (saturating at zero); see [`EvaluationConfig::exact_false_negatives`].
///
/// Detections with class ids missing from `labels` still participate in
/// matching (matching compares ids, not names); they are counted and logged
/// so the report can fold them into an unnamed bucket.
///
/// # Errors
///
/// Returns an error on invalid configuration, or when the source or the
/// detector fails. Metric edge cases (nothing detected, nothing to find) are
/// not errors; they yield zero counters and 0.0 ratios.
pub fn evaluate<S, D>(
    source: &mut S,
    detector: &D,
    labels: &LabelMap,
    config: &EvaluationConfig,
) -> Result<Evaluation>
where
    S: DatasetSource,
    D: Detector,
{
    config.validate()?;
    source.reset()?;

    let mut tally = EvaluationTally::new();
    let mut per_image = Vec::new();
    let mut class_detections: BTreeMap<u64, usize> = BTreeMap::new();
    let mut stats = RunStats::new();

    while stats.samples_processed < config.num_samples {
        let Some(sample) = source.next_sample()? else {
            break;
        };

        let detections = detector.detect(&sample)?;
        stats.add_sample();
        stats.add_detections(detections.len());

        let kept = filter_by_confidence(&detections, config.confidence_threshold)?;
        stats.add_below_confidence(detections.len() - kept.len());
        if kept.is_empty() {
            stats.add_empty_image();
        }

        for detection in &kept {
            *class_detections.entry(detection.class_id).or_insert(0) += 1;
            if !labels.is_empty() && !labels.contains(detection.class_id) {
                stats.add_unknown_class();
                warn!(
                    class_id = detection.class_id,
                    image_id = sample.image_id,
                    "detector returned unknown class id"
                );
            }
        }

        let outcomes = match_image(&kept, &sample.ground_truth, config.iou_threshold);

        let mut image_tally = EvaluationTally::new();
        let mut matched_gt: HashSet<usize> = HashSet::new();
        for outcome in &outcomes {
            if outcome.is_true_positive {
                image_tally.record_true_positive();
                if let Some(gt_idx) = outcome.matched_ground_truth {
                    matched_gt.insert(gt_idx);
                }
            } else {
                image_tally.record_false_positive();
            }
        }

        let missed = if config.exact_false_negatives {
            sample.ground_truth.len() - matched_gt.len()
        } else {
            sample
                .ground_truth
                .len()
                .saturating_sub(image_tally.true_positives)
        };
        image_tally.record_false_negatives(missed);

        debug!(
            image_id = sample.image_id,
            true_positives = image_tally.true_positives,
            false_positives = image_tally.false_positives,
            false_negatives = image_tally.false_negatives,
            "image evaluated"
        );

        tally.merge(&image_tally);
        per_image.push(ImageResult {
            image_id: sample.image_id,
            ground_truth_count: sample.ground_truth.len(),
            tally: image_tally,
        });
    }

    info!(
        samples = stats.samples_processed,
        true_positives = tally.true_positives,
        false_positives = tally.false_positives,
        false_negatives = tally.false_negatives,
        "evaluation run complete"
    );

    Ok(Evaluation {
        tally,
        per_image,
        class_detections,
        stats,
    })
}

/// Re-run the evaluation at several confidence thresholds.
///
/// Relies on the source being restartable; every threshold gets a full pass
/// over the same samples.
///
/// # Returns
///
/// Returns one `(threshold, Evaluation)` pair per input threshold, in input
/// order.
pub fn evaluate_at_confidence_thresholds<S, D>(
    source: &mut S,
    detector: &D,
    labels: &LabelMap,
    config: &EvaluationConfig,
    thresholds: &[f64],
) -> Result<Vec<(f64, Evaluation)>>
where
    S: DatasetSource,
    D: Detector,
{
    thresholds
        .iter()
        .map(|&threshold| {
            let run_config = EvaluationConfig {
                confidence_threshold: threshold,
                ..config.clone()
            };
            evaluate(source, detector, labels, &run_config).map(|eval| (threshold, eval))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InMemorySource;
    use crate::detector::FixtureDetector;
    use crate::types::{BoundingBox, Detection, GroundTruth, ImageSample};

    fn single_box_sample(image_id: u64) -> ImageSample {
        ImageSample::new(
            image_id,
            vec![GroundTruth::new(BoundingBox::new(10.0, 10.0, 60.0, 60.0), 1)],
        )
    }

    fn labels() -> LabelMap {
        let mut labels = LabelMap::new();
        labels.insert(1, "person");
        labels.insert(2, "car");
        labels
    }

    #[test]
    fn test_perfect_detection() {
        let mut source = InMemorySource::new(vec![single_box_sample(1)]);
        let detector = FixtureDetector::new().with_response(
            1,
            vec![Detection::new(BoundingBox::new(10.0, 10.0, 60.0, 60.0), 1, 0.9)],
        );

        let eval = evaluate(&mut source, &detector, &labels(), &EvaluationConfig::default())
            .unwrap();

        assert_eq!(eval.tally.true_positives, 1);
        assert_eq!(eval.tally.false_positives, 0);
        assert_eq!(eval.tally.false_negatives, 0);
        assert_eq!(eval.precision(), 1.0);
        assert_eq!(eval.recall(), 1.0);
        assert_eq!(eval.f1(), 1.0);
    }

    #[test]
    fn test_low_confidence_detection_is_dropped() {
        let mut source = InMemorySource::new(vec![single_box_sample(1)]);
        let detector = FixtureDetector::new().with_response(
            1,
            vec![Detection::new(BoundingBox::new(10.0, 10.0, 60.0, 60.0), 1, 0.4)],
        );

        let eval = evaluate(&mut source, &detector, &labels(), &EvaluationConfig::default())
            .unwrap();

        // Never reaches matching: one missed box, nothing counted as detected
        assert_eq!(eval.tally.true_positives, 0);
        assert_eq!(eval.tally.false_positives, 0);
        assert_eq!(eval.tally.false_negatives, 1);
        assert_eq!(eval.stats.detections_below_confidence, 1);
        assert_eq!(eval.stats.images_without_detections, 1);
    }

    #[test]
    fn test_num_samples_bounds_the_run() {
        let samples: Vec<ImageSample> = (1..=5).map(single_box_sample).collect();
        let mut source = InMemorySource::new(samples);
        let detector = FixtureDetector::new();

        let config = EvaluationConfig {
            num_samples: 3,
            ..EvaluationConfig::default()
        };
        let eval = evaluate(&mut source, &detector, &labels(), &config).unwrap();

        assert_eq!(eval.stats.samples_processed, 3);
        assert_eq!(eval.per_image.len(), 3);
        assert_eq!(eval.tally.false_negatives, 3);
    }

    #[test]
    fn test_approximate_vs_exact_false_negatives() {
        // Two detections claim the same ground-truth box; a second box is
        // never found. Approximate counting cancels a miss against the
        // duplicate true positive, exact counting does not.
        let sample = ImageSample::new(
            1,
            vec![
                GroundTruth::new(BoundingBox::new(10.0, 10.0, 60.0, 60.0), 1),
                GroundTruth::new(BoundingBox::new(200.0, 200.0, 260.0, 260.0), 1),
            ],
        );
        let detector = FixtureDetector::new().with_response(
            1,
            vec![
                Detection::new(BoundingBox::new(10.0, 10.0, 60.0, 60.0), 1, 0.9),
                Detection::new(BoundingBox::new(11.0, 11.0, 61.0, 61.0), 1, 0.8),
            ],
        );

        let mut source = InMemorySource::new(vec![sample]);

        let approx = evaluate(
            &mut source,
            &detector,
            &labels(),
            &EvaluationConfig::default(),
        )
        .unwrap();
        assert_eq!(approx.tally.true_positives, 2);
        assert_eq!(approx.tally.false_negatives, 0);

        let exact_config = EvaluationConfig {
            exact_false_negatives: true,
            ..EvaluationConfig::default()
        };
        let exact = evaluate(&mut source, &detector, &labels(), &exact_config).unwrap();
        assert_eq!(exact.tally.true_positives, 2);
        assert_eq!(exact.tally.false_negatives, 1);
    }

    #[test]
    fn test_unknown_class_is_counted_not_fatal() {
        let mut source = InMemorySource::new(vec![single_box_sample(1)]);
        let detector = FixtureDetector::new().with_response(
            1,
            vec![Detection::new(BoundingBox::new(10.0, 10.0, 60.0, 60.0), 99, 0.9)],
        );

        let eval = evaluate(&mut source, &detector, &labels(), &EvaluationConfig::default())
            .unwrap();

        // Label mismatch against ground-truth class 1
        assert_eq!(eval.tally.false_positives, 1);
        assert_eq!(eval.stats.detections_unknown_class, 1);
        assert_eq!(eval.class_detections.get(&99), Some(&1));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut source = InMemorySource::new(vec![]);
        let detector = FixtureDetector::new();

        let bad_threshold = EvaluationConfig {
            confidence_threshold: 1.5,
            ..EvaluationConfig::default()
        };
        assert!(evaluate(&mut source, &detector, &labels(), &bad_threshold).is_err());

        let zero_samples = EvaluationConfig {
            num_samples: 0,
            ..EvaluationConfig::default()
        };
        assert!(evaluate(&mut source, &detector, &labels(), &zero_samples).is_err());
    }

    #[test]
    fn test_threshold_sweep_restarts_source() {
        let mut source = InMemorySource::new(vec![single_box_sample(1)]);
        let detector = FixtureDetector::new().with_response(
            1,
            vec![Detection::new(BoundingBox::new(10.0, 10.0, 60.0, 60.0), 1, 0.6)],
        );

        let sweep = evaluate_at_confidence_thresholds(
            &mut source,
            &detector,
            &labels(),
            &EvaluationConfig::default(),
            &[0.5, 0.7],
        )
        .unwrap();

        assert_eq!(sweep.len(), 2);
        // Kept at 0.5, dropped at 0.7
        assert_eq!(sweep[0].1.tally.true_positives, 1);
        assert_eq!(sweep[1].1.tally.true_positives, 0);
        assert_eq!(sweep[1].1.tally.false_negatives, 1);
    }
}
