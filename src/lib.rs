//! # det-eval
//!
//! A Rust library for evaluating object-detection output against ground-truth
//! annotations via Intersection-over-Union (IoU) matching.
//!
//! This library provides:
//! - **IoU** calculation between corner-format bounding boxes
//! - **Greedy best-overlap matching** of detections to ground truth per image
//! - **Precision / Recall / F1** derived from running TP/FP/FN tallies
//! - **Confidence thresholding** before matching, and threshold sweeps
//! - A labeled **text report** with per-class detection counts
//!
//! The detection model and the dataset stay behind two capability traits —
//! [`detector::Detector`] and [`dataset::DatasetSource`] — so the evaluator
//! runs the same against a real inference stack or synthetic fixtures.
//!
//! ## Quick Start
//!
//! ```rust
//! use det_eval::dataset::InMemorySource;
//! use det_eval::detector::FixtureDetector;
//! use det_eval::evaluator::{evaluate, EvaluationConfig};
//! use det_eval::types::{BoundingBox, Detection, GroundTruth, ImageSample, LabelMap};
//!
//! # fn main() -> det_eval::Result<()> {
//! let mut labels = LabelMap::new();
//! labels.insert(1, "person");
//!
//! let mut source = InMemorySource::new(vec![ImageSample::new(
//!     1,
//!     vec![GroundTruth::new(BoundingBox::new(0.1, 0.1, 0.4, 0.4), 1)],
//! )]);
//! let detector = FixtureDetector::new().with_response(
//!     1,
//!     vec![Detection::new(BoundingBox::new(0.1, 0.1, 0.4, 0.4), 1, 0.9)],
//! );
//!
//! let eval = evaluate(&mut source, &detector, &labels, &EvaluationConfig::default())?;
//! assert_eq!(eval.tally.true_positives, 1);
//! println!("Precision: {:.2}", eval.precision());
//! # Ok(())
//! # }
//! ```
//!
//! ## Evaluation semantics
//!
//! Matching is unconstrained: each detection pairs with the ground-truth box
//! of highest IoU, and one box may be claimed by several detections. A
//! detection is a true positive when its best IoU is strictly above the IoU
//! threshold and the class ids agree. By default, per-image false negatives
//! are approximated as the ground-truth count minus the image's true
//! positives; exact per-box tracking is available via
//! [`evaluator::EvaluationConfig::exact_false_negatives`].

pub mod error;
pub mod types;
pub mod dataset;
pub mod detector;
pub mod threshold;
pub mod metrics;
pub mod matching;
pub mod evaluator;
pub mod stats;
pub mod report;
pub mod polars_utils;

// Re-export commonly used types and functions
pub use error::{DetEvalError, Result};
pub use types::{
    BoundingBox, Category, Detection, EvaluationTally, GroundTruth, ImageSample, LabelMap,
};
pub use dataset::{load_from_file, load_from_string, DatasetSource, InMemorySource};
pub use detector::{Detector, FixtureDetector, RawDetections};
pub use evaluator::{evaluate, evaluate_at_confidence_thresholds, Evaluation, EvaluationConfig};
pub use report::{format_report, print_report};
pub use threshold::{filter_by_confidence, generate_threshold_range};
