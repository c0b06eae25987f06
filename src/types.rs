//! Core data types for detections, ground truth, and evaluation tallies.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Axis-aligned bounding box in corner format (ymin, xmin, ymax, xmax).
///
/// This is the ordinate order emitted by common detection models. Coordinates
/// may be normalized fractions or absolute pixels; the evaluation only
/// requires that ground truth and predictions use the same convention.
///
/// A box with `ymin == ymax` or `xmin == xmax` is degenerate: it has zero
/// area and never overlaps anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub ymin: f64,
    pub xmin: f64,
    pub ymax: f64,
    pub xmax: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(ymin: f64, xmin: f64, ymax: f64, xmax: f64) -> Self {
        Self { ymin, xmin, ymax, xmax }
    }

    /// Create a bounding box from COCO-style (x, y, width, height) values.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            ymin: y,
            xmin: x,
            ymax: y + height,
            xmax: x + width,
        }
    }

    /// Convert to COCO-style [x, y, width, height].
    pub fn to_xywh(&self) -> [f64; 4] {
        [self.xmin, self.ymin, self.width(), self.height()]
    }

    /// Get the box width (xmax - xmin).
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Get the box height (ymax - ymin).
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Get the area of the bounding box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Check that the corner ordering invariant holds (ymin <= ymax, xmin <= xmax).
    pub fn is_valid(&self) -> bool {
        self.ymin <= self.ymax && self.xmin <= self.xmax
    }

    /// Check whether the box has zero area.
    pub fn is_degenerate(&self) -> bool {
        self.area() == 0.0
    }
}

/// A single prediction from a detector: box, class id, and confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub class_id: u64,
    /// Confidence score in [0, 1].
    pub score: f64,
}

impl Detection {
    /// Create a new detection.
    pub fn new(bbox: BoundingBox, class_id: u64, score: f64) -> Self {
        Self { bbox, class_id, score }
    }
}

/// A ground-truth annotation: box and class id, no score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruth {
    pub bbox: BoundingBox,
    pub class_id: u64,
}

impl GroundTruth {
    /// Create a new ground-truth annotation.
    pub fn new(bbox: BoundingBox, class_id: u64) -> Self {
        Self { bbox, class_id }
    }
}

/// One dataset item: an image identifier and its ground-truth annotations.
///
/// Samples are produced lazily by a [`crate::dataset::DatasetSource`] and each
/// is consumed once per evaluation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSample {
    pub image_id: u64,
    pub file_name: Option<String>,
    pub ground_truth: Vec<GroundTruth>,
}

impl ImageSample {
    /// Create a sample with no file name.
    pub fn new(image_id: u64, ground_truth: Vec<GroundTruth>) -> Self {
        Self {
            image_id,
            file_name: None,
            ground_truth,
        }
    }
}

/// Represents a category from dataset metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supercategory: Option<String>,
}

/// Class-id to class-name mapping built from dataset metadata.
///
/// Lookups for ids the dataset never declared return `None`; the report layer
/// folds such detections into an unnamed bucket instead of failing.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    names: HashMap<u64, String>,
}

impl LabelMap {
    /// Create an empty label map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a label map from dataset categories.
    pub fn from_categories(categories: &[Category]) -> Self {
        let names = categories
            .iter()
            .map(|c| (c.id, c.name.clone()))
            .collect();
        Self { names }
    }

    /// Register a class name.
    pub fn insert(&mut self, class_id: u64, name: impl Into<String>) {
        self.names.insert(class_id, name.into());
    }

    /// Look up the name for a class id.
    pub fn name_of(&self, class_id: u64) -> Option<&str> {
        self.names.get(&class_id).map(String::as_str)
    }

    /// Check whether a class id is known.
    pub fn contains(&self, class_id: u64) -> bool {
        self.names.contains_key(&class_id)
    }

    /// Number of known classes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Running true/false positive/negative counters for one evaluation run.
///
/// Mutated only by the evaluator and reset at the start of each run.
/// Counters saturate at zero when decremented implicitly (the approximate
/// false-negative count subtracts true positives from the ground-truth count
/// per image and clamps rather than going negative).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationTally {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationTally {
    /// Create a tally with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one true positive.
    pub fn record_true_positive(&mut self) {
        self.true_positives += 1;
    }

    /// Record one false positive.
    pub fn record_false_positive(&mut self) {
        self.false_positives += 1;
    }

    /// Record a number of false negatives.
    pub fn record_false_negatives(&mut self, count: usize) {
        self.false_negatives += count;
    }

    /// Fold another tally (e.g. a per-image tally) into this one.
    pub fn merge(&mut self, other: &EvaluationTally) {
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.false_negatives += other.false_negatives;
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Precision derived from the counters, 0.0 when no detections were kept.
    pub fn precision(&self) -> f64 {
        crate::metrics::precision_recall::calculate_precision(
            self.true_positives,
            self.false_positives,
        )
    }

    /// Recall derived from the counters, 0.0 when there was nothing to find.
    pub fn recall(&self) -> f64 {
        crate::metrics::precision_recall::calculate_recall(
            self.true_positives,
            self.false_negatives,
        )
    }
}
