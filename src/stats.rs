/// Statistics tracking for evaluation runs
///
/// This module provides counters collected while samples flow through the
/// evaluator, reported alongside the detection-quality metrics.

use serde::{Deserialize, Serialize};

/// Counters collected during one evaluation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Number of image samples pulled from the dataset source
    pub samples_processed: usize,

    /// Total detections returned by the detector across all samples
    pub detections_returned: usize,

    /// Detections dropped by the confidence filter
    pub detections_below_confidence: usize,

    /// Detections whose class id is not in the label map
    pub detections_unknown_class: usize,

    /// Images where no detection survived the confidence filter
    pub images_without_detections: usize,
}

impl RunStats {
    /// Create a new `RunStats` with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processed sample
    pub fn add_sample(&mut self) {
        self.samples_processed += 1;
    }

    /// Record detections returned by the detector for one sample
    pub fn add_detections(&mut self, count: usize) {
        self.detections_returned += count;
    }

    /// Record detections dropped by the confidence filter
    pub fn add_below_confidence(&mut self, count: usize) {
        self.detections_below_confidence += count;
    }

    /// Record a detection carrying an unknown class id
    pub fn add_unknown_class(&mut self) {
        self.detections_unknown_class += 1;
    }

    /// Record an image with no surviving detections
    pub fn add_empty_image(&mut self) {
        self.images_without_detections += 1;
    }

    /// Detections that survived the confidence filter
    pub fn detections_kept(&self) -> usize {
        self.detections_returned
            .saturating_sub(self.detections_below_confidence)
    }

    /// Get a formatted one-line summary of the statistics
    pub fn summary_string(&self) -> String {
        format!(
            "RunStats {{ samples: {}, detections: {}, kept: {}, unknown_class: {}, empty_images: {} }}",
            self.samples_processed,
            self.detections_returned,
            self.detections_kept(),
            self.detections_unknown_class,
            self.images_without_detections
        )
    }
}
