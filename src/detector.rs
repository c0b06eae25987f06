//! The `Detector` capability and helpers for raw model output.

use crate::error::{DetEvalError, Result};
use crate::types::{BoundingBox, Detection, ImageSample};
use std::collections::HashMap;

/// A black-box detection model: maps an image sample to a list of detections.
///
/// Implementations wrap whatever inference stack produces the boxes; the
/// evaluator only sees the trait. A failed inference call propagates as an
/// error, there is no retry.
pub trait Detector {
    /// Run inference for one sample.
    fn detect(&self, sample: &ImageSample) -> Result<Vec<Detection>>;
}

/// Raw model output as parallel arrays of boxes, scores, and class ids.
///
/// Pre-trained detectors commonly emit these three arrays side by side, boxes
/// in (ymin, xmin, ymax, xmax) order. `into_detections` validates that the
/// arrays line up before handing them to the evaluator.
#[derive(Debug, Clone, Default)]
pub struct RawDetections {
    pub boxes: Vec<[f64; 4]>,
    pub scores: Vec<f64>,
    pub class_ids: Vec<u64>,
}

impl RawDetections {
    /// Convert parallel arrays into typed detections.
    ///
    /// # Errors
    ///
    /// Returns an error when the arrays have mismatched lengths or a box
    /// violates the corner ordering invariant.
    pub fn into_detections(self) -> Result<Vec<Detection>> {
        if self.scores.len() != self.boxes.len() || self.class_ids.len() != self.boxes.len() {
            return Err(DetEvalError::InvalidDetectorOutput(format!(
                "Parallel arrays disagree: {} boxes, {} scores, {} class ids",
                self.boxes.len(),
                self.scores.len(),
                self.class_ids.len()
            )));
        }

        self.boxes
            .into_iter()
            .zip(self.scores)
            .zip(self.class_ids)
            .map(|((corners, score), class_id)| {
                let bbox = BoundingBox::new(corners[0], corners[1], corners[2], corners[3]);
                if !bbox.is_valid() {
                    return Err(DetEvalError::InvalidBoundingBox(format!(
                        "Corner ordering violated: {:?}",
                        corners
                    )));
                }
                Ok(Detection::new(bbox, class_id, score))
            })
            .collect()
    }
}

/// A detector that replays canned responses keyed by image id.
///
/// Images without a registered response yield no detections. Used to exercise
/// the evaluator without a real model.
#[derive(Debug, Clone, Default)]
pub struct FixtureDetector {
    responses: HashMap<u64, Vec<Detection>>,
}

impl FixtureDetector {
    /// Create a fixture detector with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the detections to return for an image id.
    pub fn with_response(mut self, image_id: u64, detections: Vec<Detection>) -> Self {
        self.responses.insert(image_id, detections);
        self
    }
}

impl Detector for FixtureDetector {
    fn detect(&self, sample: &ImageSample) -> Result<Vec<Detection>> {
        Ok(self
            .responses
            .get(&sample.image_id)
            .cloned()
            .unwrap_or_default())
    }
}
