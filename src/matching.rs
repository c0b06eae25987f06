//! Per-image matching of detections against ground-truth boxes.

use crate::metrics::iou::calculate_iou;
use crate::types::{Detection, GroundTruth};

/// Outcome of matching one detection against an image's ground truth.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// Index of the detection in the input slice.
    pub detection_index: usize,
    /// Highest IoU found against any ground-truth box.
    pub best_iou: f64,
    /// Index of the best-overlapping ground-truth box, if the overlap cleared
    /// the IoU threshold.
    pub matched_ground_truth: Option<usize>,
    /// True when the overlap cleared the threshold and the class ids agree.
    pub is_true_positive: bool,
}

/// Match detections to ground-truth boxes for a single image.
///
/// Each detection is compared against every ground-truth box and paired with
/// the one of highest IoU. The pairing is unconstrained: a single ground-truth
/// box may be claimed by several detections. A detection is a true positive
/// when its best IoU is strictly greater than `iou_threshold` and the class
/// ids agree; every other detection is a false positive, including those whose
/// best overlap cleared the threshold with the wrong class.
///
/// # Arguments
///
/// * `detections` - Detections that survived confidence filtering
/// * `ground_truths` - Ground-truth boxes for the image
/// * `iou_threshold` - Minimum overlap for a detection to count as found
///
/// # Returns
///
/// Returns one `MatchOutcome` per detection, in input order.
pub fn match_image(
    detections: &[Detection],
    ground_truths: &[GroundTruth],
    iou_threshold: f64,
) -> Vec<MatchOutcome> {
    detections
        .iter()
        .enumerate()
        .map(|(det_idx, det)| {
            let mut best_iou = 0.0;
            let mut best_gt_idx: Option<usize> = None;

            for (gt_idx, gt) in ground_truths.iter().enumerate() {
                let iou = calculate_iou(&det.bbox, &gt.bbox);
                if iou > best_iou {
                    best_iou = iou;
                    best_gt_idx = Some(gt_idx);
                }
            }

            if best_iou > iou_threshold {
                let matched = best_gt_idx;
                let is_tp = matched
                    .map(|gt_idx| ground_truths[gt_idx].class_id == det.class_id)
                    .unwrap_or(false);
                MatchOutcome {
                    detection_index: det_idx,
                    best_iou,
                    matched_ground_truth: matched,
                    is_true_positive: is_tp,
                }
            } else {
                MatchOutcome {
                    detection_index: det_idx,
                    best_iou,
                    matched_ground_truth: None,
                    is_true_positive: false,
                }
            }
        })
        .collect()
}
