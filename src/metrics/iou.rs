//! Intersection over Union (IoU) calculation.

use crate::types::BoundingBox;

/// Calculate the Intersection over Union (IoU) between two bounding boxes.
///
/// IoU is defined as the area of intersection divided by the area of union.
///
/// # Arguments
///
/// * `bbox1` - First bounding box
/// * `bbox2` - Second bounding box
///
/// # Returns
///
/// Returns a value between 0.0 (no overlap) and 1.0 (perfect overlap).
/// A zero-area union (both boxes degenerate) yields 0.0.
///
/// # Example
///
/// ```
/// use det_eval::metrics::iou::calculate_iou;
/// use det_eval::types::BoundingBox;
///
/// let bbox1 = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
/// let bbox2 = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
/// let iou = calculate_iou(&bbox1, &bbox2);
/// assert!(iou > 0.0 && iou < 1.0);
/// ```
pub fn calculate_iou(bbox1: &BoundingBox, bbox2: &BoundingBox) -> f64 {
    // Intersection rectangle corners
    let ymin = bbox1.ymin.max(bbox2.ymin);
    let xmin = bbox1.xmin.max(bbox2.xmin);
    let ymax = bbox1.ymax.min(bbox2.ymax);
    let xmax = bbox1.xmax.min(bbox2.xmax);

    // Clamp to zero when the boxes do not overlap
    let intersection_height = (ymax - ymin).max(0.0);
    let intersection_width = (xmax - xmin).max(0.0);
    let intersection_area = intersection_height * intersection_width;

    let union_area = bbox1.area() + bbox2.area() - intersection_area;

    // Avoid division by zero
    if union_area == 0.0 {
        return 0.0;
    }

    intersection_area / union_area
}

/// Calculate the IoU matrix between two sets of bounding boxes.
///
/// # Arguments
///
/// * `bboxes1` - First set of bounding boxes
/// * `bboxes2` - Second set of bounding boxes
///
/// # Returns
///
/// Returns a 2D vector where `result[i][j]` is the IoU between `bboxes1[i]` and `bboxes2[j]`.
pub fn calculate_iou_matrix(bboxes1: &[BoundingBox], bboxes2: &[BoundingBox]) -> Vec<Vec<f64>> {
    bboxes1
        .iter()
        .map(|bbox1| {
            bboxes2
                .iter()
                .map(|bbox2| calculate_iou(bbox1, bbox2))
                .collect()
        })
        .collect()
}
