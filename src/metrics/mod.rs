//! Metrics calculation modules for detection evaluation.

pub mod iou;
pub mod precision_recall;

pub use iou::{calculate_iou, calculate_iou_matrix};
pub use precision_recall::{
    calculate_f1_score, calculate_precision, calculate_precision_recall, calculate_recall,
    PrecisionRecall,
};
