//! Text report rendering for evaluation results.

use crate::evaluator::Evaluation;
use crate::types::LabelMap;
use std::fmt::Write;

/// Render an evaluation as a labeled text report.
///
/// Ratios are formatted to two decimal places. Per-class detection counts are
/// printed with names resolved through the label map; detections whose class
/// ids the map does not know are folded into a single unnamed bucket rather
/// than dropped silently or treated as an error.
pub fn format_report(eval: &Evaluation, labels: &LabelMap) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Detection Evaluation ===");
    let _ = writeln!(out, "Samples evaluated: {}", eval.stats.samples_processed);
    let _ = writeln!(out, "True Positives: {}", eval.tally.true_positives);
    let _ = writeln!(out, "False Positives: {}", eval.tally.false_positives);
    let _ = writeln!(out, "False Negatives: {}", eval.tally.false_negatives);
    let _ = writeln!(out, "Precision: {:.2}", eval.precision());
    let _ = writeln!(out, "Recall: {:.2}", eval.recall());
    let _ = writeln!(out, "F1 Score: {:.2}", eval.f1());

    if !eval.class_detections.is_empty() {
        let _ = writeln!(out, "Detections per class:");
        let mut unknown = 0;
        for (&class_id, &count) in &eval.class_detections {
            match labels.name_of(class_id) {
                Some(name) => {
                    let _ = writeln!(out, "  {}: {}", name, count);
                }
                None => unknown += count,
            }
        }
        if unknown > 0 {
            let _ = writeln!(out, "  (unknown classes): {}", unknown);
        }
    }

    let _ = writeln!(out, "Detections returned: {}", eval.stats.detections_returned);
    let _ = writeln!(
        out,
        "Below confidence threshold: {}",
        eval.stats.detections_below_confidence
    );
    let _ = writeln!(
        out,
        "Images without detections: {}",
        eval.stats.images_without_detections
    );
    let _ = writeln!(out, "============================");

    out
}

/// Print the evaluation report to stdout.
pub fn print_report(eval: &Evaluation, labels: &LabelMap) {
    print!("{}", format_report(eval, labels));
}
