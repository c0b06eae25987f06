//! Basic evaluation example demonstrating core functionality.

use det_eval::dataset::load_from_string;
use det_eval::detector::{FixtureDetector, RawDetections};
use det_eval::evaluator::{evaluate, EvaluationConfig};
use det_eval::metrics::iou::calculate_iou;
use det_eval::report::print_report;
use det_eval::types::BoundingBox;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Detection Evaluation Example ===\n");

    // Example 1: IoU calculation
    println!("1. IoU Calculation");
    let bbox1 = BoundingBox::new(10.0, 10.0, 60.0, 60.0);
    let bbox2 = BoundingBox::new(30.0, 30.0, 80.0, 80.0);
    let iou = calculate_iou(&bbox1, &bbox2);
    println!("   IoU between overlapping boxes: {:.4}", iou);
    println!();

    // Example 2: Load ground-truth annotations
    println!("2. Loading Ground Truth");
    let ground_truth_json = r#"{
        "images": [
            {
                "id": 1,
                "file_name": "image1.jpg",
                "height": 480,
                "width": 640
            }
        ],
        "annotations": [
            {
                "id": 1,
                "image_id": 1,
                "category_id": 1,
                "bbox": [100.0, 100.0, 200.0, 150.0]
            },
            {
                "id": 2,
                "image_id": 1,
                "category_id": 2,
                "bbox": [350.0, 200.0, 100.0, 120.0]
            }
        ],
        "categories": [
            {
                "id": 1,
                "name": "person",
                "supercategory": "human"
            },
            {
                "id": 2,
                "name": "car",
                "supercategory": "vehicle"
            }
        ]
    }"#;

    let file = load_from_string(ground_truth_json)?;
    let labels = file.label_map();
    println!("   Loaded {} annotations", file.annotations.len());
    println!("   Known classes: {}", labels.len());
    println!();

    // Example 3: Canned model output, as the raw parallel arrays a
    // pre-trained detector would emit
    println!("3. Preparing Detector Output");
    let raw = RawDetections {
        boxes: vec![
            [98.0, 105.0, 253.0, 300.0],
            [198.0, 348.0, 323.0, 453.0],
            [10.0, 10.0, 40.0, 40.0],
        ],
        scores: vec![0.95, 0.87, 0.30],
        class_ids: vec![1, 2, 1],
    };
    let detections = raw.into_detections()?;
    println!("   Detector returns {} boxes", detections.len());
    println!();

    // Example 4: Run the evaluation
    println!("4. Evaluation");
    let mut source = file.into_source()?;
    let detector = FixtureDetector::new().with_response(1, detections);
    let eval = evaluate(&mut source, &detector, &labels, &EvaluationConfig::default())?;
    print_report(&eval, &labels);

    Ok(())
}
