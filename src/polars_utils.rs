/// Utilities for working with Polars DataFrames
///
/// This module bridges evaluation results into Polars DataFrames so
/// downstream analysis (grouping, joining, plotting frontends) can work with
/// per-image rows instead of walking the result structs.

use polars::prelude::*;
use crate::error::DetEvalError;
use crate::evaluator::ImageResult;

/// Validate that a DataFrame contains all required columns
///
/// # Arguments
///
/// * `df` - The DataFrame to validate
/// * `required_columns` - Slice of required column names
///
/// # Returns
///
/// `Ok(())` if all columns are present, error otherwise
pub fn validate_columns(df: &DataFrame, required_columns: &[&str]) -> Result<(), DetEvalError> {
    let column_names: Vec<String> = df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for col in required_columns {
        if !column_names.iter().any(|c| c == col) {
            return Err(DetEvalError::MissingColumn(col.to_string()));
        }
    }

    Ok(())
}

/// Build a DataFrame with one row per evaluated image
///
/// Columns: `image_id`, `ground_truth`, `true_positives`, `false_positives`,
/// `false_negatives`, `precision`, `recall`.
pub fn per_image_frame(results: &[ImageResult]) -> Result<DataFrame, DetEvalError> {
    let image_ids: Vec<i64> = results.iter().map(|r| r.image_id as i64).collect();
    let ground_truth: Vec<u32> = results.iter().map(|r| r.ground_truth_count as u32).collect();
    let true_positives: Vec<u32> = results.iter().map(|r| r.tally.true_positives as u32).collect();
    let false_positives: Vec<u32> = results.iter().map(|r| r.tally.false_positives as u32).collect();
    let false_negatives: Vec<u32> = results.iter().map(|r| r.tally.false_negatives as u32).collect();
    let precision: Vec<f64> = results.iter().map(|r| r.tally.precision()).collect();
    let recall: Vec<f64> = results.iter().map(|r| r.tally.recall()).collect();

    let df = df! {
        "image_id" => image_ids,
        "ground_truth" => ground_truth,
        "true_positives" => true_positives,
        "false_positives" => false_positives,
        "false_negatives" => false_negatives,
        "precision" => precision,
        "recall" => recall,
    }?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EvaluationTally;

    #[test]
    fn test_validate_columns_success() {
        let df = df! {
            "col1" => &[1, 2, 3],
            "col2" => &["a", "b", "c"],
        }.unwrap();

        assert!(validate_columns(&df, &["col1", "col2"]).is_ok());
    }

    #[test]
    fn test_validate_columns_missing() {
        let df = df! {
            "col1" => &[1, 2, 3],
        }.unwrap();

        let result = validate_columns(&df, &["col1", "col2"]);
        assert!(result.is_err());
        match result {
            Err(DetEvalError::MissingColumn(col)) => assert_eq!(col, "col2"),
            _ => panic!("Expected MissingColumn error"),
        }
    }

    #[test]
    fn test_per_image_frame() {
        let results = vec![
            ImageResult {
                image_id: 1,
                ground_truth_count: 2,
                tally: EvaluationTally {
                    true_positives: 2,
                    false_positives: 0,
                    false_negatives: 0,
                },
            },
            ImageResult {
                image_id: 2,
                ground_truth_count: 1,
                tally: EvaluationTally {
                    true_positives: 0,
                    false_positives: 1,
                    false_negatives: 1,
                },
            },
        ];

        let df = per_image_frame(&results).unwrap();
        assert_eq!(df.height(), 2);
        assert!(validate_columns(
            &df,
            &["image_id", "true_positives", "false_positives", "false_negatives", "precision", "recall"],
        )
        .is_ok());

        let precision = df.column("precision").unwrap().f64().unwrap();
        assert_eq!(precision.get(0), Some(1.0));
        assert_eq!(precision.get(1), Some(0.0));
    }

    #[test]
    fn test_per_image_frame_empty() {
        let df = per_image_frame(&[]).unwrap();
        assert_eq!(df.height(), 0);
    }
}
