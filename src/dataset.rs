//! Dataset access: the `DatasetSource` capability and a COCO-style
//! JSON fixture loader.

use crate::error::{DetEvalError, Result};
use crate::types::{BoundingBox, Category, GroundTruth, ImageSample, LabelMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A lazy, finite, restartable sequence of image samples.
///
/// The evaluator pulls samples one at a time and calls [`reset`] at the start
/// of each run, so one source can back repeated evaluations (e.g. a threshold
/// sweep).
///
/// [`reset`]: DatasetSource::reset
pub trait DatasetSource {
    /// Rewind the source to its first sample.
    fn reset(&mut self) -> Result<()>;

    /// Produce the next sample, or `None` when the source is exhausted.
    fn next_sample(&mut self) -> Result<Option<ImageSample>>;
}

/// A `DatasetSource` backed by an in-memory vector of samples.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    samples: Vec<ImageSample>,
    cursor: usize,
}

impl InMemorySource {
    /// Create a source over the given samples.
    pub fn new(samples: Vec<ImageSample>) -> Self {
        Self { samples, cursor: 0 }
    }

    /// Total number of samples held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check whether the source holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl DatasetSource for InMemorySource {
    fn reset(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }

    fn next_sample(&mut self) -> Result<Option<ImageSample>> {
        match self.samples.get(self.cursor) {
            Some(sample) => {
                self.cursor += 1;
                Ok(Some(sample.clone()))
            }
            None => Ok(None),
        }
    }
}

/// An annotation record in COCO format.
///
/// The bbox is `[x, y, width, height]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: u64,
    pub image_id: u64,
    pub category_id: u64,
    pub bbox: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscrowd: Option<u8>,
}

impl AnnotationRecord {
    /// Convert the bbox array to a corner-format `BoundingBox`.
    pub fn to_bbox(&self) -> Result<BoundingBox> {
        if self.bbox.len() != 4 {
            return Err(DetEvalError::InvalidBoundingBox(format!(
                "Expected 4 values, got {}",
                self.bbox.len()
            )));
        }
        Ok(BoundingBox::from_xywh(
            self.bbox[0],
            self.bbox[1],
            self.bbox[2],
            self.bbox[3],
        ))
    }
}

/// An image record in COCO format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: u64,
    pub file_name: String,
    pub height: u32,
    pub width: u32,
}

/// A complete COCO-style annotation file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageRecord>>,
    pub annotations: Vec<AnnotationRecord>,
    pub categories: Vec<Category>,
}

impl AnnotationFile {
    /// Build the class-id to name mapping from the file's categories.
    pub fn label_map(&self) -> LabelMap {
        LabelMap::from_categories(&self.categories)
    }

    /// Convert the annotation file into per-image samples, ordered by image id.
    ///
    /// Images listed without annotations become samples with empty ground
    /// truth.
    pub fn into_samples(self) -> Result<Vec<ImageSample>> {
        let mut grouped: BTreeMap<u64, Vec<GroundTruth>> = BTreeMap::new();
        let mut file_names: BTreeMap<u64, String> = BTreeMap::new();

        if let Some(images) = &self.images {
            for image in images {
                grouped.entry(image.id).or_default();
                file_names.insert(image.id, image.file_name.clone());
            }
        }

        for record in &self.annotations {
            let bbox = record.to_bbox()?;
            grouped
                .entry(record.image_id)
                .or_default()
                .push(GroundTruth::new(bbox, record.category_id));
        }

        Ok(grouped
            .into_iter()
            .map(|(image_id, ground_truth)| ImageSample {
                image_id,
                file_name: file_names.get(&image_id).cloned(),
                ground_truth,
            })
            .collect())
    }

    /// Convert the annotation file into an in-memory dataset source.
    pub fn into_source(self) -> Result<InMemorySource> {
        Ok(InMemorySource::new(self.into_samples()?))
    }
}

/// Load an annotation file from a JSON file on disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if validation
/// fails.
///
/// # Example
///
/// ```no_run
/// use det_eval::dataset::load_from_file;
///
/// let file = load_from_file("annotations.json").unwrap();
/// println!("Loaded {} annotations", file.annotations.len());
/// ```
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<AnnotationFile> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let annotation_file: AnnotationFile = serde_json::from_reader(reader)?;

    validate_annotation_file(&annotation_file)?;

    Ok(annotation_file)
}

/// Load an annotation file from a JSON string.
///
/// # Example
///
/// ```
/// use det_eval::dataset::load_from_string;
///
/// let json = r#"{
///     "annotations": [],
///     "categories": [{"id": 1, "name": "person"}]
/// }"#;
/// let file = load_from_string(json).unwrap();
/// ```
pub fn load_from_string(json_str: &str) -> Result<AnnotationFile> {
    let annotation_file: AnnotationFile = serde_json::from_str(json_str)?;
    validate_annotation_file(&annotation_file)?;
    Ok(annotation_file)
}

/// Validate that an annotation file has the required structure.
fn validate_annotation_file(file: &AnnotationFile) -> Result<()> {
    if file.categories.is_empty() {
        return Err(DetEvalError::EmptyDataset(
            "Annotation file must contain at least one category".to_string(),
        ));
    }

    for annotation in &file.annotations {
        if annotation.bbox.len() != 4 {
            return Err(DetEvalError::InvalidAnnotation(format!(
                "Annotation {} has invalid bbox length: {}",
                annotation.id,
                annotation.bbox.len()
            )));
        }

        // Negative width or height can never satisfy the corner ordering
        if annotation.bbox[2] < 0.0 || annotation.bbox[3] < 0.0 {
            return Err(DetEvalError::InvalidBoundingBox(format!(
                "Annotation {} has negative dimensions",
                annotation.id
            )));
        }
    }

    Ok(())
}
