//! Core data types for VOC detections, ground truth and evaluation results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Integer class identifier.
pub type ClassLabel = i32;

/// Represents an axis-aligned bounding box in VOC corner format.
///
/// Coordinates are `(x_min, y_min, x_max, y_max)` and are treated as inclusive
/// pixel indices, so a box spanning a single pixel has `x_min == x_max`.
/// The ordering `x_min <= x_max`, `y_min <= y_max` is not enforced.
///
/// Serializes as a 4-element array `[x_min, y_min, x_max, y_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }

    /// Width in pixels under the inclusive VOC convention.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min + 1.0
    }

    /// Height in pixels under the inclusive VOC convention.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min + 1.0
    }

    /// Area under the inclusive VOC convention: `width() * height()`, each inclusive (+1).
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Check if the corners are ordered and finite.
    pub fn is_valid(&self) -> bool {
        [self.x_min, self.y_min, self.x_max, self.y_max]
            .iter()
            .all(|v| v.is_finite())
            && self.x_min <= self.x_max
            && self.y_min <= self.y_max
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([x_min, y_min, x_max, y_max]: [f64; 4]) -> Self {
        Self::new(x_min, y_min, x_max, y_max)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max]
    }
}

/// A predicted box of one class in one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub score: f64,
}

impl Detection {
    pub fn new(bbox: BoundingBox, score: f64) -> Self {
        Self { bbox, score }
    }
}

/// A ground-truth box of one class in one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthBox {
    pub bbox: BoundingBox,
    /// Difficult boxes never count as positives.
    pub difficult: bool,
}

impl GroundTruthBox {
    pub fn new(bbox: BoundingBox, difficult: bool) -> Self {
        Self { bbox, difficult }
    }
}

/// How a single ranked detection was scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Claimed an unclaimed, non-difficult ground truth above the IoU threshold.
    TruePositive,
    /// Missed every ground truth, or hit one that was already claimed.
    FalsePositive,
    /// Best match was a difficult ground truth; counts as neither TP nor FP.
    Ignored,
}

/// Precision-recall curve in descending-confidence order.
///
/// `recall[i]` and `precision[i]` describe the top `i + 1` detections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrCurve {
    pub recall: Vec<f64>,
    pub precision: Vec<f64>,
}

impl PrCurve {
    /// All-zero curve with `len` points.
    pub fn zeros(len: usize) -> Self {
        Self {
            recall: vec![0.0; len],
            precision: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.recall.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recall.is_empty()
    }
}

/// Evaluation output for a single class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassResult {
    pub recall: Vec<f64>,
    pub precision: Vec<f64>,
    pub ap: f64,
}

/// Evaluation output for the whole corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Per-class curves and AP, keyed by label in ascending order.
    pub per_class: BTreeMap<ClassLabel, ClassResult>,
    /// Mean of `ap` over every scored class.
    pub map: f64,
}

impl EvaluationResult {
    /// Result for one class, if that class was scored.
    pub fn get(&self, label: ClassLabel) -> Option<&ClassResult> {
        self.per_class.get(&label)
    }

    /// `(label, ap)` pairs in ascending label order.
    pub fn ap_per_class(&self) -> Vec<(ClassLabel, f64)> {
        self.per_class
            .iter()
            .map(|(&label, result)| (label, result.ap))
            .collect()
    }
}

/// Owned bundle of the per-image evaluation inputs.
///
/// Every outer `Vec` has one entry per image. This is the document format read
/// by [`crate::loader`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationInput {
    pub bboxes: Vec<Vec<BoundingBox>>,
    pub labels: Vec<Vec<ClassLabel>>,
    pub scores: Vec<Vec<f64>>,
    pub gt_bboxes: Vec<Vec<BoundingBox>>,
    pub gt_labels: Vec<Vec<ClassLabel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt_difficults: Option<Vec<Vec<bool>>>,
}

impl EvaluationInput {
    /// Number of images in the corpus.
    pub fn num_images(&self) -> usize {
        self.bboxes.len()
    }

    /// Check that every per-image list lines up.
    pub fn validate(&self) -> crate::error::Result<()> {
        crate::evaluator::validate_inputs(
            &self.bboxes,
            &self.labels,
            &self.scores,
            &self.gt_bboxes,
            &self.gt_labels,
            self.gt_difficults.as_deref(),
        )
    }
}
