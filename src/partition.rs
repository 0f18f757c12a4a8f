//! Regrouping of mixed-class per-image inputs into per-class collections.

use crate::types::{BoundingBox, ClassLabel, Detection, GroundTruthBox};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// All detections and ground truth of one class, one entry per image.
///
/// Images without boxes of the class hold empty vectors, so indices line up
/// with the original corpus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassCorpus {
    pub detections: Vec<Vec<Detection>>,
    pub ground_truths: Vec<Vec<GroundTruthBox>>,
}

impl ClassCorpus {
    /// Empty collections for `num_images` images.
    pub fn with_images(num_images: usize) -> Self {
        Self {
            detections: vec![Vec::new(); num_images],
            ground_truths: vec![Vec::new(); num_images],
        }
    }

    pub fn num_images(&self) -> usize {
        self.detections.len()
    }

    /// Detections of this class across every image.
    pub fn num_detections(&self) -> usize {
        self.detections.iter().map(Vec::len).sum()
    }

    /// Non-difficult ground truth across every image (`npos`).
    pub fn num_positives(&self) -> usize {
        self.ground_truths
            .iter()
            .flatten()
            .filter(|gt| !gt.difficult)
            .count()
    }
}

/// Sorted union of every label seen in predictions or ground truth.
pub fn label_set(labels: &[Vec<ClassLabel>], gt_labels: &[Vec<ClassLabel>]) -> Vec<ClassLabel> {
    labels
        .iter()
        .chain(gt_labels.iter())
        .flatten()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Split per-image predictions and ground truth by class.
///
/// Every label in `label_set` gets a [`ClassCorpus`] covering all images.
/// Boxes whose label is not in `label_set` are dropped. A missing
/// `gt_difficults` marks every ground truth as not difficult.
///
/// Malformed boxes (inverted or non-finite corners) are kept as given and
/// only logged at debug level.
///
/// Inputs are expected to be length-aligned; see
/// [`crate::evaluator::validate_inputs`].
pub fn partition_by_class(
    bboxes: &[Vec<BoundingBox>],
    labels: &[Vec<ClassLabel>],
    scores: &[Vec<f64>],
    gt_bboxes: &[Vec<BoundingBox>],
    gt_labels: &[Vec<ClassLabel>],
    gt_difficults: Option<&[Vec<bool>]>,
    label_set: &[ClassLabel],
) -> BTreeMap<ClassLabel, ClassCorpus> {
    let num_images = bboxes.len();
    let mut corpora: BTreeMap<ClassLabel, ClassCorpus> = label_set
        .iter()
        .map(|&label| (label, ClassCorpus::with_images(num_images)))
        .collect();

    for (n, ((image_bboxes, image_labels), image_scores)) in
        bboxes.iter().zip(labels).zip(scores).enumerate()
    {
        for ((bbox, label), &score) in image_bboxes.iter().zip(image_labels).zip(image_scores) {
            if !bbox.is_valid() {
                debug!(image = n, label, ?bbox, "malformed predicted box");
            }
            if let Some(corpus) = corpora.get_mut(label) {
                corpus.detections[n].push(Detection::new(*bbox, score));
            }
        }
    }

    for (n, (image_bboxes, image_labels)) in gt_bboxes.iter().zip(gt_labels).enumerate() {
        let image_difficults = gt_difficults.and_then(|d| d.get(n));
        for (r, (bbox, label)) in image_bboxes.iter().zip(image_labels).enumerate() {
            let difficult = image_difficults
                .and_then(|d| d.get(r).copied())
                .unwrap_or(false);
            if !bbox.is_valid() {
                debug!(image = n, label, ?bbox, "malformed ground truth box");
            }
            if let Some(corpus) = corpora.get_mut(label) {
                corpus.ground_truths[n].push(GroundTruthBox::new(*bbox, difficult));
            }
        }
    }

    corpora
}
