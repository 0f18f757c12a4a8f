//! Main evaluation orchestrator for VOC object detection metrics.

use crate::error::{Result, VocEvalError};
use crate::matching::match_class;
use crate::metrics::ap::{calculate_ap, calculate_map};
use crate::params::VocParams;
use crate::partition::{label_set, partition_by_class, ClassCorpus};
use crate::types::{BoundingBox, ClassLabel, ClassResult, EvaluationInput, EvaluationResult};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Evaluate predictions against ground truth following the PASCAL VOC protocol.
///
/// Every outer slice has one entry per image. Within an image, `labels` and
/// `scores` run parallel to `bboxes`, and `gt_labels` and `gt_difficults` run
/// parallel to `gt_bboxes`. Without `gt_difficults` no box is difficult.
///
/// Every label present in predictions or ground truth is scored independently:
/// its detections are matched greedily against ground truth, the resulting
/// precision-recall curve is integrated into AP, and `map` is the mean AP
/// over those labels.
///
/// # Errors
///
/// Returns [`VocEvalError::LengthMismatch`] before any computation if the
/// inputs are not length-aligned. Any `min_iou` is accepted: a NaN or `+inf`
/// threshold turns every detection into a false positive.
///
/// # Example
///
/// ```
/// use voc_eval::evaluator::eval_detection_voc;
/// use voc_eval::params::VocParams;
/// use voc_eval::types::BoundingBox;
///
/// let bboxes = vec![vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)]];
/// let labels = vec![vec![0]];
/// let scores = vec![vec![0.9]];
/// let gt_bboxes = vec![vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)]];
/// let gt_labels = vec![vec![0]];
///
/// let result = eval_detection_voc(
///     &bboxes, &labels, &scores, &gt_bboxes, &gt_labels, None, &VocParams::default(),
/// ).unwrap();
/// assert_eq!(result.map, 1.0);
/// ```
pub fn eval_detection_voc(
    bboxes: &[Vec<BoundingBox>],
    labels: &[Vec<ClassLabel>],
    scores: &[Vec<f64>],
    gt_bboxes: &[Vec<BoundingBox>],
    gt_labels: &[Vec<ClassLabel>],
    gt_difficults: Option<&[Vec<bool>]>,
    params: &VocParams,
) -> Result<EvaluationResult> {
    validate_inputs(bboxes, labels, scores, gt_bboxes, gt_labels, gt_difficults)?;

    let labels_to_score = label_set(labels, gt_labels);
    let corpora = partition_by_class(
        bboxes,
        labels,
        scores,
        gt_bboxes,
        gt_labels,
        gt_difficults,
        &labels_to_score,
    );

    let per_class: BTreeMap<ClassLabel, ClassResult> = if params.parallel {
        corpora
            .par_iter()
            .map(|(&label, corpus)| (label, evaluate_class(label, corpus, params)))
            .collect()
    } else {
        corpora
            .iter()
            .map(|(&label, corpus)| (label, evaluate_class(label, corpus, params)))
            .collect()
    };

    let aps: Vec<f64> = per_class.values().map(|result| result.ap).collect();
    let map = calculate_map(&aps);

    info!(
        images = bboxes.len(),
        classes = per_class.len(),
        map,
        "VOC evaluation complete"
    );

    Ok(EvaluationResult { per_class, map })
}

/// Evaluate an owned [`EvaluationInput`] bundle.
pub fn evaluate(input: &EvaluationInput, params: &VocParams) -> Result<EvaluationResult> {
    eval_detection_voc(
        &input.bboxes,
        &input.labels,
        &input.scores,
        &input.gt_bboxes,
        &input.gt_labels,
        input.gt_difficults.as_deref(),
        params,
    )
}

/// Match and integrate a single class.
fn evaluate_class(label: ClassLabel, corpus: &ClassCorpus, params: &VocParams) -> ClassResult {
    let matches = match_class(corpus, params.min_iou);
    let curve = matches.pr_curve();
    let ap = calculate_ap(&curve.recall, &curve.precision, params.ap_method);

    if matches.npos == 0 {
        warn!(
            label,
            detections = matches.num_detections,
            "class has no non-difficult ground truth"
        );
    }

    debug!(
        label,
        npos = matches.npos,
        detections = matches.num_detections,
        tp = matches.true_positives(),
        fp = matches.false_positives(),
        ignored = matches.ignored(),
        ap,
        "evaluated class"
    );

    ClassResult {
        recall: curve.recall,
        precision: curve.precision,
        ap,
    }
}

/// Check that all per-image inputs line up.
///
/// The five required lists must have one entry per image, and inside every
/// image the label, score and difficulty arrays must match their box arrays.
pub fn validate_inputs(
    bboxes: &[Vec<BoundingBox>],
    labels: &[Vec<ClassLabel>],
    scores: &[Vec<f64>],
    gt_bboxes: &[Vec<BoundingBox>],
    gt_labels: &[Vec<ClassLabel>],
    gt_difficults: Option<&[Vec<bool>]>,
) -> Result<()> {
    let n = bboxes.len();
    let lengths = [
        ("labels", labels.len()),
        ("scores", scores.len()),
        ("gt_bboxes", gt_bboxes.len()),
        ("gt_labels", gt_labels.len()),
    ];
    for (name, len) in lengths {
        if len != n {
            return Err(VocEvalError::LengthMismatch(format!(
                "bboxes has {} images but {} has {}",
                n, name, len
            )));
        }
    }
    if let Some(difficults) = gt_difficults {
        if difficults.len() != n {
            return Err(VocEvalError::LengthMismatch(format!(
                "bboxes has {} images but gt_difficults has {}",
                n,
                difficults.len()
            )));
        }
    }

    for i in 0..n {
        let boxes = bboxes[i].len();
        if labels[i].len() != boxes || scores[i].len() != boxes {
            return Err(VocEvalError::LengthMismatch(format!(
                "image {}: {} boxes, {} labels, {} scores",
                i,
                boxes,
                labels[i].len(),
                scores[i].len()
            )));
        }

        let gt_boxes = gt_bboxes[i].len();
        if gt_labels[i].len() != gt_boxes {
            return Err(VocEvalError::LengthMismatch(format!(
                "image {}: {} ground truth boxes, {} ground truth labels",
                i,
                gt_boxes,
                gt_labels[i].len()
            )));
        }
        if let Some(difficults) = gt_difficults {
            if difficults[i].len() != gt_boxes {
                return Err(VocEvalError::LengthMismatch(format!(
                    "image {}: {} ground truth boxes, {} difficult flags",
                    i,
                    gt_boxes,
                    difficults[i].len()
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x: f64) -> BoundingBox {
        BoundingBox::new(x, x, x + 10.0, x + 10.0)
    }

    #[test]
    fn test_evaluate_basic() {
        let input = EvaluationInput {
            bboxes: vec![vec![bbox(0.0)]],
            labels: vec![vec![1]],
            scores: vec![vec![0.9]],
            gt_bboxes: vec![vec![bbox(0.0)]],
            gt_labels: vec![vec![1]],
            gt_difficults: None,
        };
        let result = evaluate(&input, &VocParams::default()).unwrap();
        assert_eq!(result.per_class.len(), 1);
        assert_eq!(result.map, 1.0);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let input = EvaluationInput {
            bboxes: vec![vec![bbox(0.0), bbox(30.0)], vec![bbox(2.0)]],
            labels: vec![vec![0, 1], vec![0]],
            scores: vec![vec![0.9, 0.4], vec![0.6]],
            gt_bboxes: vec![vec![bbox(0.0)], vec![bbox(60.0)]],
            gt_labels: vec![vec![0], vec![1]],
            gt_difficults: None,
        };
        let parallel = evaluate(&input, &VocParams::default()).unwrap();
        let sequential = evaluate(&input, &VocParams::default().with_parallel(false)).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_validate_top_level_mismatch() {
        let err = validate_inputs(&[vec![]], &[], &[vec![]], &[vec![]], &[vec![]], None)
            .unwrap_err();
        assert!(matches!(err, VocEvalError::LengthMismatch(_)));
    }

    #[test]
    fn test_validate_difficults_mismatch() {
        let difficults = vec![vec![true]];
        let result = validate_inputs(
            &[vec![]],
            &[vec![]],
            &[vec![]],
            &[vec![]],
            &[vec![]],
            Some(&difficults),
        );
        assert!(matches!(result, Err(VocEvalError::LengthMismatch(_))));
    }

    #[test]
    fn test_validate_per_image_mismatch() {
        let result = validate_inputs(
            &[vec![bbox(0.0)]],
            &[vec![0]],
            &[vec![]],
            &[vec![]],
            &[vec![]],
            None,
        );
        assert!(matches!(result, Err(VocEvalError::LengthMismatch(_))));
    }

    #[test]
    fn test_class_without_positives_scores_zero() {
        // Label 3 only appears as a difficult ground truth and one detection.
        let input = EvaluationInput {
            bboxes: vec![vec![bbox(0.0), bbox(40.0)]],
            labels: vec![vec![1, 3]],
            scores: vec![vec![0.9, 0.8]],
            gt_bboxes: vec![vec![bbox(0.0), bbox(80.0)]],
            gt_labels: vec![vec![1, 3]],
            gt_difficults: Some(vec![vec![false, true]]),
        };
        let result = evaluate(&input, &VocParams::default()).unwrap();

        let class3 = result.get(3).unwrap();
        assert_eq!(class3.recall, vec![0.0]);
        assert_eq!(class3.precision, vec![0.0]);
        assert_eq!(class3.ap, 0.0);
        assert_eq!(result.map, 0.5);
    }

    #[test]
    fn test_non_finite_min_iou_accepted() {
        let input = EvaluationInput {
            bboxes: vec![vec![bbox(0.0)]],
            labels: vec![vec![1]],
            scores: vec![vec![0.9]],
            gt_bboxes: vec![vec![bbox(0.0)]],
            gt_labels: vec![vec![1]],
            gt_difficults: None,
        };
        let low = evaluate(&input, &VocParams::default().with_min_iou(f64::NEG_INFINITY)).unwrap();
        assert_eq!(low.map, 1.0);
        for min_iou in [f64::INFINITY, f64::NAN] {
            let result = evaluate(&input, &VocParams::default().with_min_iou(min_iou)).unwrap();
            assert_eq!(result.map, 0.0);
        }
    }

    #[test]
    fn test_empty_corpus() {
        let result = eval_detection_voc(&[], &[], &[], &[], &[], None, &VocParams::default())
            .unwrap();
        assert!(result.per_class.is_empty());
        assert_eq!(result.map, 0.0);
    }
}
