//! Greedy matching of ranked detections to ground truth for one class.

use crate::metrics::iou::{calculate_iou_row, max_iou};
use crate::metrics::precision_recall::calculate_precision_recall_curve;
use crate::partition::ClassCorpus;
use crate::types::{GroundTruthBox, MatchOutcome, PrCurve};
use std::cmp::Ordering;

/// Scoring of one detection, in the order it was processed.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionMatch {
    pub image_index: usize,
    /// Position of the detection within its image's class detections.
    pub detection_index: usize,
    pub score: f64,
    /// Best IoU against the image's ground truth, `None` if the image has none.
    pub iou: Option<f64>,
    /// Ground truth with the best IoU, `None` if the image has none.
    pub gt_index: Option<usize>,
    pub outcome: MatchOutcome,
}

/// Matching result for one class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassMatches {
    /// Non-difficult ground truth count.
    pub npos: usize,
    /// Total detections of the class. Equals `matches.len()` unless `npos` is 0.
    pub num_detections: usize,
    /// Per-detection records in descending-score order.
    pub matches: Vec<DetectionMatch>,
}

impl ClassMatches {
    pub fn true_positives(&self) -> usize {
        self.count(MatchOutcome::TruePositive)
    }

    pub fn false_positives(&self) -> usize {
        self.count(MatchOutcome::FalsePositive)
    }

    pub fn ignored(&self) -> usize {
        self.count(MatchOutcome::Ignored)
    }

    fn count(&self, outcome: MatchOutcome) -> usize {
        self.matches.iter().filter(|m| m.outcome == outcome).count()
    }

    /// Cumulative precision and recall over the ranked detections.
    ///
    /// A class without positives, or without detections, gets an all-zero
    /// curve with one point per detection.
    pub fn pr_curve(&self) -> PrCurve {
        if self.npos == 0 || self.matches.is_empty() {
            return PrCurve::zeros(self.num_detections);
        }
        let outcomes: Vec<MatchOutcome> = self.matches.iter().map(|m| m.outcome).collect();
        calculate_precision_recall_curve(&outcomes, self.npos)
    }
}

/// Claimed flags for every ground truth of one class, indexed by image.
///
/// Built fresh for each class and dropped when matching ends.
#[derive(Debug, Clone)]
pub struct MatchState {
    claimed: Vec<Vec<bool>>,
}

impl MatchState {
    pub fn new(ground_truths: &[Vec<GroundTruthBox>]) -> Self {
        Self {
            claimed: ground_truths.iter().map(|gts| vec![false; gts.len()]).collect(),
        }
    }

    pub fn is_claimed(&self, image_index: usize, gt_index: usize) -> bool {
        self.claimed[image_index][gt_index]
    }

    pub fn claim(&mut self, image_index: usize, gt_index: usize) {
        self.claimed[image_index][gt_index] = true;
    }
}

/// Descending score, NaN last. `sort_by` is stable, so equal scores keep
/// (image, detection) order.
fn by_descending_score(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}

/// Match one class's detections to ground truth.
///
/// Detections from every image are ranked together by descending score and
/// processed greedily. Each is compared with the ground truth of its own
/// image and takes the box with the highest IoU (first on ties):
///
/// - IoU `> min_iou`, box not difficult, not yet claimed: true positive, box claimed.
/// - IoU `> min_iou`, box difficult: ignored. Difficult boxes are never claimed.
/// - IoU `> min_iou`, box already claimed: false positive.
/// - IoU `<= min_iou`, or no ground truth in the image: false positive.
///
/// When the class has no non-difficult ground truth nothing is matched and
/// `matches` is empty.
///
/// # Arguments
///
/// * `corpus` - Detections and ground truth of one class, per image
/// * `min_iou` - Overlap a match must strictly exceed
///
/// # Returns
///
/// `npos`, the detection count and one [`DetectionMatch`] per detection in
/// rank order.
pub fn match_class(corpus: &ClassCorpus, min_iou: f64) -> ClassMatches {
    let npos = corpus.num_positives();
    let num_detections = corpus.num_detections();

    if npos == 0 || num_detections == 0 {
        return ClassMatches {
            npos,
            num_detections,
            matches: Vec::new(),
        };
    }

    let mut ranked: Vec<(usize, usize, f64)> = corpus
        .detections
        .iter()
        .enumerate()
        .flat_map(|(image_index, dets)| {
            dets.iter()
                .enumerate()
                .map(move |(detection_index, det)| (image_index, detection_index, det.score))
        })
        .collect();
    ranked.sort_by(|a, b| by_descending_score(a.2, b.2));

    let mut state = MatchState::new(&corpus.ground_truths);
    let mut matches = Vec::with_capacity(num_detections);

    for (image_index, detection_index, score) in ranked {
        let detection = &corpus.detections[image_index][detection_index];
        let gts = &corpus.ground_truths[image_index];
        let ious = calculate_iou_row(&detection.bbox, gts.iter().map(|gt| &gt.bbox));

        let (outcome, iou, gt_index) = match max_iou(&ious) {
            None => (MatchOutcome::FalsePositive, None, None),
            Some((j, ioumax)) => {
                let outcome = if ioumax > min_iou {
                    if gts[j].difficult {
                        MatchOutcome::Ignored
                    } else if state.is_claimed(image_index, j) {
                        MatchOutcome::FalsePositive
                    } else {
                        state.claim(image_index, j);
                        MatchOutcome::TruePositive
                    }
                } else {
                    MatchOutcome::FalsePositive
                };
                (outcome, Some(ioumax), Some(j))
            }
        };

        matches.push(DetectionMatch {
            image_index,
            detection_index,
            score,
            iou,
            gt_index,
            outcome,
        });
    }

    ClassMatches {
        npos,
        num_detections,
        matches,
    }
}

/// Precision-recall curve of one class.
pub fn precision_recall(corpus: &ClassCorpus, min_iou: f64) -> PrCurve {
    match_class(corpus, min_iou).pr_curve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoundingBox, Detection};

    fn det(x: f64, score: f64) -> Detection {
        Detection::new(BoundingBox::new(x, x, x + 10.0, x + 10.0), score)
    }

    fn gt(x: f64, difficult: bool) -> GroundTruthBox {
        GroundTruthBox::new(BoundingBox::new(x, x, x + 10.0, x + 10.0), difficult)
    }

    fn corpus(detections: Vec<Vec<Detection>>, ground_truths: Vec<Vec<GroundTruthBox>>) -> ClassCorpus {
        ClassCorpus {
            detections,
            ground_truths,
        }
    }

    #[test]
    fn test_perfect_match() {
        let c = corpus(vec![vec![det(0.0, 0.9)]], vec![vec![gt(0.0, false)]]);
        let result = match_class(&c, 0.5);
        assert_eq!(result.npos, 1);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].outcome, MatchOutcome::TruePositive);
        assert!((result.matches[0].iou.unwrap() - 1.0).abs() < 1e-10);
        assert_eq!(result.matches[0].gt_index, Some(0));
    }

    #[test]
    fn test_no_match() {
        let c = corpus(vec![vec![det(20.0, 0.9)]], vec![vec![gt(0.0, false)]]);
        let result = match_class(&c, 0.5);
        assert_eq!(result.matches[0].outcome, MatchOutcome::FalsePositive);
        assert_eq!(result.matches[0].iou, Some(0.0));
    }

    #[test]
    fn test_confidence_sorting_across_images() {
        let c = corpus(
            vec![vec![det(0.0, 0.5)], vec![det(0.0, 0.9), det(40.0, 0.7)]],
            vec![vec![gt(0.0, false)], vec![gt(0.0, false)]],
        );
        let result = match_class(&c, 0.5);
        let order: Vec<(usize, usize)> = result
            .matches
            .iter()
            .map(|m| (m.image_index, m.detection_index))
            .collect();
        assert_eq!(order, vec![(1, 0), (1, 1), (0, 0)]);
        assert_eq!(result.true_positives(), 2);
        assert_eq!(result.false_positives(), 1);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let c = corpus(
            vec![vec![det(0.0, 0.8), det(0.0, 0.8)], vec![det(0.0, 0.8)]],
            vec![vec![gt(0.0, false)], vec![]],
        );
        let result = match_class(&c, 0.5);
        let order: Vec<(usize, usize)> = result
            .matches
            .iter()
            .map(|m| (m.image_index, m.detection_index))
            .collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0)]);
        assert_eq!(result.matches[0].outcome, MatchOutcome::TruePositive);
        assert_eq!(result.matches[1].outcome, MatchOutcome::FalsePositive);
        assert_eq!(result.matches[2].outcome, MatchOutcome::FalsePositive);
        assert_eq!(result.matches[2].gt_index, None);
    }

    #[test]
    fn test_duplicate_detection_is_false_positive() {
        let c = corpus(vec![vec![det(0.0, 0.8), det(0.0, 0.9)]], vec![vec![gt(0.0, false)]]);
        let result = match_class(&c, 0.5);
        assert_eq!(result.matches[0].detection_index, 1);
        assert_eq!(result.matches[0].outcome, MatchOutcome::TruePositive);
        assert_eq!(result.matches[1].outcome, MatchOutcome::FalsePositive);

        let curve = result.pr_curve();
        assert_eq!(curve.recall, vec![1.0, 1.0]);
        assert_eq!(curve.precision, vec![1.0, 0.5]);
    }

    #[test]
    fn test_difficult_match_is_ignored_and_never_claimed() {
        let c = corpus(
            vec![vec![det(0.0, 0.9), det(0.0, 0.8), det(50.0, 0.7)]],
            vec![vec![gt(0.0, true), gt(50.0, false)]],
        );
        let result = match_class(&c, 0.5);
        assert_eq!(result.npos, 1);
        assert_eq!(result.matches[0].outcome, MatchOutcome::Ignored);
        // Second hit on the same difficult box is not a duplicate.
        assert_eq!(result.matches[1].outcome, MatchOutcome::Ignored);
        assert_eq!(result.matches[2].outcome, MatchOutcome::TruePositive);
        assert_eq!(result.ignored(), 2);

        let curve = result.pr_curve();
        assert_eq!(curve.recall, vec![0.0, 0.0, 1.0]);
        assert_eq!(curve.precision, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Half-height box: intersection 60.5, union 121.
        let half = Detection::new(BoundingBox::new(0.0, 0.0, 10.0, 4.5), 0.9);
        let c = corpus(vec![vec![half]], vec![vec![gt(0.0, false)]]);
        let iou = match_class(&c, 0.0).matches[0].iou.unwrap();
        assert!((iou - 0.5).abs() < 1e-12);

        let result = match_class(&c, iou);
        assert_eq!(result.matches[0].outcome, MatchOutcome::FalsePositive);
    }

    #[test]
    fn test_max_iou_prefers_first_on_tie() {
        let c = corpus(
            vec![vec![det(0.0, 0.9), det(0.0, 0.8)]],
            vec![vec![gt(0.0, false), gt(0.0, false)]],
        );
        let result = match_class(&c, 0.5);
        assert_eq!(result.matches[0].gt_index, Some(0));
        // The claimed first copy still has the max IoU, so the second detection is a duplicate.
        assert_eq!(result.matches[1].gt_index, Some(0));
        assert_eq!(result.matches[1].outcome, MatchOutcome::FalsePositive);
    }

    #[test]
    fn test_no_positives_skips_matching() {
        let c = corpus(vec![vec![det(0.0, 0.9), det(5.0, 0.1)]], vec![vec![gt(0.0, true)]]);
        let result = match_class(&c, 0.5);
        assert_eq!(result.npos, 0);
        assert!(result.matches.is_empty());
        assert_eq!(result.pr_curve(), PrCurve::zeros(2));
    }

    #[test]
    fn test_no_detections() {
        let c = corpus(vec![vec![], vec![]], vec![vec![gt(0.0, false)], vec![]]);
        let curve = precision_recall(&c, 0.5);
        assert!(curve.is_empty());
    }

    #[test]
    fn test_nan_score_ranked_last() {
        let c = corpus(
            vec![vec![det(0.0, f64::NAN), det(0.0, 0.1)]],
            vec![vec![gt(0.0, false)]],
        );
        let result = match_class(&c, 0.5);
        assert_eq!(result.matches[0].detection_index, 1);
        assert_eq!(result.matches[0].outcome, MatchOutcome::TruePositive);
    }

    #[test]
    fn test_match_state() {
        let gts = vec![vec![gt(0.0, false), gt(1.0, false)], vec![]];
        let mut state = MatchState::new(&gts);
        assert!(!state.is_claimed(0, 1));
        state.claim(0, 1);
        assert!(state.is_claimed(0, 1));
        assert!(!state.is_claimed(0, 0));
    }
}
