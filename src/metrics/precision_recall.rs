//! Precision and Recall calculation.

use crate::types::{MatchOutcome, PrCurve};

/// Calculate the precision-recall curve from ranked match outcomes.
///
/// `outcomes` must be in descending-confidence order. Ignored detections add
/// nothing to either count but still get a point on the curve, repeating the
/// previous values.
///
/// Returns an all-zero curve when `num_positives` is zero.
///
/// # Example
///
/// ```
/// use voc_eval::metrics::precision_recall::calculate_precision_recall_curve;
/// use voc_eval::types::MatchOutcome::{FalsePositive, TruePositive};
///
/// let curve = calculate_precision_recall_curve(&[TruePositive, FalsePositive], 1);
/// assert_eq!(curve.recall, vec![1.0, 1.0]);
/// assert_eq!(curve.precision, vec![1.0, 0.5]);
/// ```
pub fn calculate_precision_recall_curve(outcomes: &[MatchOutcome], num_positives: usize) -> PrCurve {
    if num_positives == 0 {
        return PrCurve::zeros(outcomes.len());
    }

    let mut curve = PrCurve {
        recall: Vec::with_capacity(outcomes.len()),
        precision: Vec::with_capacity(outcomes.len()),
    };
    let mut tp = 0usize;
    let mut fp = 0usize;
    let npos = num_positives as f64;

    for outcome in outcomes {
        match outcome {
            MatchOutcome::TruePositive => tp += 1,
            MatchOutcome::FalsePositive => fp += 1,
            MatchOutcome::Ignored => {}
        }

        let tp = tp as f64;
        curve.recall.push(tp / npos);
        curve.precision.push(tp / (tp + fp as f64).max(f64::EPSILON));
    }

    curve
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchOutcome::{FalsePositive, Ignored, TruePositive};

    #[test]
    fn test_precision_recall_curve() {
        let outcomes = vec![TruePositive, TruePositive, FalsePositive, TruePositive, FalsePositive];
        let curve = calculate_precision_recall_curve(&outcomes, 4);
        assert_eq!(curve.len(), 5);

        assert!((curve.precision[0] - 1.0).abs() < 1e-10);
        assert!((curve.recall[0] - 0.25).abs() < 1e-10);
        assert!((curve.precision[2] - 2.0 / 3.0).abs() < 1e-10);
        assert!((curve.recall[3] - 0.75).abs() < 1e-10);
        assert!((curve.precision[4] - 0.6).abs() < 1e-10);
    }

    #[test]
    fn test_ignored_leading_detection_has_zero_precision() {
        let curve = calculate_precision_recall_curve(&[Ignored, TruePositive], 1);
        assert_eq!(curve.recall, vec![0.0, 1.0]);
        assert_eq!(curve.precision, vec![0.0, 1.0]);
    }

    #[test]
    fn test_ignored_repeats_previous_point() {
        let curve = calculate_precision_recall_curve(&[TruePositive, Ignored, FalsePositive], 2);
        assert_eq!(curve.recall, vec![0.5, 0.5, 0.5]);
        assert_eq!(curve.precision, vec![1.0, 1.0, 0.5]);
    }

    #[test]
    fn test_no_positives_gives_zeros() {
        let curve = calculate_precision_recall_curve(&[FalsePositive, FalsePositive], 0);
        assert_eq!(curve, PrCurve::zeros(2));
    }

    #[test]
    fn test_empty_outcomes() {
        let curve = calculate_precision_recall_curve(&[], 3);
        assert!(curve.is_empty());
    }
}
