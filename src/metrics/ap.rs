//! Average Precision (AP) and mean Average Precision (mAP) calculation.

use crate::params::ApMethod;

/// Calculate Average Precision with the selected integration rule.
///
/// # Arguments
///
/// * `recalls` - Recall values in detection rank order (non-decreasing)
/// * `precisions` - Precision values, parallel to `recalls`
/// * `method` - [`ApMethod::ElevenPoint`] or [`ApMethod::Envelope`]
///
/// # Returns
///
/// The Average Precision value (0.0 to 1.0 for well-formed curves).
///
/// # Example
///
/// ```
/// use voc_eval::metrics::ap::calculate_ap;
/// use voc_eval::params::ApMethod;
///
/// let recalls = vec![0.5, 1.0];
/// let precisions = vec![1.0, 1.0];
/// let ap = calculate_ap(&recalls, &precisions, ApMethod::Envelope);
/// assert!((ap - 1.0).abs() < 1e-10);
/// ```
pub fn calculate_ap(recalls: &[f64], precisions: &[f64], method: ApMethod) -> f64 {
    match method {
        ApMethod::ElevenPoint => eleven_point_ap(recalls, precisions),
        ApMethod::Envelope => envelope_ap(recalls, precisions),
    }
}

/// VOC2007 11-point interpolated AP.
///
/// At each recall level `t` in `0.0, 0.1, ..., 1.0` take the best precision
/// among points with `recall >= t` (0 if there are none) and average the 11
/// values.
///
/// # Arguments
///
/// * `recalls` - Recall values in detection rank order
/// * `precisions` - Precision values, parallel to `recalls`
///
/// # Returns
///
/// The mean of the 11 interpolated precisions.
///
/// # Example
///
/// ```
/// use voc_eval::metrics::ap::eleven_point_ap;
///
/// // Precision 1.0 up to recall 0.5 (6 levels), then 0.5 (5 levels).
/// let ap = eleven_point_ap(&[0.5, 1.0], &[1.0, 0.5]);
/// assert!((ap - 8.5 / 11.0).abs() < 1e-12);
/// ```
pub fn eleven_point_ap(recalls: &[f64], precisions: &[f64]) -> f64 {
    let mut ap = 0.0;
    for k in 0..=10 {
        let recall_level = k as f64 * 0.1;
        let max_precision = recalls
            .iter()
            .zip(precisions.iter())
            .filter(|(&r, _)| r >= recall_level)
            .map(|(_, &p)| p)
            .fold(0.0f64, |a, b| a.max(b));
        ap += max_precision / 11.0;
    }
    ap
}

/// Area under the precision envelope.
///
/// The curve is padded with `(0, 0)` in front and `(1, 0)` behind, precision is
/// replaced by its running maximum from the right, and each step where recall
/// changes contributes `delta_recall * envelope_precision`.
///
/// # Arguments
///
/// * `recalls` - Recall values in detection rank order
/// * `precisions` - Precision values, parallel to `recalls`
///
/// # Returns
///
/// The exact area under the monotone precision envelope.
///
/// # Example
///
/// ```
/// use voc_eval::metrics::ap::envelope_ap;
///
/// let ap = envelope_ap(&[0.5, 1.0], &[1.0, 0.5]);
/// assert!((ap - 0.75).abs() < 1e-12);
/// ```
pub fn envelope_ap(recalls: &[f64], precisions: &[f64]) -> f64 {
    let mut mrec = Vec::with_capacity(recalls.len() + 2);
    mrec.push(0.0);
    mrec.extend_from_slice(recalls);
    mrec.push(1.0);

    let mut mpre = Vec::with_capacity(precisions.len() + 2);
    mpre.push(0.0);
    mpre.extend_from_slice(precisions);
    mpre.push(0.0);

    for i in (1..mpre.len()).rev() {
        mpre[i - 1] = mpre[i - 1].max(mpre[i]);
    }

    mrec.windows(2)
        .zip(mpre.iter().skip(1))
        .filter(|(r, _)| r[1] != r[0])
        .map(|(r, &p)| (r[1] - r[0]) * p)
        .sum()
}

/// Calculate mean Average Precision (mAP) across classes.
///
/// Returns 0.0 when there are no classes.
///
/// # Example
///
/// ```
/// use voc_eval::metrics::ap::calculate_map;
///
/// let class_aps = vec![0.8, 0.9, 0.75, 0.85];
/// let map = calculate_map(&class_aps);
/// assert!((map - 0.825).abs() < 1e-10);
/// ```
pub fn calculate_map(class_aps: &[f64]) -> f64 {
    if class_aps.is_empty() {
        return 0.0;
    }

    class_aps.iter().sum::<f64>() / class_aps.len() as f64
}
