//! Intersection over Union (IoU) calculation.

use crate::types::BoundingBox;

/// Calculate the Intersection over Union (IoU) between two bounding boxes.
///
/// Follows the VOC convention: coordinates are inclusive pixel indices, so
/// every side length gets `+ 1`. Intersection sides are clamped at zero before
/// multiplying. Malformed boxes are not rejected and may produce values outside
/// `[0, 1]` or NaN.
///
/// # Arguments
///
/// * `bbox1` - First box as `(x_min, y_min, x_max, y_max)`
/// * `bbox2` - Second box as `(x_min, y_min, x_max, y_max)`
///
/// # Returns
///
/// Intersection area divided by union area.
///
/// # Example
///
/// ```
/// use voc_eval::metrics::iou::calculate_iou;
/// use voc_eval::types::BoundingBox;
///
/// let bbox1 = BoundingBox::new(0.0, 0.0, 9.0, 9.0);
/// let bbox2 = BoundingBox::new(5.0, 5.0, 14.0, 14.0);
/// let iou = calculate_iou(&bbox1, &bbox2);
/// assert!((iou - 25.0 / 175.0).abs() < 1e-12);
/// ```
pub fn calculate_iou(bbox1: &BoundingBox, bbox2: &BoundingBox) -> f64 {
    let x_left = bbox1.x_min.max(bbox2.x_min);
    let y_top = bbox1.y_min.max(bbox2.y_min);
    let x_right = bbox1.x_max.min(bbox2.x_max);
    let y_bottom = bbox1.y_max.min(bbox2.y_max);

    let intersection_area =
        (x_right - x_left + 1.0).max(0.0) * (y_bottom - y_top + 1.0).max(0.0);

    intersection_area / (bbox1.area() + bbox2.area() - intersection_area)
}

/// IoU of one box against each box in `others`, in order.
pub fn calculate_iou_row<'a, I>(bbox: &BoundingBox, others: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a BoundingBox>,
{
    others
        .into_iter()
        .map(|other| calculate_iou(bbox, other))
        .collect()
}

/// Position and value of the largest IoU, first index winning ties.
///
/// A NaN entry wins immediately, so a malformed ground truth can never be
/// matched. Returns `None` for an empty slice.
pub fn max_iou(ious: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (j, &iou) in ious.iter().enumerate() {
        if iou.is_nan() {
            return Some((j, iou));
        }
        match best {
            Some((_, value)) if iou <= value => {}
            _ => best = Some((j, iou)),
        }
    }
    best
}
