//! Metrics calculation modules for VOC evaluation.

pub mod iou;
pub mod ap;
pub mod precision_recall;

pub use iou::{calculate_iou, calculate_iou_row, max_iou};
pub use ap::{calculate_ap, calculate_map, eleven_point_ap, envelope_ap};
pub use precision_recall::calculate_precision_recall_curve;
