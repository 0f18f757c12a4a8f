//! # voc-eval
//!
//! A Rust library for PASCAL VOC object detection evaluation.
//!
//! Given per-image predicted boxes with labels and confidence scores, and
//! per-image ground-truth boxes with labels and optional "difficult" flags,
//! this library computes:
//! - per-class **precision** and **recall** curves
//! - per-class **AP** (Average Precision), with either the VOC2007 11-point
//!   metric or the exact area under the precision envelope
//! - **mAP** (mean Average Precision) over every class that appears in the
//!   predictions or the ground truth
//!
//! Matching uses a single IoU threshold (0.5 by default) with the VOC
//! inclusive-pixel area convention.
//!
//! ## Quick Start
//!
//! ```rust
//! use voc_eval::{eval_detection_voc, BoundingBox, VocParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bboxes = vec![vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)]];
//! let labels = vec![vec![0]];
//! let scores = vec![vec![0.9]];
//! let gt_bboxes = vec![vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)]];
//! let gt_labels = vec![vec![0]];
//!
//! let result = eval_detection_voc(
//!     &bboxes, &labels, &scores, &gt_bboxes, &gt_labels, None,
//!     &VocParams::default().with_use_07_metric(false),
//! )?;
//!
//! println!("mAP: {:.4}", result.map);
//! for (label, ap) in result.ap_per_class() {
//!     println!("class {}: AP {:.4}", label, ap);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Input Format
//!
//! [`loader`] reads the same inputs from JSON:
//!
//! ```json
//! {
//!   "bboxes": [[[x_min, y_min, x_max, y_max], ...], ...],
//!   "labels": [[0, 1], ...],
//!   "scores": [[0.9, 0.4], ...],
//!   "gt_bboxes": [[[x_min, y_min, x_max, y_max], ...], ...],
//!   "gt_labels": [[0], ...],
//!   "gt_difficults": [[false], ...]
//! }
//! ```

pub mod error;
pub mod types;
pub mod params;
pub mod loader;
pub mod metrics;
pub mod partition;
pub mod matching;
pub mod evaluator;

// Re-export commonly used types and functions
pub use error::{Result, VocEvalError};
pub use types::{
    BoundingBox, ClassLabel, ClassResult, Detection, EvaluationInput, EvaluationResult,
    GroundTruthBox, MatchOutcome, PrCurve,
};
pub use params::{ApMethod, VocParams};
pub use loader::{load_from_file, load_from_string};
pub use evaluator::{eval_detection_voc, evaluate};

