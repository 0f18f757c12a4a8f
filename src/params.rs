//! Evaluation parameters.

use serde::{Deserialize, Serialize};

/// Rule used to integrate a precision-recall curve into a single AP value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApMethod {
    /// VOC2007 11-point interpolation at recall 0.0, 0.1, ..., 1.0.
    ElevenPoint,
    /// Area under the precision envelope (VOC2010 and later).
    #[default]
    Envelope,
}

/// Parameters controlling a VOC evaluation run.
///
/// Defaults: IoU threshold 0.5, envelope AP, classes evaluated in parallel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocParams {
    /// A detection matches when its IoU with a ground truth is strictly above this.
    pub min_iou: f64,
    /// AP integration rule.
    pub ap_method: ApMethod,
    /// Evaluate classes on the rayon thread pool.
    pub parallel: bool,
}

impl Default for VocParams {
    fn default() -> Self {
        Self {
            min_iou: 0.5,
            ap_method: ApMethod::Envelope,
            parallel: true,
        }
    }
}

impl VocParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_iou(mut self, min_iou: f64) -> Self {
        self.min_iou = min_iou;
        self
    }

    pub fn with_ap_method(mut self, ap_method: ApMethod) -> Self {
        self.ap_method = ap_method;
        self
    }

    /// Select the VOC2007 11-point metric (`true`) or envelope AP (`false`).
    pub fn with_use_07_metric(self, use_07_metric: bool) -> Self {
        self.with_ap_method(if use_07_metric {
            ApMethod::ElevenPoint
        } else {
            ApMethod::Envelope
        })
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether the 11-point metric is selected.
    pub fn use_07_metric(&self) -> bool {
        self.ap_method == ApMethod::ElevenPoint
    }
}
