//! JSON loading utilities for evaluation inputs.

use crate::error::Result;
use crate::types::EvaluationInput;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load an evaluation input document from a JSON file.
///
/// # Arguments
///
/// * `path` - Path to a JSON document with `bboxes`, `labels`, `scores`,
///   `gt_bboxes`, `gt_labels` and optionally `gt_difficults`
///
/// # Returns
///
/// The parsed, length-checked [`EvaluationInput`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the per-image
/// lists are not length-aligned.
///
/// # Example
///
/// ```no_run
/// use voc_eval::loader::load_from_file;
///
/// let input = load_from_file("detections.json").unwrap();
/// println!("Loaded {} images", input.num_images());
/// ```
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<EvaluationInput> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let input: EvaluationInput = serde_json::from_reader(reader)?;

    input.validate()?;

    Ok(input)
}

/// Load an evaluation input document from a JSON string.
///
/// # Example
///
/// ```
/// use voc_eval::loader::load_from_string;
///
/// let json = r#"{
///     "bboxes": [[[0, 0, 10, 10]]],
///     "labels": [[0]],
///     "scores": [[0.9]],
///     "gt_bboxes": [[[0, 0, 10, 10]]],
///     "gt_labels": [[0]]
/// }"#;
/// let input = load_from_string(json).unwrap();
/// assert_eq!(input.num_images(), 1);
/// assert!(input.gt_difficults.is_none());
/// ```
pub fn load_from_string(json_str: &str) -> Result<EvaluationInput> {
    let input: EvaluationInput = serde_json::from_str(json_str)?;
    input.validate()?;
    Ok(input)
}
