//! Basic evaluation example demonstrating core functionality.

use voc_eval::{
    load_from_string, evaluator::evaluate, matching::match_class, metrics::iou::calculate_iou,
    partition::{label_set, partition_by_class}, BoundingBox, VocParams,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== VOC Evaluation Example ===\n");

    // Example 1: IoU Calculation
    println!("1. IoU Calculation (inclusive pixel coordinates)");
    let bbox1 = BoundingBox::new(10.0, 10.0, 59.0, 59.0);
    let bbox2 = BoundingBox::new(30.0, 30.0, 79.0, 79.0);
    let iou = calculate_iou(&bbox1, &bbox2);
    println!("   IoU between overlapping boxes: {:.4}", iou);
    println!();

    // Example 2: Load inputs
    println!("2. Loading Predictions and Ground Truth");
    let input_json = r#"{
        "bboxes": [
            [[100, 100, 299, 249], [350, 200, 449, 319], [50, 50, 129, 139]],
            [[10, 10, 59, 59]]
        ],
        "labels": [[1, 2, 1], [1]],
        "scores": [[0.95, 0.87, 0.42], [0.6]],
        "gt_bboxes": [
            [[102, 98, 301, 251], [352, 205, 451, 322]],
            [[12, 8, 60, 58], [200, 200, 220, 230]]
        ],
        "gt_labels": [[1, 2], [1, 1]],
        "gt_difficults": [[false, false], [false, true]]
    }"#;

    let input = load_from_string(input_json)?;
    println!("   Loaded {} images", input.num_images());
    println!();

    // Example 3: Matching a single class
    println!("3. Matching Class 1");
    let labels = label_set(&input.labels, &input.gt_labels);
    let corpora = partition_by_class(
        &input.bboxes,
        &input.labels,
        &input.scores,
        &input.gt_bboxes,
        &input.gt_labels,
        input.gt_difficults.as_deref(),
        &labels,
    );
    if let Some(corpus) = corpora.get(&1) {
        let matches = match_class(corpus, 0.5);
        println!("   npos: {}", matches.npos);
        for m in &matches.matches {
            println!(
                "   ├─ image {} det {} score {:.2}: {:?}",
                m.image_index, m.detection_index, m.score, m.outcome
            );
        }
    }
    println!();

    // Example 4: Full evaluation with both AP rules
    println!("4. Running Full Evaluation");
    for use_07_metric in [false, true] {
        let params = VocParams::default().with_use_07_metric(use_07_metric);
        let result = evaluate(&input, &params)?;
        println!("   use_07_metric = {}", use_07_metric);
        for (label, ap) in result.ap_per_class() {
            println!("   ├─ class {}: AP {:.4}", label, ap);
        }
        println!("   └─ mAP: {:.4}", result.map);
    }
    println!();

    println!("=== Example Complete ===");

    Ok(())
}
