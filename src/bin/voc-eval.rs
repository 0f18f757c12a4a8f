use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use voc_eval::{evaluate, load_from_file, VocParams};

#[derive(Parser)]
#[command(name = "voc-eval")]
#[command(about = "PASCAL VOC evaluation tool: per-class AP and mAP for object detection")]
struct Cli {
    /// Path to the JSON file with predictions and ground truth
    #[arg(long)]
    input: PathBuf,

    /// IoU a detection must exceed to match a ground truth box
    #[arg(long, default_value_t = 0.5)]
    min_iou: f64,

    /// Use the VOC2007 11-point AP instead of the area under the precision envelope
    #[arg(long)]
    use_07_metric: bool,

    /// Evaluate classes one after another instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Print the full result (curves included) as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let params = VocParams::new()
        .with_min_iou(cli.min_iou)
        .with_use_07_metric(cli.use_07_metric)
        .with_parallel(!cli.sequential);

    info!(path = ?cli.input, "loading evaluation input");
    let input = load_from_file(&cli.input)?;

    let result = evaluate(&input, &params)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(" class |     AP | detections");
    println!("-------|--------|-----------");
    for (label, class_result) in &result.per_class {
        println!(
            "{:>6} | {:.4} | {:>10}",
            label,
            class_result.ap,
            class_result.recall.len()
        );
    }
    println!("mAP: {:.4}", result.map);

    Ok(())
}
