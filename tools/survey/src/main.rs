/// Region survey tool: runs the full risk pipeline over a bounding box (or a
/// single point's default box) and writes the region report as JSON.
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use ecorisk_core::classify::{RiskClassifier, DEFAULT_ARTIFACT_PATH};
use ecorisk_core::{analyze_region, RegionBounds, Scenario};

#[derive(Parser, Debug)]
#[command(
    name = "survey",
    about = "Evaluate biodiversity risk over a region and emit a JSON report"
)]
struct Args {
    /// Bounding box as min_lat,min_lng,max_lat,max_lng
    #[arg(long, value_delimiter = ',', num_args = 4, conflicts_with = "point")]
    bbox: Option<Vec<f64>>,

    /// Single point as lat,lng (analyzed over the default 0.05° box)
    #[arg(long, value_delimiter = ',', num_args = 2)]
    point: Option<Vec<f64>>,

    /// Cells per grid side
    #[arg(long, default_value = "5")]
    grid_size: usize,

    /// What-if: temperature increase in °C
    #[arg(long, default_value = "0.0")]
    temp_increase: f64,

    /// What-if: urban growth percentage (0-100)
    #[arg(long, default_value = "0.0")]
    urban_growth: f64,

    /// Classifier artifact path (loaded if present, trained and written otherwise)
    #[arg(long, default_value = DEFAULT_ARTIFACT_PATH)]
    classifier: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let bounds = match (&args.bbox, &args.point) {
        (Some(b), _) => RegionBounds::new(b[0], b[1], b[2], b[3]),
        (None, Some(p)) => RegionBounds::around(p[0], p[1]),
        (None, None) => bail!("either --bbox or --point is required"),
    };
    let scenario = Scenario {
        temp_increase: args.temp_increase,
        urban_growth_pct: args.urban_growth,
    };

    let classifier = RiskClassifier::load_or_train(&args.classifier);
    let report = analyze_region(&bounds, args.grid_size, &scenario, &classifier)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &args.output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
