use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use price_core::persist::load_header;
use price_core::{PipelineConfig, Predictor, ProductFields, ProductInput, RidgeConfig, VectorizerConfig};
use tracing_subscriber::{fmt, EnvFilter};
use trainer::report::save_report;
use trainer::{TrainConfig, Trainer};

#[derive(Parser)]
#[command(name = "trainer")]
#[command(about = "Train and inspect the text-to-price model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the model on a labeled CSV (text,price; no header) and write the artifact
    Fit {
        /// Dataset path
        #[arg(long, default_value = "data/human_out.csv")]
        data: PathBuf,
        /// Artifact output path
        #[arg(long, env = "MODEL_PATH", default_value = "models/price_model.bin")]
        output: PathBuf,
        /// Fraction of rows held out for evaluation
        #[arg(long, default_value_t = 0.2)]
        test_size: f64,
        /// Shuffle seed for the train/holdout split
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Maximum vocabulary size
        #[arg(long, default_value_t = 6000)]
        max_features: usize,
        /// Ridge regularization strength
        #[arg(long, default_value_t = 1.0)]
        alpha: f64,
        /// Optional path for a JSON training report
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Print the artifact header as JSON
    Inspect {
        #[arg(long, env = "MODEL_PATH", default_value = "models/price_model.bin")]
        model: PathBuf,
    },
    /// Predict a single price from raw text or structured fields
    Predict {
        #[arg(long, env = "MODEL_PATH", default_value = "models/price_model.bin")]
        model: PathBuf,
        /// Raw text; overrides every structured field when non-blank
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        details: Option<String>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fit { data, output, test_size, seed, max_features, alpha, report } => {
            let config = TrainConfig {
                data_path: data,
                output_path: output,
                test_size,
                seed,
                pipeline: PipelineConfig {
                    vectorizer: VectorizerConfig { max_features, ..Default::default() },
                    ridge: RidgeConfig { alpha, ..Default::default() },
                },
            };
            let result = Trainer::new(config).run().context("training failed")?;
            if let Some(path) = report {
                save_report(&path, &result).with_context(|| format!("writing report to {}", path.display()))?;
            }
            println!("Saved model to: {}", result.artifact_path.display());
            match result.holdout_mae {
                Some(mae) => println!("Holdout MAE: ${mae:.2} (smaller is better)"),
                None => println!("Holdout MAE: n/a (no holdout rows)"),
            }
            Ok(())
        }
        Commands::Inspect { model } => {
            let header = load_header(&model)?;
            println!("{}", serde_json::to_string_pretty(&header)?);
            Ok(())
        }
        Commands::Predict { model, text, title, category, brand, description, details } => {
            let predictor = Predictor::load(&model)?;
            let fields = ProductFields { title, category, brand, description, details };
            let input = ProductInput::new(fields, text.as_deref());
            println!("{:.2}", predictor.predict(&input));
            Ok(())
        }
    }
}
