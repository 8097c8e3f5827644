use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "smoke-signals",
    version,
    about = "PM2.5 prediction-tensor ETL for the smoke-signals dashboard"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch, reshape, and persist the dashboard time series.
    Run(RunArgs),
    /// Fetch and reshape without persisting; report shapes and counts.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long, help = "Output directory for the processed CSV")]
    pub out: PathBuf,

    #[arg(long, default_value_t = false, help = "Also write a JSON run report")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    #[arg(long, value_enum, default_value_t = StoreArg::Gcs)]
    pub store: StoreArg,

    #[arg(long, default_value = "smoke-signal-bucket")]
    pub bucket: String,

    #[arg(long, help = "Root directory for --store dir")]
    pub store_root: Option<PathBuf>,

    #[arg(long, default_value = "pm25gnn/predict.npy")]
    pub predict_net_key: String,

    #[arg(long, default_value = "pm25gnn-ambient/predict.npy")]
    pub predict_ambient_key: String,

    #[arg(long, default_value = "pm25gnn-ambient/label.npy")]
    pub label_key: String,

    #[arg(long, default_value = "pm25gnn/time.npy")]
    pub time_key: String,

    #[arg(long, help = "Location lookup CSV (row index -> city_name)")]
    pub locations: PathBuf,

    #[arg(
        long,
        default_value_t = 48,
        help = "Trailing window steps kept per forecast sample"
    )]
    pub pred_len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreArg {
    Gcs,
    Dir,
}
