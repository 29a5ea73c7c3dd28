use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use loginlens::config::AnalysisConfig;
use loginlens::ingest::{CsvFormat, TimestampUnit};

#[derive(Parser)]
#[command(
    name = "loginlens",
    about = "Batch rate-anomaly analysis for authentication attempt logs",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis: global rate-spike periods + per-source outliers
    Analyze {
        /// Path to the CSV dataset
        input: PathBuf,

        /// Emit the full report as JSON
        #[arg(long)]
        json: bool,

        /// Include the full per-source table in text output
        #[arg(long)]
        full_table: bool,

        #[command(flatten)]
        tuning: TuningArgs,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Bin and calibrate only: print both data-derived thresholds
    Calibrate {
        /// Path to the CSV dataset
        input: PathBuf,

        #[command(flatten)]
        tuning: TuningArgs,

        #[command(flatten)]
        format: FormatArgs,
    },
}

#[derive(Args)]
struct TuningArgs {
    /// TOML config file with analysis parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Counting window width in seconds
    #[arg(long)]
    window_secs: Option<u64>,

    /// Percentile for the global per-window threshold
    #[arg(long)]
    global_percentile: Option<f64>,

    /// Merge tolerance between flagged windows, in seconds
    #[arg(long)]
    merge_tolerance_secs: Option<u64>,

    /// Percentile for the per-source maxima threshold
    #[arg(long)]
    source_percentile: Option<f64>,

    /// Worker threads for the per-source fan-out (0 = auto)
    #[arg(long)]
    max_workers: Option<usize>,
}

impl TuningArgs {
    /// Config file (or defaults) overlaid with any explicit CLI flags.
    fn resolve(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(w) = self.window_secs {
            config.window_width_secs = w;
        }
        if let Some(p) = self.global_percentile {
            config.global_percentile = p;
        }
        if let Some(t) = self.merge_tolerance_secs {
            config.merge_tolerance_secs = t;
        }
        if let Some(p) = self.source_percentile {
            config.source_percentile = p;
        }
        if let Some(n) = self.max_workers {
            config.max_workers = n;
        }
        Ok(config)
    }
}

#[derive(Args)]
struct FormatArgs {
    /// Name of the timestamp column
    #[arg(long, default_value = "timestamp")]
    timestamp_column: String,

    /// Name of the source identifier column
    #[arg(long, default_value = "source_ip")]
    source_column: String,

    /// Timestamp encoding: s, ms, us, or rfc3339
    #[arg(long, default_value = "us")]
    timestamp_unit: String,
}

impl FormatArgs {
    fn resolve(&self) -> Result<CsvFormat> {
        Ok(CsvFormat {
            timestamp_column: self.timestamp_column.clone(),
            source_column: self.source_column.clone(),
            timestamp_unit: TimestampUnit::from_str(&self.timestamp_unit)?,
        })
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            json,
            full_table,
            tuning,
            format,
        } => {
            let config = tuning.resolve()?;
            let format = format.resolve()?;
            tracing::info!(input = %input.display(), "starting batch analysis");

            let events = loginlens::ingest::load_events(&input, &format)?;
            let report = loginlens::analyze(&events, &config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("\n=== LoginLens Rate-Anomaly Report ===");
                println!("Run:               {}", report.run_id);
                println!("Events analyzed:   {}", report.event_count);
                println!("Distinct sources:  {}", report.source_count);
                println!(
                    "Global threshold:  {:.1} attempts/window (p{})",
                    report.global_threshold, config.global_percentile
                );
                println!(
                    "Source threshold:  {:.1} attempts/window (p{})",
                    report.source_threshold, config.source_percentile
                );

                println!("\nPeriods with unusual global attempt rate:");
                if report.anomaly_periods.is_empty() {
                    println!("  (none)");
                } else {
                    for period in &report.anomaly_periods {
                        println!("  {}  -  {}", period.start, period.end);
                    }
                }

                println!("\nSources exceeding the per-window rate threshold:");
                if report.flagged_sources.is_empty() {
                    println!("  (none)");
                } else {
                    println!("  {:<39} | max/window", "Source");
                    println!("  {:-<39}-|-{:-<10}", "", "");
                    for record in &report.flagged_sources {
                        println!(
                            "  {:<39} | {}",
                            record.source_id, record.max_count_per_window
                        );
                    }
                }

                if full_table {
                    println!("\nFull per-source table:");
                    for record in &report.source_table {
                        println!(
                            "  {:<39} | {}",
                            record.source_id, record.max_count_per_window
                        );
                    }
                }
                println!();
            }
        }
        Commands::Calibrate {
            input,
            tuning,
            format,
        } => {
            let config = tuning.resolve()?;
            let format = format.resolve()?;
            tracing::info!(input = %input.display(), "calibrating thresholds");

            let events = loginlens::ingest::load_events(&input, &format)?;
            let report = loginlens::analyze(&events, &config)?;

            println!("\n=== LoginLens Threshold Calibration ===");
            println!(
                "Global cutoff:  {:.2} attempts per {}s window at p{}",
                report.global_threshold, config.window_width_secs, config.global_percentile
            );
            println!(
                "Source cutoff:  {:.2} attempts per {}s window at p{} over {} sources",
                report.source_threshold,
                config.window_width_secs,
                config.source_percentile,
                report.source_count
            );
            println!();
        }
    }

    Ok(())
}
