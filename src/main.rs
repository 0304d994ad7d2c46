use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use mpox_curate::app::{
    FinalizeMetadataRequest, FinalizeMetadataUseCase, RefineNextcladeRequest,
    RefineNextcladeUseCase,
};
use mpox_curate::config::Config;
use mpox_curate::infra::TsvFileAdapter;
use mpox_curate::{logging, observability};

#[derive(Parser)]
#[command(name = "mpox-curate")]
#[command(about = "Curate GenBank metadata and Nextclade clade calls for mpox builds")]
#[command(version)]
struct Cli {
    /// TOML config file (defaults to curate.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for JSON log files, overrides [logging].log_dir
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refine GenBank dataset metadata
    FinalizeMetadata {
        /// Input metadata TSV
        #[arg(long)]
        input_metadata: PathBuf,
        /// Output final metadata TSV
        #[arg(long)]
        output_metadata: PathBuf,
        /// Output TSV of records submitted in the last two weeks
        #[arg(long)]
        output_update: PathBuf,
        /// Date to measure submission recency against (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        reference_date: Option<NaiveDate>,
    },
    /// Refine clade I Nextclade results
    RefineNextclade {
        /// Nextclade results for all clades
        #[arg(long)]
        input_all: PathBuf,
        /// Nextclade results for clade I
        #[arg(long, alias = "input-cladeI")]
        input_clade_i: PathBuf,
        /// Output Nextclade results for clade I
        #[arg(long, alias = "output-cladeI")]
        output_clade_i: PathBuf,
    },
}

fn run(command: Commands) -> Result<()> {
    let files = TsvFileAdapter::new();

    match command {
        Commands::FinalizeMetadata {
            input_metadata,
            output_metadata,
            output_update,
            reference_date,
        } => {
            let request = FinalizeMetadataRequest {
                input_metadata,
                output_metadata,
                output_update,
                reference_date: reference_date.unwrap_or_else(|| Local::now().date_naive()),
            };
            FinalizeMetadataUseCase::new(Box::new(files), Box::new(files))
                .run(&request)
                .with_context(|| {
                    format!(
                        "finalize-metadata failed for {}",
                        request.input_metadata.display()
                    )
                })?;
        }
        Commands::RefineNextclade {
            input_all,
            input_clade_i,
            output_clade_i,
        } => {
            let request = RefineNextcladeRequest {
                input_all,
                input_clade_i,
                output_clade_i,
            };
            RefineNextcladeUseCase::new(Box::new(files), Box::new(files))
                .run(&request)
                .with_context(|| {
                    format!(
                        "refine-nextclade failed for {}",
                        request.input_clade_i.display()
                    )
                })?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(log_dir) = cli.log_dir {
        config.logging.log_dir = Some(log_dir);
    }
    let _guard = logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    let metrics = match observability::metrics::init() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Metrics disabled: {}", e);
            None
        }
    };

    // Errors are reported once, by the anyhow return below
    let result = run(cli.command);

    if let Some(handle) = metrics {
        debug!(metrics = %handle.render(), "Run metrics");
    }

    result
}
