use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use delmarva_lp::codes::CodeMapping;
use delmarva_lp::config::Config;
use delmarva_lp::exporter::{LoadProfileExporter, MappingMode};
use delmarva_lp::profile::{ParseOptions, PartialDataPolicy};
use delmarva_lp::services::LoadProfileService;
use delmarva_lp::utils::parse_target_date;

#[derive(Parser, Debug)]
#[command(name = "delmarva-lp")]
#[command(about = "Download Delmarva load profile data and export it for database upload", long_about = None)]
struct Cli {
    /// First day to download (MM/DD/YYYY or YYYY-MM-DD)
    #[arg(long)]
    from: String,

    /// Last day to download, inclusive
    #[arg(long)]
    to: String,

    /// Output directory (default: LP_DEST_DIR or the current directory)
    #[arg(long)]
    dest: Option<PathBuf>,

    /// Output file name (default: Conectiv_<first date>.txt)
    #[arg(long)]
    file_name: Option<String>,

    /// Directory holding the code mapping file (default: LP_CODES_DIR)
    #[arg(long)]
    codes_dir: Option<PathBuf>,

    /// Keep the repeated fall DST hour as a separate H02X column
    #[arg(long)]
    keep_dst_hour: bool,

    /// Fail when downloaded segments are missing from the code mapping
    #[arg(long)]
    strict_mapping: bool,

    /// Fail when a day's file is missing some load profiles
    #[arg(long)]
    strict_partial: bool,
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,delmarva_lp=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    info!("Starting load profile export with config: {:?}", config);

    let from = parse_target_date(&cli.from)?;
    let to = parse_target_date(&cli.to)?;

    let codes_dir = cli.codes_dir.clone().unwrap_or_else(|| config.codes_dir.clone());
    let codes = CodeMapping::load(&codes_dir, &config.codes_file_name)?;

    let mapping_mode = if cli.strict_mapping {
        MappingMode::Strict
    } else {
        config.mapping_mode()
    };
    let dest_dir = cli.dest.clone().unwrap_or_else(|| config.dest_dir.clone());
    let exporter = LoadProfileExporter::new(codes, dest_dir).with_mapping_mode(mapping_mode);

    let mut options: ParseOptions = config.parse_options();
    if cli.strict_partial {
        options.partial_policy = PartialDataPolicy::Strict;
    }
    let service = LoadProfileService::from_config(&config)?.with_options(options);

    let progress = ProgressBar::new(LoadProfileService::pair_count(from, to) as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let table = service
        .collect_range(from, to, !cli.keep_dst_hour, |date, ldc| {
            progress.set_message(format!("{ldc} {date}"));
            progress.inc(1);
        })
        .await?;
    progress.finish_with_message("download complete");

    let summary = exporter.export(&table, None, cli.file_name.as_deref())?;
    info!(
        "Wrote {} rows to {}",
        summary.rows_written,
        summary.path.display()
    );

    Ok(())
}
