use clap::Parser;
use delmarva_lp::config::Config;
use delmarva_lp::fetcher::LoadProfileFetcher;
use delmarva_lp::ldc::Ldc;
use delmarva_lp::profile::{parse_day, ParseOptions};
use delmarva_lp::utils::parse_target_date;

#[derive(Parser)]
#[command(name = "examine-day")]
#[command(about = "Fetch one day of Delmarva load profile data and print it", long_about = None)]
struct Cli {
    /// Day to fetch (MM/DD/YYYY or YYYY-MM-DD)
    date: String,

    /// LDC code: CND (Delaware) or CNM (Maryland)
    #[arg(default_value = "CNM")]
    ldc: String,

    /// Print the raw vendor text instead of the parsed table
    #[arg(long)]
    raw: bool,

    /// Print the parsed table as JSON
    #[arg(long)]
    json: bool,

    /// Keep the repeated fall DST hour as H02X
    #[arg(long)]
    keep_dst_hour: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let date = parse_target_date(&cli.date)?;
    let ldc: Ldc = cli.ldc.parse()?;

    let fetcher = LoadProfileFetcher::with_options(
        config.archive_base_url.clone(),
        config.http_timeout(),
        config.transient_retries,
    )?;
    let raw = fetcher.fetch_raw(date, ldc).await?;

    if cli.raw {
        print!("{raw}");
        return Ok(());
    }

    let options = ParseOptions {
        aggregate_dst_hour: !cli.keep_dst_hour,
        ..config.parse_options()
    };
    let table = parse_day(&raw, &options)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("{ldc} {date}: {} rows", table.len());
    println!("{}", "=".repeat(100));
    let columns = table.columns();
    println!("{}", columns.join("\t"));
    for record in table.records() {
        let mut fields = vec![record.segment.clone(), record.date.to_string()];
        for column in &columns[2..] {
            fields.push(
                record
                    .hour_value(column)
                    .map(|v| format!("{v:.3}"))
                    .unwrap_or_default(),
            );
        }
        println!("{}", fields.join("\t"));
    }
    println!("{}", "=".repeat(100));
    for record in table.records() {
        println!("{:<12} total {:>12.3}", record.segment, record.daily_total());
    }

    Ok(())
}
