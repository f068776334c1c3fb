use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use zipweather::config::AppConfig;
use zipweather::logging::init_logging;
use zipweather::{
    ForecastError, ForecastPipeline, HttpFetcher, Notifier, SmtpNotifier, ZipcodesGazetteer,
    export,
};

#[derive(Parser)]
#[command(name = "zipweather", version)]
#[command(about = "Daily forecast for a US zip code, saved as CSV and emailed")]
struct Cli {
    /// 5-digit US zip code; prompted for when omitted
    #[arg(short, long)]
    zip: Option<String>,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// CSV output file, overrides the configured path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Skip the email even when recipients are configured
    #[arg(long)]
    no_email: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load_from_path(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.logging, cli.verbose);

    match run(&cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            match e.downcast_ref::<ForecastError>() {
                Some(forecast_error) => eprintln!("{}", forecast_error.user_message()),
                None => eprintln!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: AppConfig) -> Result<()> {
    let postal_code = match &cli.zip {
        Some(zip) => zip.clone(),
        None => prompt_zip().context("Failed to read zip code")?,
    };

    let fetcher = HttpFetcher::new(&config.site)?;
    let pipeline = ForecastPipeline::new(fetcher, ZipcodesGazetteer, config.site.clone());
    let report = pipeline.run(&postal_code, Local::now().date_naive())?;

    let csv_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.csv_path));
    export::write_table(&csv_path, &report.table)?;
    println!(
        "Saved {} forecast days for {} to {}",
        report.table.len(),
        report.location.display_name(),
        csv_path.display()
    );

    if cli.no_email || !config.email.is_enabled() {
        tracing::info!("Email step skipped");
        return Ok(());
    }

    SmtpNotifier::new(config.email)?.send(&report)?;
    println!("Email Sent!");
    Ok(())
}

fn prompt_zip() -> io::Result<String> {
    print!("Enter Zip Code: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
