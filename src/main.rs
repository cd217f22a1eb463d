use std::path::PathBuf;
use clap::Parser;
use log::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use owner_phone_lookup::pipeline::{default_output_path, process_file};
use owner_phone_lookup::Config;

/// Look up phone numbers for the property owners in a spreadsheet
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// input spreadsheet (.xlsx, .xls, .ods or .csv)
    input: PathBuf,

    /// output file, defaults to leads_med_korrigerte_telefonnumre.<ext> next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// owners looked up at the same time
    #[arg(long)]
    concurrency: Option<usize>,

    /// extra attempts per page after a network error
    #[arg(long)]
    retries: Option<usize>,

    /// debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = install_tracing(cli.verbose) {
        eprintln!("cannot set up logging: {e:?}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        error!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn install_tracing(verbose: bool) -> color_eyre::Result<()> {
    color_eyre::install()?;
    let default_filter = if verbose {
        "owner_phone_lookup=debug,info"
    } else {
        "owner_phone_lookup=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(ErrorLayer::default())
        .try_init()?;
    Ok(())
}

async fn run(cli: Cli) -> color_eyre::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(concurrency) = cli.concurrency {
        config.http.concurrency = concurrency;
    }
    if let Some(retries) = cli.retries {
        config.http.retries = retries;
    }
    config.validate()?;

    let output = cli.output.unwrap_or_else(|| default_output_path(&cli.input));
    let summary = process_file(&cli.input, &output, &config).await?;
    info!(
        "done: [{}] numbers found for [{}] owners, written to [{}]",
        summary.found, summary.rows, output.display()
    );
    Ok(())
}
