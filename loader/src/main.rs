//! Product Loader CLI - create products from products.csv
//!
//! ```bash
//! product-loader               # Submit every row of products.csv
//! product-loader submit        # Same as above
//! product-loader preview       # Print the JSON records, send nothing
//! product-loader --timeout 60  # Per-request timeout in seconds
//! ```

use clap::{Parser, Subcommand};
use product_loader::logs::{self, log_info, log_success, log_warning};
use product_loader::{
    preview_all, submit_all, CsvSource, HttpSink, Settings, SubmitError, SubmitResult,
};
use std::io;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "product-loader")]
#[command(about = "Create products from products.csv in the products collection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// HTTP request timeout in seconds (default: 30, or PRODUCT_LOADER_TIMEOUT_SECS)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// POST every row to the products collection (default)
    Submit,

    /// Print the JSON record for every row without sending it
    Preview,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logs::init(cli.verbose);

    let result = run(&cli).await;

    if let Err(e) = &result {
        eprintln!("{}", failure_line(e));
    }
    let code = exit_code(&result);
    if code != 0 {
        std::process::exit(code);
    }
}

async fn run(cli: &Cli) -> SubmitResult<()> {
    let mut settings = Settings::from_env()?;
    if let Some(secs) = cli.timeout {
        settings = settings.with_timeout(Duration::from_secs(secs));
    }

    execute(cli.command.unwrap_or(Commands::Submit), &settings).await
}

async fn execute(command: Commands, settings: &Settings) -> SubmitResult<()> {
    match command {
        Commands::Submit => cmd_submit(settings).await,
        Commands::Preview => cmd_preview(settings),
    }
}

fn exit_code(result: &SubmitResult<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

fn failure_line(err: &SubmitError) -> String {
    format!("❌ Error: {}", err)
}

async fn cmd_submit(settings: &Settings) -> SubmitResult<()> {
    log_info(format!("📄 Reading: {}", settings.input_path.display()));
    let source = CsvSource::open(&settings.input_path)?;

    let sink = HttpSink::from_settings(settings)?;
    log_info(format!("📡 Submitting to: {}", sink.endpoint()));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = submit_all(source, &sink, &mut out).await?;

    log_success(format!("Submitted {} products", report.submitted));
    if report.non_success > 0 {
        log_warning(format!("{} responses had a non-success status", report.non_success));
    }

    Ok(())
}

fn cmd_preview(settings: &Settings) -> SubmitResult<()> {
    log_info(format!("📄 Previewing: {}", settings.input_path.display()));
    let source = CsvSource::open(&settings.input_path)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let printed = preview_all(source, &mut out)?;

    log_success(format!("{} records, nothing sent", printed));
    Ok(())
}
