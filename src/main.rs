//! # forecast-studio
//!
//! Command-line front end: preview an uploaded CSV or run one forecasting
//! session against it.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use forecast_studio::config::{ModelConfig, ModelFamily, SessionRequest, DEFAULT_HORIZON};
use forecast_studio::models::{ARIMASpec, SARIMASpec};
use forecast_studio::pipeline::{run_forecast, Session};
use forecast_studio::present::{render_forecast_svg, render_history_svg, DEFAULT_PREVIEW_ROWS};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "forecast-studio")]
#[command(about = "Time series forecasting with ARIMA and SARIMAX", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the columns and first rows of a CSV file
    Preview {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Number of rows to show
        #[arg(short, long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        rows: usize,
    },

    /// Fit a model on the whole series and forecast the following months
    Forecast(ForecastArgs),
}

#[derive(Args)]
struct ForecastArgs {
    /// Input CSV file
    #[arg(short, long)]
    input: PathBuf,

    /// Column holding the timestamps
    #[arg(long)]
    date_column: String,

    /// Column holding the values to forecast
    #[arg(long)]
    value_column: String,

    /// Model family (arima, sarimax)
    #[arg(short, long, default_value = "arima")]
    model: ModelFamily,

    /// AR order
    #[arg(short, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=5))]
    p: u8,

    /// Differencing order
    #[arg(short, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=2))]
    d: u8,

    /// MA order
    #[arg(short, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=5))]
    q: u8,

    /// Seasonal AR order (SARIMAX only)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=5))]
    seasonal_p: u8,

    /// Seasonal differencing order (SARIMAX only)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=2))]
    seasonal_d: u8,

    /// Seasonal MA order (SARIMAX only)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=5))]
    seasonal_q: u8,

    /// Seasonal period (SARIMAX only)
    #[arg(short = 's', long, default_value_t = 12, value_parser = clap::value_parser!(u8).range(1..=24))]
    period: u8,

    /// Forecast horizon in months
    #[arg(long, default_value_t = DEFAULT_HORIZON as u8, value_parser = clap::value_parser!(u8).range(1..=36))]
    horizon: u8,

    /// Add prediction intervals at this level, e.g. 0.95
    #[arg(long)]
    interval_level: Option<f64>,

    /// Directory for history.svg and forecast.svg
    #[arg(long)]
    chart_dir: Option<PathBuf>,

    /// Write the forecast table as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write history and forecast rows as CSV
    #[arg(long)]
    combined_csv: Option<PathBuf>,
}

impl ForecastArgs {
    fn request(&self) -> SessionRequest {
        let order = ARIMASpec::new(self.p.into(), self.d.into(), self.q.into());
        let seasonal = SARIMASpec::new(
            self.seasonal_p.into(),
            self.seasonal_d.into(),
            self.seasonal_q.into(),
            self.period.into(),
        );
        let model = ModelConfig::from_parts(self.model, order, seasonal, self.horizon.into());
        SessionRequest::new(&self.date_column, &self.value_column, model)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "forecast_studio=debug"
    } else {
        "forecast_studio=info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .init();
}

fn preview(input: &Path, rows: usize) -> Result<()> {
    let session =
        Session::open(input).with_context(|| format!("failed to load {}", input.display()))?;
    println!("Columns: {}", session.columns().join(", "));
    println!();
    print!("{}", session.preview(rows));
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn forecast(args: &ForecastArgs) -> Result<()> {
    let request = args.request();
    let session = Session::open(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    let prepared = session
        .prepare(&request.date_column, &request.value_column)
        .context("failed to prepare the time series")?;
    for notice in &prepared.notices {
        eprintln!("warning: {notice}");
    }
    if let Some(dir) = &args.chart_dir {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        write_file(&dir.join("history.svg"), &render_history_svg(&prepared.series)?)?;
        tracing::info!(dir = %dir.display(), "history chart written");
    }

    let run = run_forecast(&prepared.series, &request.model, args.interval_level)
        .with_context(|| format!("{} forecast failed", request.model.family()))?;
    let combined = run.combined();

    if let Some(dir) = &args.chart_dir {
        let title = format!("{} forecast", run.model_label);
        write_file(&dir.join("forecast.svg"), &render_forecast_svg(&combined, &title)?)?;
        tracing::info!(dir = %dir.display(), "forecast chart written");
    }

    let table = run.table();
    println!("{} forecast for {}", run.model_label, run.history.label());
    print!("{table}");

    if let Some(path) = &args.output {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &table)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    if let Some(path) = &args.combined_csv {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        combined
            .write_csv(BufWriter::new(file))
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Preview { input, rows } => preview(input, *rows),
        Commands::Forecast(args) => forecast(args),
    }
}
