use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use daily_returns::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "daily-returns")]
#[command(about = "Daily percentage returns from backtest and live equity curves", long_about = None)]
struct Cli {
    //log filter (overridden by DAILY_RETURNS_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    //log output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //resample equity curves into daily returns
    Run {
        //path to a json report configuration
        #[arg(long)]
        config: Option<PathBuf>,

        //path to the backtest equity csv (timestamp,equity)
        #[arg(long)]
        backtest: Option<PathBuf>,

        //path to the live equity csv (optional)
        #[arg(long)]
        live: Option<PathBuf>,

        //emit an empty live series instead of failing when the live curve is bad
        #[arg(long)]
        skip_live_errors: bool,

        //output options
        //output path for the daily returns csv
        #[arg(long)]
        output_csv: Option<PathBuf>,

        //output path for the daily returns json
        #[arg(long)]
        output_json: Option<PathBuf>,

        //do not print the day table
        #[arg(long)]
        no_table: bool,
    },
    //write a default configuration file
    InitConfig {
        #[arg(long, default_value = "daily_returns.json")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, &cli.log_format)?;

    match cli.command {
        Commands::Run {
            config,
            backtest,
            live,
            skip_live_errors,
            output_csv,
            output_json,
            no_table,
        } => {
            let mut configuration = match &config {
                Some(path) => ReportConfiguration::from_json_file(path)
                    .context(format!("Failed to load configuration from {:?}", path))?,
                None => {
                    let backtest = backtest
                        .clone()
                        .ok_or_else(|| anyhow::anyhow!("--backtest or --config is required"))?;
                    ReportConfiguration {
                        backtest_equity_csv: backtest,
                        ..ReportConfiguration::default()
                    }
                }
            };

            //command line flags win over the file
            if let Some(path) = backtest {
                configuration.backtest_equity_csv = path;
            }
            if live.is_some() {
                configuration.live_equity_csv = live;
            }
            if skip_live_errors {
                configuration.live_failure_policy = LiveFailurePolicy::Skip;
            }
            if output_csv.is_some() {
                configuration.output_csv = output_csv;
            }
            if output_json.is_some() {
                configuration.output_json = output_json;
            }
            if no_table {
                configuration.print_table = false;
            }

            run_report(&configuration)?;
        }
        Commands::InitConfig { path } => {
            ReportConfiguration::default().to_json_file(&path)?;
            println!("Configuration written to {:?}", path);
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str, log_format: &str) -> Result<()> {
    let filter = std::env::var("DAILY_RETURNS_LOG").unwrap_or_else(|_| log_level.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| anyhow::anyhow!("invalid log filter: {err}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match log_format.trim().to_lowercase().as_str() {
        "json" => builder.json().init(),
        "text" => builder.init(),
        other => anyhow::bail!("unknown log format: {other} (expected text or json)"),
    }
    Ok(())
}

fn run_report(configuration: &ReportConfiguration) -> Result<()> {
    let backtest = CsvEquitySource::new(&configuration.backtest_equity_csv);
    let live = configuration
        .live_equity_csv
        .as_ref()
        .map(CsvEquitySource::new);

    info!(
        backtest = %backtest.path().display(),
        live = ?live.as_ref().map(|l| l.path()),
        policy = ?configuration.live_failure_policy,
        "building daily returns"
    );

    let report = DailyReturnsReport::from_sources(
        &backtest,
        live.as_ref().map(|l| l as &dyn EquitySource),
        configuration.live_failure_policy,
    )?;

    info!(
        backtest_days = report.backtest.len(),
        live_days = report.live.len(),
        "daily returns ready"
    );

    if let Some(err) = &report.live_error {
        println!("Live curve skipped: {}\n", err);
    }

    if configuration.print_table {
        println!("Daily Returns");
        println!("=============\n");
        report.render(&mut TablePresenter::new(std::io::stdout().lock()))?;

        println!("\nSummary");
        println!("=======\n");
        DailyReturnSummary::pretty_print_pair(&report.backtest_summary(), &report.live_summary());
    }

    //save outputs if requested
    if let Some(path) = &configuration.output_csv {
        let file = File::create(path).context(format!("Failed to create {:?}", path))?;
        report.render(&mut CsvPresenter::new(BufWriter::new(file)))?;
        println!("\nDaily returns csv saved to {:?}", path);
    }

    if let Some(path) = &configuration.output_json {
        let file = File::create(path).context(format!("Failed to create {:?}", path))?;
        report.render(&mut JsonPresenter::new(BufWriter::new(file)))?;
        println!("Daily returns json saved to {:?}", path);
    }

    Ok(())
}
