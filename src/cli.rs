//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::tracing_event_adapter::TracingEventAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestReport, Series};
pub use crate::domain::config_validation::build_backtest_config;
use crate::domain::error::SentraderError;
use crate::domain::metrics::PerformanceMetrics;
use crate::domain::period::{FULL_PERIOD, IN_SAMPLE, OUT_OF_SAMPLE};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_LOG_FILTER: &str = "sentrader=info";
pub const DEFAULT_OUTPUT_DIR: &str = "report";

#[derive(Parser, Debug)]
#[command(name = "sentrader", about = "Sentiment-driven strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Observation CSV, overrides `[backtest] data_path`
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Report directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the date range of an observation file
    Info {
        #[arg(short, long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing();
    match cli.command {
        Command::Backtest {
            config,
            data,
            output,
        } => run_backtest(&config, data.as_deref(), output.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { data } => run_info(&data),
    }
}

/// Install the log subscriber; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A second install (e.g. several runs in one test process) is a no-op.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| report_error(&e))
}

fn report_error(err: &SentraderError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err)
}

/// `--data` wins over `[backtest] data_path`.
pub fn resolve_data_path(
    data_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, SentraderError> {
    if let Some(p) = data_override {
        return Ok(p.to_path_buf());
    }
    match config.get_string("backtest", "data_path") {
        Some(p) if !p.trim().is_empty() => Ok(PathBuf::from(p.trim())),
        _ => Err(SentraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "data_path".to_string(),
        }),
    }
}

fn run_backtest(
    config_path: &Path,
    data_override: Option<&Path>,
    output_path: Option<&Path>,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Validate and build run parameters
    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };
    if bt_config.strategy.thresholds_overlap() {
        tracing::warn!(
            entry_threshold = bt_config.strategy.entry_threshold,
            exit_threshold = bt_config.strategy.exit_threshold,
            "Thresholds overlap; buy takes precedence when both conditions hold"
        );
    }

    // Stage 3: Resolve data source
    let data_path = match resolve_data_path(data_override, &adapter) {
        Ok(p) => p,
        Err(e) => return report_error(&e),
    };
    eprintln!("Reading observations from {}", data_path.display());
    let data_port = CsvAdapter::new(data_path);

    let output = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    run_backtest_pipeline(&data_port, &CsvReportAdapter::new(), &bt_config, &output)
}

/// Fetch, simulate, summarize and write the report.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    bt_config: &BacktestConfig,
    output_path: &Path,
) -> ExitCode {
    // Stage 4: Fetch observations
    let observations = match data_port.fetch_observations(bt_config.start_date, bt_config.end_date)
    {
        Ok(o) => o,
        Err(e) => return report_error(&e),
    };

    eprintln!(
        "Running backtest: {} observations, {} to {}",
        observations.len(),
        bt_config.start_date,
        bt_config.end_date,
    );

    // Stage 5: Simulate strategy and baseline, compute metrics
    let events = TracingEventAdapter::new();
    let report = match backtest_engine::run_backtest(&observations, bt_config, &events) {
        Ok(r) => r,
        Err(e) => return report_error(&e),
    };

    // Stage 6: Console summary
    print_summary(&report);

    // Stage 7: Write report
    match report_port.write(&report, output_path) {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

fn print_summary(report: &BacktestReport) {
    eprintln!("\n=== Full Period ===");
    print_metrics_table(report, FULL_PERIOD, &[
        Series::StrategyMarket,
        Series::StrategyEquity,
        Series::BuyAndHold,
    ]);

    if let Some(split) = report.split_date {
        for period in [IN_SAMPLE, OUT_OF_SAMPLE] {
            eprintln!("\n=== {} (split {}) ===", period, split);
            print_metrics_table(report, period, &[Series::StrategyMarket, Series::BuyAndHold]);
        }
    }

    let trades = &report.strategy.trades;
    eprintln!("\nTrades:           {}", trades.len());
    if let Some(last) = trades.last() {
        eprintln!("Realized P&L:     {:.4}", last.cumulative_realized_pnl);
    }
    if let Some(point) = report.strategy.final_point() {
        if point.position_size > 0 {
            eprintln!("Open position:    {} contract(s) at end of data", point.position_size);
        }
    }
}

fn print_metrics_table(report: &BacktestReport, period: &str, series: &[Series]) {
    eprintln!(
        "{:<16} {:>10} {:>10} {:>9} {:>8} {:>8} {:>9} {:>8} {:>14}",
        "series", "total %", "annual %", "vol %", "sharpe", "sortino", "mdd %", "calmar", "capital"
    );
    for s in series {
        if let Some(m) = report.find(*s, period) {
            eprintln!("{}", format_metrics_row(s.name(), m, report.initial_capital));
        }
    }
}

fn format_metrics_row(name: &str, m: &PerformanceMetrics, initial_capital: f64) -> String {
    format!(
        "{:<16} {:>10.2} {:>10.2} {:>9.2} {:>8.2} {:>8.2} {:>9.2} {:>8.2} {:>14.2}",
        name,
        m.total_return,
        m.annualized_return_pct(),
        m.annualized_volatility,
        m.sharpe_ratio,
        m.sortino_ratio,
        m.max_drawdown,
        m.calmar_ratio,
        m.capital_effect(initial_capital),
    )
}

pub fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };

    eprintln!("\nBacktest:");
    eprintln!("  start_date:      {}", config.start_date);
    eprintln!("  end_date:        {}", config.end_date);
    match config.split_date {
        Some(d) => eprintln!("  split_date:      {}", d),
        None => eprintln!("  split_date:      (none)"),
    }
    eprintln!("  initial_capital: {:.2}", config.initial_capital);
    eprintln!("  risk_free_rate:  {}", config.risk_free_rate);
    if let Some(p) = adapter.get_string("backtest", "data_path") {
        eprintln!("  data_path:       {}", p);
    }

    eprintln!("\nStrategy:");
    eprintln!("  entry_threshold: {}", config.strategy.entry_threshold);
    eprintln!("  exit_threshold:  {}", config.strategy.exit_threshold);
    eprintln!("  position_size:   {}", config.strategy.position_size);
    if config.strategy.thresholds_overlap() {
        eprintln!("  warning: thresholds overlap; buy takes precedence");
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

pub fn run_info(data_path: &Path) -> ExitCode {
    let adapter = CsvAdapter::new(data_path.to_path_buf());
    match adapter.get_data_range() {
        Ok(Some((first, last, count))) => {
            println!("{}: {} observations, {} to {}", data_path.display(), count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no observations found", data_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}
