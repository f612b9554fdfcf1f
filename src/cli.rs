//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::csv_issuer_adapter::CsvIssuerAdapter;
use crate::adapters::csv_price_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_price_adapter::JsonPriceAdapter;
use crate::domain::config_validation::validate_engine_config;
use crate::domain::engine_config::{
    DataFormat, EngineConfig, DEFAULT_ROLLING_PERIOD, DEFAULT_TIMEOUT_SECS,
};
use crate::domain::error::EodError;
use crate::domain::fetch::require_prices;
use crate::domain::issuer::{parse_ids, resolve_tickers};
use crate::domain::table::{Frequency, Series, Table};
use crate::domain::table_set::{Bounds, TableSet};
use crate::domain::views::{BacktestInput, IncomeInput, RiskInput};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;

#[derive(Parser, Debug)]
#[command(name = "eodtable", about = "End-of-day price alignment and resampling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Which securities to load.
#[derive(Args, Debug, Clone)]
pub struct Selection {
    #[arg(short, long)]
    pub config: PathBuf,
    /// Comma-separated tickers
    #[arg(long, conflicts_with = "ids")]
    pub codes: Option<String>,
    /// Comma-separated issuer ids, resolved through the issuer directory
    #[arg(long)]
    pub ids: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show each security's date range
    Info {
        #[command(flatten)]
        selection: Selection,
    },
    /// Print adjusted closes aligned on the common calendar
    Merge {
        #[command(flatten)]
        selection: Selection,
        #[arg(long)]
        monthly: bool,
    },
    /// Print percentage returns on the common calendar
    Returns {
        #[command(flatten)]
        selection: Selection,
        #[arg(long)]
        monthly: bool,
    },
    /// List rolling windows over the common calendar
    Rolling {
        #[command(flatten)]
        selection: Selection,
        #[arg(long)]
        period: Option<usize>,
        #[arg(long)]
        monthly: bool,
    },
    /// Show overlap bounds and shared dates
    Coverage {
        #[command(flatten)]
        selection: Selection,
    },
    /// Emit backtest input as JSON
    Backtest {
        #[command(flatten)]
        selection: Selection,
        /// Comma-separated weights, one per security
        #[arg(long)]
        weights: String,
    },
    /// Emit income simulation input as JSON
    Income {
        #[command(flatten)]
        selection: Selection,
        /// Comma-separated weights, one per security
        #[arg(long)]
        weights: String,
    },
    /// Emit risk attribution input as JSON; the first security is the dependent
    Risk {
        #[command(flatten)]
        selection: Selection,
        #[arg(long)]
        period: Option<usize>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match execute(&cli.command, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Runs one command, writing its data to `out`.
pub fn execute(command: &Command, out: &mut dyn Write) -> Result<(), EodError> {
    match command {
        Command::Info { selection } => {
            let request = prepare(selection)?;
            let set = load_set(&request)?;
            write_info(out, &request.labels, &set)
        }
        Command::Merge { selection, monthly } => {
            let request = prepare(selection)?;
            let table = aligned(&request, *monthly)?;
            write_series(out, &request.labels, &table.adjusted_close())
        }
        Command::Returns { selection, monthly } => {
            let request = prepare(selection)?;
            let table = aligned(&request, *monthly)?;
            write_series(out, &request.labels, &table.returns())
        }
        Command::Rolling {
            selection,
            period,
            monthly,
        } => {
            let request = prepare(selection)?;
            let table = aligned(&request, *monthly)?;
            let period = period.unwrap_or(request.config.rolling_period);
            write_rolling(out, &table, period)
        }
        Command::Coverage { selection } => {
            let request = prepare(selection)?;
            let set = load_set(&request)?;
            write_coverage(out, &set, request.config.bounds)
        }
        Command::Backtest { selection, weights } => {
            let request = prepare(selection)?;
            let weights = parse_weights(weights)?;
            let set = load_set(&request)?;
            let input = BacktestInput::build(&set, &request.labels, &weights, request.config.bounds)?;
            write_json(out, &input)
        }
        Command::Income { selection, weights } => {
            let request = prepare(selection)?;
            let weights = parse_weights(weights)?;
            let set = load_set(&request)?;
            let input = IncomeInput::build(set, &request.labels, &weights)?;
            write_json(out, &input)
        }
        Command::Risk { selection, period } => {
            let request = prepare(selection)?;
            let Some((dep, ind)) = request.labels.split_first() else {
                return Err(EodError::MissingData);
            };
            let set = load_set(&request)?;
            let period = period.unwrap_or(request.config.rolling_period);
            let input = RiskInput::build(&set, dep, ind, request.config.bounds, period)?;
            write_json(out, &input)
        }
    }
}

/// A validated configuration plus the securities to fetch. `labels` are
/// the identifiers the caller used (tickers or issuer ids), parallel to
/// `tickers`.
#[derive(Debug, Clone)]
pub struct Request {
    pub config: EngineConfig,
    pub tickers: Vec<String>,
    pub labels: Vec<String>,
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, EodError> {
    FileConfigAdapter::from_file(path).map_err(|e| EodError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn prepare(selection: &Selection) -> Result<Request, EodError> {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", selection.config.display());
    let adapter = load_config(&selection.config)?;
    validate_engine_config(&adapter)?;
    let config = build_engine_config(&adapter)?;

    // Stage 2: Resolve securities
    let ids = selection
        .ids
        .clone()
        .or_else(|| adapter.get_string("request", "ids"));
    let codes = selection.codes.clone().map(|c| split_list(&c));

    let (tickers, labels) = match (codes, ids) {
        (Some(codes), _) => (codes.clone(), codes),
        (None, Some(ids)) => {
            let ids = parse_ids(&ids)?;
            let path = config
                .issuers_path
                .as_ref()
                .ok_or_else(|| EodError::ConfigMissing {
                    section: "issuers".into(),
                    key: "path".into(),
                })?;
            let directory = CsvIssuerAdapter::from_file(path)?;
            let tickers = resolve_tickers(&directory, &ids)?;
            (tickers, ids.iter().map(|id| id.to_string()).collect())
        }
        (None, None) => {
            let codes = adapter.get_list("request", "codes");
            (codes.clone(), codes)
        }
    };

    if tickers.is_empty() {
        return Err(EodError::ConfigMissing {
            section: "request".into(),
            key: "codes".into(),
        });
    }

    eprintln!("Securities: {}", tickers.join(", "));
    Ok(Request {
        config,
        tickers,
        labels,
    })
}

pub fn build_engine_config(adapter: &dyn ConfigPort) -> Result<EngineConfig, EodError> {
    let data_path = adapter
        .get_string("data", "path")
        .ok_or_else(|| EodError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;

    let data_format = match adapter.get_string("data", "format") {
        Some(raw) => raw.parse::<DataFormat>().map_err(|reason| EodError::ConfigInvalid {
            section: "data".into(),
            key: "format".into(),
            reason,
        })?,
        None => DataFormat::default(),
    };

    let bounds = match adapter.get_string("merge", "bounds") {
        Some(raw) => raw.parse::<Bounds>().map_err(|reason| EodError::ConfigInvalid {
            section: "merge".into(),
            key: "bounds".into(),
            reason,
        })?,
        None => Bounds::default(),
    };

    let timeout_secs = adapter.get_int("fetch", "timeout_secs", DEFAULT_TIMEOUT_SECS);
    let fetch_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs as u64));

    let rolling_period = adapter
        .get_int("risk", "rolling_period", DEFAULT_ROLLING_PERIOD)
        .max(1) as usize;

    Ok(EngineConfig {
        data_format,
        data_path: PathBuf::from(data_path),
        issuers_path: adapter.get_string("issuers", "path").map(PathBuf::from),
        fetch_timeout,
        bounds,
        rolling_period,
    })
}

pub fn price_port(config: &EngineConfig) -> Arc<dyn PricePort> {
    match config.data_format {
        DataFormat::Csv => Arc::new(CsvPriceAdapter::new(config.data_path.clone())),
        DataFormat::Json => Arc::new(JsonPriceAdapter::new(config.data_path.clone())),
    }
}

pub fn load_set(request: &Request) -> Result<TableSet, EodError> {
    // Stage 3: Fetch every security
    let port = price_port(&request.config);
    let runtime = tokio::runtime::Runtime::new()?;
    let set = runtime.block_on(require_prices(
        port,
        &request.tickers,
        request.config.fetch_timeout,
    ))?;
    eprintln!(
        "Fetched {} securities ({} entries)",
        set.len(),
        set.iter().map(Table::len).sum::<usize>()
    );
    Ok(set)
}

fn aligned(request: &Request, monthly: bool) -> Result<Table, EodError> {
    let set = load_set(request)?;
    let merged = set.merge_on_date(Frequency::Daily, request.config.bounds);
    if merged.is_empty() {
        return Err(EodError::NoOverlap);
    }
    if monthly { merged.to_monthly() } else { Ok(merged) }
}

pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parses a comma-separated weight list. Every item must be a number; an
/// empty item is an error rather than being skipped.
pub fn parse_weights(input: &str) -> Result<Vec<f64>, EodError> {
    input
        .split(',')
        .map(str::trim)
        .map(|w| {
            w.parse::<f64>().map_err(|_| EodError::ConfigInvalid {
                section: "request".into(),
                key: "weights".into(),
                reason: format!("invalid weight {w:?}"),
            })
        })
        .collect()
}

fn output_error(e: impl std::fmt::Display) -> EodError {
    EodError::Output {
        reason: e.to_string(),
    }
}

pub fn write_series(out: &mut dyn Write, labels: &[String], series: &Series) -> Result<(), EodError> {
    let mut wtr = csv::Writer::from_writer(out);
    let header = std::iter::once("date".to_string()).chain(labels.iter().cloned());
    wtr.write_record(header).map_err(output_error)?;
    for (date, values) in series {
        let record = std::iter::once(date.to_string()).chain(values.iter().map(|v| v.to_string()));
        wtr.write_record(record).map_err(output_error)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_info(out: &mut dyn Write, labels: &[String], set: &TableSet) -> Result<(), EodError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["security", "entries", "first_date", "last_date"])
        .map_err(output_error)?;
    for (label, table) in labels.iter().zip(set) {
        let first = table.first_date().map(|d| d.to_string()).unwrap_or_default();
        let last = table.last_date().map(|d| d.to_string()).unwrap_or_default();
        wtr.write_record([label.clone(), table.len().to_string(), first, last])
            .map_err(output_error)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_coverage(out: &mut dyn Write, set: &TableSet, bounds: Bounds) -> Result<(), EodError> {
    let (first, last) = set.overlap_bounds().ok_or(EodError::NoOverlap)?;
    let overlapping = set.overlapping_dates().map_or(0, |dates| dates.len());
    let merged = set.merge_on_date(Frequency::Daily, bounds);

    let mut wtr = csv::Writer::from_writer(out);
    let rows = [
        ("members", set.len().to_string()),
        ("first_bound", first.to_string()),
        ("last_bound", last.to_string()),
        ("overlapping_dates", overlapping.to_string()),
        ("calendar_dates", set.calendar().len().to_string()),
        ("merged_dates", merged.len().to_string()),
    ];
    wtr.write_record(["metric", "value"]).map_err(output_error)?;
    for (metric, value) in rows {
        wtr.write_record([metric.to_string(), value])
            .map_err(output_error)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_rolling(out: &mut dyn Write, table: &Table, period: usize) -> Result<(), EodError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["window", "start", "end", "entries"])
        .map_err(output_error)?;
    for (i, window) in table.rolling(period)?.enumerate() {
        let start = window.first_date().map(|d| d.to_string()).unwrap_or_default();
        let end = window.last_date().map(|d| d.to_string()).unwrap_or_default();
        wtr.write_record([i.to_string(), start, end, window.len().to_string()])
            .map_err(output_error)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_json<T: serde::Serialize>(out: &mut dyn Write, value: &T) -> Result<(), EodError> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(output_error)?;
    writeln!(out)?;
    Ok(())
}
