//! CLI definition and dispatch.
//!
//! Every data command follows the same pipeline: load and validate the
//! optional config, resolve the data path, fetch the dataset through the
//! cache, build the filter criteria, then render a plain-text table.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_export_adapter::CsvExportAdapter;
use crate::adapters::dataset_cache::DatasetCache;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::aggregate::HistogramBin;
use crate::domain::config_validation::validate_config;
use crate::domain::dataset::Dataset;
use crate::domain::district;
use crate::domain::error::LakaspiacError;
use crate::domain::filter::{filter, FilterCriteria, FilteredView};
use crate::domain::record::{Column, Metric, PropertyType};
use crate::domain::selection::{parse_districts, parse_years};
use crate::ports::config_port::ConfigPort;
use crate::ports::export_port::{ExportPort, DEFAULT_SUMMARY_FILE};

pub const DEFAULT_DATA_FILE: &str = "budapest_lakaspiac_osszefuzve.csv";
pub const DEFAULT_ROWS_FILE: &str = "budapest_lakaspiac_filtered.csv";
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Parser, Debug)]
#[command(name = "lakaspiac", about = "Budapest housing market data explorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command that reads the dataset.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// INI configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Source CSV, overrides [data] path
    #[arg(short, long)]
    pub data: Option<PathBuf>,
    /// Comma-separated years (empty string selects nothing)
    #[arg(long)]
    pub years: Option<String>,
    /// Comma-separated district codes, numeric or Roman
    #[arg(long)]
    pub districts: Option<String>,
    /// detached | multi_unit | panel | all
    #[arg(short = 't', long)]
    pub property_type: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show what the dataset contains
    Info {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Headline metrics for the selection
    Summary {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Per-district table, cheapest first
    Districts {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Yearly price series for the selected districts
    Trend {
        #[command(flatten)]
        data: DataArgs,
        /// One line per (year, district) instead of one per year
        #[arg(long)]
        per_district: bool,
    },
    /// Mean price per building type
    Types {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Highest (or lowest) ranked rows
    Top {
        #[command(flatten)]
        data: DataArgs,
        #[arg(short, long)]
        n: Option<usize>,
        /// price | count | volatility
        #[arg(long, default_value = "price")]
        by: String,
        #[arg(long)]
        ascending: bool,
    },
    /// Histogram of relative standard deviation
    Volatility {
        #[command(flatten)]
        data: DataArgs,
        #[arg(long)]
        bins: Option<usize>,
    },
    /// Write the selection to CSV
    Export {
        #[command(flatten)]
        data: DataArgs,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Export matching rows instead of the district/year summary
        #[arg(long)]
        rows: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Loaded inputs for one command.
pub struct Session {
    pub config: Option<FileConfigAdapter>,
    pub data_path: PathBuf,
    pub dataset: Arc<Dataset>,
    pub criteria: FilterCriteria,
}

impl Session {
    pub fn config_port(&self) -> Option<&dyn ConfigPort> {
        self.config.as_ref().map(|c| c as &dyn ConfigPort)
    }

    pub fn view(&self) -> FilteredView<'_> {
        filter(&self.dataset, &self.criteria)
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let cache = DatasetCache::new(Box::new(CsvAdapter::new()));

    match cli.command {
        Command::Info { data } => with_session(&data, &cache, |s| {
            Ok(render_info(&s.dataset, &s.data_path, cache.snapshot_time(&s.data_path)))
        }),
        Command::Summary { data } => {
            with_session(&data, &cache, |s| Ok(render_summary(&s.view())))
        }
        Command::Districts { data } => {
            with_session(&data, &cache, |s| Ok(render_districts(&s.view())))
        }
        Command::Trend { data, per_district } => {
            with_session(&data, &cache, |s| Ok(render_trend(&s.view(), per_district)))
        }
        Command::Types { data } => with_session(&data, &cache, |s| Ok(render_types(&s.view()))),
        Command::Top {
            data,
            n,
            by,
            ascending,
        } => with_session(&data, &cache, |s| {
            let metric: Metric = by.parse()?;
            let n = n.unwrap_or_else(|| setting(s.config_port(), "top_n", DEFAULT_TOP_N));
            Ok(render_top(&s.view(), n, metric, !ascending))
        }),
        Command::Volatility { data, bins } => with_session(&data, &cache, |s| {
            let bins = bins.unwrap_or_else(|| {
                setting(s.config_port(), "histogram_bins", DEFAULT_HISTOGRAM_BINS)
            });
            Ok(render_histogram(s.view().volatility_histogram(bins).as_deref()))
        }),
        Command::Export { data, output, rows } => with_session(&data, &cache, |s| {
            let rows = rows || export_rows_by_default(s.config_port());
            let output = resolve_output_path(output.as_deref(), s.config_port(), rows);
            run_export(&s.view(), &output, rows)
        }),
        Command::Validate { config } => run_validate(&config),
    }
}

fn with_session<F>(args: &DataArgs, cache: &DatasetCache, render: F) -> ExitCode
where
    F: FnOnce(&Session) -> Result<String, LakaspiacError>,
{
    let result = open_session(args, cache).and_then(|s| render(&s));
    match result {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, LakaspiacError> {
    let config = FileConfigAdapter::from_file(path)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn open_session(args: &DataArgs, cache: &DatasetCache) -> Result<Session, LakaspiacError> {
    let config = args.config.as_deref().map(load_config).transpose()?;
    let port = config.as_ref().map(|c| c as &dyn ConfigPort);

    let data_path = resolve_data_path(args.data.as_deref(), port)?;
    log::debug!("using data file {}", data_path.display());
    let dataset = cache.get(&data_path)?;
    let criteria = build_criteria(&dataset, args, port)?;

    Ok(Session {
        config,
        data_path,
        dataset,
        criteria,
    })
}

/// `--data`, then `[data] path`. Without a config file the default file
/// name is used; a config file must name its data.
pub fn resolve_data_path(
    flag: Option<&Path>,
    config: Option<&dyn ConfigPort>,
) -> Result<PathBuf, LakaspiacError> {
    if let Some(p) = flag {
        return Ok(p.to_path_buf());
    }
    let Some(config) = config else {
        return Ok(PathBuf::from(DEFAULT_DATA_FILE));
    };
    config
        .get_string("data", "path")
        .map(|s| PathBuf::from(s.trim()))
        .ok_or_else(|| LakaspiacError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        })
}

pub fn resolve_output_path(
    flag: Option<&Path>,
    config: Option<&dyn ConfigPort>,
    rows: bool,
) -> PathBuf {
    if let Some(p) = flag {
        return p.to_path_buf();
    }
    let (key, default) = if rows {
        ("rows_output", DEFAULT_ROWS_FILE)
    } else {
        ("summary_output", DEFAULT_SUMMARY_FILE)
    };
    config
        .and_then(|c| c.get_string("report", key))
        .map(|s| PathBuf::from(s.trim()))
        .unwrap_or_else(|| PathBuf::from(default))
}

/// `[report] rows = yes` makes `export` write rows without `--rows`.
pub fn export_rows_by_default(config: Option<&dyn ConfigPort>) -> bool {
    config.is_some_and(|c| c.get_bool("report", "rows", false))
}

fn setting(config: Option<&dyn ConfigPort>, key: &str, default: usize) -> usize {
    config.map_or(default, |c| c.get_usize("report", key, default))
}

/// Flags win over `[filter]` config; with neither, everything in the
/// dataset is selected and the active category is all housing.
pub fn build_criteria(
    dataset: &Dataset,
    args: &DataArgs,
    config: Option<&dyn ConfigPort>,
) -> Result<FilterCriteria, LakaspiacError> {
    let lookup = |flag: &Option<String>, key: &str| -> Option<String> {
        flag.clone()
            .or_else(|| config.and_then(|c| c.get_string("filter", key)))
    };

    let years = match lookup(&args.years, "years") {
        Some(s) => parse_years(&s)?,
        None => dataset.years().into_iter().collect(),
    };
    let districts = match lookup(&args.districts, "districts") {
        Some(s) => parse_districts(&s)?,
        None => dataset.districts().into_iter().collect(),
    };
    let property_type = match lookup(&args.property_type, "property_type") {
        Some(s) => s.parse::<PropertyType>()?,
        None => PropertyType::default(),
    };

    Ok(FilterCriteria {
        years,
        districts,
        property_type,
    })
}

fn run_export(view: &FilteredView<'_>, output: &Path, rows: bool) -> Result<String, LakaspiacError> {
    let exporter = CsvExportAdapter::new();
    if rows {
        exporter.write_rows(view, output)?;
        Ok(format!("{} rows written to {}", view.len(), output.display()))
    } else {
        exporter.write_summary(view, output)?;
        Ok(format!("Summary written to {}", output.display()))
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    match load_config(config_path) {
        Ok(_) => {
            eprintln!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn fmt_price(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.0} eFt/m²"))
}

pub fn fmt_count(value: Option<u64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

pub fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.1}%"))
}

fn fmt_list<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_info(dataset: &Dataset, path: &Path, modified: Option<DateTime<Utc>>) -> String {
    let mut lines = vec![format!("File:       {}", path.display())];
    if let Some(ts) = modified {
        lines.push(format!("Modified:   {}", ts.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    lines.push(format!("Rows:       {}", dataset.len()));
    lines.push(format!("Years:      {}", fmt_list(&dataset.years())));
    lines.push(format!("Districts:  {}", fmt_list(&dataset.districts())));
    lines.push("Columns:".to_string());
    for column in Column::canonical() {
        let mark = if dataset.has_column(column) { "x" } else { " " };
        lines.push(format!("  [{mark}] {}", column.header()));
    }
    for extra in dataset.text_columns() {
        lines.push(format!("  [x] {extra} (text)"));
    }
    lines.join("\n")
}

pub fn render_summary(view: &FilteredView<'_>) -> String {
    let criteria = view.criteria();
    [
        format!("Category:            {}", criteria.property_type.label()),
        format!("Average price:       {}", fmt_price(view.mean_price())),
        format!("Total transactions:  {}", fmt_count(view.total_count())),
        format!("Average volatility:  {}", fmt_pct(view.mean_volatility())),
        format!("Districts selected:  {}", criteria.districts.len()),
        format!("Rows matched:        {}", view.len()),
    ]
    .join("\n")
}

pub fn render_districts(view: &FilteredView<'_>) -> String {
    let sorted = view.districts_sorted_by_price();
    if sorted.is_empty() {
        return "No data for the selected filters.".to_string();
    }
    let mut lines = vec![format!(
        "{:<16} {:>14} {:>12} {:>10} {:>9} {:>9}",
        "District", "Mean price", "Transactions", "Volatility", "Lat", "Lon"
    )];
    for s in sorted {
        let label = district::label(s.district).unwrap_or_else(|| s.district.to_string());
        let (lat, lon) = district::centroid(s.district);
        lines.push(format!(
            "{:<16} {:>14} {:>12} {:>10} {:>9.4} {:>9.4}",
            label,
            fmt_price(s.mean_price),
            fmt_count(s.total_count),
            fmt_pct(s.mean_volatility),
            lat,
            lon
        ));
    }
    lines.join("\n")
}

pub fn render_trend(view: &FilteredView<'_>, per_district: bool) -> String {
    let lines: Vec<String> = if per_district {
        view.by_year_and_district()
            .iter()
            .map(|p| {
                format!(
                    "{}  {:>3}  {}",
                    p.year,
                    p.district,
                    fmt_price(Some(p.mean_price))
                )
            })
            .collect()
    } else {
        view.by_year()
            .iter()
            .map(|p| format!("{}  {}", p.year, fmt_price(Some(p.mean_price))))
            .collect()
    };
    if lines.is_empty() {
        "No time series data.".to_string()
    } else {
        lines.join("\n")
    }
}

pub fn render_types(view: &FilteredView<'_>) -> String {
    let by_type = view.mean_price_by_type();
    if by_type.is_empty() {
        return "No property type data.".to_string();
    }
    by_type
        .iter()
        .map(|(t, price)| format!("{:<24} {}", t.label(), fmt_price(Some(*price))))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_top(view: &FilteredView<'_>, n: usize, metric: Metric, descending: bool) -> String {
    let ranked = view.top_n(n, metric, descending);
    if ranked.is_empty() {
        return "No rows to rank.".to_string();
    }
    ranked
        .iter()
        .enumerate()
        .map(|(rank, row)| {
            let year = row.record.year.map_or_else(String::new, |y| y.to_string());
            let district = row
                .record
                .district
                .and_then(district::label)
                .unwrap_or_default();
            let location = row.record.location.as_deref().unwrap_or("");
            let value = match metric {
                Metric::Price => fmt_price(Some(row.value)),
                Metric::Count => format!("{:.0}", row.value),
                Metric::Volatility => fmt_pct(Some(row.value)),
            };
            format!(
                "{:>3}. {} {:<14} {:<20} {}",
                rank + 1,
                year,
                district,
                location,
                value
            )
            .trim_end()
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_histogram(bins: Option<&[HistogramBin]>) -> String {
    let Some(bins) = bins else {
        return "No volatility data.".to_string();
    };
    bins.iter()
        .map(|b| {
            format!(
                "{:>7.2}% – {:>7.2}%  {:>4}  {}",
                b.lower,
                b.upper,
                b.count,
                "#".repeat(b.count)
            )
            .trim_end()
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
