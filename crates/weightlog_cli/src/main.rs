//! Command-line front end for the measurement store.
//!
//! # Responsibility
//! - Resolve configuration (flag > config file > default) and start logging.
//! - Map each subcommand onto one store operation and print the result.
//!
//! # Invariants
//! - The store is loaded once per invocation and saved by the store itself.
//! - Errors are printed to stderr and yield a non-zero exit code.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use weightlog_core::config::check_threshold;
use weightlog_core::{
    core_version, init_logging, load_config, parse_measurement_date, AppConfig, DistanceMetric,
    JsonFileRepository, MeasurementStore, NearestConfig, NearestQuery, NormalizeReport,
};

#[derive(Parser, Debug)]
#[command(name = "weightlog", version, about = "Track dated weight measurements")]
struct Cli {
    /// TOML config file.
    #[arg(short, long, env = "WEIGHTLOG_CONFIG")]
    config: Option<PathBuf>,

    /// JSON state file (overrides `store.data_file`).
    #[arg(short, long, env = "WEIGHTLOG_DATA")]
    data: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logs go to stderr otherwise.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a weight; the date defaults to today.
    Add {
        weight: String,
        /// day/month/year or YYYY-MM-DD
        #[arg(short, long, default_value = "")]
        date: String,
    },
    /// Print measurements in insertion order.
    List,
    /// Print plottable measurements sorted by date.
    Chart,
    /// Print count, average, min and max.
    Stats,
    /// Rewrite dates as YYYY-MM-DD and drop unparseable ones.
    Normalize,
    /// Find the measurement closest to a point.
    Nearest {
        #[arg(long)]
        date: String,
        #[arg(long)]
        weight: f64,
        #[arg(long)]
        metric: Option<DistanceMetric>,
        /// Largest squared distance counted as a hit.
        #[arg(long)]
        max_distance: Option<f64>,
    },
    /// Replace the measurement at an index.
    Edit {
        index: usize,
        weight: String,
        /// Keeps the current date when omitted.
        #[arg(short, long, default_value = "")]
        date: String,
    },
    /// Write all measurements to a CSV file.
    Export { path: PathBuf },
    /// Append measurements from a CSV file, then normalize.
    Import { path: PathBuf },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(data) = cli.data {
        config.store.data_file = data;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = Some(level);
    }
    if let Some(dir) = cli.log_dir {
        config.logging.dir = Some(dir);
    }

    init_logging(
        config.logging.effective_level(),
        config.logging.dir.as_deref(),
    )?;
    info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );

    let repo = JsonFileRepository::new(&config.store.data_file);
    let mut store = MeasurementStore::load(repo)
        .with_context(|| format!("loading `{}`", config.store.data_file.display()))?
        .with_nearest_config(config.nearest.to_nearest_config());

    match cli.command {
        Command::Add { weight, date } => {
            let index = store.add(&date, &weight)?;
            let added = &store.measurements()[index];
            println!("added #{index}: {} {} kg", added.date, added.weight);
        }
        Command::List => {
            for (index, measurement) in store.measurements().iter().enumerate() {
                println!("{index}\t{}\t{}", measurement.date, measurement.weight);
            }
        }
        Command::Chart => {
            for point in store.chart_points() {
                println!("{}\t{}\t#{}", point.date, point.weight, point.index);
            }
        }
        Command::Stats => match store.summary() {
            Some(summary) => {
                println!("count: {}", summary.count);
                println!("average: {:.2} kg", summary.average);
                println!("min: {:.2} kg", summary.min);
                println!("max: {:.2} kg", summary.max);
            }
            None => println!("no measurements"),
        },
        Command::Normalize => print_report(&store.normalize()?),
        Command::Nearest {
            date,
            weight,
            metric,
            max_distance,
        } => {
            let date = parse_measurement_date(&date)
                .ok_or_else(|| anyhow!("date `{date}` is not day/month/year or YYYY-MM-DD"))?;
            let mut nearest = match metric {
                Some(metric) => NearestConfig::for_metric(metric),
                None => store.nearest_config(),
            };
            if let Some(max_distance) = max_distance {
                nearest.max_distance_sq = check_threshold(max_distance)?;
            }
            store = store.with_nearest_config(nearest);

            match store.nearest_to(NearestQuery { date, weight }) {
                Some(index) => {
                    let hit = &store.measurements()[index];
                    println!("#{index}: {} {} kg", hit.date, hit.weight);
                }
                None => println!("no match within {}", nearest.max_distance_sq),
            }
        }
        Command::Edit {
            index,
            weight,
            date,
        } => {
            store.edit_at(index, &date, &weight)?;
            let edited = &store.measurements()[index];
            println!("updated #{index}: {} {} kg", edited.date, edited.weight);
        }
        Command::Export { path } => {
            store.export_csv(&path)?;
            println!("exported {} measurement(s) to {}", store.len(), path.display());
        }
        Command::Import { path } => {
            let report = store.import_csv(&path)?;
            print_report(&report);
        }
    }

    Ok(())
}

fn print_report(report: &NormalizeReport) {
    println!("kept {}, dropped {}", report.kept(), report.dropped.len());
    for dropped in &report.dropped {
        println!(
            "  dropped #{}: unrecognized date `{}`",
            dropped.index, dropped.measurement.date
        );
    }
}
