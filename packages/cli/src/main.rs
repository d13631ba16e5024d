#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the youth engagement analysis toolkit.
//!
//! Loads a CSV dataset, runs one insight (chosen by subcommand, or from an
//! interactive menu when none is given), prints a text report and hands
//! the chart to a JSON chart sink.

mod config;

use std::{fs::File, io::BufWriter, path::PathBuf};

use clap::{Parser, Subcommand};
use config::Config;
use dialoguer::Select;
use engagement_analytics::insights;
use engagement_analytics_models::{InsightKind, InsightOutput};
use engagement_chart::{ChartSink, JsonChartSink, NullChartSink, chart_for};
use engagement_chart_models::ChartBackend;

#[derive(Parser)]
#[command(
    name = "engagement_cli",
    about = "Exploratory analysis of youth engagement records"
)]
struct Cli {
    /// CSV dataset to analyze (overrides `[dataset] path` in the config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Chart backend (`primary` or `alternate`)
    #[arg(long, global = true)]
    backend: Option<ChartBackend>,
    /// Write chart requests to this file instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,
    /// Skip chart output entirely
    #[arg(long, global = true)]
    no_charts: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Descriptive statistics of the numeric columns
    Describe,
    /// Number of records per age group
    AgeGroupFrequency,
    /// Total citywide count per engagement category
    CitywideByCategory,
    /// Total citywide count per report date
    CitywideOverTime,
    /// One-way ANOVA of citywide count across engagement categories
    CategoryDifference,
    /// Age-group totals within `EMPLOYMENT-BUDGETED`
    EmploymentAgeDistribution,
    /// Citywide count over time, one series per age group
    EngagementByAgeOverTime,
    /// List available insights
    Insights,
}

impl Commands {
    const fn insight(&self) -> Option<InsightKind> {
        Some(match self {
            Self::Describe => InsightKind::Describe,
            Self::AgeGroupFrequency => InsightKind::AgeGroupFrequency,
            Self::CitywideByCategory => InsightKind::CitywideByCategory,
            Self::CitywideOverTime => InsightKind::CitywideOverTime,
            Self::CategoryDifference => InsightKind::CategoryDifference,
            Self::EmploymentAgeDistribution => InsightKind::EmploymentAgeDistribution,
            Self::EngagementByAgeOverTime => InsightKind::EngagementByAgeOverTime,
            Self::Insights => return None,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let kind = match &cli.command {
        Some(Commands::Insights) => {
            for kind in InsightKind::all() {
                println!("{:<30} {}", kind.as_ref(), kind.label());
            }
            return Ok(());
        }
        Some(command) => command.insight(),
        None => None,
    };
    let kind = kind.map_or_else(select_insight, Ok)?;

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(backend) = cli.backend {
        config.chart.backend = backend;
    }

    let (path, options) = config.dataset(cli.data)?;
    let table = engagement_ingest::load_csv(&path, &options)?;
    let output = insights::run(kind, &table)?;

    print_report(kind, &output);

    let mut sink: Box<dyn ChartSink> = if cli.no_charts {
        Box::new(NullChartSink)
    } else if let Some(path) = &cli.output {
        Box::new(JsonChartSink::new(BufWriter::new(File::create(path)?)))
    } else {
        Box::new(JsonChartSink::new(std::io::stdout().lock()))
    };

    if let Some(request) = chart_for(kind, &output, &config.chart) {
        log::debug!("Rendering {} chart for {kind}", request.kind);
        sink.render(&request)?;
    }

    Ok(())
}

fn select_insight() -> Result<InsightKind, dialoguer::Error> {
    println!("Youth Engagement Analysis");
    println!();

    let labels: Vec<&str> = InsightKind::all().iter().map(|k| k.label()).collect();

    let idx = Select::new()
        .with_prompt("Which insight would you like to run?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(InsightKind::all()[idx])
}

fn print_report(kind: InsightKind, output: &InsightOutput) {
    println!("{}", kind.label());
    println!("{}", "-".repeat(50));

    match output {
        InsightOutput::Summary(report) => {
            println!("{} rows", report.rows);
            println!(
                "{:<20} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
                "COLUMN", "COUNT", "MEAN", "STD", "MIN", "25%", "50%", "75%", "MAX"
            );
            for c in &report.columns {
                let std = c.std.map_or_else(|| "NaN".to_string(), |s| format!("{s:.3}"));
                println!(
                    "{:<20} {:>8} {:>10.3} {:>10} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
                    c.column, c.count, c.mean, std, c.min, c.p25, c.p50, c.p75, c.max
                );
            }
        }
        InsightOutput::Counts(counts) => {
            for (key, count) in counts.ranked() {
                println!("{key:<30} {count}");
            }
        }
        InsightOutput::Totals(totals) => {
            for (key, total) in totals.iter() {
                println!("{key:<30} {total}");
            }
        }
        InsightOutput::Trend(series) => {
            for point in series.points() {
                println!("{}  {}", point.date, point.value);
            }
        }
        InsightOutput::Trends(by_group) => {
            for (key, series) in by_group {
                println!("{key}:");
                for point in series.points() {
                    println!("  {}  {}", point.date, point.value);
                }
            }
        }
        InsightOutput::Difference(difference) => {
            let inference = &difference.inference;
            println!(
                "F({}, {}) = {}",
                inference.df_between, inference.df_within, inference.statistic
            );
            println!("p-value = {}", inference.p_value);
            println!("{}", inference.verdict());
        }
    }
    println!();
}
