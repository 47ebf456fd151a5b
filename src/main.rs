use analytics::{ExposureColumns, IndexFilter, SeriesColumns};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::Table as ConsoleTable;
use configuration::Settings;
use core_types::NaStrategy;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// The main entry point for the fund analytics application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let mut settings = configuration::load_config(&cli.config)?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => {
            if let Some(host) = args.host {
                settings.server.host = host;
            }
            if let Some(port) = args.port {
                settings.server.port = port;
            }
            web_server::run_server(settings).await?;
        }
        Commands::Returns(args) => handle_returns(args, &settings)?,
        Commands::Windows(args) => handle_windows(args, &settings)?,
        Commands::Exposure(args) => handle_exposure(args, &settings)?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Returns, alpha and exposure analytics over a fund's returns workbook.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML settings file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Cumulative fund and benchmark returns over an inclusive date range.
    Returns(ReturnsArgs),
    /// Cumulative returns over trailing windows ending at a date.
    Windows(WindowsArgs),
    /// Change in summed weights per group between two dates.
    Exposure(ExposureArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.host`.
    #[arg(long)]
    host: Option<String>,

    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct ReturnsArgs {
    /// First date of the range (format: YYYY-MM-DD).
    #[arg(long)]
    start: NaiveDate,

    /// Last date of the range, inclusive (format: YYYY-MM-DD).
    #[arg(long)]
    end: NaiveDate,
}

#[derive(Parser)]
struct WindowsArgs {
    /// Last date of every window (format: YYYY-MM-DD).
    #[arg(long)]
    as_of: NaiveDate,

    /// Window lengths in days, e.g. 30,90,180. Defaults to `returns.default_windows`.
    #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u32).range(1..))]
    windows: Vec<u32>,

    /// keep, zero or drop. Defaults to `data.default_na_strategy`.
    #[arg(long)]
    na_strategy: Option<NaStrategy>,
}

#[derive(Parser)]
struct ExposureArgs {
    /// Date of the first snapshot (format: YYYY-MM-DD).
    #[arg(long)]
    start: NaiveDate,

    /// Date of the second snapshot (format: YYYY-MM-DD).
    #[arg(long)]
    end: NaiveDate,

    /// Column to group constituents by. Defaults to `constituents.region_col`.
    #[arg(long)]
    group_by: Option<String>,

    /// Only count constituents of this index.
    #[arg(long)]
    index: Option<String>,

    /// keep, zero or drop. Defaults to `data.default_na_strategy`.
    #[arg(long)]
    na_strategy: Option<NaStrategy>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_returns(args: ReturnsArgs, settings: &Settings) -> anyhow::Result<()> {
    let dataset = workbook::load_dataset(settings)?;
    let columns = &settings.returns;
    let result = analytics::compute_range(
        &dataset.returns,
        SeriesColumns {
            date: &columns.date_col,
            fund: &columns.fund_col,
            benchmark: &columns.benchmark_col,
        },
        args.start,
        args.end,
    )?;

    let mut table = ConsoleTable::new();
    table.set_header(vec!["From", "To", "Fund", "Benchmark", "Alpha"]);
    table.add_row(vec![
        args.start.to_string(),
        args.end.to_string(),
        pct(Some(result.fund_geom)),
        pct(Some(result.benchmark_geom)),
        pct(Some(result.alpha)),
    ]);
    println!("{table}");
    Ok(())
}

fn handle_windows(args: WindowsArgs, settings: &Settings) -> anyhow::Result<()> {
    let dataset = workbook::load_dataset(settings)?;
    let columns = &settings.returns;
    let windows = if args.windows.is_empty() {
        columns.default_windows.clone()
    } else {
        args.windows
    };
    let strategy = args.na_strategy.unwrap_or(settings.data.default_na_strategy);

    let results = analytics::compute_windows(
        &dataset.returns,
        SeriesColumns {
            date: &columns.date_col,
            fund: &columns.fund_col,
            benchmark: &columns.benchmark_col,
        },
        args.as_of,
        &windows,
        strategy,
    )?;

    let mut table = ConsoleTable::new();
    table.set_header(vec!["Window (days)", "As of", "Fund", "Benchmark", "Alpha"]);
    for row in results {
        table.add_row(vec![
            row.window_days.to_string(),
            row.as_of.to_string(),
            pct(row.fund_cum_return),
            pct(row.bench_cum_return),
            pct(row.alpha),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn handle_exposure(args: ExposureArgs, settings: &Settings) -> anyhow::Result<()> {
    let dataset = workbook::load_dataset(settings)?;
    let columns = &settings.constituents;
    let group_by = args.group_by.unwrap_or_else(|| columns.region_col.clone());
    let strategy = args.na_strategy.unwrap_or(settings.data.default_na_strategy);
    let index = args.index.as_deref().map(|value| IndexFilter {
        column: &columns.index_col,
        value,
    });

    let results = analytics::difference(
        &dataset.constituents,
        ExposureColumns {
            date: &columns.date_col,
            weight: &columns.weight_col,
            group: &group_by,
        },
        args.start,
        args.end,
        index,
        strategy,
    )?;

    let mut table = ConsoleTable::new();
    table.set_header(vec![
        group_by.clone(),
        args.start.to_string(),
        args.end.to_string(),
        "Difference".to_string(),
    ]);
    for row in results {
        table.add_row(vec![
            row.group,
            pct(row.sum_weight_start),
            pct(row.sum_weight_end),
            pct(row.difference),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Formats a fraction as a percentage with two decimals, or "n/a".
fn pct(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{:.2}%", (v * Decimal::ONE_HUNDRED).round_dp(2)),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_flag_splits_on_commas() {
        let cli = Cli::try_parse_from([
            "fund-analytics",
            "windows",
            "--as-of",
            "2025-06-30",
            "--windows",
            "30,90",
        ])
        .unwrap();

        match cli.command {
            Commands::Windows(args) => assert_eq!(args.windows, vec![30, 90]),
            _ => panic!("expected the windows command"),
        }
    }

    #[test]
    fn windows_flag_rejects_zero_days() {
        let result = Cli::try_parse_from([
            "fund-analytics",
            "windows",
            "--as-of",
            "2025-06-30",
            "--windows",
            "30,0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn percentages_round_to_two_decimals() {
        assert_eq!(pct(Some(Decimal::new(19494, 6))), "1.95%");
        assert_eq!(pct(None), "n/a");
    }
}
