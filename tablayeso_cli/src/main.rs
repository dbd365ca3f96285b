//! # Tablayeso CLI
//!
//! Command-line front end for the estimation engine.
//!
//! ```text
//! tablayeso calculate estimate.json            # text report
//! tablayeso calculate estimate.json --json     # full result as JSON
//! tablayeso calculate estimate.json --csv bill.csv
//! tablayeso import segments.csv --kind wall    # CSV rows -> segments JSON
//! tablayeso template > estimate.json           # starter estimate file
//! ```
//!
//! Logs go to stderr. Set `RUST_LOG` or pass `-v` for more detail.

use std::fmt::{self, Write as _};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use tablayeso_core::engine::CalculationResult;
use tablayeso_core::estimate::Estimate;
use tablayeso_core::export::export_bill_csv;
use tablayeso_core::import::import_segments_from_path;
use tablayeso_core::items::{CeilingInput, ItemKind, TrimInput, TrimOrientation, WallInput};
use tablayeso_core::panels::PanelType;

#[derive(Parser, Debug)]
#[command(name = "tablayeso")]
#[command(about = "Tablayeso - drywall materials estimator")]
#[command(version)]
struct Args {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate the bill of materials for an estimate file
    Calculate {
        /// Path to the estimate JSON file
        file: PathBuf,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Override the work area label from the file
        #[arg(long, value_name = "TEXT")]
        work_area: Option<String>,

        /// Also write the bill of materials to a CSV file
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,
    },

    /// Read segment dimensions from a CSV file
    Import {
        /// Path to the CSV file
        file: PathBuf,

        /// Item kind the rows belong to (wall, ceiling, trim)
        #[arg(long, value_parser = parse_kind)]
        kind: ItemKind,
    },

    /// Print a sample estimate file
    Template,
}

fn parse_kind(s: &str) -> std::result::Result<ItemKind, String> {
    ItemKind::from_str_flexible(s).map_err(|e| e.to_string())
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Calculate {
            file,
            json,
            work_area,
            csv,
        } => {
            let mut estimate = Estimate::from_path(&file)
                .wrap_err_with(|| format!("failed to load estimate from {}", file.display()))?;
            if let Some(work_area) = work_area {
                estimate.meta.work_area = work_area;
            }
            tracing::debug!(file = %file.display(), items = estimate.item_count(), "estimate loaded");

            let result = estimate.calculate();
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render_report(&result)?);
            }

            if let Some(csv_path) = &csv {
                export_bill_csv(&result.bill, csv_path)
                    .wrap_err_with(|| format!("failed to export {}", csv_path.display()))?;
                eprintln!("Exported to CSV: {}", csv_path.display());
            }

            if result.items.is_empty() && result.has_errors() {
                bail!("no item could be calculated");
            }
        }
        Command::Import { file, kind } => {
            let report = import_segments_from_path(&file, kind)
                .wrap_err_with(|| format!("failed to import {}", file.display()))?;
            for message in &report.skipped {
                eprintln!("skipped: {message}");
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Template => {
            println!("{}", serde_json::to_string_pretty(&template_estimate())?);
        }
    }

    Ok(())
}

/// Plain-text report: header, per-item details, bill table, then any item errors.
fn render_report(result: &CalculationResult) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "═══════════════════════════════════════════════════")?;
    writeln!(out, "  MATERIALS ESTIMATE")?;
    writeln!(out, "═══════════════════════════════════════════════════")?;
    if !result.work_area.is_empty() {
        writeln!(out, "Work area: {}", result.work_area)?;
    }
    writeln!(out, "Date:      {}", result.calculated_at.format("%Y-%m-%d %H:%M UTC"))?;
    writeln!(out)?;

    for item in &result.items {
        writeln!(out, "{}", item.label())?;
        for (name, value) in item.details() {
            writeln!(out, "  {:<20} {}", format!("{name}:"), value)?;
        }
        writeln!(out)?;
    }

    if result.bill.is_empty() {
        writeln!(out, "No materials.")?;
    } else {
        writeln!(out, "{:<40} {:>8}  {}", "Material", "Quantity", "Unit")?;
        writeln!(out, "{}", "─".repeat(60))?;
        for line in result.bill.lines() {
            writeln!(out, "{:<40} {:>8}  {}", line.name, line.quantity, line.unit.label())?;
        }
    }

    if result.has_errors() {
        writeln!(out)?;
        if result.is_partial() {
            writeln!(
                out,
                "Partial result: {} item(s) calculated, {} rejected",
                result.items.len(),
                result.errors.len()
            )?;
        }
        writeln!(out, "Errors:")?;
        for error in &result.errors {
            writeln!(out, "  - {error}")?;
        }
    }
    Ok(out)
}

fn template_estimate() -> Estimate {
    let mut estimate = Estimate::new("Level 2 offices");
    estimate.add_item(
        WallInput::new(0, 2, PanelType::Normal, 0.40)
            .with_face2(PanelType::MoistureResistant)
            .with_segment(3.0, 2.4)
            .with_segment(1.5, 2.4),
    );
    estimate.add_item(
        CeilingInput::new(0, PanelType::Normal)
            .with_segment(4.0, 5.0)
            .with_plenum(0.5),
    );
    estimate.add_item(
        TrimInput::new(0, TrimOrientation::Horizontal, PanelType::Normal, 2)
            .with_segment(6.0, 0.3, 0.4),
    );
    estimate
}
