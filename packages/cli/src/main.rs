#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tools for the election map.
//!
//! ```text
//! election_map parse [FILE] [--bounds]
//! election_map classify <CODE>...
//! election_map render --db <PATH> [--district <CODE>] [--config <FILE>] [--scheme <ID>] --out <FILE>
//! election_map pick --db <PATH> --x <X> --y <Y> [--district <CODE>] [--config <FILE>] [--scheme <ID>]
//! ```
//!
//! `parse` reads WKT from a file or stdin and prints the parsed polygons as
//! JSON. `render` draws the overview (or one district's municipalities) to
//! an SVG file. `pick` draws the same view in memory and reports what a
//! click at the given pixel would select, with the leading party totals of
//! the selected district or municipality.

mod config;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use config::MapConfig;
use election_map_geometry::{bounds, parse_wkt};
use election_map_navigator::{DrawReport, DrawStatus, NavState, Navigator};
use election_map_region::{classify, logical_code};
use election_map_render::{Scene, Selection};
use election_map_store::{DuckDbStore, PartyVotes};

#[derive(Parser)]
#[command(
    name = "election_map",
    about = "Parse boundary WKT and render the election map"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse WKT and print the polygons as JSON
    Parse {
        /// File containing WKT (reads stdin when omitted)
        file: Option<PathBuf>,
        /// Print the exterior bounding box instead of the polygons
        #[arg(long)]
        bounds: bool,
    },
    /// Show the region and logical code of district codes
    Classify {
        /// Raw district codes
        #[arg(required = true)]
        codes: Vec<u32>,
    },
    /// Render the map to an SVG file
    Render {
        #[command(flatten)]
        view: ViewArgs,
        /// Output SVG path
        #[arg(long)]
        out: PathBuf,
    },
    /// Report what a click at a pixel selects
    Pick {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
    },
}

#[derive(clap::Args)]
struct ViewArgs {
    /// Path to the elections `DuckDB` database
    #[arg(long)]
    db: PathBuf,
    /// Show this district's municipalities instead of the overview
    #[arg(long)]
    district: Option<u32>,
    /// TOML file with layout and color settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Embedded color scheme id (e.g. `default`, `grayscale`)
    #[arg(long)]
    scheme: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { file, bounds: only_bounds } => {
            let text = read_input(file.as_deref())?;
            let polygons = parse_wkt(&text)?;

            let json = if only_bounds {
                serde_json::to_string_pretty(&bounds(&polygons)?)?
            } else {
                serde_json::to_string_pretty(&polygons)?
            };
            println!("{json}");
        }
        Commands::Classify { codes } => {
            println!("{:<6} {:<12} LOGICAL", "CODE", "REGION");
            for code in codes {
                println!("{code:<6} {:<12} {}", classify(code), logical_code(code));
            }
        }
        Commands::Render { view, out } => {
            let config = MapConfig::load(view.config.as_deref(), view.scheme.as_deref())?;
            let (navigator, scene, report) = draw_view(&view, config)?;
            print_report(&navigator, &report);

            let layout = navigator.layout();
            let svg = scene.to_svg(layout.width, layout.height, &navigator.colors().background);
            std::fs::write(&out, svg)?;
            println!("Wrote {} shapes to {}", scene.len(), out.display());
        }
        Commands::Pick { view, x, y } => {
            let config = MapConfig::load(view.config.as_deref(), view.scheme.as_deref())?;
            let (mut navigator, mut scene, _) = draw_view(&view, config)?;

            let Some(selection) = scene.click(x, y) else {
                println!("Nothing selectable at ({x}, {y})");
                return Ok(());
            };

            match &selection {
                Selection::District { code, name } => println!("District {name} ({code})"),
                Selection::Municipality { code, name } => {
                    println!("Municipality {name} ({code})");
                }
            }

            if let Some(report) = navigator.handle_selection(selection, &mut scene)? {
                print_report(&navigator, &report);
            } else if let Some(focused) = navigator.focused_municipality() {
                print_results(&focused.results);
            }
        }
    }

    Ok(())
}

fn read_input(file: Option<&Path>) -> std::io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn draw_view(
    view: &ViewArgs,
    config: MapConfig,
) -> Result<(Navigator<DuckDbStore>, Scene, DrawReport), Box<dyn std::error::Error>> {
    let store = DuckDbStore::open(&view.db)?;
    let mut navigator = Navigator::new(store, config.layout, config.colors);
    let mut scene = Scene::new();

    let report = match view.district {
        Some(code) => navigator.select_district(code, &mut scene)?,
        None => navigator.show_overview(&mut scene)?,
    };

    Ok((navigator, scene, report))
}

fn print_report(navigator: &Navigator<DuckDbStore>, report: &DrawReport) {
    let view = match navigator.state() {
        NavState::Overview => "Overview".to_string(),
        NavState::RegionDetail { code, name } => format!("{name} ({code})"),
    };

    match report.status {
        DrawStatus::Drawn { shapes } => println!("{view}: {shapes} shapes"),
        DrawStatus::NoData => println!("{view}: no data for this selection"),
    }

    print_results(&report.results);

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
}

fn print_results(results: &[PartyVotes]) {
    for (rank, party) in results.iter().enumerate() {
        println!("{:>3}. {:<40} {:>10}", rank + 1, party.party, party.votes);
    }
}
