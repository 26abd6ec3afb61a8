//! Partpick CLI - resolve the reference board to catalog parts from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use partpick::board::BoardOptions;
use partpick::{BuildOptions, BuildReport, Catalog, Issue, PartPickCore, Severity};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "partpick")]
#[command(about = "Pick purchasable parts for a circuit design and check its connectivity", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the reference board, pick parts and run ERC
    Pick {
        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Catalog JSON file instead of the embedded LCSC tables
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Pixels on the WS2812B string
        #[arg(long, default_value_t = 5)]
        pixels: usize,

        /// Drive the LED string directly instead of through a level buffer
        #[arg(long)]
        unbuffered: bool,

        /// Exit with error code if any electrical pin is left unconnected
        #[arg(long)]
        fail_on_unconnected: bool,
    },

    /// List the tables of a catalog
    Catalog {
        /// Catalog JSON file instead of the embedded LCSC tables
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts and CI
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Pick {
            format,
            catalog,
            pixels,
            unbuffered,
            fail_on_unconnected,
        } => {
            let options = BuildOptions {
                catalog_path: catalog,
                board: BoardOptions {
                    pixels,
                    buffered: !unbuffered,
                },
                ..Default::default()
            };
            handle_pick(&options, format, fail_on_unconnected)
        }
        Commands::Catalog { catalog } => {
            let options = BuildOptions {
                catalog_path: catalog,
                ..Default::default()
            };
            handle_catalog(&options)
        }
    };

    process::exit(exit_code);
}

/// Logs go to stderr so JSON on stdout stays parseable.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_pick(options: &BuildOptions, format: OutputFormat, fail_on_unconnected: bool) -> i32 {
    tracing::debug!(
        "Reference board: {} pixels, buffered: {}, catalog: {}",
        options.board.pixels,
        options.board.buffered,
        options
            .catalog_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded".to_string())
    );
    match PartPickCore::build_reference_board(options) {
        Ok((_, report)) => {
            let printed = match format {
                OutputFormat::Human => {
                    output_human(&report);
                    true
                }
                OutputFormat::Json => output_json(&report),
            };
            if !printed || (fail_on_unconnected && report.has_warnings()) {
                return 1;
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn output_human(report: &BuildReport) {
    println!("\nDesign: {} (catalog: {})", report.design, report.catalog);
    println!("{}", "─".repeat(60));

    for part in &report.parts {
        let designator = part.designator.as_deref().unwrap_or("-");
        println!("  {:<10} {:<2} {}", part.part_id, designator, part.path);
        if let Some(map) = &part.pin_map {
            let pins: Vec<String> = map
                .pins()
                .iter()
                .map(|p| format!("{}={}", p.pin, p.terminal))
                .collect();
            println!("                pins: {}", pins.join(", "));
        }
    }

    let warnings: Vec<&Issue> = report
        .issues
        .iter()
        .filter(|i| i.severity == Severity::Warning)
        .collect();
    let info: Vec<&Issue> = report
        .issues
        .iter()
        .filter(|i| i.severity == Severity::Info)
        .collect();

    if !warnings.is_empty() {
        println!("\n  WARNINGS:");
        for issue in warnings {
            println!("    - {}", issue.message);
        }
    }
    if !info.is_empty() {
        println!("\n  INFO:");
        for issue in info {
            println!("    - {}", issue.message);
            if let Some(ref comp) = issue.component {
                println!("      Component: {}", comp);
            }
        }
    }

    println!("\n  Summary:");
    println!("    Components: {}", report.stats.components);
    println!("    Picked:     {}", report.stats.picked);
    println!("    Warnings:   {}", report.stats.warnings);
    println!("    Info:       {}", report.stats.info);
}

fn output_json(report: &BuildReport) -> bool {
    match serde_json::to_string_pretty(report) {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            false
        }
    }
}

fn handle_catalog(options: &BuildOptions) -> i32 {
    match options.load_catalog() {
        Ok(catalog) => {
            print_catalog(&catalog);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn print_catalog(catalog: &Catalog) {
    println!("Catalog: {} ({} parts)\n", catalog.source, catalog.part_count());

    println!("Modules:");
    for entry in &catalog.canonical {
        println!("  {:<10} {}", entry.part_id, entry.part.model());
    }

    println!("\nLED:");
    match &catalog.led {
        Some(part_id) => println!("  {}", part_id),
        None => println!("  (none)"),
    }

    println!("\nResistors:");
    for entry in &catalog.resistors {
        println!("  {:<10} {}", entry.part_id, partpick::units::format_si(entry.value, "Ω"));
    }

    println!("\nCapacitors:");
    for entry in &catalog.capacitors {
        println!("  {:<10} {}", entry.part_id, partpick::units::format_si(entry.value, "F"));
    }

    println!("\nMOSFETs:");
    for entry in &catalog.mosfets {
        println!("  {:<10} {}", entry.part_id, entry.tags);
    }
}
