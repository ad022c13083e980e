// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Use library instead of local modules
use vehicle_dashboard::{
    format_thousands, init_tracing, open_dashboard, write_csv, DashboardConfig, DatasetCache,
    DateRange, FilterSelection,
};

#[derive(Parser, Debug)]
#[command(name = "vehicle-dashboard", version, about = "Vehicle registration trends dashboard")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Registrations CSV (overrides the config file)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Seed for synthetic data (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive terminal dashboard (default)
    Ui,
    /// Print metrics and tables for a selection
    Summary {
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Comma-separated categories (default: all)
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<String>>,
        /// Comma-separated manufacturers (default: all)
        #[arg(long, value_delimiter = ',')]
        manufacturers: Option<Vec<String>>,
        /// Also print the filtered rows
        #[arg(long)]
        raw: bool,
    },
    /// Write a fresh synthetic dataset, replacing the data file
    Generate,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = DashboardConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    match cli.command.unwrap_or(Command::Ui) {
        Command::Ui => run_ui_mode(&config)?,
        Command::Summary { start, end, categories, manufacturers, raw } => {
            run_summary(&config, start, end, categories, manufacturers, raw)?
        }
        Command::Generate => run_generate(&config)?,
    }

    Ok(())
}

fn run_generate(config: &DashboardConfig) -> Result<()> {
    println!("🎲 Generating synthetic registrations...");

    let dataset = config.generator().generate();
    write_csv(&config.data_path, &dataset)
        .with_context(|| format!("Failed to write {}", config.data_path.display()))?;

    println!("✓ Wrote {} rows to {}", dataset.len(), config.data_path.display());
    Ok(())
}

fn run_summary(
    config: &DashboardConfig,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    categories: Option<Vec<String>>,
    manufacturers: Option<Vec<String>>,
    raw: bool,
) -> Result<()> {
    let cache = DatasetCache::new();
    let dashboard = open_dashboard(config, &cache).context("Startup failed")?;

    let defaults = dashboard.default_selection();
    let selection = FilterSelection::new(
        DateRange::new(
            start.unwrap_or(defaults.date_range.start),
            end.unwrap_or(defaults.date_range.end),
        ),
        categories.unwrap_or_else(|| defaults.categories.into_iter().collect()),
        manufacturers.unwrap_or_else(|| defaults.manufacturers.into_iter().collect()),
    )
    .with_raw(raw);

    let view = dashboard.view(&selection);

    println!("🚗 Vehicle Registration Dashboard");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "Selection: {} → {} | {} categories | {} manufacturers | {} rows",
        selection.date_range.start,
        selection.date_range.end,
        selection.categories.len(),
        selection.manufacturers.len(),
        view.row_count
    );

    println!("\n📊 Key Metrics");
    let (yoy_label, yoy_value) = view.metrics.yoy_display();
    println!("  Total Registrations: {}", view.metrics.total_display());
    println!("  {}: {}", yoy_label, yoy_value);
    println!("  Latest Data: {}", view.metrics.latest_display());

    println!("\n📈 Year-over-Year Growth");
    for row in &view.yoy_growth {
        let growth = row
            .growth_pct
            .map(|g| format!("{:+.1}%", g))
            .unwrap_or_else(|| "—".to_string());
        println!("  {}  {:>12}  {:>8}", row.year, format_thousands(row.total_registrations), growth);
    }

    println!("\n🏭 Manufacturer Market Share");
    for share in &view.market_share {
        println!(
            "  {:<15} {:>12}  {:>5.1}%",
            share.manufacturer,
            format_thousands(share.total_registrations),
            share.share_pct
        );
    }

    println!("\n📅 Monthly Registration Trends");
    for point in &view.monthly_trend {
        println!(
            "  {}  {:<3} {:>10}",
            point.date,
            point.category,
            format_thousands(point.total_registrations)
        );
    }

    if let Some(rows) = &view.raw_rows {
        println!("\n🗂️  Raw Data");
        println!("  date        year  quarter  month  category  manufacturer     registrations");
        for r in rows {
            println!(
                "  {}  {}  {:<7}  {:>5}  {:<8}  {:<15}  {:>13}",
                r.date, r.year, r.quarter.label(), r.month, r.category, r.manufacturer, r.registrations
            );
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &DashboardConfig) -> Result<()> {
    println!("🖥️  Loading Vehicle Registration Dashboard...\n");

    let cache = DatasetCache::new();
    let dashboard = open_dashboard(config, &cache).context("Startup failed")?;

    println!("✓ Loaded {} registration rows", dashboard.dataset().len());
    println!("Starting UI... (Press 'q' to quit)\n");

    // Create and run app
    let mut app = ui::App::new(dashboard);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &DashboardConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print a report: vehicle-dashboard summary");
    std::process::exit(1);
}
