use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use warehouse::catalog::ItemCatalog;
use warehouse::item::Item;
use warehouse::layout::LayoutStore;
use warehouse::rng::Rng;
use warehouse::settings::{SettingsStore, StashSettings};
use warehouse::star_link::StarLinkReport;
use warehouse::warehouse::Warehouse;

#[derive(Debug, Parser)]
#[command(name = "layouttool")]
#[command(about = "Inspect the item catalog and check saved warehouse layouts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every registered item type.
    Catalog {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Draw a panel's worth of items the way a refresh would.
    Sample {
        #[arg(long, default_value_t = 3)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    Validate {
        path: PathBuf,
    },
    /// Print the star-link report for a layout.
    Report {
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the effective settings and where they were read from.
    Settings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogRow {
    id: String,
    name: String,
    kind: &'static str,
    required_neighbor: Option<&'static str>,
    width: usize,
    height: usize,
    cells: usize,
    stars: usize,
    shape: Vec<String>,
}

impl From<&Item> for CatalogRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id().to_string(),
            name: item.name().to_string(),
            kind: item.kind().label(),
            required_neighbor: item.required_neighbor().map(|kind| kind.label()),
            width: item.width(),
            height: item.height(),
            cells: item.occupied_count(),
            stars: item.star_count(),
            shape: item.shape().glyph_rows(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings_store = SettingsStore::from_env();
    let settings = settings_store.load();
    let catalog = ItemCatalog::with_defaults();

    match cli.command {
        Commands::Catalog { json } => cmd_catalog(&catalog, json),
        Commands::Sample { count, seed } => {
            cmd_sample(&catalog, count, seed.unwrap_or(settings.seed))
        }
        Commands::Validate { path } => cmd_validate(&catalog, &settings, &path),
        Commands::Report { path, json } => cmd_report(&catalog, &settings, &path, json),
        Commands::Settings => cmd_settings(&settings_store, &settings),
    }
}

fn cmd_catalog(catalog: &ItemCatalog, json: bool) -> Result<()> {
    let rows: Vec<CatalogRow> = catalog.create_all().iter().map(CatalogRow::from).collect();
    if json {
        let text = serde_json::to_string_pretty(&rows).context("serialize catalog")?;
        println!("{text}");
        return Ok(());
    }

    for row in &rows {
        let links = row.required_neighbor.unwrap_or("-");
        println!(
            "{:<24} {:<7} links:{:<7} {}x{} cells:{} stars:{}",
            row.id, row.kind, links, row.width, row.height, row.cells, row.stars
        );
        for line in &row.shape {
            println!("    {line}");
        }
    }
    println!("{} item types", rows.len());
    Ok(())
}

fn cmd_sample(catalog: &ItemCatalog, count: usize, seed: u64) -> Result<()> {
    if count == 0 {
        bail!("--count must be at least 1");
    }
    let mut rng = Rng::new(seed);
    for (slot, item) in catalog.sample(count, &mut rng).iter().enumerate() {
        println!("slot {slot}: {} ({})", item.id(), item.name());
    }
    Ok(())
}

fn load_warehouse(catalog: &ItemCatalog, settings: &StashSettings, path: &Path) -> Result<Warehouse> {
    let store = LayoutStore::new(path);
    let layout = store
        .load()
        .with_context(|| format!("read layout {}", path.display()))?;
    let mut warehouse = Warehouse::new(layout.rows, layout.columns, settings.geometry());
    warehouse
        .import_layout(&layout, catalog)
        .with_context(|| format!("import layout {}", path.display()))?;
    Ok(warehouse)
}

fn cmd_validate(catalog: &ItemCatalog, settings: &StashSettings, path: &Path) -> Result<()> {
    let warehouse = load_warehouse(catalog, settings, path)?;
    let grid = warehouse.grid();
    println!(
        "OK: {} items on a {}x{} grid",
        grid.len(),
        grid.rows(),
        grid.columns()
    );
    Ok(())
}

fn cmd_report(
    catalog: &ItemCatalog,
    settings: &StashSettings,
    path: &Path,
    json: bool,
) -> Result<()> {
    let warehouse = load_warehouse(catalog, settings, path)?;
    let report = warehouse.star_links();
    if json {
        let text = serde_json::to_string_pretty(report).context("serialize star-link report")?;
        println!("{text}");
        return Ok(());
    }
    print_report(report);
    Ok(())
}

fn print_report(report: &StarLinkReport) {
    println!(
        "stars: {}  active links: {}  linked pairs: {}",
        report.total_stars, report.active_star_links, report.unique_linked_pairs
    );
    println!(
        "chains: {}  longest chain: {}",
        report.chain_count, report.max_chain_size
    );
    for bonus in &report.item_bonuses {
        println!(
            "  #{:<3} {:<24} at ({}, {})  stars:{} neighbors:{} chain:{}",
            bonus.placement_id,
            bonus.item_id,
            bonus.row,
            bonus.col,
            bonus.star_count,
            bonus.linked_neighbors,
            bonus.chain_size
        );
    }
}

fn cmd_settings(store: &SettingsStore, settings: &StashSettings) -> Result<()> {
    let text = serde_json::to_string_pretty(settings).context("serialize settings")?;
    println!("# {}", store.path().display());
    println!("{text}");
    Ok(())
}
