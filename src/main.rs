//! Panel Advisor
//!
//! Sizes controllers, enclosure panels and the supervisory device for a set of
//! building automation systems.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use panel_advisor::calculator::{format_demand_table, summarize_batch};
use panel_advisor::requests::{RequestParser, recommend_directory};
use panel_advisor::{Catalog, SystemType, db, recommend};

#[derive(Parser)]
#[command(name = "panel-advisor")]
#[command(about = "Controller and panel sizing advisor for building automation systems")]
struct Cli {
    /// Path to a SQLite catalog database (builtin catalog when omitted)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend controllers and panels for a list of systems
    Recommend {
        /// Systems as system:grade[:qty] (e.g. "ahu:average:2", "vav:simple:10")
        systems: Vec<String>,

        /// Read additional systems from a request file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Show per-class point demand
        #[arg(short, long)]
        verbose: bool,
    },

    /// Recommend a panel for every *.systems file in a directory
    Batch {
        /// Directory to scan
        dir: PathBuf,
    },

    /// List system profiles in the catalog
    ListSystems,

    /// List controllers and expansion modules in the catalog
    ListControllers,

    /// Show details for a specific controller
    Controller {
        /// Controller model
        model: String,
    },

    /// Show panel and supervisory device tiers
    Tiers,

    /// Initialize empty catalog database with schema
    Init,

    /// Write the builtin catalog into the database
    LoadBuiltin,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("panel_advisor=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let path = require_database(cli.database.as_deref())?;
            open_database(path)?;
            println!("Database initialized at: {}", path.display());
        }

        Commands::LoadBuiltin => {
            let path = require_database(cli.database.as_deref())?;
            let conn = open_database(path)?;
            let catalog = Catalog::builtin();
            db::save_catalog(&conn, &catalog)?;
            println!(
                "Loaded builtin catalog: {} profiles, {} controllers",
                catalog.profiles().len(),
                catalog.controllers().len()
            );
        }

        Commands::Recommend {
            systems,
            file,
            verbose,
        } => {
            let catalog = load_catalog(cli.database.as_deref())?;
            let parser = RequestParser::new()?;

            let mut requests = Vec::new();
            for (i, text) in systems.iter().enumerate() {
                requests.push(parser.parse_request(text, i + 1)?);
            }
            if let Some(path) = &file {
                requests.extend(parser.read_request_file(path)?);
            }
            if requests.is_empty() {
                println!("No systems given. Pass tuples like 'ahu:average:2' or use --file.");
            }

            let rec = recommend(&catalog, &requests)?;

            if verbose {
                println!("Point demand:\n");
                println!("{}", format_demand_table(&rec));
            }
            println!("{}", rec);
        }

        Commands::Batch { dir } => {
            let catalog = load_catalog(cli.database.as_deref())?;
            let outcome = recommend_directory(&catalog, &dir)?;

            for (name, rec) in &outcome.results {
                println!("--- {} ---", name);
                println!("{}", rec);
            }
            for (name, error) in &outcome.failures {
                println!("--- {} ---\nError: {}\n", name, error);
            }

            println!("{}", summarize_batch(&outcome.results));
            println!("{}", outcome.stats);
        }

        Commands::ListSystems => {
            let catalog = load_catalog(cli.database.as_deref())?;
            println!(
                "{:<8} {:<11} {:>4} {:>4} {:>5} {:>7}  {:>3} {:>3} {:>3} {:>3} {:>3}",
                "System", "Grade", "HW", "SW", "Total", "Objects", "UI", "BI", "BO", "CO", "AO"
            );
            println!("{}", "-".repeat(68));
            for p in catalog.profiles() {
                let d = &p.demand;
                println!(
                    "{:<8} {:<11} {:>4} {:>4} {:>5} {:>7}  {:>3} {:>3} {:>3} {:>3} {:>3}",
                    p.system.as_str(),
                    p.grade.as_str(),
                    p.hardware_points,
                    p.software_points,
                    p.total_points(),
                    p.object_count,
                    d.ui,
                    d.bi,
                    d.bo,
                    d.co,
                    d.ao
                );
            }
        }

        Commands::ListControllers => {
            let catalog = load_catalog(cli.database.as_deref())?;
            println!(
                "{:<12} {:<16} {:>3} {:>3} {:>3} {:>3} {:>3}",
                "Model", "Category", "UI", "BI", "BO", "CO", "AO"
            );
            println!("{}", "-".repeat(49));
            for c in catalog.controllers() {
                let cap = &c.capacity;
                println!(
                    "{:<12} {:<16} {:>3} {:>3} {:>3} {:>3} {:>3}",
                    c.model,
                    c.category.to_string(),
                    cap.ui,
                    cap.bi,
                    cap.bo,
                    cap.co,
                    cap.ao
                );
            }
        }

        Commands::Controller { model } => {
            let catalog = load_catalog(cli.database.as_deref())?;
            match catalog.controller_spec(&model) {
                Ok(c) => {
                    println!("Controller: {}", c.model);
                    if let Some(desc) = &c.description {
                        println!("  Description: {}", desc);
                    }
                    println!("  Category: {}", c.category);
                    println!("  Capacity: {}", c.capacity);
                    if c.requires_base() {
                        println!("  Requires a base controller");
                    } else {
                        let systems: Vec<&str> =
                            c.supported_systems.iter().map(|s| s.as_str()).collect();
                        println!("  Systems: {}", systems.join(", "));
                    }
                }
                Err(_) => println!("Controller '{}' not found", model),
            }
        }

        Commands::Tiers => {
            let catalog = load_catalog(cli.database.as_deref())?;
            println!("Panel tiers:");
            for t in catalog.panel_tiers() {
                let up_to = t
                    .breakpoint
                    .map(|b| format!("<= {} devices", b))
                    .unwrap_or_else(|| "any count".to_string());
                println!(
                    "  {:<12} {:>6} {}  {:>2} per panel  ({})",
                    t.name, t.enclosure_size, t.rating, t.max_controllers_per_panel, up_to
                );
            }
            println!();
            println!("Supervisory devices:");
            for t in catalog.network_tiers() {
                match t.max_devices {
                    Some(max) => println!("  {:<10} <= {} devices", t.model, max),
                    None => println!("  {:<10} above", t.model),
                }
            }
            println!();
            println!("Grades per system:");
            for system in SystemType::ALL {
                let grades: Vec<&str> = catalog
                    .grades_for(system)
                    .into_iter()
                    .map(|g| g.as_str())
                    .collect();
                println!("  {:<8} {}", system.as_str(), grades.join(", "));
            }
        }
    }

    Ok(())
}

fn require_database(path: Option<&Path>) -> Result<&Path> {
    match path {
        Some(p) => Ok(p),
        None => bail!("This command needs --database <PATH>"),
    }
}

fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    db::init_schema(&conn)?;
    Ok(conn)
}

/// Catalog from the database when one is given, otherwise the builtin one
fn load_catalog(database: Option<&Path>) -> Result<Catalog> {
    let Some(path) = database else {
        return Ok(Catalog::builtin());
    };

    let conn = open_database(path)?;
    if db::catalog_is_empty(&conn)? {
        bail!(
            "No catalog in {}. Run 'load-builtin' first.",
            path.display()
        );
    }
    info!("Using catalog from {}", path.display());
    db::load_catalog(&conn)
}
