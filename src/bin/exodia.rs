use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use exodia_catalog::{CardCatalog, CardCatalogBuilder, CardFilter, CatalogError, Result};
use serde::Serialize;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "exodia", about = "Yu-Gi-Oh! card catalog: import, search and random draws")]
struct Cli {
    /// Database file (defaults to EXODIA_DATABASE, then the platform data directory)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the YGOPRODeck card lists and load them
    Import,
    /// Search cards and print the total plus one page as JSON
    Query {
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        card_type: Option<String>,
        #[arg(long)]
        attribute: Option<String>,
        #[arg(long)]
        archetype: Option<String>,
        #[arg(long)]
        race: Option<String>,
        #[arg(long)]
        level: Option<i64>,
        #[arg(long)]
        atk: Option<i64>,
        #[arg(long)]
        def: Option<i64>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
    },
    /// Print random translated cards as JSON
    Random {
        #[arg(long, default_value_t = 1)]
        size: i64,
    },
    /// Print one card by id as JSON
    Card { id: i64 },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open(database: Option<PathBuf>) -> Result<CardCatalog> {
    let mut builder = CardCatalogBuilder::from_env()?;
    if let Some(path) = database {
        builder = builder.database(path);
    }
    builder.build()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let catalog = open(cli.database)?;

    match cli.command {
        Command::Import => {
            let summary = catalog.import()?;
            println!("inserted {} cards", summary.inserted);
            for (lang, updated) in &summary.translated {
                println!("translated {} rows ({})", updated, lang);
            }
        }
        Command::Query {
            name,
            card_type,
            attribute,
            archetype,
            race,
            level,
            atk,
            def,
            limit,
            offset,
        } => {
            let filter = CardFilter {
                name,
                card_type,
                attribute,
                archetype,
                race,
                level,
                atk,
                def,
                limit,
                offset,
            };
            print_json(&catalog.query_cards(&filter)?)?;
        }
        Command::Random { size } => {
            print_json(&catalog.random_cards(size)?)?;
        }
        Command::Card { id } => {
            let card = catalog
                .get_by_id(id)?
                .ok_or_else(|| CatalogError::NotFound(format!("card {}", id)))?;
            print_json(&card)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
