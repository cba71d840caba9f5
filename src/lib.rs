pub mod config;
pub mod search;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use config::SearchConfig;
use search::input::StdinTerm;
use search::object_store::JsonObjectStore;
use search::term::{Fuzziness, TermProcessor};
use search::transport::HttpTransport;
use search::{AcceptTypes, CursorStep, SearchService};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "fos",
    version,
    about = "Fuzzy search over an external index, resolved against an object snapshot"
)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Index root URL (overrides config and FOS_SEARCH_ROOT)
    #[arg(long, global = true)]
    pub root: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the index and print resolved matches in score order
    Query {
        /// Search term; read from stdin when omitted
        term: Option<String>,

        /// Maximum hits to request from the backend
        #[arg(long, allow_negative_numbers = true)]
        max_results: Option<i64>,

        /// Advisory backend timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Only keep objects of these types (repeatable)
        #[arg(long = "type", value_name = "TYPE")]
        types: Vec<String>,

        /// JSON object snapshot (id -> model)
        #[arg(long)]
        objects: Option<PathBuf>,

        /// Emit one JSON object per line
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the backend query string a term normalizes to
    Normalize {
        term: String,

        /// Fuzziness edit distance
        #[arg(long)]
        edit_distance: Option<u8>,
    },
}

#[derive(Debug, Serialize)]
struct MatchRow<'a> {
    id: &'a str,
    score: f64,
    name: Option<&'a str>,
    model: Option<&'a serde_json::Value>,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = SearchConfig::load(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config.root = root;
    }

    match cli.command {
        Commands::Query {
            term,
            max_results,
            timeout_ms,
            types,
            objects,
            json,
        } => {
            if let Some(objects) = objects {
                config.objects_path = Some(objects);
            }
            run_query(&config, term, max_results, timeout_ms, types, json).await
        }
        Commands::Normalize {
            term,
            edit_distance,
        } => {
            let distance = edit_distance.or(config.edit_distance);
            let processed = TermProcessor::new(Fuzziness::new(distance)).normalize(&term);
            println!("{processed}");
            Ok(())
        }
    }
}

async fn run_query(
    config: &SearchConfig,
    term: Option<String>,
    max_results: Option<i64>,
    timeout_ms: Option<u64>,
    types: Vec<String>,
    json: bool,
) -> Result<()> {
    let store = match &config.objects_path {
        Some(path) => JsonObjectStore::load(path)?,
        None => anyhow::bail!("no object snapshot configured (use --objects or FOS_OBJECTS)"),
    };
    let transport =
        HttpTransport::new(config.request_timeout()).context("building http client")?;
    let service = SearchService::new(config, Arc::new(transport), Arc::new(store));

    let raw = match term {
        Some(term) => term,
        None => StdinTerm.read_term().await?,
    };
    let valid_type = AcceptTypes::new(types);

    let mut step = service
        .query(raw.as_str(), &valid_type, max_results, timeout_ms)
        .await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    while let CursorStep::Match(m) = step {
        let row = MatchRow {
            id: &m.id,
            score: m.score,
            name: m.object.name(),
            model: m.object.model(),
        };
        if json {
            writeln!(out, "{}", serde_json::to_string(&row)?)?;
        } else {
            writeln!(
                out,
                "{:.3}\t{}\t{}",
                row.score,
                row.id,
                row.name.unwrap_or("-")
            )?;
        }
        step = service.next();
    }

    if let Some(summary) = service.last_summary()
        && summary.truncated
    {
        eprintln!(
            "note: showing {} of {} matching objects; raise --max-results to see more",
            summary.returned, summary.total
        );
    }
    Ok(())
}
