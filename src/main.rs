//! # msgtally CLI
//!
//! Command-line front end for the msgtally library.

use std::process;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use msgtally::cli::{Args, OutputFormat};
use msgtally::config::AppConfig;
use msgtally::prelude::*;
use msgtally::report;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let config_path = AppConfig::default_path();
    let mut config = match config_path.as_deref() {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let owner = args
        .owner
        .clone()
        .unwrap_or_else(|| config.username.clone());
    let range = resolve_range(&args, &config)?;

    if args.save_config {
        config.username = owner.clone();
        config.archive_root = Some(args.root.clone());
        config.from_date = args.after.clone().or(config.from_date);
        config.to_date = args.before.clone().or(config.to_date);
        if let Some(path) = config_path.as_deref() {
            config.save(path)?;
        }
    }

    let now_millis = Utc::now().timestamp_millis();

    // Drill-down view for one conversation, no full scan
    if let Some(ref folder_id) = args.detail {
        let aggregate = aggregate_one(&args.root, folder_id, range, &owner)?;
        match args.format {
            OutputFormat::Table => print!("{}", report::render_detail(&aggregate, now_millis)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&aggregate)?),
        }
        return Ok(());
    }

    let progress = if args.format == OutputFormat::Table {
        stderr_progress()
    } else {
        no_progress()
    };
    let outcome = scan(&args.root, range, &owner, &progress)?;

    let mut store = RowStore::from_aggregates(&outcome.rows);
    if let Some(sort) = args.sort {
        store.sort_by(sort.into(), args.desc);
    }

    let selected: Vec<&Row> = match args.search.as_deref() {
        Some(query) => {
            let matches = store.search(query);
            matches.into_iter().map(|index| &store.rows()[index]).collect()
        }
        None => store.rows().iter().collect(),
    };

    match args.format {
        OutputFormat::Table => {
            let rows: Vec<Row> = selected.into_iter().cloned().collect();
            print!("{}", report::render_table(&rows, &outcome.totals));
        }
        OutputFormat::Json => {
            let payload = serde_json::json!({
                "rows": selected,
                "totals": outcome.totals,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }

    Ok(())
}

/// Explicit CLI dates must parse or error loudly; the persisted config
/// falls back to its defaults silently.
fn resolve_range(args: &Args, config: &AppConfig) -> Result<DateRange> {
    let saved = config.date_range();
    let from = match args.after.as_deref() {
        Some(raw) => msgtally::range::parse_date(raw)?,
        None => saved.from,
    };
    let to = match args.before.as_deref() {
        Some(raw) => msgtally::range::parse_date(raw)?,
        None => saved.to,
    };
    Ok(DateRange::new(from, to))
}
