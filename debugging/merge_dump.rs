//! Run the title dedupe over a saved `/movies` response and print the result.
//! Usage: merge_dump <movies.json> [--sorted]
//! Chain priority comes from AFLAM_CHAIN_PRIORITY (.env supported).

use aflam::config::{default_chain_priority, parse_chain_priority, CHAIN_PRIORITY_VAR};
use aflam::dedupe::{dedupe_movies, sort_by_title};
use aflam::models::MovieRecord;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::{env, fs};

fn main() -> Result<()> {
    dotenv().ok();

    let mut args = env::args().skip(1);
    let path = args
        .next()
        .context("Usage: merge_dump <movies.json> [--sorted]")?;
    let sorted = args.any(|a| a == "--sorted");

    let priority = env::var(CHAIN_PRIORITY_VAR)
        .map(|raw| parse_chain_priority(&raw))
        .unwrap_or_else(|_| default_chain_priority());

    let text = fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
    let records: Vec<MovieRecord> =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse movies in {path}"))?;
    let input_len = records.len();

    let mut movies = dedupe_movies(records, priority.as_slice());
    if sorted {
        sort_by_title(&mut movies);
    }

    eprintln!("{} listings -> {} movies", input_len, movies.len());
    println!("{}", serde_json::to_string_pretty(&movies)?);
    Ok(())
}
