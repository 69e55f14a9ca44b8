use std::path::PathBuf;

use clap::{Parser, Subcommand};
use smol_str::SmolStr;
use tracing::level_filters::LevelFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(about, version(VERSION))]
pub struct Config {
    #[arg(
        long,
        value_name("LevelFilter"),
        help("Log level for the search core"),
        default_value("off")
    )]
    pub log: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search an index for entries whose type unifies with a query.
    Search {
        #[arg(long, help("Path to the index file"))]
        index: PathBuf,
        #[arg(long, help("Visit every entry, bypassing feature filtering"))]
        exhaustive: bool,
        #[arg(short = 'n', long = "limit", help("Emit at most this many results"))]
        limit: Option<usize>,
        #[arg(short = 'p', long = "package", help("Restrict results to these packages"))]
        packages: Vec<SmolStr>,
        #[arg(help("Query type, e.g. \"int -> 'a -> 'a\""))]
        query: String,
    },
    /// Build an index from a harvest file and save it.
    Build {
        #[arg(long, help("Path to the index file to write"))]
        index: PathBuf,
        #[arg(help("JSON harvest of (path, type) records"))]
        harvest: PathBuf,
    },
}
