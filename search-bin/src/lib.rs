pub mod cli;
pub mod logging;

use std::path::Path;

use indexing::{IndexError, QueryOptions, SearchIndex};
use parsing::ParseError;
use smol_str::SmolStr;
use terms::pretty;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MainError {
    #[error("{0}")]
    Index(#[from] IndexError),
    #[error("{0}")]
    Parse(#[from] ParseError),
}

pub fn run(config: cli::Config) -> Result<(), MainError> {
    match config.command {
        cli::Command::Search { index, exhaustive, limit, packages, query } => {
            search(&index, exhaustive, limit, packages, &query)
        }
        cli::Command::Build { index, harvest } => build(&index, &harvest),
    }
}

fn search(
    index: &Path,
    exhaustive: bool,
    limit: Option<usize>,
    packages: Vec<SmolStr>,
    query: &str,
) -> Result<(), MainError> {
    let mut index = SearchIndex::load(index)?;
    let parsed = parsing::parse_type(query)?;
    let query = index.lower_query(&parsed);

    let options = QueryOptions { exhaustive, limit, packages };
    let results = index.query(query, &options)?;
    for result in &results {
        println!("{} : {}", result.path, pretty::print_type(index.env(), result.ty));
    }
    Ok(())
}

fn build(index: &Path, harvest: &Path) -> Result<(), MainError> {
    let entries = indexing::read_harvest(harvest)?;
    let index_value = SearchIndex::build(entries.into_iter().map(|entry| (entry.path, entry.ty)));
    index_value.save(index)?;
    Ok(())
}
