use std::io;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry, filter, fmt};

use crate::cli;

pub fn start(config: &cli::Config) {
    let fmt_filter = filter::Targets::new()
        .with_target("indexing", config.log)
        .with_target("unifier", config.log)
        .with_default(LevelFilter::WARN);
    let fmt = fmt::layer().with_writer(io::stderr).with_filter(fmt_filter);

    let subscriber = Registry::default().with(fmt);
    tracing::subscriber::set_global_default(subscriber).unwrap();
}
