use std::process::ExitCode;

use clap::Parser;
use typeseek::{cli, logging};

fn main() -> ExitCode {
    let config = cli::Config::parse();
    logging::start(&config);

    match typeseek::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("typeseek: {error}");
            ExitCode::FAILURE
        }
    }
}
