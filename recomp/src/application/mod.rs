pub mod handlers;

use crate::presentation::cli::Cli;
use clap::Parser;
use std::process::ExitCode;

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    handlers::handle_convert(cli)
}
