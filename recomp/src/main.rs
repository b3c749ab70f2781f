mod application;

mod presentation {
    pub mod cli;
}

use std::process::ExitCode;
use time::macros::format_description;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // UTC, not local time: the local offset cannot be read soundly once
    // worker threads exist.
    let timer = UtcTime::new(format_description!(
        "[hour]:[minute]:[second].[subsecond digits:2]"
    ));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    application::run()
}
