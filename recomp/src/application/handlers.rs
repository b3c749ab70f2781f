use std::process::ExitCode;
use std::time::Duration;

use recomp_core::error::Result;
use recomp_core::{BatchOptions, BatchSummary, Format, run_batch};

use crate::presentation::cli::Cli;

/// Bad format name, missing directory, zero threads.
pub const EXIT_CONFIG: u8 = 1;
/// The batch finished but some files could not be converted.
pub const EXIT_PARTIAL: u8 = 2;

pub fn options_from_cli(cli: &Cli) -> Result<BatchOptions> {
    let input = Format::parse_option("InputFormat", &cli.input_format)?;
    let output = Format::parse_option("OutputFormat", &cli.output_format)?;

    let mut opts = BatchOptions::new(input, output, &cli.work_directory);
    opts.workers = cli.threads;
    opts.level = cli.level;
    opts.progress_interval = Duration::from_millis(cli.progress_interval_ms.max(1));
    opts.validate()?;
    Ok(opts)
}

pub fn handle_convert(cli: Cli) -> ExitCode {
    let opts = match options_from_cli(&cli) {
        Ok(o) => o,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    match run_batch(&opts) {
        Ok(summary) => {
            report(&summary, cli.json);
            exit_code(&summary)
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(EXIT_CONFIG)
        }
    }
}

fn report(summary: &BatchSummary, json: bool) {
    tracing::info!("{summary}");
    if summary.converted > 0 {
        tracing::info!(
            "{} -> {} bytes on disk",
            summary.bytes_before,
            summary.bytes_after
        );
    }
    if !summary.is_clean() {
        tracing::warn!("{} Files failed to convert and were left unchanged", summary.failed);
        for f in &summary.failures {
            tracing::warn!("  {}: {}", f.path.display(), f.error);
        }
    }
    if json {
        match summary_json(summary) {
            Ok(s) => println!("{s}"),
            Err(e) => tracing::error!("summary encode: {e}"),
        }
    }
}

fn summary_json(summary: &BatchSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

fn exit_code(summary: &BatchSummary) -> ExitCode {
    if summary.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_PARTIAL)
    }
}
