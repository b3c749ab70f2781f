use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Recompress every file in a directory from one format to another",
    after_help = "Log lines go to stderr with UTC timestamps (HH:MM:SS.ff). Set RUST_LOG to change verbosity."
)]
pub struct Cli {
    /// Format the files are stored in now: Identity (or None), GZip, ZLib, ZStd, Brotli
    #[arg(long = "input-format", env = "RECOMP_INPUT_FORMAT")]
    pub input_format: String,

    /// Format to rewrite the files in
    #[arg(long = "output-format", env = "RECOMP_OUTPUT_FORMAT")]
    pub output_format: String,

    /// Directory whose files (not subdirectories) are converted in place
    #[arg(long = "work-directory", env = "RECOMP_WORK_DIRECTORY")]
    pub work_directory: PathBuf,

    /// Files converted at once (default: 3/4 of the available cores)
    #[arg(long, env = "RECOMP_THREADS")]
    pub threads: Option<usize>,

    /// Compression level override, clamped to each codec's range
    #[arg(long, allow_negative_numbers = true)]
    pub level: Option<i32>,

    /// Milliseconds between progress lines
    #[arg(long = "progress-interval-ms", default_value_t = 1000)]
    pub progress_interval_ms: u64,

    /// Print the final summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}
