//! Batch orchestration: validate, enumerate, schedule, report.

use crate::codec::CodecRegistry;
use crate::convert::{ConversionJob, ConvertOutcome, TEMP_PREFIX};
use crate::error::{RecompError, Result};
use crate::format::Format;
use crate::progress::{self, ProgressCounters, ProgressReporter, ProgressSnapshot};
use crate::schedule::{Scheduler, default_workers};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

#[derive(Clone, Debug)]
pub struct BatchOptions {
    pub input: Format,
    pub output: Format,
    pub work_dir: PathBuf,
    /// Defaults to three quarters of the available cores.
    pub workers: Option<usize>,
    /// Defaults to each codec's strongest level.
    pub level: Option<i32>,
    pub progress_interval: Duration,
}

impl BatchOptions {
    pub fn new(input: Format, output: Format, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            input,
            output,
            work_dir: work_dir.into(),
            workers: None,
            level: None,
            progress_interval: progress::DEFAULT_INTERVAL,
        }
    }

    /// Checks everything that can be checked before a file is opened.
    pub fn validate(&self) -> Result<()> {
        if !self.work_dir.is_dir() {
            return Err(RecompError::NotADirectory(self.work_dir.clone()));
        }
        if self.workers == Some(0) {
            return Err(RecompError::InvalidThreads);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct BatchSummary {
    pub work_dir: PathBuf,
    pub input: Format,
    pub output: Format,
    pub workers: usize,
    pub total: u64,
    pub converted: u64,
    pub failed: u64,
    /// On-disk bytes of the converted files, before and after.
    pub bytes_before: u64,
    pub bytes_after: u64,
    pub elapsed_secs: f64,
    pub failures: Vec<FileFailure>,
}

impl BatchSummary {
    pub fn elapsed_minutes(&self) -> f64 {
        self.elapsed_secs / 60.0
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    pub fn progress(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            converted: self.converted,
            failed: self.failed,
            total: self.total,
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "All done! Converted {} Files in '{}' in {:.2} Minutes",
            self.converted,
            self.work_dir.display(),
            self.elapsed_minutes()
        )
    }
}

/// Regular files directly inside `dir`, sorted. Subdirectories and symlinks
/// are skipped, as are temp files left behind by an interrupted run.
pub fn list_candidates(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for e in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false) {
        let e = e.map_err(std::io::Error::from)?;
        if !e.file_type().is_file() {
            continue;
        }
        if e.file_name().to_string_lossy().starts_with(TEMP_PREFIX) {
            tracing::warn!("Skipping leftover temp file '{}'", e.path().display());
            continue;
        }
        files.push(e.into_path());
    }
    files.sort();
    Ok(files)
}

pub fn run_batch(opts: &BatchOptions) -> Result<BatchSummary> {
    opts.validate()?;

    let registry = CodecRegistry::with_level(opts.level);
    let source = registry.get(opts.input);
    let target = registry.get(opts.output);

    let files = list_candidates(&opts.work_dir)?;
    let scheduler = Scheduler::new(opts.workers.unwrap_or_else(default_workers))?;
    tracing::info!(
        "Using {} threads to convert {} files in '{}' ({} -> {})",
        scheduler.workers(),
        files.len(),
        opts.work_dir.display(),
        opts.input,
        opts.output
    );

    let counters = Arc::new(ProgressCounters::new(files.len() as u64));
    let started = Instant::now();
    let reporter = ProgressReporter::start(Arc::clone(&counters), opts.progress_interval)?;

    let results = scheduler.run(&files, &counters, |path| {
        ConversionJob {
            path,
            source,
            target,
        }
        .run()
    });

    reporter.stop();
    let elapsed = started.elapsed();
    let snap = counters.snapshot();
    tracing::info!("{snap}");

    let mut summary = BatchSummary {
        work_dir: opts.work_dir.clone(),
        input: opts.input,
        output: opts.output,
        workers: scheduler.workers(),
        total: snap.total,
        converted: snap.converted,
        failed: snap.failed,
        bytes_before: 0,
        bytes_after: 0,
        elapsed_secs: elapsed.as_secs_f64(),
        failures: Vec::new(),
    };
    for (path, result) in results {
        match result {
            Ok(ConvertOutcome {
                bytes_before,
                bytes_after,
                ..
            }) => {
                summary.bytes_before += bytes_before;
                summary.bytes_after += bytes_after;
            }
            Err(e) => summary.failures.push(FileFailure {
                path,
                error: e.to_string(),
            }),
        }
    }
    Ok(summary)
}
