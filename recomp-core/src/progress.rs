//! Shared batch counters and the periodic progress line.

use crate::error::Result;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Written by workers, read by the reporter. Each job bumps exactly one of
/// `converted` / `failed`, exactly once.
#[derive(Debug, Default)]
pub struct ProgressCounters {
    converted: AtomicU64,
    failed: AtomicU64,
    total: u64,
}

impl ProgressCounters {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record_success(&self) {
        self.converted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            converted: self.converted.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            total: self.total,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub converted: u64,
    pub failed: u64,
    pub total: u64,
}

impl ProgressSnapshot {
    pub fn done(&self) -> u64 {
        self.converted + self.failed
    }

    /// 0.0 for an empty batch.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.done() as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04} Files done. ({:05.1}%)", self.done(), self.percent())
    }
}

/// Background thread emitting a snapshot every `interval` until stopped.
pub struct ProgressReporter {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Logs each snapshot at info level.
    pub fn start(counters: Arc<ProgressCounters>, interval: Duration) -> Result<Self> {
        Self::start_with(counters, interval, |snap| tracing::info!("{snap}"))
    }

    pub fn start_with<F>(counters: Arc<ProgressCounters>, interval: Duration, mut emit: F) -> Result<Self>
    where
        F: FnMut(ProgressSnapshot) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("recomp-progress".into())
            .spawn(move || {
                // A disconnect (sender dropped) is the stop signal.
                while let Err(RecvTimeoutError::Timeout) = rx.recv_timeout(interval) {
                    emit(counters.snapshot());
                }
            })?;
        Ok(Self {
            stop: Some(tx),
            handle: Some(handle),
        })
    }

    /// Wakes the reporter and waits for it to exit; no tick runs after this returns.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        drop(self.stop.take());
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
