//! Bounded worker pool running one job per file.

use crate::error::{RecompError, Result};
use crate::progress::ProgressCounters;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Three quarters of `units`, at least one.
pub fn workers_for(units: usize) -> usize {
    (units * 3 / 4).max(1)
}

pub fn default_workers() -> usize {
    let units = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    workers_for(units)
}

pub struct Scheduler {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl Scheduler {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(RecompError::InvalidThreads);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("recomp-worker-{i}"))
            .build()?;
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs `job` for every path, at most `workers` at a time, and blocks
    /// until all are finished. A failing (or panicking) job is logged and
    /// counted; it never stops its siblings.
    pub fn run<T, F>(
        &self,
        paths: &[PathBuf],
        counters: &ProgressCounters,
        job: F,
    ) -> Vec<(PathBuf, Result<T>)>
    where
        T: Send,
        F: Fn(&Path) -> Result<T> + Sync,
    {
        self.pool.install(|| {
            paths
                .par_iter()
                .map(|path| {
                    let result = panic::catch_unwind(AssertUnwindSafe(|| job(path.as_path())))
                        .unwrap_or_else(|payload| {
                            Err(RecompError::JobPanicked(panic_message(&*payload)))
                        });
                    match &result {
                        Ok(_) => counters.record_success(),
                        Err(e) => {
                            tracing::warn!("Failed to convert '{}': {e}", path.display());
                            counters.record_failure();
                        }
                    }
                    (path.clone(), result)
                })
                .collect()
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn paths(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("r.{i}.0.mca"))).collect()
    }

    #[test]
    fn worker_default_is_three_quarters() {
        assert_eq!(workers_for(0), 1);
        assert_eq!(workers_for(1), 1);
        assert_eq!(workers_for(2), 1);
        assert_eq!(workers_for(4), 3);
        assert_eq!(workers_for(16), 12);
        assert!(default_workers() >= 1);
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(matches!(Scheduler::new(0), Err(RecompError::InvalidThreads)));
    }

    #[test]
    fn never_exceeds_worker_limit() {
        const K: usize = 3;
        let sched = Scheduler::new(K).unwrap();
        let counters = ProgressCounters::new(24);
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        let results = sched.run(&paths(24), &counters, |_| {
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(15));
            active.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        });

        assert_eq!(results.len(), 24);
        assert!(peak.load(Ordering::SeqCst) <= K);
        assert_eq!(counters.snapshot().converted, 24);
    }

    #[test]
    fn failures_are_isolated() {
        let sched = Scheduler::new(2).unwrap();
        let all = paths(6);
        let counters = ProgressCounters::new(all.len() as u64);

        let results = sched.run(&all, &counters, |p| {
            if p == Path::new("r.2.0.mca") {
                return Err(RecompError::Io(std::io::Error::other("boom")));
            }
            if p == Path::new("r.4.0.mca") {
                panic!("codec blew up");
            }
            Ok(p.to_path_buf())
        });

        let snap = counters.snapshot();
        assert_eq!(snap.converted, 4);
        assert_eq!(snap.failed, 2);
        assert_eq!(snap.percent(), 100.0);

        let failed: Vec<_> = results
            .iter()
            .filter(|(_, r)| r.is_err())
            .map(|(p, _)| p.clone())
            .collect();
        assert_eq!(failed.len(), 2);
        assert!(results.iter().any(|(_, r)| {
            matches!(r, Err(RecompError::JobPanicked(m)) if m == "codec blew up")
        }));
    }

    #[test]
    fn empty_input_completes() {
        let sched = Scheduler::new(1).unwrap();
        let counters = ProgressCounters::new(0);
        let results = sched.run(&[], &counters, |_| Ok(()));
        assert!(results.is_empty());
        assert_eq!(counters.snapshot().percent(), 0.0);
    }
}
