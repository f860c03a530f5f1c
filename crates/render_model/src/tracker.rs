//! Progress reporting and cooperative cancellation of placement passes

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Observer of a placement pass.
///
/// Long loops announce their work with [`add_new_jobs`](Self::add_new_jobs),
/// report each finished unit, and poll [`abort_placement`](Self::abort_placement)
/// between units.
pub trait PlacementTracker {
    fn add_new_jobs(&mut self, count: u64);
    fn completed_job(&mut self);
    fn abort_placement(&self) -> bool;
}

/// Tracker that ignores progress and never aborts
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTracker;

impl PlacementTracker for NullTracker {
    fn add_new_jobs(&mut self, _count: u64) {}

    fn completed_job(&mut self) {}

    fn abort_placement(&self) -> bool {
        false
    }
}

/// Handle used by another part of the application to cancel a pass
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Tracker counting jobs for a progress display
#[derive(Debug, Default)]
pub struct ProgressTracker {
    total_jobs: u64,
    completed_jobs: u64,
    abort: AbortHandle,
    abort_after: Option<u64>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort automatically once `jobs` jobs have completed
    pub fn with_job_limit(jobs: u64) -> Self {
        Self {
            abort_after: Some(jobs),
            ..Self::default()
        }
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn total_jobs(&self) -> u64 {
        self.total_jobs
    }

    pub fn completed_jobs(&self) -> u64 {
        self.completed_jobs
    }

    /// Completed fraction in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.total_jobs == 0 {
            1.0
        } else {
            (self.completed_jobs as f64 / self.total_jobs as f64).min(1.0)
        }
    }

    pub fn reset(&mut self) {
        self.total_jobs = 0;
        self.completed_jobs = 0;
    }
}

impl PlacementTracker for ProgressTracker {
    fn add_new_jobs(&mut self, count: u64) {
        self.total_jobs += count;
        tracing::trace!(total = self.total_jobs, "placement jobs added");
    }

    fn completed_job(&mut self) {
        self.completed_jobs += 1;
        if self.abort_after.is_some_and(|limit| self.completed_jobs >= limit) {
            self.abort.abort();
        }
    }

    fn abort_placement(&self) -> bool {
        self.abort.is_aborted()
    }
}
