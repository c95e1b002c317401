//! Per-surface advisory locks.
//!
//! At most one run mutates a surface at a time. A run acquires the
//! surface's lock at start and holds it until its terminal event; waiters
//! queue in arrival order up to a bound, beyond which acquisition fails
//! fast so a wedged run cannot accumulate unbounded queued work.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;

/// The surface is locked and its wait queue is full.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("surface {surface_id} is busy (queue of {limit} waiters is full)")]
pub struct SurfaceBusyError {
    /// The contended surface.
    pub surface_id: String,
    /// The configured queue bound.
    pub limit: usize,
}

#[derive(Debug)]
struct SurfaceLock {
    mutex: Arc<tokio::sync::Mutex<()>>,
    waiters: AtomicUsize,
}

/// RAII guard: dropping it releases the surface to the next queued run.
#[derive(Debug)]
pub struct SurfaceGuard {
    _inner: OwnedMutexGuard<()>,
    surface_id: String,
}

impl SurfaceGuard {
    /// The surface this guard holds.
    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }
}

/// Registry of per-surface advisory locks, keyed by surface id.
#[derive(Debug)]
pub struct SurfaceLockRegistry {
    locks: Mutex<HashMap<String, Arc<SurfaceLock>>>,
    queue_limit: usize,
}

impl SurfaceLockRegistry {
    /// Default bound on queued waiters per surface.
    pub const DEFAULT_QUEUE_LIMIT: usize = 4;

    /// Create a registry with the default queue bound.
    pub fn new() -> Self {
        Self::with_queue_limit(Self::DEFAULT_QUEUE_LIMIT)
    }

    /// Create a registry with an explicit queue bound. A bound of zero
    /// means fail-fast: any contention is an immediate error.
    pub fn with_queue_limit(queue_limit: usize) -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            queue_limit,
        }
    }

    fn lock_for(&self, surface_id: &str) -> Arc<SurfaceLock> {
        let mut locks = self.locks.lock().expect("surface lock registry poisoned");
        locks
            .entry(surface_id.to_owned())
            .or_insert_with(|| {
                Arc::new(SurfaceLock {
                    mutex: Arc::new(tokio::sync::Mutex::new(())),
                    waiters: AtomicUsize::new(0),
                })
            })
            .clone()
    }

    /// Acquire the surface, queueing behind the current holder in arrival
    /// order. Fails fast with [`SurfaceBusyError`] when the queue is full.
    pub async fn acquire(&self, surface_id: &str) -> Result<SurfaceGuard, SurfaceBusyError> {
        let lock = self.lock_for(surface_id);

        // Uncontended fast path never counts as a waiter.
        if let Ok(guard) = lock.mutex.clone().try_lock_owned() {
            return Ok(SurfaceGuard {
                _inner: guard,
                surface_id: surface_id.to_owned(),
            });
        }

        let waiting = lock.waiters.fetch_add(1, Ordering::AcqRel);
        if waiting >= self.queue_limit {
            lock.waiters.fetch_sub(1, Ordering::AcqRel);
            return Err(SurfaceBusyError {
                surface_id: surface_id.to_owned(),
                limit: self.queue_limit,
            });
        }

        let guard = lock.mutex.clone().lock_owned().await;
        lock.waiters.fetch_sub(1, Ordering::AcqRel);
        Ok(SurfaceGuard {
            _inner: guard,
            surface_id: surface_id.to_owned(),
        })
    }
}

impl Default for SurfaceLockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
