// src/checker/limiter.rs
// =============================================================================
// A counting gate that caps how many remote checks are in flight at once.
//
// Every task of a run shares the same limiter (cloning the handle shares the
// underlying pool, it does not create a new one). A task takes a slot with
// `acquire().await` and gives it back by dropping the returned guard, so the
// slot is released on every exit path: normal return, early return with `?`,
// or a panic unwinding through the task.
//
// Rust concepts:
// - Arc: shared ownership across tasks
// - RAII guards: cleanup tied to a value going out of scope
// =============================================================================

use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Shared pool of `capacity` slots.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// One held slot. Dropping it returns the slot to the pool.
#[derive(Debug)]
pub struct LimiterSlot<'a> {
    _permit: SemaphorePermit<'a>,
}

impl ConcurrencyLimiter {
    /// Creates a pool with `capacity` slots
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits until a slot is free and takes it.
    ///
    /// Waiters are not guaranteed to be served in any particular order.
    pub async fn acquire(&self) -> LimiterSlot<'_> {
        // The semaphore is owned by the limiter and never closed, so
        // acquire can only fail if someone closed it
        let permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(_) => unreachable!("limiter semaphore is never closed"),
        };
        LimiterSlot { _permit: permit }
    }

    /// Total number of slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots not currently held
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is there no release() method?
//    - A manual release has to be called on every return path
//    - Forgetting it once (say, on an error path) leaks a slot forever
//    - Tying the release to Drop makes that mistake impossible to write
//
// 2. Why does LimiterSlot have a lifetime?
//    - It borrows the limiter it came from
//    - The compiler guarantees the slot cannot outlive its pool
//
// 3. Why is cloning cheap?
//    - Cloning an Arc only bumps a reference count
//    - All clones point at the same semaphore
// -----------------------------------------------------------------------------
