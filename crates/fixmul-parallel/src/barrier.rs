//! Completion barrier over a spin-lock-guarded counter.

use core::fmt;
use core::hint;
use spin::Mutex;

/// Releases only after a known number of tasks have each signaled exactly
/// once.
///
/// The counter sits behind a compare-and-swap spin-lock; an increment is
/// never lost to an interleaved read-modify-write. Waiting is polling, not
/// blocking: the waiter burns cycles until the count arrives.
pub struct CompletionBarrier {
    done: Mutex<usize>,
    total: usize,
}

/// A bounded wait gave up before every task signaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTimeout;

impl fmt::Display for WaitTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "completion barrier wait exhausted its poll budget")
    }
}

impl core::error::Error for WaitTimeout {}

impl CompletionBarrier {
    /// A barrier expecting `total` completion signals.
    pub const fn new(total: usize) -> Self {
        Self {
            done: Mutex::new(0),
            total,
        }
    }

    /// The number of signals the barrier waits for.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Signals observed so far.
    pub fn done(&self) -> usize {
        *self.done.lock()
    }

    /// Record one task's completion. Must be called exactly once per task.
    pub(crate) fn signal(&self) {
        let mut done = self.done.lock();
        *done += 1;
        debug_assert!(*done <= self.total, "barrier signaled more than total");
    }

    /// Whether every expected signal has arrived.
    pub fn is_released(&self) -> bool {
        *self.done.lock() >= self.total
    }

    /// Busy-wait until every task has signaled.
    pub fn wait(&self) {
        self.wait_with(hint::spin_loop);
    }

    /// Busy-wait, calling `relax` between polls. On a cooperative target
    /// `relax` is the scheduler yield; elsewhere a core hint suffices.
    pub fn wait_with(&self, mut relax: impl FnMut()) {
        while !self.is_released() {
            relax();
        }
    }

    /// Bounded wait: poll at most `max_polls` times before giving up, so a
    /// lost completion signal surfaces as an error instead of a hang.
    pub fn wait_polls(&self, max_polls: u64) -> Result<(), WaitTimeout> {
        for _ in 0..max_polls {
            if self.is_released() {
                return Ok(());
            }
            hint::spin_loop();
        }
        if self.is_released() {
            Ok(())
        } else {
            Err(WaitTimeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_releases_at_exact_total() {
        let barrier = CompletionBarrier::new(3);
        assert!(!barrier.is_released());
        barrier.signal();
        barrier.signal();
        assert!(!barrier.is_released());
        barrier.signal();
        assert!(barrier.is_released());
        assert_eq!(barrier.done(), 3);
    }

    #[test]
    fn test_zero_total_is_released_immediately() {
        let barrier = CompletionBarrier::new(0);
        assert!(barrier.is_released());
        barrier.wait();
    }

    #[test]
    fn test_bounded_wait_times_out() {
        let barrier = CompletionBarrier::new(1);
        assert_eq!(barrier.wait_polls(100), Err(WaitTimeout));
        barrier.signal();
        assert_eq!(barrier.wait_polls(1), Ok(()));
    }

    #[test]
    fn test_concurrent_signals_are_never_lost() {
        use alloc::sync::Arc;
        use std::thread;

        const TASKS: usize = 1600;
        const THREADS: usize = 8;

        let barrier = Arc::new(CompletionBarrier::new(TASKS));
        let mut handles = alloc::vec::Vec::new();
        for _ in 0..THREADS {
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                for _ in 0..TASKS / THREADS {
                    barrier.signal();
                }
            }));
        }
        barrier.wait();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(barrier.done(), TASKS);
    }
}
