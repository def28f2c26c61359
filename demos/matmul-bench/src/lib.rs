//! Benchmark plumbing for the multiply engines.
//!
//! Holds the platform collaborators the engines stay agnostic of: the tick
//! source used for timing reports and the scheduler pool the parallel
//! workload is dealt onto.

use std::thread;

use matrix::Matrix;
use parallel::{JoinError, Workload};

/// Matrix dimension used by the benchmark run.
pub const DIM: usize = 40;

/// Scheduler threads the parallel workers are dealt onto.
pub const WORKER_THREADS: usize = 4;

/// Finalizer poll budget; exhausting it is treated as a fatal fault.
pub const JOIN_POLL_BUDGET: u64 = 1 << 32;

/// Monotonic tick source, used only to report elapsed engine time.
pub trait Timebase {
    /// Current tick count.
    fn now(&self) -> u64;

    /// Ticks per second.
    fn frequency(&self) -> u64;
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "riscv32")] {
        mod cycles;
        pub use cycles::CycleCounter;
    }
}

/// Host clock: nanosecond ticks from a monotonic origin.
pub struct WallClock {
    origin: std::time::Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Timebase for WallClock {
    fn now(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }

    fn frequency(&self) -> u64 {
        1_000_000_000
    }
}

/// Run `f`, returning its result and the elapsed ticks.
pub fn time<T>(clock: &impl Timebase, f: impl FnOnce() -> T) -> (T, u64) {
    let start = clock.now();
    let result = f();
    (result, clock.now() - start)
}

/// Normalize elapsed ticks to seconds for display.
pub fn ticks_to_secs(ticks: u64, frequency: u64) -> f64 {
    ticks as f64 / frequency as f64
}

/// Run the parallel engine: deal one worker per cell onto the thread pool,
/// finalize on the calling thread.
pub fn run_parallel(a: Matrix, b: Matrix) -> Result<Matrix, JoinError> {
    let workload = Workload::new(a, b).map_err(JoinError::Matrix)?;

    let mut buckets: Vec<Vec<parallel::Worker>> =
        (0..WORKER_THREADS).map(|_| Vec::new()).collect();
    for (index, worker) in workload
        .workers()
        .map_err(JoinError::Matrix)?
        .into_iter()
        .enumerate()
    {
        buckets[index % WORKER_THREADS].push(worker);
    }

    let handles: Vec<_> = buckets
        .into_iter()
        .map(|bucket| {
            thread::spawn(move || {
                for worker in bucket {
                    worker.run();
                }
            })
        })
        .collect();

    let result = workload.join_polls(JOIN_POLL_BUDGET);

    for handle in handles {
        let _ = handle.join();
    }

    result
}
