//! Fixed-cadence stepping thread
//!
//! The clock owns its payload while running: [`SimulationClock::start`] moves
//! it into a single stepping thread and [`SimulationClock::stop`] joins that
//! thread and hands the payload back. Nothing can touch the payload between
//! those two calls, so a reset can never race a tick.
//!
//! Pacing has no catch-up: a step that overruns the budget is followed
//! immediately by the next one, and missed time is simply dropped.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub struct SimulationClock<T> {
    period: Duration,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> SimulationClock<T> {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawn the stepping thread. `step` runs once per period until it
    /// breaks or the clock is stopped.
    ///
    /// Hands `payload` back if a stepping thread already exists; call
    /// [`Self::stop`] first.
    pub fn start<F>(&mut self, payload: T, step: F) -> Result<(), T>
    where
        F: FnMut(&mut T) -> ControlFlow<()> + Send + 'static,
    {
        if self.worker.is_some() {
            return Err(payload);
        }

        // Fresh flag per run so a stale stop can't leak into the new thread
        let running = Arc::new(AtomicBool::new(true));
        self.running = Arc::clone(&running);
        let period = self.period;

        self.worker = Some(thread::spawn(move || {
            run_loop(payload, step, period, &running)
        }));
        log::debug!("Clock started ({:?} per tick)", period);
        Ok(())
    }

    /// Stop the stepping thread and wait for it to exit.
    ///
    /// Returns the payload, or `None` if no thread was started or the
    /// thread panicked. After this returns no further step executes.
    pub fn stop(&mut self) -> Option<T> {
        self.running.store(false, Ordering::Release);
        let worker = self.worker.take()?;
        worker.thread().unpark();

        match worker.join() {
            Ok(payload) => {
                log::debug!("Clock stopped");
                Some(payload)
            }
            Err(_) => {
                log::error!("Stepping thread panicked");
                None
            }
        }
    }

    /// A stepping thread exists (it may have ended on its own)
    pub fn is_started(&self) -> bool {
        self.worker.is_some()
    }

    /// The stepping thread is alive and still ticking
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }
}

impl<T> Drop for SimulationClock<T> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            worker.thread().unpark();
            let _ = worker.join();
        }
    }
}

fn run_loop<T, F>(mut payload: T, mut step: F, period: Duration, running: &AtomicBool) -> T
where
    F: FnMut(&mut T) -> ControlFlow<()>,
{
    while running.load(Ordering::Acquire) {
        let started = Instant::now();
        if step(&mut payload).is_break() {
            break;
        }

        let deadline = started + period;
        // Early wake-ups (spurious or from stop) just re-check the flag
        while running.load(Ordering::Acquire) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::park_timeout(deadline - now);
        }
    }
    running.store(false, Ordering::Release);
    payload
}
