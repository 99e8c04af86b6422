//! Timer Module - Cancellable delayed callbacks
//!
//! The scheduling capability consumed by the typewriter engine. A
//! [`Scheduler`] runs a callback once after a delay and hands back a
//! [`TimerHandle`]; a cancelled handle guarantees the callback never
//! fires afterwards, even if its deadline has already passed.
//!
//! # Implementations
//!
//! - [`ThreadScheduler`] - wall-clock timers on background threads
//! - [`ManualClock`] - virtual clock advanced explicitly; what the
//!   engine tests run against, and what hosts with their own frame
//!   loop drive directly
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use spark_typewriter::timer::{ManualClock, Scheduler};
//!
//! let clock = ManualClock::new();
//! let handle = clock.schedule(Duration::from_millis(100), Box::new(|| {
//!     println!("fired");
//! }));
//!
//! clock.advance(Duration::from_millis(50));  // nothing yet
//! handle.cancel();
//! clock.advance(Duration::from_millis(100)); // never fires
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::trace;

/// Callback type accepted by [`Scheduler::schedule`].
pub type TimerCallback = Box<dyn FnOnce() + Send>;

// =============================================================================
// TIMER HANDLE
// =============================================================================

/// Handle to one scheduled callback.
///
/// Cancellation is a flag flip shared with the owning scheduler, which
/// re-checks the flag immediately before running the callback. Dropping
/// the handle does NOT cancel the timer; call [`TimerHandle::cancel`].
#[derive(Clone)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Prevent the callback from running. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check whether [`cancel`](TimerHandle::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// =============================================================================
// SCHEDULER TRAIT
// =============================================================================

/// A delayed-callback facility.
///
/// The engine schedules exactly one callback at a time and cancels the
/// outstanding handle on every teardown path, so implementations only
/// need one-shot semantics.
pub trait Scheduler: Send + Sync {
    /// Run `callback` once, `delay` from now, unless the returned
    /// handle is cancelled first.
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;
}

// =============================================================================
// THREAD SCHEDULER
// =============================================================================

/// Wall-clock scheduler: one background thread per outstanding timer.
///
/// The thread sleeps for the delay, re-checks the cancel flag, then
/// runs the callback. A cancelled timer's thread wakes, sees the flag,
/// and exits without side effects.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadScheduler;

impl ThreadScheduler {
    /// Create a thread scheduler.
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = TimerHandle::new();
        let cancelled = Arc::clone(&handle.cancelled);

        trace!(delay_ms = delay.as_millis() as u64, "scheduling wall-clock timer");
        thread::spawn(move || {
            thread::sleep(delay);
            if !cancelled.load(Ordering::SeqCst) {
                callback();
            }
        });

        handle
    }
}

// =============================================================================
// MANUAL CLOCK
// =============================================================================

struct PendingTimer {
    id: u64,
    deadline: Duration,
    cancelled: Arc<AtomicBool>,
    callback: TimerCallback,
}

struct ClockInner {
    now: Duration,
    next_id: u64,
    pending: Vec<PendingTimer>,
}

/// Virtual clock: time moves only when [`advance`](ManualClock::advance)
/// is called.
///
/// Due callbacks fire in (deadline, insertion) order, with the queue
/// lock released around each callback so a callback may schedule its
/// successor — a chain of one-shot timers plays out inside a single
/// `advance` call.
///
/// Clones share the same clock.
#[derive(Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ClockInner>>,
}

impl ManualClock {
    /// Create a clock at time zero with no pending timers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ClockInner {
                now: Duration::ZERO,
                next_id: 0,
                pending: Vec::new(),
            })),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.inner.lock().unwrap().now
    }

    /// Number of scheduled callbacks that have not yet fired or been
    /// cancelled.
    pub fn pending(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner
            .pending
            .iter()
            .filter(|t| !t.cancelled.load(Ordering::SeqCst))
            .count()
    }

    /// Move virtual time forward by `delta`, firing every due callback.
    ///
    /// Each callback observes `now()` equal to its own deadline, and
    /// callbacks scheduled during the advance still fire if their
    /// deadline falls within the window.
    pub fn advance(&self, delta: Duration) {
        let target = {
            let inner = self.inner.lock().unwrap();
            inner.now + delta
        };

        loop {
            let due = {
                let mut inner = self.inner.lock().unwrap();

                let next = inner
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.deadline <= target)
                    .min_by_key(|(_, t)| (t.deadline, t.id))
                    .map(|(i, _)| i);

                match next {
                    Some(i) => {
                        let timer = inner.pending.swap_remove(i);
                        // Deadlines already in the past fire "now"
                        // without moving time backwards.
                        inner.now = inner.now.max(timer.deadline);
                        Some(timer)
                    }
                    None => {
                        inner.now = target;
                        None
                    }
                }
            };

            match due {
                Some(timer) => {
                    if !timer.cancelled.load(Ordering::SeqCst) {
                        (timer.callback)();
                    }
                }
                None => break,
            }
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualClock {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = TimerHandle::new();
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        let deadline = inner.now + delay;
        inner.pending.push(PendingTimer {
            id,
            deadline,
            cancelled: Arc::clone(&handle.cancelled),
            callback,
        });
        handle
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_manual_clock_fires_at_deadline() {
        let clock = ManualClock::new();
        let fired = Arc::new(AtomicBool::new(false));
        let fired_in_cb = Arc::clone(&fired);

        clock.schedule(
            ms(100),
            Box::new(move || fired_in_cb.store(true, Ordering::SeqCst)),
        );

        clock.advance(ms(99));
        assert!(!fired.load(Ordering::SeqCst));

        clock.advance(ms(1));
        assert!(fired.load(Ordering::SeqCst));
        assert_eq!(clock.now(), ms(100));
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_manual_clock_ordering() {
        let clock = ManualClock::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        // Scheduled out of deadline order on purpose.
        for (label, deadline) in [("b", 200u64), ("a", 100), ("c", 300)] {
            let order = Arc::clone(&order);
            clock.schedule(
                ms(deadline),
                Box::new(move || order.lock().unwrap().push(label)),
            );
        }

        clock.advance(ms(500));
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_manual_clock_tie_breaks_by_insertion() {
        let clock = ManualClock::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second"] {
            let order = Arc::clone(&order);
            clock.schedule(ms(100), Box::new(move || order.lock().unwrap().push(label)));
        }

        clock.advance(ms(100));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_manual_clock_cancel() {
        let clock = ManualClock::new();
        let fired = Arc::new(AtomicBool::new(false));
        let fired_in_cb = Arc::clone(&fired);

        let handle = clock.schedule(
            ms(100),
            Box::new(move || fired_in_cb.store(true, Ordering::SeqCst)),
        );

        handle.cancel();
        assert!(handle.is_cancelled());
        assert_eq!(clock.pending(), 0);

        clock.advance(ms(200));
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[test]
    fn test_manual_clock_chained_callbacks_fire_in_one_advance() {
        // A callback scheduling its successor inside the window: both
        // fire within a single advance, at their own deadlines.
        let clock = ManualClock::new();
        let times = Arc::new(Mutex::new(Vec::new()));

        let clock_in_cb = clock.clone();
        let times_in_cb = Arc::clone(&times);
        clock.schedule(
            ms(100),
            Box::new(move || {
                times_in_cb.lock().unwrap().push(clock_in_cb.now());
                let clock_inner = clock_in_cb.clone();
                let times_inner = Arc::clone(&times_in_cb);
                clock_in_cb.schedule(
                    ms(50),
                    Box::new(move || times_inner.lock().unwrap().push(clock_inner.now())),
                );
            }),
        );

        clock.advance(ms(200));
        assert_eq!(*times.lock().unwrap(), vec![ms(100), ms(150)]);
        assert_eq!(clock.now(), ms(200));
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let clone = clock.clone();

        clock.advance(ms(40));
        assert_eq!(clone.now(), ms(40));
    }

    #[test]
    fn test_thread_scheduler_fires() {
        let scheduler = ThreadScheduler::new();
        let (tx, rx) = mpsc::channel();

        scheduler.schedule(
            ms(10),
            Box::new(move || {
                let _ = tx.send(());
            }),
        );

        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
    }

    #[test]
    fn test_thread_scheduler_cancel_prevents_fire() {
        let scheduler = ThreadScheduler::new();
        let (tx, rx) = mpsc::channel::<()>();

        let handle = scheduler.schedule(
            ms(30),
            Box::new(move || {
                let _ = tx.send(());
            }),
        );
        handle.cancel();

        // The timer thread wakes after 30ms and must drop the send.
        assert!(rx.recv_timeout(Duration::from_millis(150)).is_err());
    }
}
