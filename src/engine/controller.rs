//! Animation Controller - The public typewriter unit
//!
//! Composes the phrase sequencer and character animator, owns the
//! single outstanding timer, and reports visible text to the rendering
//! surface. State is mutated exclusively by the controller's own timer
//! callbacks; consumers observe it through plain getters, reactive
//! signals, or per-tick observers.
//!
//! # Timer lifecycle
//!
//! Exactly one timer is in flight per controller. Every tick callback
//! performs one state mutation, then schedules its successor (or stops
//! at [`Mode::Done`]). Every teardown path - [`stop`], [`restart`],
//! [`replace_phrases`], drop - cancels the outstanding handle first,
//! and callbacks additionally carry the generation they were armed
//! under, so a callback that slips past cancellation still refuses to
//! mutate retired state.
//!
//! # Example
//!
//! ```ignore
//! use spark_typewriter::{Typewriter, TypewriterConfig};
//!
//! let tw = Typewriter::new(
//!     vec!["product engineer".into(), "designer".into(), "manager".into()],
//!     TypewriterConfig::default(),
//! )?;
//!
//! let unsubscribe = tw.on_tick(|event| {
//!     println!("{}", event.text);
//! });
//!
//! tw.start();
//! // ... later ...
//! unsubscribe();
//! tw.stop();
//! ```
//!
//! [`stop`]: Typewriter::stop
//! [`restart`]: Typewriter::restart
//! [`replace_phrases`]: Typewriter::replace_phrases

use std::sync::{Arc, Mutex};
use std::time::Duration;

use spark_signals::{signal, Signal};
use tracing::debug;

use crate::engine::animator::CharacterAnimator;
use crate::engine::sequencer::PhraseSequencer;
use crate::error::TypewriterError;
use crate::timer::{Scheduler, ThreadScheduler, TimerHandle};
use crate::types::{Cleanup, Mode, TickEvent, TypewriterConfig};

/// Observer invoked with a [`TickEvent`] snapshot after every tick.
pub type TickHandler = Box<dyn Fn(&TickEvent) + Send>;

// =============================================================================
// SHARED STATE
// =============================================================================

struct EngineState {
    sequencer: PhraseSequencer,
    animator: CharacterAnimator,
    config: TypewriterConfig,
    /// A tick chain is currently armed.
    running: bool,
    /// The run has ticked at least once (initial delay already spent).
    started: bool,
    /// Bumped on stop/restart/replace/drop; callbacks armed under an
    /// older generation return without mutating.
    generation: u64,
    timer: Option<TimerHandle>,
}

impl EngineState {
    fn visible_text(&self) -> String {
        self.sequencer.visible_prefix(self.animator.cursor())
    }

    fn snapshot(&self) -> TickEvent {
        TickEvent {
            text: self.visible_text(),
            mode: self.animator.mode(),
            phrase_index: self.sequencer.phrase_index(),
            cursor: self.animator.cursor(),
            complete: self.animator.is_done(),
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

#[derive(Default)]
struct ObserverList {
    handlers: Vec<(usize, TickHandler)>,
    next_id: usize,
}

/// Everything tick callbacks need to reach, behind one `Arc` so a
/// callback can hold a `Weak` to the whole controller state.
struct Shared {
    engine: Mutex<EngineState>,
    observers: Mutex<ObserverList>,
}

// =============================================================================
// TICK CHAIN
// =============================================================================

/// Schedule the next tick. Caller holds the engine lock; the handle is
/// stored before the lock is released, so even an immediately-firing
/// timer (which must take the lock itself) finds it in place.
fn arm_locked(
    st: &mut EngineState,
    shared: &Arc<Shared>,
    scheduler: &Arc<dyn Scheduler>,
    delay: Duration,
) {
    let generation = st.generation;
    let weak = Arc::downgrade(shared);
    let sched = Arc::clone(scheduler);

    let handle = scheduler.schedule(
        delay,
        Box::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };

            let event = {
                let mut guard = shared.engine.lock().unwrap();
                if !guard.running || guard.generation != generation {
                    return;
                }
                let st = &mut *guard;
                st.started = true;
                let config = st.config;
                let next = st.animator.step(&mut st.sequencer, &config);
                match next {
                    Some(delay) => arm_locked(st, &shared, &sched, delay),
                    None => {
                        st.running = false;
                        st.timer = None;
                    }
                }
                st.snapshot()
            };

            // Lock released: observers may freely read the controller.
            notify(&shared, &event);
        }),
    );

    st.timer = Some(handle);
}

fn notify(shared: &Shared, event: &TickEvent) {
    let observers = shared.observers.lock().unwrap();
    for (_, handler) in observers.handlers.iter() {
        handler(event);
    }
}

// =============================================================================
// TYPEWRITER
// =============================================================================

/// The public typewriter animation controller.
///
/// One instance per animated text element. Instances are fully
/// independent; several on one screen coordinate only through their
/// `initial_delay`.
pub struct Typewriter {
    shared: Arc<Shared>,
    scheduler: Arc<dyn Scheduler>,
    // Reactive mirrors of engine state, synced on read. Signals are
    // thread-local; the timer thread only touches the shared state.
    visible: Signal<String>,
    complete: Signal<bool>,
}

impl std::fmt::Debug for Typewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typewriter").finish_non_exhaustive()
    }
}

impl Typewriter {
    /// Create a controller over `phrases` with wall-clock timers.
    ///
    /// Fails with [`TypewriterError::InvalidConfiguration`] when
    /// `phrases` is empty. The animation does not run until
    /// [`start`](Typewriter::start).
    pub fn new(
        phrases: Vec<String>,
        config: TypewriterConfig,
    ) -> Result<Self, TypewriterError> {
        Self::with_scheduler(phrases, config, Arc::new(ThreadScheduler::new()))
    }

    /// Create a controller driven by an injected [`Scheduler`]
    /// (virtual clocks, host frame loops).
    pub fn with_scheduler(
        phrases: Vec<String>,
        config: TypewriterConfig,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<Self, TypewriterError> {
        let sequencer = PhraseSequencer::new(phrases)?;
        let shared = Arc::new(Shared {
            engine: Mutex::new(EngineState {
                sequencer,
                animator: CharacterAnimator::new(),
                config,
                running: false,
                started: false,
                generation: 0,
                timer: None,
            }),
            observers: Mutex::new(ObserverList::default()),
        });

        Ok(Self {
            shared,
            scheduler,
            visible: signal(String::new()),
            complete: signal(false),
        })
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Arm the tick chain. No-op while running or after completion
    /// (use [`restart`](Typewriter::restart) to run again). Starting a
    /// fresh run spends `initial_delay`; resuming after
    /// [`stop`](Typewriter::stop) does not.
    pub fn start(&self) {
        let mut guard = self.shared.engine.lock().unwrap();
        if guard.running || guard.animator.is_done() {
            return;
        }
        let delay = if guard.started {
            match guard.animator.resume_delay(&guard.config) {
                Some(delay) => delay,
                None => return,
            }
        } else {
            guard.animator.first_delay(&guard.config)
        };
        guard.running = true;
        debug!(
            phrases = guard.sequencer.phrase_count(),
            delay_ms = delay.as_millis() as u64,
            "typewriter started"
        );
        arm_locked(&mut guard, &self.shared, &self.scheduler, delay);
    }

    /// Cancel the outstanding timer. The visible text freezes where it
    /// is; no further mutation ever happens until
    /// [`start`](Typewriter::start) re-arms the chain.
    pub fn stop(&self) {
        let mut guard = self.shared.engine.lock().unwrap();
        guard.cancel_timer();
        guard.running = false;
        guard.generation = guard.generation.wrapping_add(1);
        debug!("typewriter stopped");
    }

    /// Reset to the first phrase and run again from scratch, including
    /// the initial delay. Works from any state, `Done` included.
    pub fn restart(&self) {
        let mut guard = self.shared.engine.lock().unwrap();
        guard.cancel_timer();
        guard.generation = guard.generation.wrapping_add(1);
        guard.sequencer.rewind();
        guard.animator.reset();
        guard.started = false;
        guard.running = true;
        let delay = guard.animator.first_delay(&guard.config);
        debug!("typewriter restarted");
        arm_locked(&mut guard, &self.shared, &self.scheduler, delay);
    }

    /// Swap in a new phrase sequence mid-animation.
    ///
    /// The outstanding timer is cancelled before the swap, so ticks
    /// armed for the old sequence never touch the new one. A running
    /// animation restarts on the new sequence (initial delay included);
    /// a stopped one stays stopped.
    pub fn replace_phrases(&self, phrases: Vec<String>) -> Result<(), TypewriterError> {
        let sequencer = PhraseSequencer::new(phrases)?;
        let mut guard = self.shared.engine.lock().unwrap();
        let was_running = guard.running;
        guard.cancel_timer();
        guard.generation = guard.generation.wrapping_add(1);
        guard.sequencer = sequencer;
        guard.animator.reset();
        guard.started = false;
        guard.running = was_running;
        debug!(running = was_running, "typewriter phrases replaced");
        if was_running {
            let delay = guard.animator.first_delay(&guard.config);
            arm_locked(&mut guard, &self.shared, &self.scheduler, delay);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Observation
    // -------------------------------------------------------------------------

    /// The currently visible prefix of the active phrase.
    pub fn visible_text(&self) -> String {
        self.sync_signals().0
    }

    /// True once the run has reached [`Mode::Done`].
    pub fn is_complete(&self) -> bool {
        self.sync_signals().1
    }

    /// Current animation mode.
    pub fn mode(&self) -> Mode {
        self.shared.engine.lock().unwrap().animator.mode()
    }

    /// Index of the active phrase.
    pub fn phrase_index(&self) -> usize {
        self.shared.engine.lock().unwrap().sequencer.phrase_index()
    }

    /// Reactive visible-text signal, synced from engine state on read.
    pub fn visible_text_signal(&self) -> Signal<String> {
        self.sync_signals();
        self.visible.clone()
    }

    /// Reactive completion signal, synced from engine state on read.
    pub fn complete_signal(&self) -> Signal<bool> {
        self.sync_signals();
        self.complete.clone()
    }

    /// Subscribe to per-tick snapshots. The handler runs on whichever
    /// thread drives the scheduler, after the engine lock is released.
    ///
    /// Returns an unsubscribe function.
    pub fn on_tick(&self, handler: impl Fn(&TickEvent) + Send + 'static) -> Cleanup {
        let id = {
            let mut observers = self.shared.observers.lock().unwrap();
            let id = observers.next_id;
            observers.next_id += 1;
            observers.handlers.push((id, Box::new(handler)));
            id
        };

        let weak = Arc::downgrade(&self.shared);
        Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                let mut observers = shared.observers.lock().unwrap();
                observers.handlers.retain(|(hid, _)| *hid != id);
            }
        })
    }

    /// One-off snapshot of the full animation state.
    pub fn snapshot(&self) -> TickEvent {
        self.shared.engine.lock().unwrap().snapshot()
    }

    // -------------------------------------------------------------------------
    // Internal
    // -------------------------------------------------------------------------

    /// Sync the thread-local signal mirrors from shared engine state
    /// and return (visible text, completion).
    fn sync_signals(&self) -> (String, bool) {
        let (text, done) = {
            let guard = self.shared.engine.lock().unwrap();
            (guard.visible_text(), guard.animator.is_done())
        };
        if self.visible.get() != text {
            self.visible.set(text.clone());
        }
        if self.complete.get() != done {
            self.complete.set(done);
        }
        (text, done)
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        let mut guard = self.shared.engine.lock().unwrap();
        guard.cancel_timer();
        guard.running = false;
        guard.generation = guard.generation.wrapping_add(1);
    }
}

// =============================================================================
// Tests
// =============================================================================
