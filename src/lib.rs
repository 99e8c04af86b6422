//! # spark-typewriter
//!
//! Typewriter text animation engine for terminal UIs.
//!
//! Given an ordered sequence of phrases, a [`Typewriter`] produces a
//! continuously-updating visible substring: each phrase is typed
//! character-by-character, held, erased character-by-character, and the
//! next phrase follows, until the last phrase has been fully typed
//! (or forever, when looping).
//!
//! ## Architecture
//!
//! The engine is a cancellable, single-outstanding-timer finite state
//! machine. Each tick callback performs one state mutation and
//! schedules its successor:
//!
//! ```text
//! Scheduler tick → CharacterAnimator::step → PhraseSequencer → observers/signals
//! ```
//!
//! Scheduling is a capability: production runs on wall-clock
//! [`ThreadScheduler`] timers, while tests and host-driven frame loops
//! drive a [`ManualClock`] deterministically.
//!
//! ## Example
//!
//! ```ignore
//! use spark_typewriter::{Typewriter, TypewriterConfig};
//! use spark_typewriter::renderer::{attach_stdout, SurfaceConfig};
//!
//! let tw = Typewriter::new(
//!     vec!["product engineer".into(), "designer".into(), "manager".into()],
//!     TypewriterConfig::default(),
//! )?;
//!
//! let detach = attach_stdout(&tw, SurfaceConfig::default());
//! tw.start();
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (Mode, TypewriterConfig, TickEvent, Attr, ...)
//! - [`error`] - The construction-time error type
//! - [`timer`] - Scheduler capability (thread timers, manual clock)
//! - [`engine`] - Sequencer, animator, and the public controller
//! - [`renderer`] - Inline terminal rendering surface

pub mod engine;
pub mod error;
pub mod renderer;
pub mod timer;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::TypewriterError;

pub use engine::{CharacterAnimator, PhraseSequencer, TickHandler, Typewriter};

pub use timer::{ManualClock, Scheduler, ThreadScheduler, TimerCallback, TimerHandle};

pub use renderer::{attach_stdout, SurfaceConfig};
