//! Character Animator - Per-tick cursor movement and mode transitions
//!
//! The pure state machine at the heart of the engine: a mode plus a
//! character cursor into the current phrase. One [`step`] per scheduled
//! tick; the return value is the delay until the next tick, or `None`
//! once the machine is terminal. No timers in here - the controller
//! owns scheduling.
//!
//! [`step`]: CharacterAnimator::step

use std::time::Duration;

use tracing::trace;

use crate::engine::sequencer::PhraseSequencer;
use crate::types::{Mode, TypewriterConfig};

/// Mode + character cursor for the active phrase.
///
/// Invariant: `0 <= cursor <= sequencer.current_len()` at every tick
/// boundary.
#[derive(Debug, Clone)]
pub struct CharacterAnimator {
    mode: Mode,
    cursor: usize,
}

impl CharacterAnimator {
    /// Fresh animator: `Typing` at cursor 0.
    pub fn new() -> Self {
        Self {
            mode: Mode::Typing,
            cursor: 0,
        }
    }

    /// Current animation mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current cursor position (count of visible characters).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the machine has reached the terminal state.
    pub fn is_done(&self) -> bool {
        self.mode.is_terminal()
    }

    /// Reset to `Typing` at cursor 0 (restarts, phrase replacement).
    pub fn reset(&mut self) {
        self.mode = Mode::Typing;
        self.cursor = 0;
    }

    /// Delay before the first tick of a run.
    pub fn first_delay(&self, config: &TypewriterConfig) -> Duration {
        config.initial_delay + config.type_speed
    }

    /// Delay before the next tick when resuming a stopped run, `None`
    /// when terminal. The initial delay does not re-apply.
    pub fn resume_delay(&self, config: &TypewriterConfig) -> Option<Duration> {
        match self.mode {
            Mode::Typing => Some(config.type_speed),
            Mode::Pausing => Some(config.pause_duration),
            Mode::Erasing => Some(config.erase_speed),
            Mode::Done => None,
        }
    }

    /// Advance one tick.
    ///
    /// Performs exactly one cursor move or one mode hold, transitioning
    /// modes at the boundaries:
    ///
    /// - the tick that types the final character also enters `Pausing`
    /// - the pause tick either enters `Erasing` or, on the last phrase
    ///   of a non-looping run, `Done` (full text retained)
    /// - the tick that erases to zero advances the sequencer and enters
    ///   `Typing` on the next phrase, or `Done` when none remains
    ///
    /// Returns the delay until the next tick, `None` when terminal.
    pub fn step(
        &mut self,
        sequencer: &mut PhraseSequencer,
        config: &TypewriterConfig,
    ) -> Option<Duration> {
        match self.mode {
            Mode::Typing => {
                let len = sequencer.current_len();
                if self.cursor < len {
                    self.cursor += 1;
                }
                if self.cursor >= len {
                    self.transition(Mode::Pausing, sequencer);
                    Some(config.pause_duration)
                } else {
                    Some(config.type_speed)
                }
            }
            Mode::Pausing => {
                if sequencer.has_next() || config.looping {
                    self.transition(Mode::Erasing, sequencer);
                    Some(config.erase_speed)
                } else {
                    // Last phrase of a non-looping run: complete with
                    // the full phrase still visible.
                    self.transition(Mode::Done, sequencer);
                    None
                }
            }
            Mode::Erasing => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
                if self.cursor > 0 {
                    return Some(config.erase_speed);
                }
                let advanced = if sequencer.advance() {
                    true
                } else if config.looping {
                    sequencer.rewind();
                    true
                } else {
                    false
                };
                if advanced {
                    self.transition(Mode::Typing, sequencer);
                    Some(config.type_speed)
                } else {
                    self.transition(Mode::Done, sequencer);
                    None
                }
            }
            Mode::Done => None,
        }
    }

    fn transition(&mut self, to: Mode, sequencer: &PhraseSequencer) {
        trace!(
            from = ?self.mode,
            to = ?to,
            phrase = sequencer.phrase_index(),
            cursor = self.cursor,
            "mode transition"
        );
        self.mode = to;
    }
}

impl Default for CharacterAnimator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
