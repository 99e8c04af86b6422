//! Core types for the typewriter animation engine.
//!
//! Everything the public API hands around lives here: the animation
//! [`Mode`], the [`TypewriterConfig`] timing options, the [`TickEvent`]
//! snapshot delivered to observers, caret styling for the rendering
//! surface, and the [`Cleanup`] closure type returned by subscriptions.

use std::time::Duration;

// =============================================================================
// Cleanup
// =============================================================================

/// Cleanup function returned by subscriptions and surface attachments.
///
/// Call it to unsubscribe / detach. Safe to call exactly once.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Animation Mode
// =============================================================================

/// The four states of the typewriter state machine.
///
/// Transitions are driven by timer ticks only:
///
/// ```text
/// Typing   --(cursor reaches phrase length)--> Pausing
/// Pausing  --(pause elapsed, more phrases)-->  Erasing
/// Pausing  --(pause elapsed, last phrase)-->   Done
/// Erasing  --(cursor reaches 0, next phrase)-> Typing
/// Erasing  --(cursor reaches 0, no more)-->    Done
/// ```
///
/// `Done` is terminal: no further ticks are scheduled and the visible
/// text is frozen at whatever it was on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Mode {
    /// Revealing the current phrase one character per tick.
    #[default]
    Typing = 0,
    /// Holding the fully-typed phrase on screen.
    Pausing = 1,
    /// Removing the current phrase one character per tick.
    Erasing = 2,
    /// Terminal state. Visible text is frozen.
    Done = 3,
}

impl Mode {
    /// Check whether this is the terminal state.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        *self == Mode::Done
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Timing configuration for one typewriter run.
///
/// All fields have defaults matching the classic cadence: type at
/// 100ms/char, hold the full phrase for 1s, erase at 50ms/char.
/// Erasing is deliberately faster than typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterConfig {
    /// Delay between typing ticks (default: 100ms).
    pub type_speed: Duration,
    /// Delay between erasing ticks (default: 50ms).
    pub erase_speed: Duration,
    /// Hold duration after a phrase is fully typed (default: 1000ms).
    pub pause_duration: Duration,
    /// Extra delay before the first tick of a run (default: 0).
    ///
    /// Several controllers on one screen stagger their starts with
    /// this; they need no other coordination.
    pub initial_delay: Duration,
    /// Cycle back to the first phrase after the last one erases
    /// (default: false).
    ///
    /// When false, the run completes after the last phrase is fully
    /// typed and paused, leaving it permanently visible.
    pub looping: bool,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            type_speed: Duration::from_millis(100),
            erase_speed: Duration::from_millis(50),
            pause_duration: Duration::from_millis(1000),
            initial_delay: Duration::ZERO,
            looping: false,
        }
    }
}

// =============================================================================
// Tick Event
// =============================================================================

/// Snapshot delivered to `on_tick` observers after every tick.
///
/// The snapshot is taken with the engine already advanced, so `text`
/// is what should be on screen right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickEvent {
    /// The currently visible prefix of the active phrase.
    pub text: String,
    /// Animation mode after this tick.
    pub mode: Mode,
    /// Index of the active phrase in the sequence.
    pub phrase_index: usize,
    /// Cursor position (count of visible characters).
    pub cursor: usize,
    /// True once the run has reached [`Mode::Done`].
    pub complete: bool,
}

// =============================================================================
// Caret
// =============================================================================

/// Caret style presets for the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CaretStyle {
    /// │ vertical bar
    #[default]
    Bar = 0,
    /// █ full block
    Block = 1,
    /// _ underscore
    Underline = 2,
}

impl CaretStyle {
    /// The glyph drawn for this caret style.
    pub fn glyph(&self) -> char {
        match self {
            CaretStyle::Bar => '\u{2502}',
            CaretStyle::Block => '\u{2588}',
            CaretStyle::Underline => '_',
        }
    }
}

// =============================================================================
// Text Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const INVERSE = 1 << 5;
        const HIDDEN = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TypewriterConfig::default();

        assert_eq!(config.type_speed, Duration::from_millis(100));
        assert_eq!(config.erase_speed, Duration::from_millis(50));
        assert_eq!(config.pause_duration, Duration::from_millis(1000));
        assert_eq!(config.initial_delay, Duration::ZERO);
        assert!(!config.looping);
    }

    #[test]
    fn test_mode_terminal() {
        assert!(!Mode::Typing.is_terminal());
        assert!(!Mode::Pausing.is_terminal());
        assert!(!Mode::Erasing.is_terminal());
        assert!(Mode::Done.is_terminal());
    }

    #[test]
    fn test_caret_glyphs() {
        assert_eq!(CaretStyle::Bar.glyph(), '│');
        assert_eq!(CaretStyle::Block.glyph(), '█');
        assert_eq!(CaretStyle::Underline.glyph(), '_');
        assert_eq!(CaretStyle::default(), CaretStyle::Bar);
    }

    #[test]
    fn test_attr_combination() {
        let attrs = Attr::BOLD | Attr::ITALIC;
        assert!(attrs.contains(Attr::BOLD));
        assert!(attrs.contains(Attr::ITALIC));
        assert!(!attrs.contains(Attr::UNDERLINE));
    }
}
