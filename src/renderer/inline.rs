//! Inline Surface - Paint visible text onto the current terminal line
//!
//! The bundled rendering surface: one terminal line, repainted on every
//! tick. Each repaint returns to column 0, clears the line, prints the
//! visible text with its attributes, and appends a caret glyph while
//! the animation is incomplete. The caret blinks with the terminal's
//! native slow-blink attribute, so no extra timer is needed for it.
//!
//! # Example
//!
//! ```ignore
//! use spark_typewriter::{Typewriter, TypewriterConfig};
//! use spark_typewriter::renderer::{attach_stdout, SurfaceConfig};
//!
//! let tw = Typewriter::new(vec!["designer".into()], TypewriterConfig::default())?;
//! let detach = attach_stdout(&tw, SurfaceConfig::default());
//! tw.start();
//! // ... animation paints itself ...
//! detach();
//! ```

use std::io::{self, Write};

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType};
use tracing::warn;

use crate::engine::Typewriter;
use crate::types::{Attr, CaretStyle, Cleanup};

// =============================================================================
// Configuration
// =============================================================================

/// Appearance of the inline surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceConfig {
    /// Caret glyph style (default: Bar).
    pub caret: CaretStyle,
    /// Draw a caret while the animation is incomplete (default: true).
    pub show_caret: bool,
    /// Blink the caret via the terminal's slow-blink attribute
    /// (default: true).
    pub blink_caret: bool,
    /// Attributes applied to the visible text (default: none).
    pub text_attrs: Attr,
    /// Attributes applied to the caret glyph (default: none).
    pub caret_attrs: Attr,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            caret: CaretStyle::Bar,
            show_caret: true,
            blink_caret: true,
            text_attrs: Attr::NONE,
            caret_attrs: Attr::NONE,
        }
    }
}

// =============================================================================
// Drawing
// =============================================================================

/// Map attribute flags onto queued terminal attribute commands.
fn queue_attrs(out: &mut impl Write, attrs: Attr) -> io::Result<()> {
    const MAPPING: [(Attr, Attribute); 8] = [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::BLINK, Attribute::SlowBlink),
        (Attr::INVERSE, Attribute::Reverse),
        (Attr::HIDDEN, Attribute::Hidden),
        (Attr::STRIKETHROUGH, Attribute::CrossedOut),
    ];
    for (flag, attribute) in MAPPING {
        if attrs.contains(flag) {
            queue!(out, SetAttribute(attribute))?;
        }
    }
    Ok(())
}

/// Repaint one frame: clear the current line, print `text`, append the
/// caret while `complete` is false.
pub fn draw(
    out: &mut impl Write,
    text: &str,
    complete: bool,
    config: &SurfaceConfig,
) -> io::Result<()> {
    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;

    queue_attrs(out, config.text_attrs)?;
    queue!(out, Print(text), SetAttribute(Attribute::Reset))?;

    if config.show_caret && !complete {
        let mut caret_attrs = config.caret_attrs;
        if config.blink_caret {
            caret_attrs |= Attr::BLINK;
        }
        queue_attrs(out, caret_attrs)?;
        queue!(out, Print(config.caret.glyph()), SetAttribute(Attribute::Reset))?;
    }

    out.flush()
}

// =============================================================================
// Attachment
// =============================================================================

/// Subscribe a stdout painter to `typewriter`.
///
/// Every tick repaints the current terminal line. Repaint errors are
/// logged and dropped - a failed frame only means the next tick paints
/// a stale line. Returns a detach function.
pub fn attach_stdout(typewriter: &Typewriter, config: SurfaceConfig) -> Cleanup {
    typewriter.on_tick(move |event| {
        let mut stdout = io::stdout().lock();
        if let Err(err) = draw(&mut stdout, &event.text, event.complete, &config) {
            warn!(error = %err, "inline surface repaint failed");
        }
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str, complete: bool, config: &SurfaceConfig) -> String {
        let mut buf = Vec::new();
        draw(&mut buf, text, complete, config).expect("draw into Vec cannot fail");
        String::from_utf8(buf).expect("valid utf8")
    }

    #[test]
    fn test_draw_clears_line_and_prints_text() {
        let frame = render("hel", false, &SurfaceConfig::default());

        // Clear-line escape, then the visible text.
        assert!(frame.contains("\u{1b}[2K"));
        assert!(frame.contains("hel"));
    }

    #[test]
    fn test_caret_drawn_while_incomplete() {
        let config = SurfaceConfig::default();

        let animating = render("hel", false, &config);
        assert!(animating.contains(CaretStyle::Bar.glyph()));

        let done = render("hello", true, &config);
        assert!(!done.contains(CaretStyle::Bar.glyph()));
    }

    #[test]
    fn test_caret_styles() {
        let config = SurfaceConfig {
            caret: CaretStyle::Block,
            ..SurfaceConfig::default()
        };
        let frame = render("x", false, &config);
        assert!(frame.contains('█'));
        assert!(!frame.contains('│'));
    }

    #[test]
    fn test_caret_can_be_disabled() {
        let config = SurfaceConfig {
            show_caret: false,
            ..SurfaceConfig::default()
        };
        let frame = render("x", false, &config);
        assert!(!frame.contains(CaretStyle::Bar.glyph()));
    }

    #[test]
    fn test_text_attrs_emitted() {
        let config = SurfaceConfig {
            text_attrs: Attr::BOLD,
            ..SurfaceConfig::default()
        };
        let frame = render("x", false, &config);
        // Bold on before the text, reset after.
        assert!(frame.contains("\u{1b}[1m"));
        assert!(frame.contains("\u{1b}[0m"));
    }

    #[test]
    fn test_caret_blink_attr() {
        let blinking = render("x", false, &SurfaceConfig::default());
        assert!(blinking.contains("\u{1b}[5m"));

        let steady = render(
            "x",
            false,
            &SurfaceConfig {
                blink_caret: false,
                ..SurfaceConfig::default()
            },
        );
        assert!(!steady.contains("\u{1b}[5m"));
    }
}
