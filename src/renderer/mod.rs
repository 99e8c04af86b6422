//! Rendering surfaces.
//!
//! The engine itself performs no I/O; surfaces subscribe to a
//! [`Typewriter`](crate::Typewriter) and paint its visible text.
//! [`inline`] renders onto the current terminal line via crossterm.

pub mod inline;

pub use inline::{attach_stdout, draw, SurfaceConfig};
