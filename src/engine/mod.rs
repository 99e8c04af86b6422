//! Animation engine - sequencer, animator, controller.
//!
//! Composition order, leaf first: [`sequencer`] owns the phrase list
//! and active index, [`animator`] owns the per-phrase cursor and mode
//! transitions, [`controller`] wires both to the timer capability and
//! exposes the public [`Typewriter`] unit.

pub mod animator;
pub mod controller;
pub mod sequencer;

pub use animator::CharacterAnimator;
pub use controller::{TickHandler, Typewriter};
pub use sequencer::PhraseSequencer;
