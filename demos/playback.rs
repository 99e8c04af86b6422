//! Playback Demo - Deterministic stepping on a manual clock
//!
//! Drives the two-phrase reference scenario on a virtual clock and
//! prints every observed frame with its timestamp and mode. No real
//! time passes; the whole animation plays out in a loop of
//! `advance` calls.
//!
//! Run with: cargo run --example playback

use std::sync::Arc;
use std::time::Duration;

use spark_typewriter::{ManualClock, Typewriter, TypewriterConfig, TypewriterError};

fn main() -> Result<(), TypewriterError> {
    let clock = ManualClock::new();
    let tw = Typewriter::with_scheduler(
        vec!["ab".to_string(), "cd".to_string()],
        TypewriterConfig::default(),
        Arc::new(clock.clone()),
    )?;

    let clock_in_observer = clock.clone();
    let _cleanup = tw.on_tick(move |event| {
        println!(
            "t={:>5}ms  {:<8?}  \"{}\"",
            clock_in_observer.now().as_millis(),
            event.mode,
            event.text
        );
    });

    tw.start();

    // 50ms resolution covers every tick boundary in the default config.
    let step = Duration::from_millis(50);
    while !tw.is_complete() {
        clock.advance(step);
    }

    println!("complete: \"{}\"", tw.visible_text());
    Ok(())
}
