//! Roles Demo - Multi-phrase run in real time
//!
//! Types a list of roles onto the current terminal line with the
//! classic cadence: 100ms per typed character, a 1s hold, 50ms per
//! erased character, completing with the last role left on screen.
//!
//! Run with: cargo run --example roles

use std::sync::mpsc;
use std::time::Duration;

use spark_typewriter::renderer::{attach_stdout, SurfaceConfig};
use spark_typewriter::{Typewriter, TypewriterConfig, TypewriterError};

fn main() -> Result<(), TypewriterError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let tw = Typewriter::new(
        vec![
            "product engineer".to_string(),
            "designer".to_string(),
            "manager".to_string(),
        ],
        TypewriterConfig {
            initial_delay: Duration::from_millis(800),
            ..TypewriterConfig::default()
        },
    )?;

    let detach = attach_stdout(&tw, SurfaceConfig::default());

    // Block until the Done tick arrives.
    let (tx, rx) = mpsc::channel();
    let _done = tw.on_tick(move |event| {
        if event.complete {
            let _ = tx.send(());
        }
    });

    tw.start();
    let _ = rx.recv();

    detach();
    println!();
    Ok(())
}
