// Hands-free accessible reader: voice navigation, reading modes and synchronized read-aloud

// Enable coverage attribute on nightly for explicit exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod accessibility;
pub mod app;
pub mod content;
pub mod events;
pub mod listening;
pub mod read_aloud;
pub mod screens;
pub mod shutdown;
pub mod storage;
pub mod text;
pub mod util;
pub mod voice_commands;

// Re-export log macros for use throughout the crate
pub use log::{debug, error, info, trace, warn};

/// Application entry point - runs the console front end until exit.
/// Note: This function cannot be unit tested as it reads stdin.
#[cfg_attr(coverage_nightly, coverage(off))]
pub fn run() {
    app::setup::init_logging();
    if let Err(e) = app::setup::setup() {
        error!("Failed to start neuroadapt: {}", e);
        std::process::exit(1);
    }
}
