//! Application setup and initialization.
//!
//! Wires the console backends, settings and transformation service into an
//! [`AppShell`] and runs it on the calling thread.

use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::sync::Arc;

use super::console::{
    spawn_stdin_reader, ConsoleEventEmitter, ConsoleRecognizer, ConsoleSynthesizer, ConsoleView,
    DEFAULT_WORD_MS, HELP,
};
use super::shell::{AppEvent, AppShell, Backends};
use crate::content::{TransformService, UnconfiguredTransformer};
use crate::shutdown;
use crate::util::clock::{Clock, SystemClock};
use crate::util::settings::{default_settings_path, SettingsFile};

/// Initialize logging: debug builds log at Debug, release at Info; `RUST_LOG` overrides
pub fn init_logging() {
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}

/// Main application setup function.
///
/// Returns once the shell has shut down.
pub fn setup() -> Result<(), Box<dyn std::error::Error>> {
    crate::info!("Setting up neuroadapt...");

    let (tx, rx) = mpsc::channel::<AppEvent>();
    setup_signal_handlers(tx.clone());

    let settings_path = default_settings_path()?;
    crate::info!("Using settings at {:?}", settings_path);
    let settings = SettingsFile::load_or_default(settings_path);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let recognizer = Arc::new(ConsoleRecognizer::new(tx.clone()));
    let emitter = Arc::new(ConsoleEventEmitter);
    let backends = Backends {
        recognizer: recognizer.clone(),
        synthesizer: Arc::new(ConsoleSynthesizer::new(tx.clone(), DEFAULT_WORD_MS)),
        voice_events: emitter.clone(),
        read_aloud_events: emitter,
        transformer: Arc::new(TransformService::new(
            Arc::new(UnconfiguredTransformer),
            clock.clone(),
        )),
        clock,
    };

    let shell = AppShell::new(backends, settings);

    let help = Arc::new(AtomicBool::new(false));
    spawn_stdin_reader(tx, recognizer, help.clone())?;
    println!("{}", HELP);

    let mut view = ConsoleView::new(help);
    shell.run(rx, |shell| view.update(shell));

    crate::info!("neuroadapt exited");
    Ok(())
}

/// Ctrl+C sets the shutdown flag and wakes the event loop
fn setup_signal_handlers(events: mpsc::Sender<AppEvent>) {
    if let Err(e) = shutdown::install_ctrlc_handler(move || {
        let _ = events.send(AppEvent::Shutdown);
    }) {
        crate::warn!("Failed to set Ctrl+C handler: {}", e);
    }
}
