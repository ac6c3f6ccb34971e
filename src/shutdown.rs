// Shutdown coordination module
// Provides a global flag so late callbacks can tell the app is exiting

use std::sync::atomic::{AtomicBool, Ordering};

/// Global shutdown flag - set to true when the app is shutting down
static APP_SHUTTING_DOWN: AtomicBool = AtomicBool::new(false);

/// Signal that the app is shutting down
pub fn signal_shutdown() {
    APP_SHUTTING_DOWN.store(true, Ordering::SeqCst);
    crate::info!("App shutdown signaled");
}

/// Check if the app is shutting down
/// Returns true after signal_shutdown() has been called
pub fn is_shutting_down() -> bool {
    APP_SHUTTING_DOWN.load(Ordering::SeqCst)
}

/// Install a Ctrl+C (SIGINT) handler that sets the shutdown flag and then runs
/// `on_signal`, which should wake the event loop so it can exit cleanly
pub fn install_ctrlc_handler<F>(on_signal: F) -> Result<(), ctrlc::Error>
where
    F: Fn() + Send + 'static,
{
    ctrlc::set_handler(move || {
        signal_shutdown();
        on_signal();
    })
}

#[cfg(test)]
pub(crate) fn reset_for_test() {
    APP_SHUTTING_DOWN.store(false, Ordering::SeqCst);
}

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod tests;
