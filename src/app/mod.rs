//! Application wiring: the shell event loop, console backends and setup.

mod console;
pub mod setup;
pub mod shell;

pub use shell::{AppEvent, AppShell, Backends};
