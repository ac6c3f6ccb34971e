//! Shared utilities.
//!
//! - `clock`: millisecond time source, real or manually driven
//! - `runtime`: Tokio bridge for running async collaborators from the shell thread
//! - `settings`: persistent JSON settings file

pub mod clock;
mod runtime;
pub mod settings;

pub use clock::{Clock, ManualClock, SystemClock};
pub use runtime::{run_async, RuntimeError};
pub use settings::{SettingsAccess, SettingsError, SettingsFile};
