//! Screens and navigation.
//!
//! Each screen installs its page command table when it is mounted and holds the
//! [`PageRegistration`] guard for as long as it is current, so its handlers disappear with
//! it. Handlers never navigate or toggle voice directly: they queue a [`ShellRequest`]
//! on the [`Navigator`] and the shell applies it after dispatch returns.
//!
//! [`PageRegistration`]: crate::voice_commands::PageRegistration

mod home;
mod lesson;
mod paste;
mod profile;
mod upload;

pub use home::{HomeScreen, STARTUP_INTRO_DELAY_MS, STARTUP_MESSAGE};
pub use lesson::{LessonScreen, LessonView};
pub use paste::PasteScreen;
pub use profile::ProfileScreen;
pub use upload::UploadScreen;

use crate::accessibility::SharedUi;
use crate::read_aloud::SharedReadAloud;
use crate::storage::SharedSession;
use crate::util::clock::Clock;
use crate::voice_commands::SharedRegistry;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;

/// Where the app can be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "camelCase")]
pub enum Route {
    Home,
    /// `custom` reads the stored lesson text; `optimized` shows the learner-profile badge
    Learn { custom: bool, optimized: bool },
    Profile,
    Paste,
    Upload,
}

impl Route {
    /// The demo lesson
    pub fn demo() -> Self {
        Self::Learn {
            custom: false,
            optimized: false,
        }
    }

    pub fn custom_lesson() -> Self {
        Self::Learn {
            custom: true,
            optimized: false,
        }
    }

    pub fn optimized_lesson() -> Self {
        Self::Learn {
            custom: false,
            optimized: true,
        }
    }

    /// URL-style path, used in logs and the console prompt
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Learn { custom, optimized } => {
                let mut path = "/learn".to_string();
                let mut sep = '?';
                if *custom {
                    path.push_str(&format!("{}custom=1", sep));
                    sep = '&';
                }
                if *optimized {
                    path.push_str(&format!("{}optimized=1", sep));
                }
                path
            }
            Self::Profile => "/profile".to_string(),
            Self::Paste => "/learn/paste".to_string(),
            Self::Upload => "/learn/upload".to_string(),
        }
    }

    /// Parse a console route name such as `learn`, `demo`, `custom`, or a path
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().trim_start_matches('/') {
            "" | "home" => Some(Self::Home),
            "learn" | "demo" => Some(Self::demo()),
            "custom" | "learn?custom=1" => Some(Self::custom_lesson()),
            "optimized" | "learn?optimized=1" => Some(Self::optimized_lesson()),
            "profile" | "preferences" => Some(Self::Profile),
            "paste" | "learn/paste" => Some(Self::Paste),
            "upload" | "learn/upload" => Some(Self::Upload),
            _ => None,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Work a handler asks the shell to do once dispatch has returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellRequest {
    Navigate(Route),
    SetVoiceEnabled(bool),
}

/// Queue of shell requests shared by every handler
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    pending: Arc<Mutex<VecDeque<ShellRequest>>>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, route: Route) {
        crate::debug!("Navigation requested: {}", route);
        self.pending.lock().push_back(ShellRequest::Navigate(route));
    }

    pub fn set_voice_enabled(&self, enabled: bool) {
        self.pending
            .lock()
            .push_back(ShellRequest::SetVoiceEnabled(enabled));
    }

    /// Take all queued requests in order
    pub fn drain(&self) -> Vec<ShellRequest> {
        self.pending.lock().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.lock().is_empty()
    }
}

/// Handles every screen needs to build its page commands
#[derive(Clone)]
pub struct ScreenContext {
    pub registry: SharedRegistry,
    pub read_aloud: SharedReadAloud,
    pub ui: SharedUi,
    pub session: SharedSession,
    pub navigator: Navigator,
    pub clock: Arc<dyn Clock>,
}

impl ScreenContext {
    /// Speak a confirmation, superseding whatever is being said
    pub fn confirm(&self, text: &str) {
        self.read_aloud.lock().announce(text);
    }
}

/// A mounted screen
pub trait Screen: Send {
    fn route(&self) -> Route;

    /// Plain-text rendering for the console front end
    fn render(&self) -> String;

    /// When the screen next wants [`Screen::tick`], if ever
    fn next_deadline(&self) -> Option<u64> {
        None
    }

    /// Run timed work that has come due
    fn tick(&mut self, _now_ms: u64) {}

    /// Typed (non-voice) input for this screen; false when not understood
    fn handle_input(&mut self, _input: &str) -> bool {
        false
    }
}

/// Mount the screen for `route`, registering its page commands
pub fn mount(route: Route, ctx: &ScreenContext) -> Box<dyn Screen> {
    match route {
        Route::Home => Box::new(HomeScreen::mount(ctx)),
        Route::Learn { custom, optimized } => Box::new(LessonScreen::mount(ctx, custom, optimized)),
        Route::Profile => Box::new(ProfileScreen::mount(ctx)),
        Route::Paste => Box::new(PasteScreen::mount(ctx)),
        Route::Upload => Box::new(UploadScreen::mount(ctx)),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::demo().path(), "/learn");
        assert_eq!(Route::custom_lesson().path(), "/learn?custom=1");
        assert_eq!(Route::optimized_lesson().path(), "/learn?optimized=1");
        assert_eq!(
            Route::Learn {
                custom: true,
                optimized: true
            }
            .path(),
            "/learn?custom=1&optimized=1"
        );
        assert_eq!(Route::Paste.to_string(), "/learn/paste");
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("home"), Some(Route::Home));
        assert_eq!(Route::parse("/learn/upload"), Some(Route::Upload));
        assert_eq!(Route::parse("custom"), Some(Route::custom_lesson()));
        assert_eq!(Route::parse("nowhere"), None);
    }

    #[test]
    fn test_navigator_drains_in_order() {
        let nav = Navigator::new();
        let shared = nav.clone();
        shared.push(Route::Paste);
        shared.set_voice_enabled(false);

        assert!(nav.has_pending());
        assert_eq!(
            nav.drain(),
            vec![
                ShellRequest::Navigate(Route::Paste),
                ShellRequest::SetVoiceEnabled(false)
            ]
        );
        assert!(!nav.has_pending());
    }
}
