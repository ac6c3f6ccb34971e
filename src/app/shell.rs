//! Application shell.
//!
//! Owns everything that lives for the whole session: the global command table, the
//! recognition session manager, the read-aloud engine, the current screen and the
//! settings file. Platform callbacks, typed input and timers are all funnelled through
//! one [`AppEvent`] channel and handled on the shell's thread, so the core never sees
//! concurrent mutation.

use crate::accessibility::{AccessibilityState, AdhdTheme, SharedUi};
use crate::content::transform::{cached, store_cached};
use crate::content::{Lesson, TransformRequest, TransformService, TransformedContent};
use crate::events::{ReadAloudEventEmitter, VoiceEnabledChangedPayload, VoiceEventEmitter};
use crate::listening::{RecognitionEvent, SessionId, SessionManager, SpeechRecognizer};
use crate::read_aloud::{
    ReadAloudEngine, SharedReadAloud, SpeechEvent, SpeechSynthesizer, UtteranceId,
};
use crate::screens::{self, Navigator, Route, Screen, ScreenContext, ShellRequest};
use crate::storage::{SessionStore, SharedSession};
use crate::util::clock::Clock;
use crate::util::run_async;
use crate::util::settings::{SettingsAccess, SettingsFile, ADHD_THEME_KEY, SPEECH_NAV_ENABLED_KEY};
use crate::voice_commands::{
    available_commands, CommandKey, CommandListing, CommandRegistry, CommandTable, SharedRegistry,
};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

/// Longest the event loop sleeps when nothing is scheduled
const IDLE_WAIT_MS: u64 = 1000;

/// Client id used for rate limiting local transformation requests
const LOCAL_CLIENT: &str = "local";

/// Everything the shell handles, in arrival order
#[derive(Debug)]
pub enum AppEvent {
    /// Callback from a recognition session
    Recognition(SessionId, RecognitionEvent),
    /// Callback from the speech synthesizer
    Speech(UtteranceId, SpeechEvent),
    /// Typed input for the current screen
    Input(String),
    Navigate(Route),
    SetVoiceEnabled(bool),
    /// Run the current lesson section through the transformation service
    Transform,
    /// Wake the loop so observers repaint
    Redraw,
    Shutdown,
}

/// Platform collaborators the shell is built from
pub struct Backends {
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub voice_events: Arc<dyn VoiceEventEmitter>,
    pub read_aloud_events: Arc<dyn ReadAloudEventEmitter>,
    pub clock: Arc<dyn Clock>,
    pub transformer: Arc<TransformService>,
}

pub struct AppShell {
    ctx: ScreenContext,
    manager: SessionManager,
    screen: Box<dyn Screen>,
    settings: SettingsFile,
    voice_events: Arc<dyn VoiceEventEmitter>,
    transformer: Arc<TransformService>,
    last_transform: Option<TransformedContent>,
}

impl AppShell {
    /// Build the shell, mount Home and restore the persisted voice navigation flag
    pub fn new(backends: Backends, settings: SettingsFile) -> Self {
        let ui: SharedUi = AccessibilityState::shared();
        if let Some(theme) = settings.get_setting::<AdhdTheme>(ADHD_THEME_KEY) {
            ui.lock().set_adhd_theme(theme);
        }

        let read_aloud: SharedReadAloud = ReadAloudEngine::new(
            backends.synthesizer,
            ui.clone(),
            backends.read_aloud_events,
        )
        .into_shared();
        let registry: SharedRegistry = CommandRegistry::shared();
        let session: SharedSession = SessionStore::shared();
        let navigator = Navigator::new();

        let ctx = ScreenContext {
            registry: registry.clone(),
            read_aloud: read_aloud.clone(),
            ui,
            session,
            navigator,
            clock: backends.clock.clone(),
        };
        registry.lock().set_global(global_commands(&ctx));

        let manager = SessionManager::new(
            backends.recognizer,
            backends.clock,
            registry,
            read_aloud,
            backends.voice_events.clone(),
        );
        let screen = screens::mount(Route::Home, &ctx);

        let mut shell = Self {
            ctx,
            manager,
            screen,
            settings,
            voice_events: backends.voice_events,
            transformer: backends.transformer,
            last_transform: None,
        };

        let enabled = shell.settings.get_bool(SPEECH_NAV_ENABLED_KEY);
        crate::debug!("Restored {} from settings: {}", SPEECH_NAV_ENABLED_KEY, enabled);
        if enabled {
            shell.manager.set_enabled(true);
            shell
                .voice_events
                .emit_voice_enabled_changed(VoiceEnabledChangedPayload { enabled: true });
        }
        shell
    }

    pub fn route(&self) -> Route {
        self.screen.route()
    }

    pub fn render(&self) -> String {
        self.screen.render()
    }

    pub fn is_voice_enabled(&self) -> bool {
        self.manager.is_enabled()
    }

    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    pub fn context(&self) -> &ScreenContext {
        &self.ctx
    }

    pub fn last_transform(&self) -> Option<&TransformedContent> {
        self.last_transform.as_ref()
    }

    /// Commands reachable by voice on the current screen
    pub fn available_commands(&self) -> Vec<CommandListing> {
        available_commands(&self.ctx.registry.lock())
    }

    /// Handle one event; returns false once the shell should stop
    pub fn handle(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Recognition(id, event) => self.manager.handle_event(id, event),
            AppEvent::Speech(id, event) => self.ctx.read_aloud.lock().handle_event(id, event),
            AppEvent::Input(input) => self.handle_input(&input),
            AppEvent::Navigate(route) => self.navigate(route),
            AppEvent::SetVoiceEnabled(enabled) => self.set_voice_enabled(enabled),
            AppEvent::Transform => self.transform_current(),
            AppEvent::Redraw => {}
            AppEvent::Shutdown => return false,
        }
        self.apply_requests();
        true
    }

    /// Fire whatever has come due at `now_ms`
    pub fn poll(&mut self, now_ms: u64) {
        self.manager.poll_restart();
        self.screen.tick(now_ms);
        self.apply_requests();
    }

    /// Earliest time the shell needs [`AppShell::poll`]
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.manager.next_deadline(), self.screen.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Run until [`AppEvent::Shutdown`], the channel closes, or the process is asked to
    /// shut down. `on_update` sees the shell after every wakeup.
    pub fn run<F>(mut self, events: Receiver<AppEvent>, mut on_update: F)
    where
        F: FnMut(&AppShell),
    {
        on_update(&self);
        crate::info!("Shell running at {}", self.route());
        loop {
            if crate::shutdown::is_shutting_down() {
                break;
            }

            let now = self.ctx.clock.now_ms();
            let wait = self
                .next_deadline()
                .map(|due| due.saturating_sub(now))
                .unwrap_or(IDLE_WAIT_MS)
                .min(IDLE_WAIT_MS);

            match events.recv_timeout(Duration::from_millis(wait)) {
                Ok(event) => {
                    if !self.handle(event) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.poll(self.ctx.clock.now_ms());
            on_update(&self);
        }
        self.shutdown();
    }

    /// Stop recognition and speech
    pub fn shutdown(&mut self) {
        crate::info!("Shutting down shell");
        self.manager.teardown();
        self.ctx.read_aloud.lock().cancel();
    }

    fn handle_input(&mut self, input: &str) {
        let theme_before = self.ctx.ui.lock().adhd_theme();
        if !self.screen.handle_input(input) {
            crate::debug!("{} ignored input {:?}", self.route(), input);
            return;
        }
        let theme = self.ctx.ui.lock().adhd_theme();
        if theme != theme_before {
            if let Err(e) = self.settings.set_setting(ADHD_THEME_KEY, theme) {
                crate::warn!("Failed to persist {}: {}", ADHD_THEME_KEY, e);
            }
        }
    }

    fn navigate(&mut self, route: Route) {
        crate::info!("Navigating {} -> {}", self.route(), route);
        // Mount first: the new screen's registration supersedes the old one, whose guard
        // then leaves the table alone when it drops
        let screen = screens::mount(route, &self.ctx);
        self.screen = screen;
    }

    fn set_voice_enabled(&mut self, enabled: bool) {
        if self.manager.is_enabled() == enabled {
            return;
        }
        self.manager.set_enabled(enabled);
        self.voice_events
            .emit_voice_enabled_changed(VoiceEnabledChangedPayload { enabled });

        if let Err(e) = self.settings.set_setting(SPEECH_NAV_ENABLED_KEY, enabled) {
            crate::warn!("Failed to persist {}: {}", SPEECH_NAV_ENABLED_KEY, e);
        }
    }

    /// Apply navigation and voice toggles queued by handlers
    fn apply_requests(&mut self) {
        for request in self.ctx.navigator.drain() {
            match request {
                ShellRequest::Navigate(route) => self.navigate(route),
                ShellRequest::SetVoiceEnabled(enabled) => self.set_voice_enabled(enabled),
            }
        }
    }

    fn transform_current(&mut self) {
        let Route::Learn { custom, .. } = self.route() else {
            crate::debug!("Nothing to transform on {}", self.route());
            return;
        };

        let (text, profile) = {
            let session = self.ctx.session.lock();
            let lesson = Lesson::for_session(&session, custom);
            let text = lesson
                .sections
                .iter()
                .flat_map(|s| s.paragraphs.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join("\n\n");
            (text, crate::content::LearnerProfile::load(&session))
        };

        if let Some(hit) = cached(&self.ctx.session.lock(), &text) {
            crate::debug!("Using cached transformation");
            self.last_transform = Some(hit);
            return;
        }

        let mut request = TransformRequest::new(text.clone());
        if let Some(profile) = profile {
            request = request.with_profile(profile.transform_profile());
        }

        let service = self.transformer.clone();
        let result = run_async(async move { service.handle(LOCAL_CLIENT, &request).await });
        match result {
            Ok(Ok(content)) => {
                store_cached(&mut self.ctx.session.lock(), &text, &content);
                self.last_transform = Some(content);
            }
            Ok(Err(e)) => crate::warn!("Transformation rejected ({}): {}", e.status(), e),
            Err(e) => crate::error!("Could not run transformation: {}", e),
        }
    }
}

impl Drop for AppShell {
    fn drop(&mut self) {
        self.manager.teardown();
        self.ctx.registry.lock().set_global(CommandTable::new());
    }
}

/// Commands available on every screen
///
/// The global table lives inside the registry, so its handlers must not hold the registry.
fn global_commands(ctx: &ScreenContext) -> CommandTable {
    let mut table = CommandTable::new();
    for (key, route, confirmation) in [
        (CommandKey::Home, Route::Home, "Going home."),
        (CommandKey::TryDemo, Route::demo(), "Opening demo lesson."),
        (CommandKey::PasteText, Route::Paste, "Paste text."),
        (CommandKey::Upload, Route::Upload, "Upload lesson."),
        (CommandKey::Preferences, Route::Profile, "Learning preferences."),
    ] {
        let navigator = ctx.navigator.clone();
        let read_aloud = ctx.read_aloud.clone();
        table = table.on(key, move |_| {
            navigator.push(route);
            read_aloud.lock().announce(confirmation);
        });
    }

    let navigator = ctx.navigator.clone();
    let read_aloud = ctx.read_aloud.clone();
    table.on(CommandKey::TurnOff, move |_| {
        navigator.set_voice_enabled(false);
        read_aloud.lock().announce("Speech navigation off.");
    })
}

#[cfg(test)]
#[path = "shell_test.rs"]
mod tests;
