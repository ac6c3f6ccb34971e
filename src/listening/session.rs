// Speech recognition session manager
// Owns the lifecycle of one continuous recognition session: start, automatic restart,
// error classification, and transcript-to-command dispatch with debouncing.

use super::recognizer::{
    latest_transcript, ErrorRecovery, RecognitionConfig, RecognitionErrorKind, RecognitionEvent,
    RecognitionSession, SessionId, SpeechRecognizer,
};
use crate::events::{
    current_timestamp, CommandDispatchedPayload, ListeningChangedPayload, RecognitionErrorPayload,
    VoiceEventEmitter,
};
use crate::read_aloud::Announce;
use crate::util::clock::Clock;
use crate::voice_commands::{dispatch, lexicon, CommandDebouncer, DispatchOutcome, SharedRegistry};
use serde::Serialize;
use std::sync::Arc;

/// Delay before restarting after the platform ends a session (e.g. silence timeout)
pub const RESTART_AFTER_END_MS: u64 = 180;

/// Delay before restarting after an unclassified error
pub const RESTART_AFTER_ERROR_MS: u64 = 600;

/// Spoken once for connectivity and service faults
pub const CONNECTIVITY_ADVISORY: &str =
    "Speech recognition needs an internet connection. Try again when online.";

/// Lifecycle state of the current recognition session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    Stopped,
    Starting,
    Listening,
    Ending,
    Erroring,
}

/// Information about the current listening status
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListeningStatus {
    /// Whether voice navigation is enabled (user preference)
    pub enabled: bool,
    /// Whether a session is actively listening
    pub listening: bool,
    /// Whether this environment can recognize speech
    pub available: bool,
    pub state: SessionState,
}

/// The live session and its handle
struct ActiveSession {
    id: SessionId,
    handle: Box<dyn RecognitionSession>,
    state: SessionState,
    /// Set by terminal and advisory errors; a following end event must not restart
    restart_suppressed: bool,
}

/// A restart scheduled for a specific session
#[derive(Debug, Clone, Copy)]
struct PendingRestart {
    session: SessionId,
    due_ms: u64,
}

/// Manager for the continuous recognition session
///
/// Gated by the `enabled` flag: enabling creates and starts a session when the platform
/// can recognize speech, disabling stops and releases it. Platform callbacks arrive
/// through [`SessionManager::handle_event`] tagged with the session they belong to, and
/// scheduled restarts are fired by the owner's event loop via
/// [`SessionManager::poll_restart`] once [`SessionManager::next_deadline`] has passed.
pub struct SessionManager {
    recognizer: Arc<dyn SpeechRecognizer>,
    config: RecognitionConfig,
    clock: Arc<dyn Clock>,
    registry: SharedRegistry,
    announcer: Arc<dyn Announce>,
    emitter: Arc<dyn VoiceEventEmitter>,
    enabled: bool,
    listening: bool,
    active: Option<ActiveSession>,
    pending_restart: Option<PendingRestart>,
    debouncer: CommandDebouncer,
}

impl SessionManager {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        clock: Arc<dyn Clock>,
        registry: SharedRegistry,
        announcer: Arc<dyn Announce>,
        emitter: Arc<dyn VoiceEventEmitter>,
    ) -> Self {
        Self {
            recognizer,
            config: RecognitionConfig::default(),
            clock,
            registry,
            announcer,
            emitter,
            enabled: false,
            listening: false,
            active: None,
            pending_restart: None,
            debouncer: CommandDebouncer::new(),
        }
    }

    pub fn with_config(mut self, config: RecognitionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_debouncer(mut self, debouncer: CommandDebouncer) -> Self {
        self.debouncer = debouncer;
        self
    }

    /// Turn voice navigation on or off
    ///
    /// Disabling synchronously cancels any pending restart and stops the session.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        self.enabled = enabled;
        crate::info!("Voice navigation {}", if enabled { "enabled" } else { "disabled" });

        if enabled {
            self.open_session();
        } else {
            self.teardown();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// State of the current session, Stopped when there is none
    pub fn state(&self) -> SessionState {
        self.active
            .as_ref()
            .map(|a| a.state)
            .unwrap_or(SessionState::Stopped)
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn status(&self) -> ListeningStatus {
        ListeningStatus {
            enabled: self.enabled,
            listening: self.listening,
            available: self.recognizer.is_available(),
            state: self.state(),
        }
    }

    /// When the pending restart is due, if one is scheduled
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending_restart.map(|p| p.due_ms)
    }

    /// Route a platform callback for session `id`
    ///
    /// Events from any session other than the current one are ignored.
    pub fn handle_event(&mut self, id: SessionId, event: RecognitionEvent) {
        if self.current_session() != Some(id) {
            crate::trace!("Ignoring {:?} from stale session {}", event, id);
            return;
        }

        match event {
            RecognitionEvent::Started => self.on_started(),
            RecognitionEvent::Ended => self.on_ended(id),
            RecognitionEvent::Error(kind) => self.on_error(id, kind),
            RecognitionEvent::Result(results) => {
                let transcript = latest_transcript(&results).to_string();
                self.handle_transcript(&transcript);
            }
        }
    }

    /// Resolve a transcript and dispatch it unless debounced
    ///
    /// Returns the dispatch outcome, or None when the transcript is not a command or the
    /// command was suppressed.
    pub fn handle_transcript(&mut self, transcript: &str) -> Option<DispatchOutcome> {
        let Some(command) = lexicon::resolve(transcript) else {
            crate::trace!("No command for transcript {:?}", transcript);
            return None;
        };

        if !self.debouncer.accept(command.key, self.clock.now_ms()) {
            return None;
        }

        let outcome = dispatch(&self.registry, command);
        self.emitter.emit_command_dispatched(CommandDispatchedPayload {
            transcript: transcript.to_string(),
            command,
            outcome,
        });
        Some(outcome)
    }

    /// Fire the pending restart if it is due
    ///
    /// A restart whose session is no longer current, or that comes due after voice
    /// navigation was disabled, is discarded.
    pub fn poll_restart(&mut self) {
        let Some(pending) = self.pending_restart else {
            return;
        };
        if self.clock.now_ms() < pending.due_ms {
            return;
        }
        self.pending_restart = None;

        if !self.enabled || self.current_session() != Some(pending.session) {
            crate::trace!("Discarding restart for stale session {}", pending.session);
            return;
        }

        crate::debug!("Restarting recognition session {}", pending.session);
        self.start_active();
    }

    /// Cancel any pending restart, stop the session and release it
    pub fn teardown(&mut self) {
        self.pending_restart = None;
        if let Some(mut active) = self.active.take() {
            crate::debug!("Stopping recognition session {}", active.id);
            active.handle.stop();
        }
        self.set_listening(false, SessionState::Stopped);
    }

    fn open_session(&mut self) {
        if !self.recognizer.is_available() {
            crate::debug!("Speech recognition unavailable, voice navigation stays inactive");
            return;
        }

        let id = SessionId::new();
        match self.recognizer.create_session(id, &self.config) {
            Ok(handle) => {
                crate::debug!("Created recognition session {}", id);
                self.active = Some(ActiveSession {
                    id,
                    handle,
                    state: SessionState::Stopped,
                    restart_suppressed: false,
                });
                self.start_active();
            }
            Err(e) => crate::warn!("Failed to create recognition session: {}", e),
        }
    }

    fn start_active(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.state = SessionState::Starting;
        if let Err(e) = active.handle.start() {
            crate::warn!("Failed to start recognition session {}: {}", active.id, e);
            active.state = SessionState::Stopped;
        }
    }

    fn on_started(&mut self) {
        if let Some(active) = self.active.as_mut() {
            crate::debug!("Recognition session {} listening", active.id);
            active.state = SessionState::Listening;
        }
        self.set_listening(true, SessionState::Listening);
    }

    fn on_ended(&mut self, id: SessionId) {
        let suppressed = match self.active.as_mut() {
            Some(active) => {
                active.state = SessionState::Ending;
                active.restart_suppressed
            }
            None => return,
        };
        crate::debug!("Recognition session {} ended", id);
        self.set_listening(false, SessionState::Ending);

        if self.enabled && !suppressed && self.pending_restart.is_none() {
            self.schedule_restart(id, RESTART_AFTER_END_MS);
        }
        self.mark_stopped();
    }

    fn on_error(&mut self, id: SessionId, kind: RecognitionErrorKind) {
        if let Some(active) = self.active.as_mut() {
            active.state = SessionState::Erroring;
        }
        self.set_listening(false, SessionState::Erroring);

        let recovery = kind.recovery();
        self.emitter.emit_recognition_error(RecognitionErrorPayload {
            error: kind.as_code().to_string(),
            recovery,
            timestamp: current_timestamp(),
        });

        match recovery {
            ErrorRecovery::Terminal => {
                crate::debug!("Recognition stopped by {}; not restarting", kind);
                self.suppress_restarts();
            }
            ErrorRecovery::Advisory => {
                crate::warn!("Recognition unavailable ({}); not restarting", kind);
                self.suppress_restarts();
                self.announcer.announce(CONNECTIVITY_ADVISORY);
            }
            ErrorRecovery::Restart => {
                crate::debug!("Recognition error {}; restarting", kind);
                if self.enabled {
                    self.schedule_restart(id, RESTART_AFTER_ERROR_MS);
                }
            }
        }
        self.mark_stopped();
    }

    fn suppress_restarts(&mut self) {
        self.pending_restart = None;
        if let Some(active) = self.active.as_mut() {
            active.restart_suppressed = true;
        }
    }

    fn schedule_restart(&mut self, session: SessionId, delay_ms: u64) {
        let due_ms = self.clock.now_ms() + delay_ms;
        crate::trace!("Restart of {} scheduled at {}ms", session, due_ms);
        self.pending_restart = Some(PendingRestart { session, due_ms });
    }

    fn mark_stopped(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.state = SessionState::Stopped;
        }
    }

    fn set_listening(&mut self, listening: bool, state: SessionState) {
        if self.listening == listening {
            return;
        }
        self.listening = listening;
        self.emitter.emit_listening_changed(ListeningChangedPayload {
            listening,
            state,
            timestamp: current_timestamp(),
        });
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
