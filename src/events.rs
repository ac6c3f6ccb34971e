// Observable events for the presentation layer
// Defines event payloads and emission traits for testability

use serde::Serialize;

use crate::listening::{ErrorRecovery, SessionState};
use crate::voice_commands::{Command, DispatchOutcome};

/// Voice navigation event names
pub mod voice_events {
    pub const VOICE_ENABLED_CHANGED: &str = "voice_enabled_changed";
    pub const LISTENING_CHANGED: &str = "listening_changed";
    pub const COMMAND_DISPATCHED: &str = "command_dispatched";
    pub const RECOGNITION_ERROR: &str = "recognition_error";
}

/// Read-aloud event names
pub mod read_aloud_events {
    pub const UTTERANCE_STARTED: &str = "utterance_started";
    pub const HIGHLIGHT_CHANGED: &str = "highlight_changed";
    pub const UTTERANCE_FINISHED: &str = "utterance_finished";
}

/// Payload for voice_enabled_changed event
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VoiceEnabledChangedPayload {
    pub enabled: bool,
}

/// Payload for listening_changed event
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListeningChangedPayload {
    /// Whether a recognition session is actively listening
    pub listening: bool,
    /// Session lifecycle state after the change
    pub state: SessionState,
    /// ISO 8601 timestamp of the change
    pub timestamp: String,
}

/// Payload for command_dispatched event
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommandDispatchedPayload {
    /// Trimmed transcript the command was resolved from
    pub transcript: String,
    pub command: Command,
    /// Which table handled it
    pub outcome: DispatchOutcome,
}

/// Payload for recognition_error event
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionErrorPayload {
    /// Platform error code (e.g., "not-allowed", "network")
    pub error: String,
    /// How the session manager recovers from it
    pub recovery: ErrorRecovery,
    /// ISO 8601 timestamp when the error was reported
    pub timestamp: String,
}

/// Payload for utterance_started event
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UtteranceStartedPayload {
    pub utterance_id: String,
    /// Number of highlightable words in the utterance
    pub word_count: usize,
}

/// Payload for highlight_changed event
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HighlightChangedPayload {
    /// Word index being spoken, None when the highlight is cleared
    pub index: Option<usize>,
}

/// Why an utterance stopped owning the speech output
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UtteranceEndReason {
    Ended,
    Error,
    Cancelled,
}

/// Payload for utterance_finished event
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UtteranceFinishedPayload {
    pub utterance_id: String,
    pub reason: UtteranceEndReason,
}

/// Trait for emitting voice navigation events
/// Allows mocking in tests while using the console front end in production
pub trait VoiceEventEmitter: Send + Sync {
    /// Emit voice_enabled_changed event
    fn emit_voice_enabled_changed(&self, payload: VoiceEnabledChangedPayload);

    /// Emit listening_changed event
    fn emit_listening_changed(&self, payload: ListeningChangedPayload);

    /// Emit command_dispatched event
    fn emit_command_dispatched(&self, payload: CommandDispatchedPayload);

    /// Emit recognition_error event
    fn emit_recognition_error(&self, payload: RecognitionErrorPayload);
}

/// Trait for emitting read-aloud events
pub trait ReadAloudEventEmitter: Send + Sync {
    /// Emit utterance_started event
    fn emit_utterance_started(&self, payload: UtteranceStartedPayload);

    /// Emit highlight_changed event
    fn emit_highlight_changed(&self, payload: HighlightChangedPayload);

    /// Emit utterance_finished event
    fn emit_utterance_finished(&self, payload: UtteranceFinishedPayload);
}

/// Get the current timestamp in ISO 8601 format
pub fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
#[path = "events_test.rs"]
pub(crate) mod tests;
