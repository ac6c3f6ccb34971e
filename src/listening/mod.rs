// Listening module for continuous voice navigation
// Provides the platform recognition contract and the SessionManager that keeps one
// recognition session alive while voice navigation is enabled

pub mod recognizer;
mod session;

pub use recognizer::{
    ErrorRecovery, RecognitionConfig, RecognitionErrorKind, RecognitionEvent, RecognitionResult,
    RecognitionSession, RecognizerError, SessionId, SpeechRecognizer, UnavailableRecognizer,
};
pub use session::{
    ListeningStatus, SessionManager, SessionState, CONNECTIVITY_ADVISORY, RESTART_AFTER_END_MS,
    RESTART_AFTER_ERROR_MS,
};
