// Platform speech recognition contract
// The session manager drives any backend through these traits; backends report
// lifecycle and result callbacks as RecognitionEvents tagged with their SessionId.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Recognition language
pub const RECOGNITION_LANG: &str = "en-US";

/// Configuration applied to every session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionConfig {
    /// Keep listening across utterances instead of stopping after the first
    pub continuous: bool,
    /// Report partial hypotheses while the user is still speaking
    pub interim_results: bool,
    pub lang: String,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            continuous: true,
            interim_results: true,
            lang: RECOGNITION_LANG.to_string(),
        }
    }
}

/// Identity of one recognition session
///
/// Events and scheduled restarts carry the id of the session they belong to; anything
/// carrying an id other than the current session's is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One hypothesis for a result entry
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionAlternative {
    pub transcript: String,
    pub confidence: Option<f32>,
}

impl RecognitionAlternative {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            confidence: None,
        }
    }
}

/// One entry of a result list, alternatives ordered best first
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    pub alternatives: Vec<RecognitionAlternative>,
    pub is_final: bool,
}

impl RecognitionResult {
    /// Final result with a single alternative
    pub fn single(transcript: impl Into<String>) -> Self {
        Self {
            alternatives: vec![RecognitionAlternative::new(transcript)],
            is_final: true,
        }
    }
}

/// Transcript of the most recent result entry's top alternative, trimmed
///
/// Empty when there are no results or the last entry has no alternatives.
pub fn latest_transcript(results: &[RecognitionResult]) -> &str {
    results
        .last()
        .and_then(|r| r.alternatives.first())
        .map(|a| a.transcript.trim())
        .unwrap_or("")
}

/// Platform error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    Aborted,
    NotAllowed,
    Network,
    ServiceNotAllowed,
    LanguageNotSupported,
    NoSpeech,
    AudioCapture,
    /// Any code this crate does not know by name
    Other(String),
}

/// How the session manager responds to an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorRecovery {
    /// Expected user choice; no restart, nothing said
    Terminal,
    /// Connectivity or service fault; one spoken advisory, no restart
    Advisory,
    /// Transient fault; restart after the error delay
    Restart,
}

impl RecognitionErrorKind {
    pub fn as_code(&self) -> &str {
        match self {
            Self::Aborted => "aborted",
            Self::NotAllowed => "not-allowed",
            Self::Network => "network",
            Self::ServiceNotAllowed => "service-not-allowed",
            Self::LanguageNotSupported => "language-not-supported",
            Self::NoSpeech => "no-speech",
            Self::AudioCapture => "audio-capture",
            Self::Other(code) => code,
        }
    }

    pub fn recovery(&self) -> ErrorRecovery {
        match self {
            Self::Aborted | Self::NotAllowed => ErrorRecovery::Terminal,
            Self::Network | Self::ServiceNotAllowed | Self::LanguageNotSupported => {
                ErrorRecovery::Advisory
            }
            Self::NoSpeech | Self::AudioCapture | Self::Other(_) => ErrorRecovery::Restart,
        }
    }
}

impl FromStr for RecognitionErrorKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "aborted" => Self::Aborted,
            "not-allowed" => Self::NotAllowed,
            "network" => Self::Network,
            "service-not-allowed" => Self::ServiceNotAllowed,
            "language-not-supported" => Self::LanguageNotSupported,
            "no-speech" => Self::NoSpeech,
            "audio-capture" => Self::AudioCapture,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Callback from a recognition session
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Started,
    Ended,
    Error(RecognitionErrorKind),
    Result(Vec<RecognitionResult>),
}

/// Errors from the platform recognition primitive
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecognizerError {
    #[error("Speech recognition is not available")]
    Unavailable,
    #[error("Recognition session is already started")]
    AlreadyStarted,
    #[error("Failed to start recognition: {0}")]
    StartFailed(String),
}

/// Handle to one continuous recognition resource
///
/// `start` returns immediately; the outcome arrives later as a Started, Error or
/// Ended event for this session's id.
pub trait RecognitionSession: Send {
    fn start(&mut self) -> Result<(), RecognizerError>;
    fn stop(&mut self);
}

/// Platform speech recognition primitive
pub trait SpeechRecognizer: Send + Sync {
    /// Whether this environment can recognize speech at all
    fn is_available(&self) -> bool;

    /// Create a session whose events will be tagged with `id`
    fn create_session(
        &self,
        id: SessionId,
        config: &RecognitionConfig,
    ) -> Result<Box<dyn RecognitionSession>, RecognizerError>;
}

/// Recognizer for environments without speech recognition
pub struct UnavailableRecognizer;

impl SpeechRecognizer for UnavailableRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    fn create_session(
        &self,
        _id: SessionId,
        _config: &RecognitionConfig,
    ) -> Result<Box<dyn RecognitionSession>, RecognizerError> {
        Err(RecognizerError::Unavailable)
    }
}
