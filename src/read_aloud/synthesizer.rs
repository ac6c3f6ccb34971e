// Platform text-to-speech contract

use std::fmt;
use std::str::FromStr;

/// Rate for lesson narration, slower than normal speech
pub const READ_ALOUD_RATE: f32 = 0.85;

/// Rate for short spoken confirmations and advisories
pub const ANNOUNCE_RATE: f32 = 0.9;

pub const DEFAULT_VOLUME: f32 = 1.0;

/// Identity of one utterance; events for any other id than the current one are stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub(crate) u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utterance-{}", self.0)
    }
}

/// A request to speak `text`
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub rate: f32,
    pub volume: f32,
}

/// Granularity reported by a boundary event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Word,
    Sentence,
}

impl FromStr for BoundaryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "word" => Ok(Self::Word),
            "sentence" => Ok(Self::Sentence),
            other => Err(format!("Unknown boundary kind: {}", other)),
        }
    }
}

/// Callback from the platform for one utterance
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    /// Playback reached `char_index`, a byte offset into the utterance text
    Boundary {
        kind: BoundaryKind,
        char_index: usize,
    },
    End,
    Error(String),
}

/// Errors from the platform text-to-speech primitive
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthesisError {
    #[error("Speech synthesis is not available")]
    Unavailable,
    #[error("Failed to speak utterance: {0}")]
    SpeakFailed(String),
}

/// Platform text-to-speech primitive
///
/// Owns a single output device: `speak` does not queue, callers cancel first.
/// Events for a cancelled utterance must not arrive once `cancel` returns.
pub trait SpeechSynthesizer: Send + Sync {
    fn cancel(&self);
    fn speak(&self, utterance: Utterance) -> Result<(), SynthesisError>;
}

/// Synthesizer for environments without speech output
pub struct SilentSynthesizer;

impl SpeechSynthesizer for SilentSynthesizer {
    fn cancel(&self) {}

    fn speak(&self, _utterance: Utterance) -> Result<(), SynthesisError> {
        Err(SynthesisError::Unavailable)
    }
}
