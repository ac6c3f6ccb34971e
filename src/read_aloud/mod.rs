// Read-aloud module - text-to-speech with synchronized word highlighting

mod engine;
pub mod synthesizer;

pub use engine::{Announce, ReadAloudEngine, SharedReadAloud};
pub use synthesizer::{
    BoundaryKind, SilentSynthesizer, SpeechEvent, SpeechSynthesizer, SynthesisError, Utterance,
    UtteranceId,
};
