use super::*;
use crate::accessibility::AccessibilityState;
use crate::events::tests::MockEventEmitter;
use crate::read_aloud::synthesizer::SynthesisError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Synthesizer that records utterances instead of playing them
#[derive(Default)]
struct RecordingSynthesizer {
    spoken: Mutex<Vec<Utterance>>,
    cancels: AtomicUsize,
    fail: AtomicBool,
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }

    fn speak(&self, utterance: Utterance) -> Result<(), SynthesisError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SynthesisError::SpeakFailed("device busy".to_string()));
        }
        self.spoken.lock().push(utterance);
        Ok(())
    }
}

struct Fixture {
    engine: ReadAloudEngine,
    synth: Arc<RecordingSynthesizer>,
    ui: SharedUi,
    emitter: Arc<MockEventEmitter>,
}

fn fixture() -> Fixture {
    let synth = Arc::new(RecordingSynthesizer::default());
    let ui = AccessibilityState::shared();
    let emitter = Arc::new(MockEventEmitter::new());
    let engine = ReadAloudEngine::new(synth.clone(), ui.clone(), emitter.clone());
    Fixture {
        engine,
        synth,
        ui,
        emitter,
    }
}

fn word_boundary(char_index: usize) -> SpeechEvent {
    SpeechEvent::Boundary {
        kind: BoundaryKind::Word,
        char_index,
    }
}

#[test]
fn test_speak_submits_reduced_rate_utterance() {
    let mut f = fixture();
    let id = f.engine.speak("Plants make food.").unwrap();

    let spoken = f.synth.spoken.lock();
    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].id, id);
    assert_eq!(spoken[0].text, "Plants make food.");
    assert_eq!(spoken[0].rate, READ_ALOUD_RATE);
    assert_eq!(spoken[0].volume, 1.0);
    assert_eq!(f.emitter.utterance_started_events.lock().unwrap()[0].word_count, 3);
}

#[test]
fn test_speak_cancels_before_submitting() {
    let mut f = fixture();
    f.engine.speak("one");
    assert_eq!(f.synth.cancels.load(Ordering::SeqCst), 1);
}

#[test]
fn test_boundary_sets_highlight_to_containing_word() {
    let mut f = fixture();
    // "Plants" 0..6, "make" 7..11, "food" 12..16
    let id = f.engine.speak("Plants make food.").unwrap();

    f.engine.handle_event(id, word_boundary(7));
    assert_eq!(f.ui.lock().highlight(), Some(1));

    f.engine.handle_event(id, word_boundary(14));
    assert_eq!(f.ui.lock().highlight(), Some(2));
}

#[test]
fn test_boundary_outside_any_word_keeps_highlight() {
    let mut f = fixture();
    let id = f.engine.speak("Plants make food.").unwrap();
    f.engine.handle_event(id, word_boundary(0));

    // Offset 6 is the space after "Plants"
    f.engine.handle_event(id, word_boundary(6));
    assert_eq!(f.ui.lock().highlight(), Some(0));
}

#[test]
fn test_sentence_boundary_highlights_first_word() {
    let mut f = fixture();
    let id = f.engine.speak("One two. Three four.").unwrap();
    f.engine.handle_event(
        id,
        SpeechEvent::Boundary {
            kind: BoundaryKind::Sentence,
            char_index: 9,
        },
    );
    assert_eq!(f.ui.lock().highlight(), Some(2));
}

#[test]
fn test_end_clears_highlight() {
    let mut f = fixture();
    let id = f.engine.speak("Plants make food.").unwrap();
    f.engine.handle_event(id, word_boundary(7));

    f.engine.handle_event(id, SpeechEvent::End);

    assert_eq!(f.ui.lock().highlight(), None);
    assert!(!f.engine.is_speaking());
    let finished = f.emitter.utterance_finished_events.lock().unwrap();
    assert_eq!(finished.last().unwrap().reason, UtteranceEndReason::Ended);
}

#[test]
fn test_error_clears_highlight_without_retry() {
    let mut f = fixture();
    let id = f.engine.speak("Plants make food.").unwrap();
    f.engine.handle_event(id, word_boundary(0));

    f.engine
        .handle_event(id, SpeechEvent::Error("synthesis-failed".to_string()));

    assert_eq!(f.ui.lock().highlight(), None);
    assert_eq!(f.synth.spoken.lock().len(), 1);
}

#[test]
fn test_second_speak_supersedes_first() {
    let mut f = fixture();
    let a = f.engine.speak("alpha beta gamma").unwrap();
    f.engine.handle_event(a, word_boundary(6));
    assert_eq!(f.ui.lock().highlight(), Some(1));

    let b = f.engine.speak("delta epsilon").unwrap();

    // New utterance starts with no highlight
    assert_eq!(f.ui.lock().highlight(), None);
    assert_eq!(f.engine.current(), Some(b));

    // Late boundary for a is ignored; b's boundaries drive the highlight
    f.engine.handle_event(a, word_boundary(11));
    assert_eq!(f.ui.lock().highlight(), None);
    f.engine.handle_event(b, word_boundary(6));
    assert_eq!(f.ui.lock().highlight(), Some(1));

    // Late end for a does not clear b's highlight
    f.engine.handle_event(a, SpeechEvent::End);
    assert_eq!(f.ui.lock().highlight(), Some(1));

    let finished = f.emitter.utterance_finished_events.lock().unwrap();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].reason, UtteranceEndReason::Cancelled);
}

#[test]
fn test_cancel_clears_highlight_and_current() {
    let mut f = fixture();
    let id = f.engine.speak("alpha beta").unwrap();
    f.engine.handle_event(id, word_boundary(0));

    f.engine.cancel();

    assert_eq!(f.ui.lock().highlight(), None);
    assert!(f.engine.current().is_none());
    assert_eq!(f.emitter.highlight_events.lock().unwrap().len(), 2);
}

#[test]
fn test_announce_uses_announce_rate_and_never_highlights() {
    let mut f = fixture();
    let id = f.engine.announce("Next section.").unwrap();
    assert_eq!(f.synth.spoken.lock()[0].rate, ANNOUNCE_RATE);

    f.engine.handle_event(id, word_boundary(0));
    assert_eq!(f.ui.lock().highlight(), None);
}

#[test]
fn test_announce_interrupts_narration() {
    let mut f = fixture();
    let narration = f.engine.speak("alpha beta").unwrap();
    f.engine.handle_event(narration, word_boundary(6));

    let shared = f.engine.into_shared();
    Announce::announce(&*shared, "Paused.");

    assert_eq!(f.ui.lock().highlight(), None);
    assert_ne!(shared.lock().current(), Some(narration));
}

#[test]
fn test_failed_speak_is_silent() {
    let mut f = fixture();
    f.synth.fail.store(true, Ordering::SeqCst);

    assert!(f.engine.speak("alpha").is_none());
    assert!(!f.engine.is_speaking());
    assert_eq!(f.ui.lock().highlight(), None);
}

#[test]
fn test_without_speech_output_nothing_speaks() {
    let mut engine = ReadAloudEngine::new(
        Arc::new(crate::read_aloud::SilentSynthesizer),
        AccessibilityState::shared(),
        Arc::new(MockEventEmitter::new()),
    );

    assert!(engine.speak("alpha beta").is_none());
    assert!(engine.announce("Paused.").is_none());
    assert!(!engine.is_speaking());
}

#[test]
fn test_blank_text_is_not_submitted() {
    let mut f = fixture();
    assert!(f.engine.speak("   ").is_none());
    assert!(f.synth.spoken.lock().is_empty());
}

#[test]
fn test_highlight_indices_match_lesson_rendering() {
    let mut f = fixture();
    let blocks = ["Photosynthesis", "Plants make food.", "They use light."];
    let text = blocks.join("\n\n");
    let id = f.engine.speak(&text).unwrap();

    // "They" is word 4 across heading and paragraphs
    let they = text.find("They").unwrap();
    f.engine.handle_event(id, word_boundary(they));

    let rendered = crate::text::segment_blocks(&blocks[..]);
    let they_index = rendered[2].tokens[0].word_index;
    assert_eq!(f.ui.lock().highlight(), they_index);
    assert_eq!(they_index, Some(4));
}
