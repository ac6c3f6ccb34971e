// Read-aloud engine - one utterance at a time, word highlight driven by boundary events

use super::synthesizer::{
    BoundaryKind, SpeechEvent, SpeechSynthesizer, Utterance, UtteranceId, ANNOUNCE_RATE,
    DEFAULT_VOLUME, READ_ALOUD_RATE,
};
use crate::accessibility::SharedUi;
use crate::events::{
    HighlightChangedPayload, ReadAloudEventEmitter, UtteranceEndReason, UtteranceFinishedPayload,
    UtteranceStartedPayload,
};
use crate::text::{span_at, word_spans, WordSpan};
use parking_lot::Mutex;
use std::sync::Arc;

/// Engine shared between the shell and command handlers
pub type SharedReadAloud = Arc<Mutex<ReadAloudEngine>>;

/// Fire-and-forget spoken message (confirmations, advisories)
pub trait Announce: Send + Sync {
    fn announce(&self, text: &str);
}

impl Announce for Mutex<ReadAloudEngine> {
    fn announce(&self, text: &str) {
        self.lock().announce(text);
    }
}

/// The utterance that currently owns the speech output
struct ActiveUtterance {
    id: UtteranceId,
    /// Word spans of the utterance text; empty for announcements
    spans: Vec<WordSpan>,
}

pub struct ReadAloudEngine {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    ui: SharedUi,
    emitter: Arc<dyn ReadAloudEventEmitter>,
    current: Option<ActiveUtterance>,
    next_id: u64,
}

impl ReadAloudEngine {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        ui: SharedUi,
        emitter: Arc<dyn ReadAloudEventEmitter>,
    ) -> Self {
        Self {
            synthesizer,
            ui,
            emitter,
            current: None,
            next_id: 1,
        }
    }

    pub fn into_shared(self) -> SharedReadAloud {
        Arc::new(Mutex::new(self))
    }

    /// Read `text` aloud with word highlighting
    ///
    /// Supersedes any utterance in flight. Returns None when nothing was submitted.
    pub fn speak(&mut self, text: &str) -> Option<UtteranceId> {
        self.begin(text, READ_ALOUD_RATE, word_spans(text))
    }

    /// Speak a short message without highlighting
    pub fn announce(&mut self, text: &str) -> Option<UtteranceId> {
        self.begin(text, ANNOUNCE_RATE, Vec::new())
    }

    /// Stop speaking and clear the highlight
    pub fn cancel(&mut self) {
        self.synthesizer.cancel();
        if let Some(active) = self.current.take() {
            crate::debug!("Cancelled {}", active.id);
            self.finish(active.id, UtteranceEndReason::Cancelled);
        }
        self.clear_highlight();
    }

    /// Route a platform callback; events for anything but the current utterance are dropped
    pub fn handle_event(&mut self, id: UtteranceId, event: SpeechEvent) {
        let is_current = self.current.as_ref().is_some_and(|a| a.id == id);
        if !is_current {
            crate::trace!("Ignoring {:?} for stale {}", event, id);
            return;
        }

        match event {
            SpeechEvent::Boundary { kind, char_index } => self.on_boundary(kind, char_index),
            SpeechEvent::End => {
                self.current = None;
                self.clear_highlight();
                self.finish(id, UtteranceEndReason::Ended);
            }
            SpeechEvent::Error(reason) => {
                crate::debug!("{} failed: {}", id, reason);
                self.current = None;
                self.clear_highlight();
                self.finish(id, UtteranceEndReason::Error);
            }
        }
    }

    pub fn current(&self) -> Option<UtteranceId> {
        self.current.as_ref().map(|a| a.id)
    }

    pub fn is_speaking(&self) -> bool {
        self.current.is_some()
    }

    fn begin(&mut self, text: &str, rate: f32, spans: Vec<WordSpan>) -> Option<UtteranceId> {
        self.cancel();

        if text.trim().is_empty() {
            return None;
        }

        let id = UtteranceId(self.next_id);
        self.next_id += 1;
        let word_count = spans.len();

        let utterance = Utterance {
            id,
            text: text.to_string(),
            rate,
            volume: DEFAULT_VOLUME,
        };
        if let Err(e) = self.synthesizer.speak(utterance) {
            crate::warn!("Speech output failed: {}", e);
            return None;
        }

        crate::debug!("Speaking {} ({} words at rate {})", id, word_count, rate);
        self.current = Some(ActiveUtterance { id, spans });
        self.emitter.emit_utterance_started(UtteranceStartedPayload {
            utterance_id: id.to_string(),
            word_count,
        });
        Some(id)
    }

    fn on_boundary(&mut self, kind: BoundaryKind, char_index: usize) {
        let Some(active) = self.current.as_ref() else {
            return;
        };
        // Sentence boundaries land on the sentence's first word, which is still useful
        let Some(span) = span_at(&active.spans, char_index) else {
            crate::trace!("No word at offset {} ({:?} boundary)", char_index, kind);
            return;
        };
        let index = span.index;
        if self.ui.lock().set_highlight(Some(index)) {
            self.emitter.emit_highlight_changed(HighlightChangedPayload {
                index: Some(index),
            });
        }
    }

    fn clear_highlight(&self) {
        if self.ui.lock().set_highlight(None) {
            self.emitter
                .emit_highlight_changed(HighlightChangedPayload { index: None });
        }
    }

    fn finish(&self, id: UtteranceId, reason: UtteranceEndReason) {
        self.emitter.emit_utterance_finished(UtteranceFinishedPayload {
            utterance_id: id.to_string(),
            reason,
        });
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
