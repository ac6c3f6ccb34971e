//! Console front end.
//!
//! Stands in for the microphone, the speaker and the page: typed lines are "heard" by the
//! live recognition session, utterances are printed and paced word by word on a
//! background thread, and the current screen is repainted whenever it changes. Every
//! callback is posted to the shell's [`AppEvent`] channel so the core stays
//! single-threaded.

use super::shell::{AppEvent, AppShell};
use crate::events::{
    read_aloud_events, voice_events, CommandDispatchedPayload, HighlightChangedPayload,
    ListeningChangedPayload, ReadAloudEventEmitter, RecognitionErrorPayload,
    UtteranceFinishedPayload, UtteranceStartedPayload, VoiceEnabledChangedPayload,
    VoiceEventEmitter,
};
use crate::listening::{
    RecognitionConfig, RecognitionErrorKind, RecognitionEvent, RecognitionResult,
    RecognitionSession, RecognizerError, SessionId, SpeechRecognizer,
};
use crate::read_aloud::{
    BoundaryKind, SpeechEvent, SpeechSynthesizer, SynthesisError, Utterance, UtteranceId,
};
use crate::screens::Route;
use crate::text::word_spans;
use parking_lot::Mutex;
use serde::Serialize;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Pacing of console speech at rate 1.0
pub const DEFAULT_WORD_MS: u64 = 250;

/// Recognizer fed by typed lines
pub struct ConsoleRecognizer {
    events: Sender<AppEvent>,
    live: Arc<Mutex<Option<SessionId>>>,
}

impl ConsoleRecognizer {
    pub fn new(events: Sender<AppEvent>) -> Self {
        Self {
            events,
            live: Arc::new(Mutex::new(None)),
        }
    }

    /// Deliver `transcript` as a final result to the live session
    ///
    /// Returns false when no session is listening.
    pub fn hear(&self, transcript: &str) -> bool {
        self.simulate(RecognitionEvent::Result(vec![RecognitionResult::single(
            transcript,
        )]))
    }

    /// Inject a platform callback into the live session
    ///
    /// An `Ended` or `Error` ends the session the way the platform would.
    pub fn simulate(&self, event: RecognitionEvent) -> bool {
        let mut live = self.live.lock();
        let Some(id) = *live else {
            return false;
        };
        if matches!(event, RecognitionEvent::Ended | RecognitionEvent::Error(_)) {
            *live = None;
        }
        self.events.send(AppEvent::Recognition(id, event)).is_ok()
    }

    pub fn is_listening(&self) -> bool {
        self.live.lock().is_some()
    }
}

impl SpeechRecognizer for ConsoleRecognizer {
    fn is_available(&self) -> bool {
        true
    }

    fn create_session(
        &self,
        id: SessionId,
        config: &RecognitionConfig,
    ) -> Result<Box<dyn RecognitionSession>, RecognizerError> {
        crate::debug!("Creating console session {} ({})", id, config.lang);
        Ok(Box::new(ConsoleSession {
            id,
            events: self.events.clone(),
            live: self.live.clone(),
        }))
    }
}

struct ConsoleSession {
    id: SessionId,
    events: Sender<AppEvent>,
    live: Arc<Mutex<Option<SessionId>>>,
}

impl RecognitionSession for ConsoleSession {
    fn start(&mut self) -> Result<(), RecognizerError> {
        let mut live = self.live.lock();
        if *live == Some(self.id) {
            return Err(RecognizerError::AlreadyStarted);
        }
        *live = Some(self.id);
        self.events
            .send(AppEvent::Recognition(self.id, RecognitionEvent::Started))
            .map_err(|_| RecognizerError::StartFailed("event loop has exited".to_string()))
    }

    fn stop(&mut self) {
        let mut live = self.live.lock();
        if *live != Some(self.id) {
            return;
        }
        *live = None;
        // Loop already gone during shutdown
        let _ = self
            .events
            .send(AppEvent::Recognition(self.id, RecognitionEvent::Ended));
    }
}

/// Synthesizer that prints the utterance and reports word boundaries at reading pace
pub struct ConsoleSynthesizer {
    events: Sender<AppEvent>,
    current: Arc<Mutex<Option<UtteranceId>>>,
    word_ms: u64,
}

impl ConsoleSynthesizer {
    pub fn new(events: Sender<AppEvent>, word_ms: u64) -> Self {
        Self {
            events,
            current: Arc::new(Mutex::new(None)),
            word_ms,
        }
    }
}

/// Send `event` for `id` only while it is still the current utterance
///
/// The check and the send happen under one lock, so nothing for a cancelled utterance
/// is sent once `cancel` has returned.
fn send_if_current(
    current: &Mutex<Option<UtteranceId>>,
    events: &Sender<AppEvent>,
    id: UtteranceId,
    event: SpeechEvent,
    finished: bool,
) -> bool {
    let mut current = current.lock();
    if *current != Some(id) {
        return false;
    }
    if finished {
        *current = None;
    }
    events.send(AppEvent::Speech(id, event)).is_ok()
}

impl SpeechSynthesizer for ConsoleSynthesizer {
    fn cancel(&self) {
        if let Some(id) = self.current.lock().take() {
            crate::trace!("Cancelled {}", id);
        }
    }

    fn speak(&self, utterance: Utterance) -> Result<(), SynthesisError> {
        let id = utterance.id;
        *self.current.lock() = Some(id);
        println!("🔊 {}", utterance.text);

        let rate = if utterance.rate > 0.0 { utterance.rate } else { 1.0 };
        let pause = Duration::from_millis((self.word_ms as f32 / rate) as u64);
        let starts: Vec<usize> = word_spans(&utterance.text).iter().map(|s| s.start).collect();
        let current = self.current.clone();
        let events = self.events.clone();

        thread::Builder::new()
            .name(format!("speech-{}", id.0))
            .spawn(move || {
                for char_index in starts {
                    let boundary = SpeechEvent::Boundary {
                        kind: BoundaryKind::Word,
                        char_index,
                    };
                    if !send_if_current(&current, &events, id, boundary, false) {
                        return;
                    }
                    thread::sleep(pause);
                }
                send_if_current(&current, &events, id, SpeechEvent::End, true);
            })
            .map(|_| ())
            .map_err(|e| SynthesisError::SpeakFailed(e.to_string()))
    }
}

/// Emitter that logs every event as JSON and prints the ones a listener would notice
pub struct ConsoleEventEmitter;

impl ConsoleEventEmitter {
    fn log<T: Serialize>(&self, event: &str, payload: &T) {
        match serde_json::to_string(payload) {
            Ok(json) => crate::debug!("{} {}", event, json),
            Err(e) => crate::warn!("Failed to emit event '{}': {}", event, e),
        }
    }
}

impl VoiceEventEmitter for ConsoleEventEmitter {
    fn emit_voice_enabled_changed(&self, payload: VoiceEnabledChangedPayload) {
        self.log(voice_events::VOICE_ENABLED_CHANGED, &payload);
        let state = if payload.enabled { "on" } else { "off" };
        println!("🎙  Speech navigation {}", state);
    }

    fn emit_listening_changed(&self, payload: ListeningChangedPayload) {
        self.log(voice_events::LISTENING_CHANGED, &payload);
    }

    fn emit_command_dispatched(&self, payload: CommandDispatchedPayload) {
        self.log(voice_events::COMMAND_DISPATCHED, &payload);
        println!("✔ \"{}\" -> {}", payload.transcript, payload.command.key);
    }

    fn emit_recognition_error(&self, payload: RecognitionErrorPayload) {
        self.log(voice_events::RECOGNITION_ERROR, &payload);
        println!("⚠ Recognition error: {}", payload.error);
    }
}

impl ReadAloudEventEmitter for ConsoleEventEmitter {
    fn emit_utterance_started(&self, payload: UtteranceStartedPayload) {
        self.log(read_aloud_events::UTTERANCE_STARTED, &payload);
    }

    fn emit_highlight_changed(&self, payload: HighlightChangedPayload) {
        self.log(read_aloud_events::HIGHLIGHT_CHANGED, &payload);
    }

    fn emit_utterance_finished(&self, payload: UtteranceFinishedPayload) {
        self.log(read_aloud_events::UTTERANCE_FINISHED, &payload);
    }
}

/// One line of console input
#[derive(Debug, PartialEq)]
pub enum ConsoleLine {
    /// Spoken words for the recognizer
    Speech(String),
    /// Something for the shell
    Event(ShellEvent),
    /// Platform callback to inject into the live session
    Simulate(RecognitionEvent),
    Help,
    Blank,
}

/// The subset of [`AppEvent`] typed at the console
#[derive(Debug, PartialEq)]
pub enum ShellEvent {
    Input(String),
    Navigate(Route),
    SetVoiceEnabled(bool),
    Transform,
    Shutdown,
}

impl From<ShellEvent> for AppEvent {
    fn from(event: ShellEvent) -> Self {
        match event {
            ShellEvent::Input(input) => AppEvent::Input(input),
            ShellEvent::Navigate(route) => AppEvent::Navigate(route),
            ShellEvent::SetVoiceEnabled(enabled) => AppEvent::SetVoiceEnabled(enabled),
            ShellEvent::Transform => AppEvent::Transform,
            ShellEvent::Shutdown => AppEvent::Shutdown,
        }
    }
}

/// Parse a console line
///
/// Plain text is speech. Lines starting with `:` are actions; any action not listed in
/// [`HELP`] is passed to the current screen as typed input.
pub fn parse_line(line: &str) -> Result<ConsoleLine, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ConsoleLine::Blank);
    }
    let Some(action) = line.strip_prefix(':') else {
        return Ok(ConsoleLine::Speech(line.to_string()));
    };

    let (verb, arg) = match action.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (action, ""),
    };
    let event = match (verb, arg) {
        ("help", _) => return Ok(ConsoleLine::Help),
        ("quit" | "q", _) => ShellEvent::Shutdown,
        ("voice", "on") => ShellEvent::SetVoiceEnabled(true),
        ("voice", "off") => ShellEvent::SetVoiceEnabled(false),
        ("voice", other) => return Err(format!("Expected :voice on|off, got {:?}", other)),
        ("go", name) => match Route::parse(name) {
            Some(route) => ShellEvent::Navigate(route),
            None => return Err(format!("Unknown screen: {:?}", name)),
        },
        ("transform", _) => ShellEvent::Transform,
        ("end", _) => return Ok(ConsoleLine::Simulate(RecognitionEvent::Ended)),
        ("error", "") => return Err("Expected :error <code>".to_string()),
        ("error", code) => {
            let kind: RecognitionErrorKind = code.parse().unwrap_or_else(|never| match never {});
            return Ok(ConsoleLine::Simulate(RecognitionEvent::Error(kind)));
        }
        _ => ShellEvent::Input(action.trim().to_string()),
    };
    Ok(ConsoleLine::Event(event))
}

pub const HELP: &str = "\
Type what you would say, or an action:
  :voice on|off        turn speech navigation on or off
  :go <screen>         home, demo, custom, optimized, profile, paste, upload
  :transform           simplify the current lesson
  :end                 end the recognition session as the platform would
  :error <code>        report a recognition error (e.g. no-speech, network)
  :help                show this and the commands for this screen
  :quit                exit
Anything else after ':' goes to the screen, e.g. :submit, :mode adhd, :theme sage";

/// Read stdin on a background thread until EOF or `:quit`
pub fn spawn_stdin_reader(
    events: Sender<AppEvent>,
    recognizer: Arc<ConsoleRecognizer>,
    help: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        crate::error!("Failed to read console input: {}", e);
                        break;
                    }
                };
                let delivered = match parse_line(&line) {
                    Ok(ConsoleLine::Blank) => true,
                    Ok(ConsoleLine::Speech(words)) => {
                        if !recognizer.hear(&words) {
                            println!("(not listening; type :voice on)");
                        }
                        true
                    }
                    Ok(ConsoleLine::Simulate(event)) => {
                        if !recognizer.simulate(event) {
                            println!("(not listening)");
                        }
                        true
                    }
                    Ok(ConsoleLine::Help) => {
                        help.store(true, Ordering::SeqCst);
                        events.send(AppEvent::Redraw).is_ok()
                    }
                    Ok(ConsoleLine::Event(ShellEvent::Shutdown)) => {
                        let _ = events.send(AppEvent::Shutdown);
                        break;
                    }
                    Ok(ConsoleLine::Event(event)) => events.send(event.into()).is_ok(),
                    Err(message) => {
                        println!("{}", message);
                        true
                    }
                };
                if !delivered {
                    break;
                }
            }
            crate::debug!("Console input closed");
            let _ = events.send(AppEvent::Shutdown);
        })
}

/// Repaints the current screen when it changes and prints help on request
pub struct ConsoleView {
    last_frame: String,
    last_transform: Option<String>,
    help: Arc<AtomicBool>,
}

impl ConsoleView {
    pub fn new(help: Arc<AtomicBool>) -> Self {
        Self {
            last_frame: String::new(),
            last_transform: None,
            help,
        }
    }

    pub fn frame(shell: &AppShell) -> String {
        let voice = if shell.is_voice_enabled() { "on" } else { "off" };
        format!("[{} | voice {}]\n{}", shell.route(), voice, shell.render())
    }

    pub fn update(&mut self, shell: &AppShell) {
        let frame = Self::frame(shell);
        if frame != self.last_frame {
            println!("\n{}\n", frame);
            self.last_frame = frame;
        }

        if let Some(content) = shell.last_transform() {
            if self.last_transform.as_deref() != Some(content.simplified_version.as_str()) {
                println!("Summary: {}", content.summary);
                println!("Simplified: {}", content.simplified_version);
                if let Some(reduction) = content.complexity_reduction {
                    println!("Complexity reduced by {:.0}%", reduction);
                }
                self.last_transform = Some(content.simplified_version.clone());
            }
        }

        if self.help.swap(false, Ordering::SeqCst) {
            println!("{}", help_text(shell));
        }
    }
}

/// Console actions followed by the voice commands reachable right now
pub fn help_text(shell: &AppShell) -> String {
    let mut lines = vec![HELP.to_string(), String::new(), "Voice commands:".to_string()];
    for listing in shell.available_commands() {
        let scope = if listing.page_scoped { " (this screen)" } else { "" };
        lines.push(format!(
            "  {}{}: {}",
            listing.key,
            scope,
            listing.phrases.join(", ")
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
#[path = "console_test.rs"]
mod tests;
