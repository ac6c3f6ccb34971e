use super::*;
use crate::events::tests::MockEventEmitter;
use crate::listening::recognizer::{RecognitionResult, RecognizerError};
use crate::util::clock::ManualClock;
use crate::voice_commands::{CommandKey, CommandRegistry, CommandTable};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Start/stop counters for one mock session
#[derive(Default)]
struct SessionCalls {
    starts: AtomicUsize,
    stops: AtomicUsize,
}

struct MockSession {
    calls: Arc<SessionCalls>,
    fail_start: bool,
}

impl RecognitionSession for MockSession {
    fn start(&mut self) -> Result<(), RecognizerError> {
        self.calls.starts.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            return Err(RecognizerError::AlreadyStarted);
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.calls.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Recognizer that hands out counting sessions
struct MockRecognizer {
    available: AtomicBool,
    fail_start: AtomicBool,
    sessions: Mutex<Vec<(SessionId, Arc<SessionCalls>)>>,
}

impl MockRecognizer {
    fn new(available: bool) -> Self {
        Self {
            available: AtomicBool::new(available),
            fail_start: AtomicBool::new(false),
            sessions: Mutex::new(Vec::new()),
        }
    }

    fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    fn calls(&self, n: usize) -> Arc<SessionCalls> {
        self.sessions.lock()[n].1.clone()
    }
}

impl SpeechRecognizer for MockRecognizer {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn create_session(
        &self,
        id: SessionId,
        config: &RecognitionConfig,
    ) -> Result<Box<dyn RecognitionSession>, RecognizerError> {
        assert!(config.continuous);
        let calls = Arc::new(SessionCalls::default());
        self.sessions.lock().push((id, calls.clone()));
        Ok(Box::new(MockSession {
            calls,
            fail_start: self.fail_start.load(Ordering::SeqCst),
        }))
    }
}

/// Announcer that records what would have been spoken
#[derive(Default)]
struct MockAnnouncer {
    spoken: Mutex<Vec<String>>,
}

impl Announce for MockAnnouncer {
    fn announce(&self, text: &str) {
        self.spoken.lock().push(text.to_string());
    }
}

struct Fixture {
    manager: SessionManager,
    recognizer: Arc<MockRecognizer>,
    clock: Arc<ManualClock>,
    registry: SharedRegistry,
    announcer: Arc<MockAnnouncer>,
    emitter: Arc<MockEventEmitter>,
}

fn fixture_with(available: bool) -> Fixture {
    let recognizer = Arc::new(MockRecognizer::new(available));
    let clock = Arc::new(ManualClock::new(10_000));
    let registry = CommandRegistry::shared();
    let announcer = Arc::new(MockAnnouncer::default());
    let emitter = Arc::new(MockEventEmitter::new());
    let manager = SessionManager::new(
        recognizer.clone(),
        clock.clone(),
        registry.clone(),
        announcer.clone(),
        emitter.clone(),
    );
    Fixture {
        manager,
        recognizer,
        clock,
        registry,
        announcer,
        emitter,
    }
}

fn fixture() -> Fixture {
    fixture_with(true)
}

/// Enable and acknowledge the start, returning the live session id
fn listening(f: &mut Fixture) -> SessionId {
    f.manager.set_enabled(true);
    let id = f.manager.current_session().unwrap();
    f.manager.handle_event(id, RecognitionEvent::Started);
    id
}

fn error(code: &str) -> RecognitionEvent {
    RecognitionEvent::Error(code.parse().unwrap())
}

fn transcript(text: &str) -> RecognitionEvent {
    RecognitionEvent::Result(vec![RecognitionResult::single(text)])
}

fn counter(registry: &SharedRegistry, key: CommandKey) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    registry
        .lock()
        .register_page(CommandTable::new().on(key, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        }));
    count
}

// ---- Lifecycle ----

#[test]
fn test_disabled_has_no_session() {
    let f = fixture();
    assert!(!f.manager.is_enabled());
    assert_eq!(f.recognizer.session_count(), 0);
    assert_eq!(f.manager.state(), SessionState::Stopped);
}

#[test]
fn test_enable_without_recognizer_is_silent_noop() {
    let mut f = fixture_with(false);
    f.manager.set_enabled(true);

    assert!(f.manager.is_enabled());
    assert!(f.manager.current_session().is_none());
    assert!(f.emitter.error_events.lock().unwrap().is_empty());
    assert!(f.announcer.spoken.lock().is_empty());
    assert!(!f.manager.status().available);
}

#[test]
fn test_enable_creates_and_starts_session() {
    let mut f = fixture();
    f.manager.set_enabled(true);

    assert_eq!(f.recognizer.session_count(), 1);
    assert_eq!(f.recognizer.calls(0).starts.load(Ordering::SeqCst), 1);
    assert_eq!(f.manager.state(), SessionState::Starting);
    assert!(!f.manager.is_listening());
}

#[test]
fn test_started_event_sets_listening() {
    let mut f = fixture();
    listening(&mut f);

    assert!(f.manager.is_listening());
    assert_eq!(f.manager.state(), SessionState::Listening);
    assert_eq!(f.emitter.listening_flags(), vec![true]);
}

#[test]
fn test_enable_twice_keeps_one_session() {
    let mut f = fixture();
    f.manager.set_enabled(true);
    f.manager.set_enabled(true);
    assert_eq!(f.recognizer.session_count(), 1);
}

#[test]
fn test_failed_start_leaves_session_stopped() {
    let mut f = fixture();
    f.recognizer.fail_start.store(true, Ordering::SeqCst);
    f.manager.set_enabled(true);

    assert_eq!(f.manager.state(), SessionState::Stopped);
    assert!(f.manager.next_deadline().is_none());
}

// ---- Automatic restart ----

#[test]
fn test_end_schedules_restart_after_180ms() {
    let mut f = fixture();
    let id = listening(&mut f);

    f.manager.handle_event(id, RecognitionEvent::Ended);

    assert!(!f.manager.is_listening());
    assert_eq!(f.manager.state(), SessionState::Stopped);
    assert_eq!(f.manager.next_deadline(), Some(10_180));

    f.clock.advance(179);
    f.manager.poll_restart();
    assert_eq!(f.recognizer.calls(0).starts.load(Ordering::SeqCst), 1);

    f.clock.advance(1);
    f.manager.poll_restart();
    assert_eq!(f.recognizer.calls(0).starts.load(Ordering::SeqCst), 2);
    assert_eq!(f.manager.state(), SessionState::Starting);
    assert!(f.manager.next_deadline().is_none());

    // Same session is reused across restarts
    assert_eq!(f.recognizer.session_count(), 1);
    assert_eq!(f.manager.current_session(), Some(id));
}

#[test]
fn test_restart_cycle_repeats() {
    let mut f = fixture();
    let id = listening(&mut f);

    for _ in 0..3 {
        f.manager.handle_event(id, RecognitionEvent::Ended);
        f.clock.advance(RESTART_AFTER_END_MS);
        f.manager.poll_restart();
        f.manager.handle_event(id, RecognitionEvent::Started);
    }

    assert_eq!(f.recognizer.calls(0).starts.load(Ordering::SeqCst), 4);
    assert!(f.manager.is_listening());
}

#[test]
fn test_unknown_error_restarts_after_600ms() {
    let mut f = fixture();
    let id = listening(&mut f);

    f.manager.handle_event(id, error("no-speech"));
    assert_eq!(f.manager.next_deadline(), Some(10_600));

    // The end event that follows does not shorten the delay
    f.manager.handle_event(id, RecognitionEvent::Ended);
    assert_eq!(f.manager.next_deadline(), Some(10_600));

    f.clock.advance(599);
    f.manager.poll_restart();
    assert_eq!(f.recognizer.calls(0).starts.load(Ordering::SeqCst), 1);
    f.clock.advance(1);
    f.manager.poll_restart();
    assert_eq!(f.recognizer.calls(0).starts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_permission_denied_is_terminal() {
    for code in ["not-allowed", "aborted"] {
        let mut f = fixture();
        let id = listening(&mut f);

        f.manager.handle_event(id, error(code));
        f.manager.handle_event(id, RecognitionEvent::Ended);

        assert!(f.manager.next_deadline().is_none(), "code {code}");
        f.clock.advance(10_000);
        f.manager.poll_restart();
        assert_eq!(f.recognizer.calls(0).starts.load(Ordering::SeqCst), 1);
        assert!(f.announcer.spoken.lock().is_empty());
        assert!(!f.manager.is_listening());
    }
}

#[test]
fn test_connectivity_error_speaks_advisory_once() {
    for code in ["network", "service-not-allowed", "language-not-supported"] {
        let mut f = fixture();
        let id = listening(&mut f);

        f.manager.handle_event(id, error(code));
        f.manager.handle_event(id, RecognitionEvent::Ended);

        assert_eq!(
            *f.announcer.spoken.lock(),
            vec![CONNECTIVITY_ADVISORY.to_string()],
            "code {code}"
        );
        assert!(f.manager.next_deadline().is_none());
    }
}

#[test]
fn test_error_event_is_emitted_with_recovery() {
    let mut f = fixture();
    let id = listening(&mut f);
    f.manager.handle_event(id, error("network"));

    let errors = f.emitter.error_events.lock().unwrap();
    assert_eq!(errors[0].error, "network");
    assert_eq!(errors[0].recovery, ErrorRecovery::Advisory);
}

// ---- Teardown and staleness ----

#[test]
fn test_disable_stops_session_and_cancels_restart() {
    let mut f = fixture();
    let id = listening(&mut f);
    f.manager.handle_event(id, RecognitionEvent::Ended);
    assert!(f.manager.next_deadline().is_some());

    f.manager.set_enabled(false);

    assert!(f.manager.next_deadline().is_none());
    assert!(f.manager.current_session().is_none());
    assert_eq!(f.recognizer.calls(0).stops.load(Ordering::SeqCst), 1);

    f.clock.advance(1_000);
    f.manager.poll_restart();
    assert_eq!(f.recognizer.calls(0).starts.load(Ordering::SeqCst), 1);
}

#[test]
fn test_events_from_discarded_session_are_ignored() {
    let mut f = fixture();
    let old = listening(&mut f);
    f.manager.set_enabled(false);
    let new = listening(&mut f);
    assert_ne!(old, new);

    // Late end from the old session must not schedule anything for the new one
    f.manager.handle_event(old, RecognitionEvent::Ended);
    assert!(f.manager.next_deadline().is_none());
    assert!(f.manager.is_listening());

    // Late results from the old session are not dispatched either
    let count = counter(&f.registry, CommandKey::Next);
    f.manager.handle_event(old, transcript("next"));
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_stale_restart_does_not_start_newer_session() {
    let mut f = fixture();
    let old = listening(&mut f);
    f.manager.handle_event(old, RecognitionEvent::Ended);

    // Re-enable within the restart window
    f.manager.set_enabled(false);
    f.manager.set_enabled(true);
    f.clock.advance(RESTART_AFTER_END_MS);
    f.manager.poll_restart();

    assert_eq!(f.recognizer.calls(0).starts.load(Ordering::SeqCst), 1);
    assert_eq!(f.recognizer.calls(1).starts.load(Ordering::SeqCst), 1);
}

#[test]
fn test_events_while_disabled_are_ignored() {
    let mut f = fixture();
    let id = listening(&mut f);
    f.manager.set_enabled(false);

    f.manager.handle_event(id, RecognitionEvent::Started);
    assert!(!f.manager.is_listening());
}

#[test]
fn test_drop_stops_session() {
    let mut f = fixture();
    listening(&mut f);
    let calls = f.recognizer.calls(0);

    drop(f.manager);

    assert_eq!(calls.stops.load(Ordering::SeqCst), 1);
}

// ---- Transcripts ----

#[test]
fn test_result_dispatches_resolved_command() {
    let mut f = fixture();
    let id = listening(&mut f);
    let count = counter(&f.registry, CommandKey::FontBigger);

    f.manager.handle_event(id, transcript("  Bigger Font "));

    assert_eq!(count.load(Ordering::SeqCst), 1);
    let dispatched = f.emitter.dispatched_events.lock().unwrap();
    assert_eq!(dispatched[0].transcript, "Bigger Font");
    assert_eq!(dispatched[0].outcome, DispatchOutcome::Page);
}

#[test]
fn test_only_last_result_is_used() {
    let mut f = fixture();
    let id = listening(&mut f);
    let count = counter(&f.registry, CommandKey::Next);

    f.manager.handle_event(
        id,
        RecognitionEvent::Result(vec![
            RecognitionResult::single("next"),
            RecognitionResult::single("hello there"),
        ]),
    );

    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unrecognized_transcript_is_dropped() {
    let mut f = fixture();
    let id = listening(&mut f);
    f.manager.handle_event(id, transcript("what is photosynthesis"));
    assert!(f.emitter.dispatched_events.lock().unwrap().is_empty());
}

#[test]
fn test_unhandled_command_is_reported_not_failed() {
    let mut f = fixture();
    assert_eq!(
        f.manager.handle_transcript("bigger font"),
        Some(DispatchOutcome::Unhandled)
    );
}

#[test]
fn test_rapid_stop_is_debounced() {
    let mut f = fixture();
    let id = listening(&mut f);
    let count = counter(&f.registry, CommandKey::Pause);

    f.manager.handle_event(id, transcript("stop"));
    f.clock.advance(500);
    f.manager.handle_event(id, transcript("stop"));

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(f.emitter.dispatched_keys(), vec![CommandKey::Pause]);
}

#[test]
fn test_font_repeats_need_1400ms() {
    let mut f = fixture();
    let count = counter(&f.registry, CommandKey::FontBigger);

    f.manager.handle_transcript("bigger font");
    f.clock.advance(1_000);
    f.manager.handle_transcript("bigger font");
    assert_eq!(count.load(Ordering::SeqCst), 1);

    f.clock.advance(500);
    f.manager.handle_transcript("bigger font");
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_section_payload_reaches_handler() {
    let mut f = fixture();
    let seen = Arc::new(Mutex::new(None));
    let s = seen.clone();
    f.registry.lock().register_page(
        CommandTable::new().on(CommandKey::GoToSection, move |payload| {
            *s.lock() = payload;
        }),
    );

    f.manager.handle_transcript("Section 3");

    assert_eq!(*seen.lock(), Some(3));
}

#[test]
fn test_handler_can_swap_page_table_during_result() {
    let mut f = fixture();
    let id = listening(&mut f);
    let registry = f.registry.clone();
    f.registry
        .lock()
        .register_page(CommandTable::new().on(CommandKey::Continue, move |_| {
            registry.lock().clear_page();
        }));

    f.manager.handle_event(id, transcript("continue"));

    assert!(f.registry.lock().page().is_empty());
}
