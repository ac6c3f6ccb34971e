// Command lexicon - resolves spoken transcripts to command keys

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Lowest section number accepted by "go to section N"
pub const MIN_SECTION: u8 = 1;
/// Highest section number accepted by "go to section N"
pub const MAX_SECTION: u8 = 20;

/// Canonical command keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandKey {
    Next,
    Previous,
    Home,
    TryDemo,
    PasteText,
    Upload,
    Preferences,
    Read,
    Pause,
    Repeat,
    GoToSection,
    ModeNormal,
    ModeDyslexia,
    ModeAdhd,
    ModeLowVision,
    FontBigger,
    FontSmaller,
    Contrast,
    Save,
    Skip,
    Continue,
    TurnOff,
}

impl CommandKey {
    /// Wire name of the key (camelCase)
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKey::Next => "next",
            CommandKey::Previous => "previous",
            CommandKey::Home => "home",
            CommandKey::TryDemo => "tryDemo",
            CommandKey::PasteText => "pasteText",
            CommandKey::Upload => "upload",
            CommandKey::Preferences => "preferences",
            CommandKey::Read => "read",
            CommandKey::Pause => "pause",
            CommandKey::Repeat => "repeat",
            CommandKey::GoToSection => "goToSection",
            CommandKey::ModeNormal => "modeNormal",
            CommandKey::ModeDyslexia => "modeDyslexia",
            CommandKey::ModeAdhd => "modeAdhd",
            CommandKey::ModeLowVision => "modeLowVision",
            CommandKey::FontBigger => "fontBigger",
            CommandKey::FontSmaller => "fontSmaller",
            CommandKey::Contrast => "contrast",
            CommandKey::Save => "save",
            CommandKey::Skip => "skip",
            CommandKey::Continue => "continue",
            CommandKey::TurnOff => "turnOff",
        }
    }

    /// Font size commands get the longer debounce window
    pub fn is_font_adjustment(&self) -> bool {
        matches!(self, CommandKey::FontBigger | CommandKey::FontSmaller)
    }
}

impl std::fmt::Display for CommandKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommandKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_KEYS
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown command key: {}", s))
    }
}

const ALL_KEYS: [CommandKey; 22] = [
    CommandKey::Next,
    CommandKey::Previous,
    CommandKey::Home,
    CommandKey::TryDemo,
    CommandKey::PasteText,
    CommandKey::Upload,
    CommandKey::Preferences,
    CommandKey::Read,
    CommandKey::Pause,
    CommandKey::Repeat,
    CommandKey::GoToSection,
    CommandKey::ModeNormal,
    CommandKey::ModeDyslexia,
    CommandKey::ModeAdhd,
    CommandKey::ModeLowVision,
    CommandKey::FontBigger,
    CommandKey::FontSmaller,
    CommandKey::Contrast,
    CommandKey::Save,
    CommandKey::Skip,
    CommandKey::Continue,
    CommandKey::TurnOff,
];

/// A resolved command with its optional section payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Command {
    pub key: CommandKey,
    /// Section number in `MIN_SECTION..=MAX_SECTION`, only for `GoToSection`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<u8>,
}

impl Command {
    pub fn new(key: CommandKey) -> Self {
        Self { key, payload: None }
    }

    pub fn go_to_section(section: u8) -> Self {
        Self {
            key: CommandKey::GoToSection,
            payload: Some(section),
        }
    }
}

/// Phrases that must match exactly before the general table is consulted.
/// Keeps "stop" from ever being matched loosely against "start reading".
const STOP_PAUSE_PHRASES: [&str; 4] = ["stop reading", "pause reading", "stop", "pause"];

/// Spoken phrase (normalized) to command key, many-to-one
const PHRASES: &[(&str, CommandKey)] = &[
    // Navigation
    ("next", CommandKey::Next),
    ("next section", CommandKey::Next),
    ("go next", CommandKey::Next),
    ("next page", CommandKey::Next),
    ("previous", CommandKey::Previous),
    ("previous section", CommandKey::Previous),
    ("go back", CommandKey::Previous),
    ("back", CommandKey::Previous),
    ("go previous", CommandKey::Previous),
    ("home", CommandKey::Home),
    ("go home", CommandKey::Home),
    ("main page", CommandKey::Home),
    ("demo", CommandKey::TryDemo),
    ("try demo", CommandKey::TryDemo),
    ("try demo lesson", CommandKey::TryDemo),
    ("try demo lessons", CommandKey::TryDemo),
    ("demo lesson", CommandKey::TryDemo),
    ("demo lessons", CommandKey::TryDemo),
    ("demo page", CommandKey::TryDemo),
    ("open demo", CommandKey::TryDemo),
    ("open demo lesson", CommandKey::TryDemo),
    ("tri demo", CommandKey::TryDemo),
    ("tried demo", CommandKey::TryDemo),
    ("dry demo lesson", CommandKey::TryDemo),
    ("start demo", CommandKey::TryDemo),
    ("show demo", CommandKey::TryDemo),
    ("load demo", CommandKey::TryDemo),
    ("go to demo", CommandKey::TryDemo),
    ("paste", CommandKey::PasteText),
    ("paste text", CommandKey::PasteText),
    ("paste lesson", CommandKey::PasteText),
    ("upload", CommandKey::Upload),
    ("upload lesson", CommandKey::Upload),
    ("upload file", CommandKey::Upload),
    ("upload files", CommandKey::Upload),
    ("preferences", CommandKey::Preferences),
    ("profile", CommandKey::Preferences),
    ("set up preferences", CommandKey::Preferences),
    ("learning preferences", CommandKey::Preferences),
    ("settings", CommandKey::Preferences),
    // Read aloud
    ("read", CommandKey::Read),
    ("read aloud", CommandKey::Read),
    ("read lesson", CommandKey::Read),
    ("start reading", CommandKey::Read),
    ("read section", CommandKey::Read),
    ("pause", CommandKey::Pause),
    ("pause reading", CommandKey::Pause),
    ("stop", CommandKey::Pause),
    ("stop reading", CommandKey::Pause),
    ("repeat", CommandKey::Repeat),
    ("repeat section", CommandKey::Repeat),
    ("read again", CommandKey::Repeat),
    // Modes
    ("normal", CommandKey::ModeNormal),
    ("normal mode", CommandKey::ModeNormal),
    ("dyslexia", CommandKey::ModeDyslexia),
    ("dyslexia mode", CommandKey::ModeDyslexia),
    ("adhd", CommandKey::ModeAdhd),
    ("adhd mode", CommandKey::ModeAdhd),
    ("adhd focus", CommandKey::ModeAdhd),
    ("focus mode", CommandKey::ModeAdhd),
    ("low vision", CommandKey::ModeLowVision),
    ("low vision mode", CommandKey::ModeLowVision),
    ("vision mode", CommandKey::ModeLowVision),
    // Toolbar
    ("increase font", CommandKey::FontBigger),
    ("bigger font", CommandKey::FontBigger),
    ("larger text", CommandKey::FontBigger),
    ("font bigger", CommandKey::FontBigger),
    ("decrease font", CommandKey::FontSmaller),
    ("smaller font", CommandKey::FontSmaller),
    ("smaller text", CommandKey::FontSmaller),
    ("font smaller", CommandKey::FontSmaller),
    ("contrast", CommandKey::Contrast),
    ("high contrast", CommandKey::Contrast),
    ("toggle contrast", CommandKey::Contrast),
    // Forms
    ("save", CommandKey::Save),
    ("save preferences", CommandKey::Save),
    ("skip", CommandKey::Skip),
    ("continue", CommandKey::Continue),
    ("continue to lesson", CommandKey::Continue),
    // Voice control
    ("turn off", CommandKey::TurnOff),
    ("speech off", CommandKey::TurnOff),
    ("disable speech", CommandKey::TurnOff),
    ("stop listening", CommandKey::TurnOff),
];

static PHRASE_TABLE: LazyLock<HashMap<&'static str, CommandKey>> =
    LazyLock::new(|| PHRASES.iter().copied().collect());

static GO_TO_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)go to section (\d+)|section (\d+)").expect("section pattern is a valid regex")
});

/// Normalize a transcript: trim, lowercase, collapse whitespace runs
pub fn normalize(transcript: &str) -> String {
    transcript
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn parse_section(normalized: &str) -> Option<u8> {
    let caps = GO_TO_SECTION.captures(normalized)?;
    let digits = caps.get(1).or_else(|| caps.get(2))?.as_str();
    // Overlong digit strings fail to parse and fall through like out-of-range numbers
    let n: u32 = digits.parse().ok()?;
    u8::try_from(n)
        .ok()
        .filter(|n| (MIN_SECTION..=MAX_SECTION).contains(n))
}

/// Resolve a transcript to a command
///
/// Order is fixed: the "section N" pattern, then the exact stop/pause phrases, then the
/// exact phrase table. Anything else resolves to `None`.
pub fn resolve(transcript: &str) -> Option<Command> {
    let t = normalize(transcript);
    if t.is_empty() {
        return None;
    }

    if let Some(section) = parse_section(&t) {
        return Some(Command::go_to_section(section));
    }

    if let Some(phrase) = STOP_PAUSE_PHRASES.iter().find(|p| **p == t) {
        return PHRASE_TABLE.get(phrase).copied().map(Command::new);
    }

    PHRASE_TABLE.get(t.as_str()).copied().map(Command::new)
}

/// All phrases that resolve to `key`, for help listings
pub fn phrases_for(key: CommandKey) -> Vec<&'static str> {
    PHRASES
        .iter()
        .filter(|(_, k)| *k == key)
        .map(|(p, _)| *p)
        .collect()
}

#[cfg(test)]
#[path = "lexicon_test.rs"]
mod tests;
