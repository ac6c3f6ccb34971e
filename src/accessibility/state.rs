// Shared accessibility state read by the presentation layer

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const MIN_FONT_SIZE: u8 = 14;
pub const MAX_FONT_SIZE: u8 = 32;
pub const FONT_STEP: u8 = 2;
pub const DEFAULT_FONT_SIZE: u8 = 18;

/// Low vision mode never renders below this size
pub const LOW_VISION_MIN_FONT_SIZE: u8 = 24;

/// Accessibility state shared between command handlers, the read-aloud engine, and the
/// presentation layer
pub type SharedUi = Arc<Mutex<AccessibilityState>>;

/// Reading mode the lesson is presented in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LearningMode {
    #[default]
    Normal,
    Dyslexia,
    Adhd,
    LowVision,
}

impl LearningMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Dyslexia => "dyslexia",
            Self::Adhd => "adhd",
            Self::LowVision => "low-vision",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Dyslexia => "Dyslexia",
            Self::Adhd => "ADHD Focus",
            Self::LowVision => "Low Vision",
        }
    }
}

impl fmt::Display for LearningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "dyslexia" => Ok(Self::Dyslexia),
            "adhd" => Ok(Self::Adhd),
            "low-vision" | "lowvision" => Ok(Self::LowVision),
            other => Err(format!("Unknown learning mode: {}", other)),
        }
    }
}

/// Color theme for ADHD focus mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdhdTheme {
    #[default]
    Calm,
    Sage,
    Dark,
}

impl AdhdTheme {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Calm => "Calm (cream + blue)",
            Self::Sage => "Sage green",
            Self::Dark => "Dark focus",
        }
    }
}

impl FromStr for AdhdTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "calm" => Ok(Self::Calm),
            "sage" => Ok(Self::Sage),
            "dark" => Ok(Self::Dark),
            other => Err(format!("Unknown ADHD theme: {}", other)),
        }
    }
}

/// Snapshot-able accessibility state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityState {
    mode: LearningMode,
    font_size: u8,
    high_contrast: bool,
    adhd_theme: AdhdTheme,
    /// Word index currently being read aloud
    highlight: Option<usize>,
}

impl Default for AccessibilityState {
    fn default() -> Self {
        Self {
            mode: LearningMode::Normal,
            font_size: DEFAULT_FONT_SIZE,
            high_contrast: false,
            adhd_theme: AdhdTheme::Calm,
            highlight: None,
        }
    }
}

impl AccessibilityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedUi {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn mode(&self) -> LearningMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LearningMode) {
        self.mode = mode;
    }

    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    /// Font size the lesson is actually rendered at
    pub fn effective_font_size(&self) -> u8 {
        if self.mode == LearningMode::LowVision {
            self.font_size.max(LOW_VISION_MIN_FONT_SIZE)
        } else {
            self.font_size
        }
    }

    /// Clamps into the supported range
    pub fn set_font_size(&mut self, size: u8) {
        self.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    }

    /// One step larger, capped; returns the new size
    pub fn increase_font(&mut self) -> u8 {
        self.set_font_size(self.font_size.saturating_add(FONT_STEP));
        self.font_size
    }

    /// One step smaller, floored; returns the new size
    pub fn decrease_font(&mut self) -> u8 {
        self.set_font_size(self.font_size.saturating_sub(FONT_STEP));
        self.font_size
    }

    pub fn high_contrast(&self) -> bool {
        self.high_contrast
    }

    pub fn set_high_contrast(&mut self, on: bool) {
        self.high_contrast = on;
    }

    /// Returns the new value
    pub fn toggle_contrast(&mut self) -> bool {
        self.high_contrast = !self.high_contrast;
        self.high_contrast
    }

    pub fn adhd_theme(&self) -> AdhdTheme {
        self.adhd_theme
    }

    pub fn set_adhd_theme(&mut self, theme: AdhdTheme) {
        self.adhd_theme = theme;
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    /// Returns true if the value changed
    pub fn set_highlight(&mut self, index: Option<usize>) -> bool {
        let changed = self.highlight != index;
        self.highlight = index;
        changed
    }

    /// Whether the presentation layer should show the read-aloud highlight
    ///
    /// ADHD mode renders one sentence at a time and never shows it.
    pub fn shows_highlight(&self) -> bool {
        self.mode != LearningMode::Adhd && self.highlight.is_some()
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
