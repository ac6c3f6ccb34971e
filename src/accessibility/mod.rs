// Accessibility module - reading mode, font sizing, contrast, and the read-aloud highlight

mod state;

pub use state::{
    AccessibilityState, AdhdTheme, LearningMode, SharedUi, DEFAULT_FONT_SIZE, FONT_STEP,
    LOW_VISION_MIN_FONT_SIZE, MAX_FONT_SIZE, MIN_FONT_SIZE,
};
