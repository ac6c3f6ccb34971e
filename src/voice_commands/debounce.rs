// Debounce for recognized commands
//
// Continuous recognition often reports the same phrase several times while the user is
// still speaking it. A repeat of the last dispatched key inside its window is dropped.

use super::lexicon::CommandKey;

/// Default window for repeated commands (700ms)
pub const DEFAULT_DEBOUNCE_MS: u64 = 700;

/// Window for font size commands (1400ms); each repeat there is a deliberate step
pub const FONT_DEBOUNCE_MS: u64 = 1400;

/// The most recently dispatched command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastCommand {
    pub key: CommandKey,
    pub timestamp_ms: u64,
}

/// Suppresses repeats of the last dispatched key inside a key-dependent window
#[derive(Debug)]
pub struct CommandDebouncer {
    last: Option<LastCommand>,
    window_ms: u64,
    font_window_ms: u64,
}

impl Default for CommandDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDebouncer {
    pub fn new() -> Self {
        Self::with_windows(DEFAULT_DEBOUNCE_MS, FONT_DEBOUNCE_MS)
    }

    pub fn with_windows(window_ms: u64, font_window_ms: u64) -> Self {
        Self {
            last: None,
            window_ms,
            font_window_ms,
        }
    }

    /// Window that applies to `key`
    pub fn window_for(&self, key: CommandKey) -> u64 {
        if key.is_font_adjustment() {
            self.font_window_ms
        } else {
            self.window_ms
        }
    }

    /// Decide whether `key` observed at `now_ms` should be dispatched
    ///
    /// Returns false (and leaves state untouched) when the same key fired less than its
    /// window ago. Otherwise records the key as the last command and returns true.
    pub fn accept(&mut self, key: CommandKey, now_ms: u64) -> bool {
        if let Some(last) = self.last {
            if last.key == key && now_ms.saturating_sub(last.timestamp_ms) < self.window_for(key) {
                crate::trace!("Command {} debounced", key);
                return false;
            }
        }

        self.last = Some(LastCommand {
            key,
            timestamp_ms: now_ms,
        });
        true
    }

    pub fn last(&self) -> Option<LastCommand> {
        self.last
    }

    /// Forget the last command
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
#[path = "debounce_test.rs"]
mod tests;
