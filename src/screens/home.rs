// Home screen - entry points and the once-per-session spoken intro

use super::{Route, Screen, ScreenContext};
use crate::storage::STARTUP_VOICE_PLAYED_KEY;
use crate::voice_commands::{CommandTable, PageRegistration};

/// Delay between first arriving home and the intro starting
pub const STARTUP_INTRO_DELAY_MS: u64 = 1500;

pub const STARTUP_MESSAGE: &str = "Welcome to NeuroAdapt. Education that adapts to you. \
You can try the demo lesson, paste your own text, or upload a lesson. \
Use the links on the page, or say 'demo lesson', 'paste text', or 'upload' to navigate. \
Say 'speech off' to turn off voice commands. Enjoy learning.";

pub struct HomeScreen {
    ctx: ScreenContext,
    /// When the intro is due; None once spoken or if it already played this session
    intro_due_ms: Option<u64>,
    _commands: PageRegistration,
}

impl HomeScreen {
    /// Home has no page commands of its own; registering an empty table drops the previous
    /// screen's.
    pub fn mount(ctx: &ScreenContext) -> Self {
        let commands = PageRegistration::register(&ctx.registry, CommandTable::new());

        let intro_due_ms = if ctx.session.lock().flag(STARTUP_VOICE_PLAYED_KEY) {
            None
        } else {
            Some(ctx.clock.now_ms() + STARTUP_INTRO_DELAY_MS)
        };

        Self {
            ctx: ctx.clone(),
            intro_due_ms,
            _commands: commands,
        }
    }
}

impl Screen for HomeScreen {
    fn route(&self) -> Route {
        Route::Home
    }

    fn render(&self) -> String {
        [
            "NeuroAdapt",
            "Education that adapts to you.",
            "",
            "  Try the demo lesson   (say \"demo lesson\")",
            "  Paste your own text   (say \"paste text\")",
            "  Upload a lesson       (say \"upload\")",
            "  Learning preferences  (say \"preferences\")",
        ]
        .join("\n")
    }

    fn next_deadline(&self) -> Option<u64> {
        self.intro_due_ms
    }

    fn tick(&mut self, now_ms: u64) {
        let Some(due) = self.intro_due_ms else {
            return;
        };
        if now_ms < due {
            return;
        }
        self.intro_due_ms = None;

        // Another home visit may have played it while this one waited
        {
            let mut session = self.ctx.session.lock();
            if session.flag(STARTUP_VOICE_PLAYED_KEY) {
                return;
            }
            session.set_flag(STARTUP_VOICE_PLAYED_KEY);
        }
        crate::debug!("Playing startup intro");
        self.ctx.confirm(STARTUP_MESSAGE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::test_support::Harness;
    use crate::util::clock::Clock;
    use crate::voice_commands::{CommandKey, DispatchOutcome};

    #[test]
    fn test_intro_plays_once_after_delay() {
        let h = Harness::new();
        let mut home = HomeScreen::mount(&h.ctx);
        assert_eq!(home.next_deadline(), Some(STARTUP_INTRO_DELAY_MS));

        h.clock.advance(1499);
        home.tick(h.clock.now_ms());
        assert!(h.spoken().is_empty());

        h.clock.advance(1);
        home.tick(h.clock.now_ms());
        assert_eq!(h.spoken(), vec![STARTUP_MESSAGE.to_string()]);
        assert_eq!(home.next_deadline(), None);

        drop(home);
        let mut again = HomeScreen::mount(&h.ctx);
        assert_eq!(again.next_deadline(), None);
        again.tick(h.clock.now_ms() + 10_000);
        assert_eq!(h.spoken().len(), 1);
    }

    #[test]
    fn test_leaving_early_cancels_intro() {
        let h = Harness::new();
        let home = HomeScreen::mount(&h.ctx);
        h.clock.advance(500);
        drop(home);

        assert!(!h.ctx.session.lock().flag(STARTUP_VOICE_PLAYED_KEY));
        // Returning home schedules it afresh
        let home = HomeScreen::mount(&h.ctx);
        assert_eq!(home.next_deadline(), Some(500 + STARTUP_INTRO_DELAY_MS));
    }

    #[test]
    fn test_home_clears_previous_page_commands() {
        let h = Harness::new();
        h.ctx.registry.lock().register_page(
            crate::voice_commands::CommandTable::new().on(CommandKey::Next, |_| {}),
        );

        let _home = HomeScreen::mount(&h.ctx);
        assert_eq!(h.say(CommandKey::Next), DispatchOutcome::Unhandled);
        assert!(h.ctx.registry.lock().page().is_empty());
    }
}
