// Learning preferences screen

use super::{Route, Screen, ScreenContext};
use crate::content::transform::{Difficulty, FocusDuration};
use crate::content::{AudioAssist, LearnerProfile};
use crate::voice_commands::{CommandKey, CommandTable, PageRegistration};
use parking_lot::Mutex;
use std::sync::Arc;

pub struct ProfileScreen {
    ctx: ScreenContext,
    draft: Arc<Mutex<LearnerProfile>>,
    _commands: PageRegistration,
}

impl ProfileScreen {
    pub fn mount(ctx: &ScreenContext) -> Self {
        let draft = Arc::new(Mutex::new(LearnerProfile::default()));
        let commands = PageRegistration::register(&ctx.registry, profile_commands(ctx, &draft));
        Self {
            ctx: ctx.clone(),
            draft,
            _commands: commands,
        }
    }

    pub fn draft(&self) -> LearnerProfile {
        self.draft.lock().clone()
    }

    fn set_field(&self, field: &str, value: &str) -> bool {
        let mut draft = self.draft.lock();
        match field {
            "mode" => match value.parse() {
                Ok(mode) => draft.mode = mode,
                Err(_) => return false,
            },
            "audio" => {
                draft.audio = match value {
                    "yes" => AudioAssist::Yes,
                    "no" => AudioAssist::No,
                    _ => return false,
                }
            }
            "focus" => {
                draft.focus_duration = match value {
                    "short" => FocusDuration::Short,
                    "medium" => FocusDuration::Medium,
                    "long" => FocusDuration::Long,
                    _ => return false,
                }
            }
            "difficulty" => {
                draft.difficulty = match value {
                    "simpler" => Difficulty::Simpler,
                    "standard" => Difficulty::Standard,
                    "as-is" => Difficulty::AsIs,
                    _ => return false,
                }
            }
            _ => return false,
        }
        true
    }
}

/// Store the draft and open the lesson tuned to it
fn save(ctx: &ScreenContext, draft: &Mutex<LearnerProfile>) {
    let profile = draft.lock().clone();
    crate::info!("Saving learner profile: {}", profile.badge());
    profile.save(&mut ctx.session.lock());
    ctx.navigator.push(Route::optimized_lesson());
}

fn profile_commands(ctx: &ScreenContext, draft: &Arc<Mutex<LearnerProfile>>) -> CommandTable {
    let save_ctx = ctx.clone();
    let save_draft = draft.clone();
    let skip_ctx = ctx.clone();
    let back_ctx = ctx.clone();

    CommandTable::new()
        .on(CommandKey::Save, move |_| {
            save(&save_ctx, &save_draft);
            save_ctx.confirm("Preferences saved.");
        })
        .on(CommandKey::Skip, move |_| {
            skip_ctx.navigator.push(Route::Home);
            skip_ctx.confirm("Skipped.");
        })
        .on(CommandKey::Previous, move |_| {
            back_ctx.navigator.push(Route::Home);
            back_ctx.confirm("Going back.");
        })
}

impl Screen for ProfileScreen {
    fn route(&self) -> Route {
        Route::Profile
    }

    fn render(&self) -> String {
        let draft = self.draft.lock();
        let json = serde_json::to_value(&*draft).unwrap_or_default();
        let field = |name: &str| json[name].as_str().unwrap_or_default().to_string();
        [
            "# Learning preferences".to_string(),
            "We'll use this to suggest a default mode and settings.".to_string(),
            String::new(),
            format!("  Preferred reading mode?  {}", field("mode")),
            format!("  Need audio assistance?   {}", field("audio")),
            format!("  Focus duration?          {}", field("focusDuration")),
            format!("  Difficulty?              {}", field("difficulty")),
            String::new(),
            "Say \"save\" to continue, \"skip\" to go home.".to_string(),
        ]
        .join("\n")
    }

    /// `<field> <value>` edits the draft; `save` and `skip` act like the buttons
    fn handle_input(&mut self, input: &str) -> bool {
        let mut parts = input.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("save"), None) => {
                save(&self.ctx, &self.draft);
                true
            }
            (Some("skip"), None) => {
                self.ctx.navigator.push(Route::Home);
                true
            }
            (Some(field), Some(value)) => self.set_field(field, value),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessibility::LearningMode;
    use crate::screens::test_support::Harness;
    use crate::screens::ShellRequest;
    use crate::voice_commands::DispatchOutcome;

    #[test]
    fn test_save_stores_profile_and_opens_optimized_lesson() {
        let h = Harness::new();
        let mut screen = ProfileScreen::mount(&h.ctx);
        assert!(screen.handle_input("mode adhd"));
        assert!(screen.handle_input("focus short"));

        assert_eq!(h.say(CommandKey::Save), DispatchOutcome::Page);

        let stored = LearnerProfile::load(&h.ctx.session.lock()).unwrap();
        assert_eq!(stored.mode, LearningMode::Adhd);
        assert_eq!(stored.focus_duration, FocusDuration::Short);
        assert_eq!(
            h.ctx.navigator.drain(),
            vec![ShellRequest::Navigate(Route::optimized_lesson())]
        );
        assert_eq!(h.last_spoken().as_deref(), Some("Preferences saved."));
    }

    #[test]
    fn test_skip_and_back_go_home() {
        let h = Harness::new();
        let _screen = ProfileScreen::mount(&h.ctx);

        h.say(CommandKey::Skip);
        assert_eq!(h.last_spoken().as_deref(), Some("Skipped."));
        h.say(CommandKey::Previous);
        assert_eq!(h.last_spoken().as_deref(), Some("Going back."));

        assert_eq!(
            h.ctx.navigator.drain(),
            vec![
                ShellRequest::Navigate(Route::Home),
                ShellRequest::Navigate(Route::Home)
            ]
        );
        assert!(LearnerProfile::load(&h.ctx.session.lock()).is_none());
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let h = Harness::new();
        let mut screen = ProfileScreen::mount(&h.ctx);
        assert!(!screen.handle_input("mode sleepy"));
        assert!(!screen.handle_input("colour blue"));
        assert!(screen.handle_input("difficulty as-is"));
        assert_eq!(screen.draft().difficulty, Difficulty::AsIs);
    }

    #[test]
    fn test_render_shows_wire_values() {
        let h = Harness::new();
        let mut screen = ProfileScreen::mount(&h.ctx);
        screen.handle_input("mode low-vision");
        let rendered = screen.render();
        assert!(rendered.contains("Preferred reading mode?  low-vision"));
        assert!(rendered.contains("Focus duration?          medium"));
    }
}
