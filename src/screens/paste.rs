// Paste screen - type or paste lesson text, then continue to the custom lesson

use super::{Route, Screen, ScreenContext};
use crate::storage::LESSON_CONTENT_KEY;
use crate::voice_commands::{CommandKey, CommandTable, PageRegistration};
use parking_lot::Mutex;
use std::sync::Arc;

pub struct PasteScreen {
    ctx: ScreenContext,
    draft: Arc<Mutex<String>>,
    _commands: PageRegistration,
}

/// Store the draft as lesson content and open it; blank drafts are ignored
fn submit(ctx: &ScreenContext, draft: &Mutex<String>) -> bool {
    let text = draft.lock().trim().to_string();
    if text.is_empty() {
        crate::debug!("Ignoring empty paste");
        return false;
    }
    ctx.session.lock().set(LESSON_CONTENT_KEY, text);
    ctx.navigator.push(Route::custom_lesson());
    true
}

impl PasteScreen {
    pub fn mount(ctx: &ScreenContext) -> Self {
        let draft = Arc::new(Mutex::new(String::new()));

        let continue_ctx = ctx.clone();
        let continue_draft = draft.clone();
        let back_ctx = ctx.clone();
        let table = CommandTable::new()
            .on(CommandKey::Continue, move |_| {
                submit(&continue_ctx, &continue_draft);
                continue_ctx.confirm("Continuing to lesson.");
            })
            .on(CommandKey::Previous, move |_| {
                back_ctx.navigator.push(Route::Home);
                back_ctx.confirm("Going back.");
            });

        Self {
            ctx: ctx.clone(),
            draft,
            _commands: PageRegistration::register(&ctx.registry, table),
        }
    }

    pub fn draft(&self) -> String {
        self.draft.lock().clone()
    }
}

impl Screen for PasteScreen {
    fn route(&self) -> Route {
        Route::Paste
    }

    fn render(&self) -> String {
        let draft = self.draft.lock();
        let mut lines = vec![
            "# Paste your lesson".to_string(),
            "Paste text below, then continue to read it in your preferred mode.".to_string(),
            String::new(),
        ];
        if draft.is_empty() {
            lines.push("  (empty)".to_string());
        } else {
            lines.extend(draft.lines().map(|l| format!("  | {}", l)));
        }
        lines.push(String::new());
        lines.push("Type `:submit` or say \"continue\" when done.".to_string());
        lines.join("\n")
    }

    /// `submit` continues; `clear` empties the draft; anything else is a line of text.
    /// `\n` in the input is an explicit line break.
    fn handle_input(&mut self, input: &str) -> bool {
        match input.trim() {
            "submit" => {
                submit(&self.ctx, &self.draft);
            }
            "clear" => self.draft.lock().clear(),
            _ => {
                let mut draft = self.draft.lock();
                if !draft.is_empty() {
                    draft.push('\n');
                }
                draft.push_str(&input.replace("\\n", "\n"));
            }
        }
        true
    }
}
