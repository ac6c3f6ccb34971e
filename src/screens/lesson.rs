//! Lesson screen.
//!
//! Shows one section of the current lesson at a time and registers the lesson command
//! table: section navigation, read-aloud, reading modes, font size and contrast. In ADHD
//! mode the section is presented one sentence at a time through a sentence cursor that
//! resets whenever the section or the mode changes.

use super::{Route, Screen, ScreenContext};
use crate::accessibility::{AdhdTheme, LearningMode};
use crate::content::{glossary, LearnerProfile, Lesson, LessonSection};
use crate::text::segment_blocks;
use crate::voice_commands::{CommandKey, CommandTable, PageRegistration};
use parking_lot::Mutex;
use std::sync::Arc;

/// Which section and sentence of a lesson is showing
#[derive(Debug, Clone)]
pub struct LessonView {
    lesson: Lesson,
    section: usize,
    sentence: usize,
}

impl LessonView {
    pub fn new(lesson: Lesson) -> Self {
        Self {
            lesson,
            section: 0,
            sentence: 0,
        }
    }

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    /// Zero-based index of the showing section
    pub fn section_index(&self) -> usize {
        self.section
    }

    pub fn section_count(&self) -> usize {
        self.lesson.section_count()
    }

    pub fn current_section(&self) -> Option<&LessonSection> {
        self.lesson.section(self.section)
    }

    fn show_section(&mut self, index: usize) {
        if index != self.section {
            self.section = index;
            self.sentence = 0;
        }
    }

    /// Advance one section, stopping at the last
    pub fn next_section(&mut self) {
        let last = self.section_count().saturating_sub(1);
        self.show_section((self.section + 1).min(last));
    }

    /// Go back one section, stopping at the first
    pub fn previous_section(&mut self) {
        self.show_section(self.section.saturating_sub(1));
    }

    /// Jump to the 1-based section `number`, clamped to the lesson; returns the 1-based
    /// section shown
    pub fn go_to_section(&mut self, number: u8) -> usize {
        let total = self.section_count().max(1);
        let index = (number as usize).clamp(1, total) - 1;
        self.show_section(index);
        index + 1
    }

    /// Sentences of the showing section
    pub fn sentences(&self) -> Vec<String> {
        self.current_section()
            .map(LessonSection::sentences)
            .unwrap_or_default()
    }

    pub fn sentence_index(&self) -> usize {
        self.sentence
    }

    pub fn current_sentence(&self) -> Option<String> {
        self.sentences().into_iter().nth(self.sentence)
    }

    pub fn next_sentence(&mut self) {
        let last = self.sentences().len().saturating_sub(1);
        self.sentence = (self.sentence + 1).min(last);
    }

    pub fn previous_sentence(&mut self) {
        self.sentence = self.sentence.saturating_sub(1);
    }

    pub fn reset_sentence(&mut self) {
        self.sentence = 0;
    }

    /// What "read" speaks: heading and paragraphs separated by blank lines
    pub fn read_aloud_text(&self) -> String {
        self.current_section()
            .map(LessonSection::read_aloud_text)
            .unwrap_or_default()
    }
}

pub type SharedLessonView = Arc<Mutex<LessonView>>;

pub struct LessonScreen {
    ctx: ScreenContext,
    view: SharedLessonView,
    custom: bool,
    optimized: bool,
    badge: Option<String>,
    _commands: PageRegistration,
}

impl LessonScreen {
    /// Load the lesson for this route and register the lesson commands
    ///
    /// An optimized lesson starts in the mode saved in the learner profile.
    pub fn mount(ctx: &ScreenContext, custom: bool, optimized: bool) -> Self {
        let (lesson, profile) = {
            let session = ctx.session.lock();
            (
                Lesson::for_session(&session, custom),
                LearnerProfile::load(&session),
            )
        };

        if optimized {
            if let Some(profile) = &profile {
                ctx.ui.lock().set_mode(profile.mode);
            }
        }

        crate::debug!(
            "Mounting lesson \"{}\" ({} sections)",
            lesson.title,
            lesson.section_count()
        );
        let view = Arc::new(Mutex::new(LessonView::new(lesson)));
        let commands = PageRegistration::register(&ctx.registry, lesson_commands(ctx, &view));

        Self {
            ctx: ctx.clone(),
            view,
            custom,
            optimized,
            badge: profile.map(|p| p.badge()),
            _commands: commands,
        }
    }

    pub fn view(&self) -> SharedLessonView {
        self.view.clone()
    }

    pub fn badge(&self) -> Option<&str> {
        self.badge.as_deref()
    }

    fn render_section(&self, view: &LessonView) -> Vec<String> {
        let Some(section) = view.current_section() else {
            return Vec::new();
        };
        let (mode, highlight) = {
            let ui = self.ctx.ui.lock();
            (ui.mode(), ui.shows_highlight().then(|| ui.highlight()).flatten())
        };

        if mode == LearningMode::Adhd {
            let sentences = section.sentences();
            let mut lines = vec![format!("## {}", section.heading)];
            if let Some(sentence) = sentences.get(view.sentence_index()) {
                lines.push(format!("> {}", sentence));
            }
            lines.push(format!(
                "Sentence {} of {}",
                view.sentence_index() + 1,
                sentences.len().max(1)
            ));
            return lines;
        }

        let blocks = section.blocks();
        let mut lines: Vec<String> = segment_blocks(&blocks)
            .iter()
            .map(|segmented| {
                segmented
                    .tokens
                    .iter()
                    .map(|token| match token.word_index {
                        Some(i) if Some(i) == highlight => format!("[{}]", token.text),
                        _ => token.text.to_string(),
                    })
                    .collect::<String>()
            })
            .collect();
        if let Some(heading) = lines.first_mut() {
            *heading = format!("## {}", heading);
        }

        if mode == LearningMode::Dyslexia {
            let text = blocks.join("\n");
            for (term, meaning) in glossary::terms_in(&text) {
                lines.push(format!("  * {}: {}", term, meaning));
            }
        }
        lines
    }
}

impl Screen for LessonScreen {
    fn route(&self) -> Route {
        Route::Learn {
            custom: self.custom,
            optimized: self.optimized,
        }
    }

    fn render(&self) -> String {
        let view = self.view.lock();
        let lesson = view.lesson();
        let status = {
            let ui = self.ctx.ui.lock();
            let mut status = format!(
                "Mode: {} | Text: {}px | Contrast: {}",
                ui.mode().label(),
                ui.effective_font_size(),
                if ui.high_contrast() { "high" } else { "normal" }
            );
            if ui.mode() == LearningMode::Adhd {
                status.push_str(&format!(" | Theme: {}", ui.adhd_theme().label()));
            }
            status
        };

        let mut lines = vec![format!("# {}", lesson.title), lesson.subtitle.clone()];
        if let Some(badge) = &self.badge {
            lines.push(badge.clone());
        }
        lines.push(status);
        lines.push(format!(
            "Section {} of {}",
            view.section_index() + 1,
            view.section_count()
        ));
        lines.push(String::new());
        lines.extend(self.render_section(&view));
        lines.join("\n")
    }

    /// `read`, `stop`, `sentence next|previous`, `theme calm|sage|dark`
    fn handle_input(&mut self, input: &str) -> bool {
        let mut parts = input.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("read"), None) => {
                let text = self.view.lock().read_aloud_text();
                self.ctx.read_aloud.lock().speak(&text);
            }
            (Some("stop"), None) => self.ctx.read_aloud.lock().cancel(),
            (Some("sentence"), Some("next")) => self.view.lock().next_sentence(),
            (Some("sentence"), Some("previous" | "prev")) => self.view.lock().previous_sentence(),
            (Some("theme"), Some(name)) => match name.parse::<AdhdTheme>() {
                Ok(theme) => self.ctx.ui.lock().set_adhd_theme(theme),
                Err(_) => return false,
            },
            _ => return false,
        }
        true
    }
}

fn set_mode(ctx: &ScreenContext, view: &SharedLessonView, mode: LearningMode, confirmation: &str) {
    ctx.ui.lock().set_mode(mode);
    view.lock().reset_sentence();
    ctx.confirm(confirmation);
}

fn lesson_commands(ctx: &ScreenContext, view: &SharedLessonView) -> CommandTable {
    let mut table = CommandTable::new();

    {
        let (ctx, view) = (ctx.clone(), view.clone());
        table = table.on(CommandKey::Next, move |_| {
            view.lock().next_section();
            ctx.confirm("Next section.");
        });
    }
    {
        let (ctx, view) = (ctx.clone(), view.clone());
        table = table.on(CommandKey::Previous, move |_| {
            view.lock().previous_section();
            ctx.confirm("Previous section.");
        });
    }
    // No confirmation for read/repeat; it would cut the narration off
    for key in [CommandKey::Read, CommandKey::Repeat] {
        let (ctx, view) = (ctx.clone(), view.clone());
        table = table.on(key, move |_| {
            let text = view.lock().read_aloud_text();
            ctx.read_aloud.lock().speak(&text);
        });
    }
    {
        let ctx = ctx.clone();
        table = table.on(CommandKey::Pause, move |_| {
            ctx.read_aloud.lock().cancel();
            ctx.confirm("Paused.");
        });
    }
    {
        let (ctx, view) = (ctx.clone(), view.clone());
        table = table.on(CommandKey::GoToSection, move |payload| {
            let Some(number) = payload else {
                return;
            };
            let shown = view.lock().go_to_section(number);
            ctx.confirm(&format!("Section {}.", shown));
        });
    }
    for (key, mode, confirmation) in [
        (CommandKey::ModeNormal, LearningMode::Normal, "Normal mode."),
        (CommandKey::ModeDyslexia, LearningMode::Dyslexia, "Dyslexia mode."),
        (CommandKey::ModeAdhd, LearningMode::Adhd, "ADHD focus mode."),
        (CommandKey::ModeLowVision, LearningMode::LowVision, "Low vision mode."),
    ] {
        let (ctx, view) = (ctx.clone(), view.clone());
        table = table.on(key, move |_| set_mode(&ctx, &view, mode, confirmation));
    }
    {
        let ctx = ctx.clone();
        table = table.on(CommandKey::FontBigger, move |_| {
            let size = ctx.ui.lock().increase_font();
            crate::debug!("Font size {}", size);
            ctx.confirm("Larger text.");
        });
    }
    {
        let ctx = ctx.clone();
        table = table.on(CommandKey::FontSmaller, move |_| {
            let size = ctx.ui.lock().decrease_font();
            crate::debug!("Font size {}", size);
            ctx.confirm("Smaller text.");
        });
    }
    {
        let ctx = ctx.clone();
        table = table.on(CommandKey::Contrast, move |_| {
            ctx.ui.lock().toggle_contrast();
            ctx.confirm("Contrast toggled.");
        });
    }

    table
}

#[cfg(test)]
#[path = "lesson_test.rs"]
mod tests;
