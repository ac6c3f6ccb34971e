// Upload screen - load a .txt lesson file

use super::{Route, Screen, ScreenContext};
use crate::content::{load_text_file, UploadError};
use crate::storage::LESSON_CONTENT_KEY;
use crate::voice_commands::{CommandKey, CommandTable, PageRegistration};
use std::path::Path;

pub struct UploadScreen {
    ctx: ScreenContext,
    error: Option<String>,
    _commands: PageRegistration,
}

impl UploadScreen {
    pub fn mount(ctx: &ScreenContext) -> Self {
        let back_ctx = ctx.clone();
        let table = CommandTable::new().on(CommandKey::Previous, move |_| {
            back_ctx.navigator.push(Route::Home);
            back_ctx.confirm("Going back.");
        });

        Self {
            ctx: ctx.clone(),
            error: None,
            _commands: PageRegistration::register(&ctx.registry, table),
        }
    }

    /// Load `path` as the lesson and open it
    ///
    /// The error is also kept for display until the next attempt.
    pub fn upload(&mut self, path: &Path) -> Result<(), UploadError> {
        self.error = None;
        match load_text_file(path) {
            Ok(text) => {
                crate::info!("Loaded lesson from {}", path.display());
                self.ctx.session.lock().set(LESSON_CONTENT_KEY, text);
                self.ctx.navigator.push(Route::custom_lesson());
                Ok(())
            }
            Err(e) => {
                crate::warn!("Upload of {} failed: {}", path.display(), e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Screen for UploadScreen {
    fn route(&self) -> Route {
        Route::Upload
    }

    fn render(&self) -> String {
        let mut lines = vec![
            "# Upload a lesson".to_string(),
            "Upload a .txt file. PDF support coming soon.".to_string(),
            String::new(),
            "Type the path of a file to load it.".to_string(),
        ];
        if let Some(error) = &self.error {
            lines.push(format!("! {}", error));
        }
        lines.join("\n")
    }

    /// The input is a file path
    fn handle_input(&mut self, input: &str) -> bool {
        let path = input.trim();
        if path.is_empty() {
            return false;
        }
        // Failures are shown on the screen
        let _ = self.upload(Path::new(path));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::test_support::Harness;
    use crate::screens::ShellRequest;
    use tempfile::TempDir;

    #[test]
    fn test_upload_txt_opens_custom_lesson() {
        let h = Harness::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cells.txt");
        std::fs::write(&path, "Cells are small.").unwrap();

        let mut screen = UploadScreen::mount(&h.ctx);
        screen.upload(&path).unwrap();

        assert_eq!(
            h.ctx.session.lock().get_str(LESSON_CONTENT_KEY),
            Some("Cells are small.")
        );
        assert_eq!(
            h.ctx.navigator.drain(),
            vec![ShellRequest::Navigate(Route::custom_lesson())]
        );
    }

    #[test]
    fn test_other_types_show_error() {
        let h = Harness::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cells.pdf");
        std::fs::write(&path, "%PDF").unwrap();

        let mut screen = UploadScreen::mount(&h.ctx);
        assert!(screen.handle_input(path.to_str().unwrap()));

        assert_eq!(
            screen.error(),
            Some("Please upload a .txt file. PDF support coming soon.")
        );
        assert!(screen.render().contains("! Please upload a .txt file."));
        assert!(!h.ctx.navigator.has_pending());
    }

    #[test]
    fn test_back_goes_home() {
        let h = Harness::new();
        let _screen = UploadScreen::mount(&h.ctx);
        h.say(CommandKey::Previous);
        assert_eq!(
            h.ctx.navigator.drain(),
            vec![ShellRequest::Navigate(Route::Home)]
        );
    }
}
