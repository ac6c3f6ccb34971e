// Lesson model - the built-in demo lesson and lessons built from pasted or uploaded text

use crate::storage::{SessionStore, LESSON_CONTENT_KEY};
use crate::text::{lesson_blocks, sentences_of};
use serde::{Deserialize, Serialize};

/// One titled section of a lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSection {
    pub heading: String,
    pub paragraphs: Vec<String>,
}

impl LessonSection {
    pub fn new(heading: impl Into<String>, paragraphs: Vec<String>) -> Self {
        Self {
            heading: heading.into(),
            paragraphs,
        }
    }

    /// Heading followed by each paragraph, in reading order
    ///
    /// Word indices for highlighting run continuously across these blocks.
    pub fn blocks(&self) -> Vec<&str> {
        std::iter::once(self.heading.as_str())
            .chain(self.paragraphs.iter().map(String::as_str))
            .collect()
    }

    /// Text spoken when the section is read aloud
    pub fn read_aloud_text(&self) -> String {
        self.blocks().join("\n\n")
    }

    /// Sentences for the one-at-a-time ADHD view
    pub fn sentences(&self) -> Vec<String> {
        sentences_of(&self.paragraphs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub title: String,
    pub subtitle: String,
    pub sections: Vec<LessonSection>,
}

impl Lesson {
    /// The built-in photosynthesis lesson
    pub fn demo() -> Self {
        Self {
            title: "Photosynthesis".to_string(),
            subtitle: "How plants make their food".to_string(),
            sections: vec![
                LessonSection::new(
                    "What is photosynthesis?",
                    vec!["Photosynthesis is how plants make their food. Plants use sunlight, water, and carbon dioxide from the air. They turn these into sugar and oxygen. The sugar gives the plant energy. The oxygen goes into the air for us to breathe.".to_string()],
                ),
                LessonSection::new(
                    "Where does it happen?",
                    vec!["Leaves are like small factories where this happens. Chlorophyll in the leaves makes them green and captures sunlight. Without photosynthesis, there would be no life on Earth as we know it.".to_string()],
                ),
                LessonSection::new(
                    "Why it matters",
                    vec!["Plants release the oxygen we breathe. They also form the base of most food chains. Understanding photosynthesis helps us protect our environment and grow food better.".to_string()],
                ),
            ],
        }
    }

    /// Lesson from free text: one "Section N" per blank-line separated block
    ///
    /// Returns None for blank text.
    pub fn from_text(text: &str) -> Option<Self> {
        let sections: Vec<LessonSection> = lesson_blocks(text)
            .into_iter()
            .enumerate()
            .map(|(i, block)| LessonSection::new(format!("Section {}", i + 1), vec![block]))
            .collect();

        if sections.is_empty() {
            return None;
        }

        Some(Self {
            title: "Your lesson".to_string(),
            subtitle: "Custom content".to_string(),
            sections,
        })
    }

    /// Lesson for the learn screen
    ///
    /// Custom lessons come from the stored pasted/uploaded text; anything missing or blank
    /// falls back to the demo.
    pub fn for_session(store: &SessionStore, custom: bool) -> Self {
        if !custom {
            return Self::demo();
        }
        store
            .get_str(LESSON_CONTENT_KEY)
            .and_then(Self::from_text)
            .unwrap_or_else(Self::demo)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn section(&self, index: usize) -> Option<&LessonSection> {
        self.sections.get(index)
    }
}

#[cfg(test)]
#[path = "lesson_test.rs"]
mod tests;
