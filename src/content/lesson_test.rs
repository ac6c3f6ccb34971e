use super::*;
use crate::text::{segment_blocks, word_spans};

#[test]
fn test_demo_lesson_shape() {
    let lesson = Lesson::demo();
    assert_eq!(lesson.title, "Photosynthesis");
    assert_eq!(lesson.section_count(), 3);
    assert_eq!(lesson.sections[2].heading, "Why it matters");
}

#[test]
fn test_from_text_splits_on_blank_lines() {
    let lesson =
        Lesson::from_text("  First part.\n\n\nSecond part.\nStill second.\n\nThird.  ").unwrap();

    assert_eq!(lesson.title, "Your lesson");
    assert_eq!(lesson.section_count(), 3);
    assert_eq!(lesson.sections[0].heading, "Section 1");
    assert_eq!(lesson.sections[1].paragraphs, vec!["Second part.\nStill second."]);
    assert_eq!(lesson.sections[2].paragraphs, vec!["Third."]);
}

#[test]
fn test_from_blank_text_is_none() {
    assert!(Lesson::from_text("  \n\n ").is_none());
}

#[test]
fn test_for_session_falls_back_to_demo() {
    let mut store = SessionStore::new();
    assert_eq!(Lesson::for_session(&store, true), Lesson::demo());

    store.set(LESSON_CONTENT_KEY, "   ");
    assert_eq!(Lesson::for_session(&store, true), Lesson::demo());

    store.set(LESSON_CONTENT_KEY, "Alpha.\n\nBeta.");
    assert_eq!(Lesson::for_session(&store, true).section_count(), 2);
    assert_eq!(Lesson::for_session(&store, false), Lesson::demo());
}

#[test]
fn test_read_aloud_text_joins_blocks() {
    let section = LessonSection::new("Title", vec!["One.".to_string(), "Two.".to_string()]);
    assert_eq!(section.read_aloud_text(), "Title\n\nOne.\n\nTwo.");
}

#[test]
fn test_read_aloud_indices_match_rendered_blocks() {
    let lesson = Lesson::demo();
    for section in &lesson.sections {
        let spoken = word_spans(&section.read_aloud_text());
        let rendered: Vec<usize> = segment_blocks(&section.blocks())
            .iter()
            .flat_map(|s| s.tokens.iter().filter_map(|t| t.word_index))
            .collect();
        let spoken: Vec<usize> = spoken.iter().map(|s| s.index).collect();
        assert_eq!(spoken, rendered);
    }
}

#[test]
fn test_sentences_for_adhd_view() {
    let lesson = Lesson::demo();
    let sentences = lesson.sections[1].sentences();
    assert_eq!(sentences.len(), 3);
    assert_eq!(sentences[0], "Leaves are like small factories where this happens.");
}
