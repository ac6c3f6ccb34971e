use super::*;

#[test]
fn test_sentences_split_on_terminal_punctuation() {
    let result = sentences("Plants need light. Do they need water? Yes! They do.");
    assert_eq!(
        result,
        vec![
            "Plants need light.",
            "Do they need water?",
            "Yes!",
            "They do."
        ]
    );
}

#[test]
fn test_sentences_newlines_are_hard_boundaries() {
    let result = sentences("First line without stop\nSecond line. Third\n\n\nFourth");
    assert_eq!(
        result,
        vec!["First line without stop", "Second line.", "Third", "Fourth"]
    );
}

#[test]
fn test_sentences_line_without_punctuation_is_one_sentence() {
    assert_eq!(sentences("just some words here"), vec!["just some words here"]);
}

#[test]
fn test_sentences_empty_and_whitespace_input() {
    assert!(sentences("").is_empty());
    assert!(sentences("   \n\n  ").is_empty());
}

#[test]
fn test_sentences_do_not_split_inside_numbers() {
    // No whitespace after the dot, so no boundary
    assert_eq!(sentences("Pi is 3.14 roughly."), vec!["Pi is 3.14 roughly."]);
}

#[test]
fn test_sentences_collapse_whitespace_runs_after_stop() {
    assert_eq!(sentences("One.   \t Two."), vec!["One.", "Two."]);
}

#[test]
fn test_sentences_of_concatenates_paragraphs() {
    let paragraphs = vec!["A one. A two.".to_string(), "B one.".to_string()];
    assert_eq!(sentences_of(&paragraphs), vec!["A one.", "A two.", "B one."]);
}

#[test]
fn test_paragraphs_split_and_trim() {
    let result = paragraphs("  Intro para \n\n\nSecond\nThird  \n");
    assert_eq!(result, vec!["Intro para", "Second", "Third"]);
}

#[test]
fn test_lesson_blocks_split_on_blank_lines_only() {
    let result = lesson_blocks("\n\nFirst block\nstill first\n\n\nSecond block\n");
    assert_eq!(result, vec!["First block\nstill first", "Second block"]);
}

#[test]
fn test_lesson_blocks_empty() {
    assert!(lesson_blocks("  \n ").is_empty());
}
