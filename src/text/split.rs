// Sentence, paragraph, and lesson-block splitting
//
// Sentence chunks drive the ADHD one-sentence-at-a-time view. Paragraph splitting
// mirrors what the browser extension reader does with scraped page text.

use regex::Regex;
use std::sync::LazyLock;

static NEWLINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("newline pattern is a valid regex"));

static BLANK_LINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n+").expect("blank line pattern is a valid regex"));

static PARAGRAPH_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n+|\n").expect("paragraph pattern is a valid regex"));

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split one line at whitespace runs that follow a terminal punctuation mark
fn split_line_sentences(line: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = line.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c.is_whitespace() && prev.is_some_and(is_terminal) {
            sentences.push(&line[start..i]);
            // Swallow the rest of the whitespace run
            let mut end = i + c.len_utf8();
            while let Some(&(j, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = j + next.len_utf8();
                chars.next();
            }
            start = end;
            prev = None;
            continue;
        }
        prev = Some(c);
    }
    sentences.push(&line[start..]);
    sentences
}

/// Split text into sentences
///
/// Newline runs are hard boundaries. Within a line, a sentence ends at whitespace that
/// follows `.`, `!`, or `?`. Results are trimmed and empty pieces dropped; a line without
/// terminal punctuation stays one sentence.
pub fn sentences(text: &str) -> Vec<String> {
    NEWLINE_RUNS
        .split(text)
        .flat_map(split_line_sentences)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sentences across several paragraphs, in order
pub fn sentences_of<S: AsRef<str>>(paragraphs: &[S]) -> Vec<String> {
    paragraphs
        .iter()
        .flat_map(|p| sentences(p.as_ref()))
        .collect()
}

/// Split scraped page text into paragraphs (blank-line runs or single newlines)
pub fn paragraphs(text: &str) -> Vec<String> {
    PARAGRAPH_BREAKS
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split user-provided lesson text into blocks separated by blank lines
pub fn lesson_blocks(text: &str) -> Vec<String> {
    BLANK_LINE_RUNS
        .split(text.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "split_test.rs"]
mod tests;
