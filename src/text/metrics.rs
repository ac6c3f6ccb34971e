// Reading-ease metrics used to grade transformed content

use serde::Serialize;

/// Readability figures for a block of text
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingMetrics {
    pub flesch_score: f64,
    pub word_count: usize,
    pub sentence_count: usize,
}

fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    if word.chars().count() <= 3 {
        return 1;
    }
    let stem = word
        .strip_suffix("es")
        .or_else(|| word.strip_suffix("ed"))
        .or_else(|| word.strip_suffix('e'))
        .unwrap_or(&word);

    let mut groups = 0;
    let mut in_group = false;
    for c in stem.chars() {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !in_group {
            groups += 1;
        }
        in_group = vowel;
    }
    groups.max(1)
}

fn count_sentences(text: &str) -> usize {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0;
    }
    let parts = trimmed
        .split(['.', '!', '?'])
        .filter(|p| !p.is_empty())
        .count();
    parts.max(1)
}

/// Flesch Reading Ease: `206.835 - 1.015 * words/sentence - 84.6 * syllables/word`
///
/// Higher is easier. Empty text scores 0.
pub fn flesch_reading_ease(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    let sentence_count = count_sentences(text);
    if words.is_empty() || sentence_count == 0 {
        return 0.0;
    }

    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
    let avg_sentence_length = words.len() as f64 / sentence_count as f64;
    let avg_syllables = syllables as f64 / words.len() as f64;

    206.835 - 1.015 * avg_sentence_length - 84.6 * avg_syllables
}

/// Percentage drop in complexity between two Flesch scores, clamped to 0..=100 and
/// rounded to one decimal
pub fn complexity_reduction_percent(original_score: f64, transformed_score: f64) -> f64 {
    let original = (100.0 - original_score).max(0.0);
    let transformed = (100.0 - transformed_score).max(0.0);
    if original == 0.0 {
        return 0.0;
    }
    let reduction = ((original - transformed) / original * 100.0).clamp(0.0, 100.0);
    (reduction * 10.0).round() / 10.0
}

pub fn reading_metrics(text: &str) -> ReadingMetrics {
    ReadingMetrics {
        flesch_score: flesch_reading_ease(text),
        word_count: text.split_whitespace().count(),
        sentence_count: count_sentences(text),
    }
}
