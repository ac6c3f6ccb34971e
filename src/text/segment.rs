// Word segmentation for read-aloud highlighting
// Splits prose into word and filler tokens, assigning each word an ordinal index

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// A word is a contiguous run of letters, digits, or underscores.
static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("word pattern is a valid regex"));

/// Byte range of one word within a source text plus its ordinal position
///
/// Offsets are byte offsets into the `&str` that was segmented; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordSpan {
    pub start: usize,
    pub end: usize,
    pub index: usize,
}

impl WordSpan {
    /// Whether `offset` falls inside `[start, end)`
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Kind of a segmented token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    /// A word run, carries an index
    Word,
    /// Whitespace or punctuation between words
    Filler,
}

/// One token of a segmented text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    /// Word index, `None` for filler tokens
    pub word_index: Option<usize>,
}

/// Output of segmenting one block of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmented<'a> {
    pub tokens: Vec<Token<'a>>,
    /// Index the next block should start numbering from
    pub next_index: usize,
}

impl<'a> Segmented<'a> {
    /// Word spans of this block, in scan order
    pub fn spans(&self) -> Vec<WordSpan> {
        self.tokens
            .iter()
            .filter_map(|t| {
                t.word_index.map(|index| WordSpan {
                    start: t.start,
                    end: t.end,
                    index,
                })
            })
            .collect()
    }
}

/// Segment `text` into word and filler tokens
///
/// Word indices start at `start_index` and increase by one per word. Callers rendering
/// a multi-block document pass the previous block's `next_index` so numbering continues
/// across blocks.
pub fn segment(text: &str, start_index: usize) -> Segmented<'_> {
    let mut tokens = Vec::new();
    let mut index = start_index;
    let mut cursor = 0;

    for m in WORD_PATTERN.find_iter(text) {
        if m.start() > cursor {
            tokens.push(Token {
                kind: TokenKind::Filler,
                text: &text[cursor..m.start()],
                start: cursor,
                end: m.start(),
                word_index: None,
            });
        }
        tokens.push(Token {
            kind: TokenKind::Word,
            text: m.as_str(),
            start: m.start(),
            end: m.end(),
            word_index: Some(index),
        });
        index += 1;
        cursor = m.end();
    }

    if cursor < text.len() {
        tokens.push(Token {
            kind: TokenKind::Filler,
            text: &text[cursor..],
            start: cursor,
            end: text.len(),
            word_index: None,
        });
    }

    Segmented {
        tokens,
        next_index: index,
    }
}

/// Segment a sequence of blocks (heading, then paragraphs), threading the word counter
/// from each block into the next
pub fn segment_blocks<'a, S: AsRef<str>>(blocks: &'a [S]) -> Vec<Segmented<'a>> {
    let mut next = 0;
    blocks
        .iter()
        .map(|block| {
            let segmented = segment(block.as_ref(), next);
            next = segmented.next_index;
            segmented
        })
        .collect()
}

/// Word spans of `text`, indexed from zero
pub fn word_spans(text: &str) -> Vec<WordSpan> {
    WORD_PATTERN
        .find_iter(text)
        .enumerate()
        .map(|(index, m)| WordSpan {
            start: m.start(),
            end: m.end(),
            index,
        })
        .collect()
}

/// Find the span containing `offset`
///
/// Spans are sorted and non-overlapping, so a binary search over `start` suffices.
pub fn span_at(spans: &[WordSpan], offset: usize) -> Option<&WordSpan> {
    let candidate = spans.partition_point(|s| s.start <= offset);
    if candidate == 0 {
        return None;
    }
    let span = &spans[candidate - 1];
    span.contains(offset).then_some(span)
}

#[cfg(test)]
#[path = "segment_test.rs"]
mod tests;
