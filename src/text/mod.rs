// Text processing: word segmentation, sentence/paragraph splitting, readability metrics

pub mod metrics;
pub mod segment;
pub mod split;

pub use metrics::{
    complexity_reduction_percent, flesch_reading_ease, reading_metrics, ReadingMetrics,
};
pub use segment::{
    segment, segment_blocks, span_at, word_spans, Segmented, Token, TokenKind, WordSpan,
};
pub use split::{lesson_blocks, paragraphs, sentences, sentences_of};
