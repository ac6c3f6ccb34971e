use super::*;

#[test]
fn test_segment_assigns_indices_to_words_only() {
    let result = segment("Plants use sunlight.", 0);

    let words: Vec<_> = result
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Word)
        .map(|t| (t.text, t.word_index))
        .collect();
    assert_eq!(
        words,
        vec![("Plants", Some(0)), ("use", Some(1)), ("sunlight", Some(2))]
    );
    assert!(result
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Filler)
        .all(|t| t.word_index.is_none()));
    assert_eq!(result.next_index, 3);
}

#[test]
fn test_segment_tokens_cover_input_exactly() {
    let text = "  Hello, world!  It's 3pm.\n";
    let result = segment(text, 0);

    let rebuilt: String = result.tokens.iter().map(|t| t.text).collect();
    assert_eq!(rebuilt, text);
}

#[test]
fn test_segment_is_deterministic() {
    let text = "Leaves are like small factories where this happens.";
    assert_eq!(segment(text, 4), segment(text, 4));
    assert_eq!(word_spans(text), word_spans(text));
}

#[test]
fn test_spans_are_sorted_and_disjoint() {
    let spans = word_spans("one two, three... four_five 6!");

    assert_eq!(spans.len(), 5);
    for (i, span) in spans.iter().enumerate() {
        assert_eq!(span.index, i);
        assert!(span.start < span.end);
    }
    for pair in spans.windows(2) {
        assert!(pair[0].end <= pair[1].start);
        assert!(pair[0].index < pair[1].index);
    }
}

#[test]
fn test_segment_empty_and_punctuation_only() {
    let empty = segment("", 7);
    assert!(empty.tokens.is_empty());
    assert_eq!(empty.next_index, 7);

    let punct = segment("... !?", 0);
    assert_eq!(punct.tokens.len(), 1);
    assert_eq!(punct.tokens[0].kind, TokenKind::Filler);
    assert_eq!(punct.next_index, 0);
}

#[test]
fn test_segment_blocks_threads_counter() {
    let blocks = ["What is photosynthesis?", "Plants make food.", "They grow."];
    let segmented = segment_blocks(&blocks);

    assert_eq!(segmented[0].next_index, 3);
    assert_eq!(segmented[1].spans()[0].index, 3);
    assert_eq!(segmented[2].spans()[0].index, 6);
    assert_eq!(segmented[2].next_index, 8);
}

#[test]
fn test_block_indices_match_joined_text_indices() {
    // Read-aloud speaks heading and paragraphs joined by blank lines; the rendered
    // blocks must number words identically so highlights land on the right word.
    let blocks = ["Why it matters", "Plants release oxygen.", "They feed us."];
    let joined = blocks.join("\n\n");

    let rendered: Vec<String> = segment_blocks(&blocks)
        .iter()
        .flat_map(|s| s.tokens.clone())
        .filter(|t| t.kind == TokenKind::Word)
        .map(|t| format!("{}:{}", t.word_index.unwrap(), t.text))
        .collect();
    let spoken: Vec<String> = word_spans(&joined)
        .iter()
        .map(|s| format!("{}:{}", s.index, &joined[s.start..s.end]))
        .collect();

    assert_eq!(rendered, spoken);
}

#[test]
fn test_span_at_finds_containing_span() {
    let text = "The sugar gives energy";
    let spans = word_spans(text);

    assert_eq!(span_at(&spans, 0).map(|s| s.index), Some(0));
    assert_eq!(span_at(&spans, 4).map(|s| s.index), Some(1));
    assert_eq!(span_at(&spans, 8).map(|s| s.index), Some(1));
    assert_eq!(span_at(&spans, 16).map(|s| s.index), Some(3));
}

#[test]
fn test_span_at_gap_and_out_of_range() {
    let spans = word_spans("a  b");

    assert!(span_at(&spans, 1).is_none());
    assert!(span_at(&spans, 2).is_none());
    assert!(span_at(&spans, 99).is_none());
    assert!(span_at(&[], 0).is_none());
}
