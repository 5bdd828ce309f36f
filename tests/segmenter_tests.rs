use voxline::text::segmenter::{paragraphs, segment, sentences, PARAGRAPH_SEPARATOR};
use voxline::PipelineError;

fn words(chunks: &[String]) -> Vec<String> {
    chunks
        .iter()
        .flat_map(|c| c.split_whitespace())
        .map(str::to_string)
        .collect()
}

#[test]
fn test_empty_and_blank_input_yield_nothing() {
    assert!(segment("", 100).unwrap().is_empty());
    assert!(segment("   \n\n \t  ", 100).unwrap().is_empty());
}

#[test]
fn test_single_chunk_passthrough_is_exact_trim() {
    let text = "  Hello there.\n\nSecond   paragraph,  odd spacing kept!  \n";
    let chunks = segment(text, 4000).unwrap();
    assert_eq!(chunks, vec![text.trim().to_string()], "Fast path must not alter the text");

    // Budget equal to the trimmed length still takes the fast path
    let exact = "abcde";
    assert_eq!(segment(exact, 5).unwrap(), vec!["abcde".to_string()]);
}

#[test]
fn test_length_is_counted_in_chars_not_bytes() {
    let text = "ééééé"; // 5 chars, 10 bytes
    assert_eq!(segment(text, 5).unwrap(), vec![text.to_string()]);
}

#[test]
fn test_paragraph_packing_is_greedy() {
    let p = "x".repeat(10);
    let text = format!("{p}\n\n{p}\n\n{p}");

    // 10 + 2 + 10 = 22 fits in 25, adding a third (34) does not
    let chunks = segment(&text, 25).unwrap();
    assert_eq!(chunks, vec![format!("{p}\n\n{p}"), p.clone()]);

    // Reconstruction with the paragraph separator reproduces the input
    assert_eq!(chunks.join(PARAGRAPH_SEPARATOR), text);
}

#[test]
fn test_multiple_blank_lines_collapse_to_one_break() {
    let text = "First block.\n\n\n   \n\nSecond block.";
    assert_eq!(
        paragraphs(text).collect::<Vec<_>>(),
        vec!["First block.", "Second block."]
    );

    let chunks = segment(text, 20).unwrap();
    assert_eq!(chunks, vec!["First block.", "Second block."]);
}

#[test]
fn test_oversized_paragraph_falls_back_to_sentences() {
    let text = "One two three. Four five six! Seven eight nine? Ten.";
    let chunks = segment(text, 30).unwrap();

    assert_eq!(
        chunks,
        vec!["One two three. Four five six!", "Seven eight nine? Ten."]
    );
    assert!(chunks.iter().all(|c| c.chars().count() <= 30));
    assert_eq!(chunks.join(" "), text);
}

#[test]
fn test_sentence_split_handles_closing_quotes_and_trailing_text() {
    let para = "He said \"stop.\" Then he left! What now? no terminator here";
    assert_eq!(
        sentences(para),
        vec![
            "He said \"stop.\"",
            "Then he left!",
            "What now?",
            "no terminator here"
        ]
    );

    // Dots inside a token are not boundaries
    assert_eq!(sentences("Version 1.2 shipped."), vec!["Version 1.2 shipped."]);
}

#[test]
fn test_single_oversized_sentence_is_emitted_whole() {
    // No terminator at all: the whole paragraph is one "sentence"
    let text = "this sentence never ends and keeps going";
    let chunks = segment(text, 10).unwrap();
    assert_eq!(chunks, vec![text.to_string()], "Oversized sentence must not be truncated");
    assert!(chunks[0].chars().count() > 10);
}

#[test]
fn test_order_is_preserved_across_tiers() {
    let text = "Intro.\n\nAlpha beta. Gamma delta.\n\nOutro.";
    let chunks = segment(text, 15).unwrap();
    assert_eq!(chunks, vec!["Intro.", "Alpha beta.", "Gamma delta.", "Outro."]);
}

#[test]
fn test_length_bound_and_completeness_on_long_text() {
    let mut text = String::new();
    for p in 0..12 {
        for s in 0..(3 + p % 5) {
            text.push_str(&format!("Paragraph {p} sentence {s} has a few more words. "));
        }
        text.push_str("\n\n");
    }

    for max in [60, 120, 250, 900] {
        let chunks = segment(&text, max).unwrap();
        assert!(chunks.len() > 1, "Budget {max} should split the text");
        for chunk in &chunks {
            assert!(!chunk.is_empty());
            assert!(
                chunk.chars().count() <= max,
                "Chunk of {} chars exceeds budget {max}",
                chunk.chars().count()
            );
        }
        // No text lost or duplicated
        let original: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        assert_eq!(words(&chunks), original);
    }
}

#[test]
fn test_segmentation_is_deterministic() {
    let text = "A first sentence. A second one!\n\nAnother paragraph here? Yes.".repeat(20);
    assert_eq!(segment(&text, 70).unwrap(), segment(&text, 70).unwrap());
}

#[test]
fn test_zero_budget_is_rejected() {
    let err = segment("anything", 0).unwrap_err();
    assert!(matches!(err, PipelineError::Segmentation(_)));
}

#[test]
fn test_two_long_paragraphs_become_two_segments() {
    let text = format!("{}\n\n{}", "a".repeat(4500), "b".repeat(4500));
    let chunks = segment(&text, 4000).unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0], "a".repeat(4500));
    assert_eq!(chunks[1], "b".repeat(4500));
    assert_eq!(chunks.join(PARAGRAPH_SEPARATOR), text);
}

#[test]
fn test_oversized_sentence_between_short_ones_stands_alone() {
    let long = "This middle sentence runs well past the twenty character budget.";
    let text = format!("Short one. {} Short two.", long);

    let chunks = segment(&text, 20).unwrap();
    assert_eq!(chunks, vec!["Short one.", long, "Short two."]);

    let over: Vec<_> = chunks.iter().filter(|c| c.chars().count() > 20).collect();
    assert_eq!(over, vec![long], "Only the unsplittable sentence may exceed the budget");
}
