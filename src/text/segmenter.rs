//! Splits long input text into synthesis-sized segments.
//!
//! Packing is greedy and works in three tiers:
//! 1. paragraphs (blank-line delimited), joined with `"\n\n"`;
//! 2. sentences of a paragraph that alone exceeds the budget, joined with `" "`;
//! 3. a single sentence over budget is emitted as-is, never cut mid-word.
//!
//! Lengths are measured in Unicode scalar values (`char`s).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{PipelineError, Result};

pub const PARAGRAPH_SEPARATOR: &str = "\n\n";
pub const SENTENCE_SEPARATOR: &str = " ";

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

// Terminal punctuation, an optional closing quote, then whitespace or end of text.
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["'”’]?(?:\s+|$)"#).unwrap());

/// Pure function: `text` -> ordered, non-empty chunks of at most `max_chars`
/// characters, except for single sentences that alone exceed the budget.
pub fn segment(text: &str, max_chars: usize) -> Result<Vec<String>> {
    if max_chars == 0 {
        return Err(PipelineError::Segmentation(
            "a zero character budget cannot hold any text".into(),
        ));
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if char_len(trimmed) <= max_chars {
        return Ok(vec![trimmed.to_string()]);
    }

    let mut packer = Packer::new(max_chars, PARAGRAPH_SEPARATOR);
    for paragraph in paragraphs(trimmed) {
        if char_len(paragraph) <= max_chars {
            packer.push(paragraph);
            continue;
        }

        // Oversized paragraph: close what we have, pack its sentences on their own.
        let mut finished = packer.finish();
        let mut sentence_packer = Packer::new(max_chars, SENTENCE_SEPARATOR);
        for sentence in sentences(paragraph) {
            sentence_packer.push(sentence);
        }
        finished.extend(sentence_packer.finish());
        packer = Packer::resume(finished, max_chars, PARAGRAPH_SEPARATOR);
    }

    Ok(packer.finish())
}

/// Blank-line delimited paragraphs, trimmed, empties dropped.
pub fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

/// Sentence split of a single paragraph. Text after the last terminator is kept
/// as a trailing sentence so nothing is lost.
pub fn sentences(paragraph: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_END.find_iter(paragraph) {
        let sentence = paragraph[start..boundary.end()].trim();
        if !sentence.is_empty() {
            out.push(sentence);
        }
        start = boundary.end();
    }
    let rest = paragraph[start..].trim();
    if !rest.is_empty() {
        out.push(rest);
    }
    out
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Greedy accumulator shared by the paragraph and sentence tiers.
struct Packer {
    max_chars: usize,
    separator: &'static str,
    finished: Vec<String>,
    buffer: String,
    buffer_chars: usize,
}

impl Packer {
    fn new(max_chars: usize, separator: &'static str) -> Self {
        Self::resume(Vec::new(), max_chars, separator)
    }

    fn resume(finished: Vec<String>, max_chars: usize, separator: &'static str) -> Self {
        Self {
            max_chars,
            separator,
            finished,
            buffer: String::new(),
            buffer_chars: 0,
        }
    }

    fn push(&mut self, piece: &str) {
        let piece_chars = char_len(piece);
        if self.buffer.is_empty() {
            self.buffer.push_str(piece);
            self.buffer_chars = piece_chars;
            return;
        }

        let joined = self.buffer_chars + self.separator.len() + piece_chars;
        if joined <= self.max_chars {
            self.buffer.push_str(self.separator);
            self.buffer.push_str(piece);
            self.buffer_chars = joined;
        } else {
            self.flush();
            self.buffer.push_str(piece);
            self.buffer_chars = piece_chars;
        }
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            self.finished.push(std::mem::take(&mut self.buffer));
        }
        self.buffer_chars = 0;
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.finished
    }
}
