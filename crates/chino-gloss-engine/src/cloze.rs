//! Cloze fingerprints and token-aligned substring search.
//!
//! A cloze pins a span of a sentence by its own text plus just enough
//! surrounding context to make it unique in that sentence. Token search works
//! on morpheme surface strings: a match must start and end on token
//! boundaries.

use serde::{Deserialize, Serialize};

use crate::models::Span;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cloze {
    pub left: String,
    pub cloze: String,
    pub right: String,
}

impl Cloze {
    /// `left + cloze + right`, a contiguous piece of the source sentence.
    pub fn context(&self) -> String {
        format!("{}{}{}", self.left, self.cloze, self.right)
    }
}

/// Last `n` characters of `s` (all of it when shorter).
pub(crate) fn last_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

/// First `n` characters of `s` (all of it when shorter).
pub(crate) fn first_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn occurs_once(haystack: &str, needle: &str) -> bool {
    match haystack.find(needle) {
        Some(first) => haystack.rfind(needle) == Some(first),
        None => false,
    }
}

/// Builds the cloze for `cloze` sitting between `left` and `right`.
///
/// Context grows one character per side at a time until `left + cloze +
/// right` occurs exactly once in the full sentence, or both sides are used
/// up.
pub fn context_cloze(left: &str, cloze: &str, right: &str) -> Cloze {
    let sentence = format!("{left}{cloze}{right}");
    let widest = left.chars().count().max(right.chars().count());

    let width = (0..widest)
        .find(|&n| {
            let candidate = format!("{}{cloze}{}", last_chars(left, n), first_chars(right, n));
            occurs_once(&sentence, &candidate)
        })
        .unwrap_or(widest);

    Cloze {
        left: last_chars(left, width).to_string(),
        cloze: cloze.to_string(),
        right: first_chars(right, width).to_string(),
    }
}

/// Cloze of `span` within a tokenization; `None` when the span does not fit.
pub fn tokens_cloze(tokens: &[String], span: Span) -> Option<Cloze> {
    if !span.fits(tokens.len()) {
        return None;
    }
    Some(context_cloze(
        &tokens[..span.start_idx].concat(),
        &tokens[span.start_idx..span.end_idx].concat(),
        &tokens[span.end_idx..].concat(),
    ))
}

/// Every token range whose concatenated text is exactly `needle`, in order.
///
/// Ranges starting inside a token, or ending inside one, never match.
pub fn token_spans(tokens: &[String], needle: &str) -> Vec<Span> {
    if needle.is_empty() {
        return vec![];
    }

    let mut spans = Vec::new();
    for start in 0..tokens.len() {
        let mut joined = String::new();
        for (offset, token) in tokens[start..].iter().enumerate() {
            joined.push_str(token);
            if !needle.starts_with(joined.as_str()) {
                break;
            }
            if joined.len() == needle.len() {
                spans.push(Span::new(start, start + offset + 1));
                break;
            }
        }
    }
    spans
}

/// First token range spelling `needle`.
pub fn find_token_span(tokens: &[String], needle: &str) -> Option<Span> {
    token_spans(tokens, needle).into_iter().next()
}

/// Token range for a cloze, preferring the range whose neighbours still
/// spell the cloze's context, else the first exact range.
pub fn locate_cloze(tokens: &[String], cloze: &Cloze) -> Option<Span> {
    let spans = token_spans(tokens, &cloze.cloze);
    spans
        .iter()
        .copied()
        .find(|span| {
            let before = tokens[..span.start_idx].concat();
            let after = tokens[span.end_idx..].concat();
            before.ends_with(&cloze.left) && after.starts_with(&cloze.right)
        })
        .or_else(|| spans.first().copied())
}
