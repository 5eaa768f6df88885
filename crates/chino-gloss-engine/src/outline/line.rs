use regex::Regex;
use std::sync::OnceLock;

/// Local facts about one outline line, before any reference to its neighbours.
///
/// This is phase 1 of outline parsing: each candidate line is classified on
/// its own; the counter stack only sees the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineLine {
    /// 1-based line number in the source text.
    pub line_number: usize,
    /// Number of leading tab characters.
    pub indent: usize,
    /// Text after the marker token, escape removed.
    pub description: String,
}

fn outline_line_regex() -> &'static Regex {
    static OUTLINE_LINE: OnceLock<Regex> = OnceLock::new();
    OUTLINE_LINE.get_or_init(|| Regex::new(r"^\t*[0-9]").expect("Invalid outline line regex"))
}

/// Whether a raw line takes part in the outline at all (`^\t*[0-9]`).
pub fn is_outline_line(raw: &str) -> bool {
    outline_line_regex().is_match(raw)
}

/// Classifies a raw line, returning `None` for lines outside the outline.
pub fn classify(line_number: usize, raw: &str) -> Option<OutlineLine> {
    if !is_outline_line(raw) {
        return None;
    }
    Some(OutlineLine {
        line_number,
        indent: raw.chars().take_while(|c| *c == '\t').count(),
        description: description(raw),
    })
}

/// Drops the leading marker token (`1`, `2.`, ...) and one leading `\`.
///
/// The remainder is split on single spaces and re-joined, so runs of spaces
/// inside the description survive as they were written.
pub fn description(raw: &str) -> String {
    let trimmed = raw.trim();
    let rest = trimmed.split(' ').skip(1).collect::<Vec<_>>().join(" ");
    match rest.strip_prefix('\\') {
        Some(unescaped) => unescaped.to_string(),
        None => rest,
    }
}
