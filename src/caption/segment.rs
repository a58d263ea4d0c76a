use std::fmt;

/// One sentence-scoped chunk of caption text.
///
/// Segments are trimmed and produced in source order; they are never mutated after a run
/// derives them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CaptionSegment(String);

impl CaptionSegment {
    /// Segment text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaptionSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CaptionSegment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split narration text into caption segments.
///
/// A boundary is a run of `.`, `!` or `?` followed by at least one whitespace character. The
/// punctuation run stays on the preceding sentence and the whitespace run is consumed. Pieces
/// are trimmed and empty pieces dropped; if nothing survives, the whole trimmed text becomes
/// the single segment. The result is never empty.
pub fn segment_narration(text: &str) -> Vec<CaptionSegment> {
    let mut out = Vec::new();
    let mut piece_start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !is_terminal(c) {
            continue;
        }
        let mut punct_end = text.len();
        while let Some(&(i, next)) = chars.peek() {
            if is_terminal(next) {
                chars.next();
            } else {
                punct_end = i;
                break;
            }
        }

        let mut resume = punct_end;
        let mut saw_space = false;
        while let Some(&(i, next)) = chars.peek() {
            if next.is_whitespace() {
                saw_space = true;
                chars.next();
                resume = i + next.len_utf8();
            } else {
                break;
            }
        }
        if !saw_space {
            continue;
        }

        push_piece(&mut out, &text[piece_start..punct_end]);
        piece_start = resume;
    }
    push_piece(&mut out, &text[piece_start..]);

    if out.is_empty() {
        out.push(CaptionSegment(text.trim().to_owned()));
    }
    out
}

fn push_piece(out: &mut Vec<CaptionSegment>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        out.push(CaptionSegment(trimmed.to_owned()));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/segment.rs"]
mod tests;
