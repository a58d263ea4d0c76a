use smallvec::SmallVec;

/// Wrapped caption lines; most segments fit in a handful of lines.
pub type WrappedLines = SmallVec<[String; 4]>;

/// Greedy word wrap against `max_width`.
///
/// Words are separated by single spaces. A candidate line is measured with its trailing space,
/// and a word moves to a new line only when the candidate overflows and the word is not the
/// first word of the text, so an over-wide first word stays on its own line.
pub fn wrap_words(
    text: &str,
    max_width: f32,
    mut measure: impl FnMut(&str) -> f32,
) -> WrappedLines {
    let mut lines = WrappedLines::new();
    let mut line = String::new();

    for (i, word) in text.split(' ').enumerate() {
        let mut candidate = String::with_capacity(line.len() + word.len() + 1);
        candidate.push_str(&line);
        candidate.push_str(word);
        candidate.push(' ');

        if i > 0 && measure(&candidate) > max_width {
            lines.push(line.trim().to_owned());
            line.clear();
            line.push_str(word);
            line.push(' ');
        } else {
            line = candidate;
        }
    }
    lines.push(line.trim().to_owned());
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/caption/wrap.rs"]
mod tests;
