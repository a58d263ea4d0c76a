use super::*;

fn texts(segments: &[CaptionSegment]) -> Vec<&str> {
    segments.iter().map(CaptionSegment::as_str).collect()
}

#[test]
fn splits_on_terminal_punctuation_followed_by_whitespace() {
    let segs = segment_narration("This is great! You will love it. Try now.");
    assert_eq!(
        texts(&segs),
        vec!["This is great!", "You will love it.", "Try now."]
    );
}

#[test]
fn punctuation_runs_stay_with_their_sentence() {
    let segs = segment_narration("Wait...   what?!\nReally.");
    assert_eq!(texts(&segs), vec!["Wait...", "what?!", "Really."]);
}

#[test]
fn punctuation_without_whitespace_is_not_a_boundary() {
    let segs = segment_narration("Version 2.5 ships today.Really");
    assert_eq!(texts(&segs), vec!["Version 2.5 ships today.Really"]);
}

#[test]
fn falls_back_to_whole_trimmed_text() {
    let segs = segment_narration("   no boundary here   ");
    assert_eq!(texts(&segs), vec!["no boundary here"]);
}

#[test]
fn empty_pieces_are_dropped() {
    let segs = segment_narration("  One.   \n\n  Two!  ");
    assert_eq!(texts(&segs), vec!["One.", "Two!"]);
}

#[test]
fn never_empty_for_any_input() {
    for text in ["", "   ", "!", ". . .", "a"] {
        assert!(!segment_narration(text).is_empty(), "{text:?}");
    }
}

#[test]
fn segmenting_is_deterministic_and_preserves_order() {
    let text = "First line here. Second one follows! Third asks why? Fourth ends";
    let a = segment_narration(text);
    let b = segment_narration(text);
    assert_eq!(a, b);

    let rebuilt = texts(&a).join(" ");
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    assert_eq!(rebuilt, normalized);
}

#[test]
fn handles_multibyte_text() {
    let segs = segment_narration("Café time! Ünïcode works.");
    assert_eq!(texts(&segs), vec!["Café time!", "Ünïcode works."]);
}
