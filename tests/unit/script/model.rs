use super::*;

fn sample_json() -> &'static str {
    r#"{
        "id": "focus-01",
        "title": "The 2 Minute Focus Trick",
        "hook": "Stop scrolling.",
        "niche": "productivity",
        "narrationText": "Stop scrolling. Try this now!",
        "tags": ["focus", "habits"],
        "trendScore": 87,
        "durationSeconds": 35
    }"#
}

#[test]
fn parses_single_record_with_camel_case_fields() {
    let scripts = Script::catalog_from_json_str(sample_json()).unwrap();
    assert_eq!(scripts.len(), 1);
    let s = &scripts[0];
    assert_eq!(s.id, "focus-01");
    assert_eq!(s.narration_text, "Stop scrolling. Try this now!");
    assert_eq!(s.tags, vec!["focus".to_string(), "habits".to_string()]);
    assert_eq!(s.trend_score, 87);
    assert_eq!(s.duration_seconds, 35);
}

#[test]
fn parses_array_catalog() {
    let json = format!("[{}, {}]", sample_json(), sample_json());
    let scripts = Script::catalog_from_json_str(&json).unwrap();
    assert_eq!(scripts.len(), 2);
}

#[test]
fn rejects_out_of_range_trend_score() {
    let json = sample_json().replace("87", "140");
    let err = Script::catalog_from_json_str(&json).unwrap_err();
    assert!(err.to_string().contains("trend score"));
}

#[test]
fn suggested_file_name_slugifies_title() {
    assert_eq!(
        suggested_file_name("The 2 Minute  Focus\tTrick"),
        "the-2-minute-focus-trick-short.webm"
    );
    assert_eq!(suggested_file_name(" Hi"), "-hi-short.webm");
}
