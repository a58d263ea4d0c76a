use super::*;

#[test]
fn upsert_updates_in_place() {
    let mut log = PipelineLog::new();
    log.upsert("A", StepStatus::Pending);
    log.upsert("B", StepStatus::Pending);
    log.upsert("A", StepStatus::Done);

    let entries = log.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].label, "A");
    assert_eq!(entries[0].status, StepStatus::Done);
    assert_eq!(entries[1].status, StepStatus::Pending);
}

#[test]
fn steps_use_fixed_labels() {
    let labels: Vec<_> = PipelineStep::ALL.iter().map(|s| s.label()).collect();
    assert_eq!(
        labels,
        ["Loading speech engine", "Synthesizing narration", "Rendering video"]
    );

    let mut log = PipelineLog::new();
    log.mark(PipelineStep::Render, StepStatus::Error);
    assert_eq!(log.status("Rendering video"), Some(StepStatus::Error));
    log.clear();
    assert!(log.is_empty());
}
