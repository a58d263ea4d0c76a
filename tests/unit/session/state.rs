use super::*;

const ALL_STATES: [GenerationState; 5] = [
    GenerationState::Idle,
    GenerationState::Loading,
    GenerationState::Rendering,
    GenerationState::Complete,
    GenerationState::Error,
];

const ALL_EVENTS: [GenerationEvent; 4] = [
    GenerationEvent::Begin,
    GenerationEvent::Synthesized,
    GenerationEvent::Rendered,
    GenerationEvent::Failed,
];

#[test]
fn happy_path_reaches_complete() {
    let s = GenerationState::Idle;
    let s = s.next(GenerationEvent::Begin).unwrap();
    assert_eq!(s, GenerationState::Loading);
    let s = s.next(GenerationEvent::Synthesized).unwrap();
    assert_eq!(s, GenerationState::Rendering);
    let s = s.next(GenerationEvent::Rendered).unwrap();
    assert_eq!(s, GenerationState::Complete);
}

#[test]
fn only_lattice_transitions_are_accepted() {
    use GenerationEvent as E;
    use GenerationState as S;
    let allowed = [
        (S::Idle, E::Begin, S::Loading),
        (S::Complete, E::Begin, S::Loading),
        (S::Error, E::Begin, S::Loading),
        (S::Loading, E::Synthesized, S::Rendering),
        (S::Loading, E::Failed, S::Error),
        (S::Rendering, E::Rendered, S::Complete),
        (S::Rendering, E::Failed, S::Error),
    ];
    for s in ALL_STATES {
        for e in ALL_EVENTS {
            let expected = allowed
                .iter()
                .find(|(from, ev, _)| *from == s && *ev == e)
                .map(|(_, _, to)| *to);
            assert_eq!(s.next(e), expected, "{s} on {e:?}");
        }
    }
}

#[test]
fn terminal_states_never_skip_loading() {
    for s in [GenerationState::Complete, GenerationState::Error] {
        assert_eq!(s.next(GenerationEvent::Synthesized), None);
        assert_eq!(s.next(GenerationEvent::Rendered), None);
        assert!(!s.is_busy());
    }
    assert!(GenerationState::Loading.is_busy());
    assert!(GenerationState::Rendering.is_busy());
}
