use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ReelError::engine_unavailable("x")
            .to_string()
            .contains("speech engine unavailable:")
    );
    assert!(
        ReelError::decode("x")
            .to_string()
            .contains("audio decode failed:")
    );
    assert!(
        ReelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn kinds_cover_pipeline_failures() {
    assert_eq!(
        ReelError::engine_unavailable("x").kind(),
        ErrorKind::EngineUnavailable
    );
    assert_eq!(ReelError::synthesis("x").kind(), ErrorKind::SynthesisFailure);
    assert_eq!(ReelError::decode("x").kind(), ErrorKind::DecodeFailure);
    assert_eq!(
        ReelError::capture_unsupported("x").kind(),
        ErrorKind::CaptureUnsupported
    );
    assert_eq!(ReelError::evaluation("x").kind(), ErrorKind::Unknown);
    assert_eq!(ReelError::validation("x").kind(), ErrorKind::Unknown);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), ErrorKind::Unknown);
}
