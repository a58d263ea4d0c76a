use super::*;
use crate::script::presets::VoiceKey;

#[test]
fn args_join_voice_and_variant() {
    let settings = VoiceSettings::from_profile(VoiceKey::Energetic.profile());
    let args = EspeakEngine::args(&settings, Path::new("/tmp/n.wav"));
    assert_eq!(
        args,
        [
            "-v", "en+f5", "-p", "160", "-s", "190", "-a", "120", "-w", "/tmp/n.wav", "--stdin"
        ]
    );
}

#[test]
fn args_use_bare_voice_without_variant() {
    let mut settings = VoiceSettings::default();
    settings.set_pitch(250);
    let args = EspeakEngine::args(&settings, Path::new("out.wav"));
    assert_eq!(args[1], "en-us");
    assert_eq!(args[3], "200");
}

#[test]
fn missing_binary_is_engine_unavailable() {
    let engine = EspeakEngine::new("/definitely/not/espeak-ng", std::env::temp_dir());
    let err = engine.initialize().unwrap_err();
    assert!(matches!(err, ReelError::EngineUnavailable(_)));
}

#[test]
fn missing_binary_fails_synthesis() {
    let engine = EspeakEngine::new("/definitely/not/espeak-ng", std::env::temp_dir());
    let err = engine
        .speak("Hello there.", &VoiceSettings::default())
        .unwrap_err();
    assert!(matches!(err, ReelError::SynthesisFailure(_)));
}
