use super::*;

#[test]
fn tables_are_indexed_by_their_keys() {
    for key in VoiceKey::ALL {
        assert_eq!(key.profile().key, key);
    }
    for id in PaletteId::ALL {
        assert_eq!(id.palette().id, id);
    }
}

#[test]
fn presets_sit_inside_fine_tune_bounds() {
    for p in &VOICE_PROFILES {
        assert!(PITCH_RANGE.contains(&p.pitch), "{}", p.label);
        assert!(SPEED_RANGE.contains(&p.speed), "{}", p.label);
    }
}

#[test]
fn settings_copy_profile_and_clamp_fine_tune() {
    let mut s = VoiceSettings::from_profile(VoiceKey::Energetic.profile());
    assert_eq!(s.voice(), "en");
    assert_eq!(s.variant(), Some("f5"));
    assert_eq!(s.pitch(), 160);
    assert_eq!(s.amplitude(), 120);

    s.set_pitch(5);
    assert_eq!(s.pitch(), 20);
    s.set_pitch(999);
    assert_eq!(s.pitch(), 200);
    s.set_speed(100);
    assert_eq!(s.speed(), 120);
    s.set_speed(241);
    assert_eq!(s.speed(), 240);
}

#[test]
fn default_settings_use_neutral_voice() {
    let s = VoiceSettings::default();
    assert_eq!(s.key(), VoiceKey::Neutral);
    assert_eq!(s.voice(), "en-us");
    assert_eq!(s.variant(), None);
}

#[test]
fn keys_round_trip_through_serde_names() {
    let json = serde_json::to_string(&PaletteId::Sunrise).unwrap();
    assert_eq!(json, "\"sunrise\"");
    let key: VoiceKey = serde_json::from_str("\"storyteller\"").unwrap();
    assert_eq!(key, VoiceKey::Storyteller);
    assert_eq!(key.as_str(), "storyteller");
}

#[test]
fn keys_parse_from_names_case_insensitively() {
    assert_eq!("Bold".parse::<VoiceKey>().unwrap(), VoiceKey::Bold);
    assert_eq!(" aqua ".parse::<PaletteId>().unwrap(), PaletteId::Aqua);
    assert!("robot".parse::<VoiceKey>().is_err());
    assert!("".parse::<PaletteId>().is_err());
}
