use super::*;

#[test]
fn silent_monitor_tracks_mix_length() {
    let mut m = SilentMonitor::new();
    m.open().unwrap();
    assert!(!m.is_playing());

    m.play(&[0.0; 2 * 800], 8_000, 2).unwrap();
    assert!(m.is_playing());
    std::thread::sleep(Duration::from_millis(150));
    assert!(!m.is_playing());
}

#[test]
fn silent_monitor_stops_early() {
    let mut m = SilentMonitor::new();
    m.play(&[0.0; 48_000], 48_000, 1).unwrap();
    assert!(m.is_playing());
    m.stop();
    assert!(!m.is_playing());
}
