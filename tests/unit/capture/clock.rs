use super::*;

#[test]
fn virtual_clock_ticks_at_frame_boundaries() {
    let mut clock = DrawClock::new(CaptureMode::Offline, Fps::CAPTURE, Instant::now());
    let ticks: Vec<f64> = (0..4).map(|_| clock.next_elapsed()).collect();
    assert_eq!(ticks[0], 0.0);
    assert!((ticks[1] - 1.0 / 30.0).abs() < 1e-12);
    assert!((ticks[3] - 0.1).abs() < 1e-12);
}

#[test]
fn wall_clock_is_paced_and_monotonic() {
    let start = Instant::now();
    let mut clock = DrawClock::new(CaptureMode::Realtime, Fps::CAPTURE, start);
    let mut prev = -1.0;
    for _ in 0..4 {
        let e = clock.next_elapsed();
        assert!(e > prev);
        prev = e;
    }
    // Tick 3 is due at 100 ms.
    assert!(prev >= 0.1);
}

#[test]
fn default_mode_is_offline() {
    assert_eq!(CaptureMode::default(), CaptureMode::Offline);
    let json = serde_json::to_string(&CaptureMode::Realtime).unwrap();
    assert_eq!(json, "\"realtime\"");
}
