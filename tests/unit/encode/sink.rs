use super::*;

fn frame(width: u32, height: u32, fill: u8) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: vec![fill; (width * height * 4) as usize],
        premultiplied: true,
    }
}

fn cfg() -> EncodeConfig {
    EncodeConfig::short_video(
        Canvas {
            width: 4,
            height: 2,
        },
        Fps::CAPTURE,
        CodecPair::Vp9Opus,
    )
}

#[test]
fn codec_preference_falls_back_to_vp8() {
    assert_eq!(CodecPair::select(|_| true), Some(CodecPair::Vp9Opus));
    assert_eq!(
        CodecPair::select(|c| c == CodecPair::Vp8Opus),
        Some(CodecPair::Vp8Opus)
    );
    assert_eq!(CodecPair::select(|_| false), None);
    assert_eq!(CodecPair::Vp8Opus.label(), "WebM (VP8 + Opus)");
}

#[test]
fn short_video_settings() {
    let c = cfg();
    assert_eq!(c.video_bitrate, 4_000_000);
    assert_eq!(c.flush_interval, Duration::from_millis(180));
    // 5 frames at 30 fps is 166 ms, the largest chunk not exceeding 180 ms.
    assert_eq!(c.frames_per_chunk(), 5);
}

#[test]
fn probe_without_codecs_is_capture_unsupported() {
    let mut enc = InMemoryEncoder::with_supported(&[]);
    let err = enc.probe_codecs().unwrap_err();
    assert!(matches!(err, ReelError::CaptureUnsupported(_)));
}

#[test]
fn chunks_flush_every_five_frames() {
    let mut enc = InMemoryEncoder::new();
    assert_eq!(enc.probe_codecs().unwrap(), CodecPair::Vp9Opus);
    enc.begin(cfg()).unwrap();
    for i in 0..12 {
        enc.push_frame(FrameIndex(i), &frame(4, 2, i as u8)).unwrap();
    }
    let media = enc.end().unwrap();
    // header + 5 + 5 + 2
    assert_eq!(media.chunks.len(), 4);
    assert_eq!(media.chunks[1].len(), 5 * 8);
    assert_eq!(media.chunks[3].len(), 2 * 8);

    let (w, h, fps) = InMemoryEncoder::parse(&media.assemble()).unwrap();
    assert_eq!((w, h), (4, 2));
    assert_eq!(fps.len(), 12);
    assert_eq!(fps[3], frame(4, 2, 3).fingerprint());
}

#[test]
fn rejects_out_of_order_and_mismatched_frames() {
    let mut enc = InMemoryEncoder::new();
    enc.begin(cfg()).unwrap();
    enc.push_frame(FrameIndex(1), &frame(4, 2, 0)).unwrap();
    assert!(enc.push_frame(FrameIndex(1), &frame(4, 2, 0)).is_err());
    assert!(enc.push_frame(FrameIndex(2), &frame(2, 2, 0)).is_err());
}

#[test]
fn abort_discards_output() {
    let mut enc = InMemoryEncoder::new();
    enc.begin(cfg()).unwrap();
    enc.push_frame(FrameIndex(0), &frame(4, 2, 0)).unwrap();
    enc.abort();
    assert!(enc.end().is_err());
}
