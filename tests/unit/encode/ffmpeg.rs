use super::*;
use crate::audio::graph::AudioInputConfig;
use crate::foundation::core::Canvas;

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn args_describe_webm_with_audio() {
    let mut cfg = EncodeConfig::short_video(Canvas::PORTRAIT, Fps::CAPTURE, CodecPair::Vp9Opus);
    cfg.audio = Some(AudioInputConfig {
        path: PathBuf::from("/tmp/mix.f32le"),
        sample_rate: 22_050,
        channels: 1,
    });
    let args = FfmpegWebmEncoder::args(&cfg).join(" ");
    assert!(args.contains("-s 720x1280 -r 30/1 -i pipe:0"));
    assert!(args.contains("-f f32le -ar 22050 -ac 1 -i /tmp/mix.f32le"));
    assert!(args.contains("-c:v libvpx-vp9 -b:v 4000000"));
    assert!(args.contains("-c:a libopus -ar 48000"));
    assert!(args.ends_with("-cluster_time_limit 180 -f webm pipe:1"));
}

#[test]
fn args_without_audio_disable_audio_stream() {
    let cfg = EncodeConfig::short_video(Canvas::PORTRAIT, Fps::CAPTURE, CodecPair::Vp8Opus);
    let args = FfmpegWebmEncoder::args(&cfg);
    assert!(args.iter().any(|a| a == "-an"));
    assert!(args.iter().any(|a| a == "libvpx"));
}

#[test]
fn encoder_listing_matches_exact_names() {
    let listing = " V....D libvpx               libvpx VP8 (codec vp8)\n \
                   A....D libopus              libopus Opus (codec opus)\n";
    assert!(encoder_listed(listing, "libvpx"));
    assert!(encoder_listed(listing, "libopus"));
    assert!(!encoder_listed(listing, "libvpx-vp9"));
}

#[test]
fn missing_ffmpeg_is_capture_unsupported() {
    let mut enc = FfmpegWebmEncoder::new("/definitely/not/ffmpeg");
    let err = enc.probe_codecs().unwrap_err();
    assert!(matches!(err, ReelError::CaptureUnsupported(_)));
}
