use super::*;

fn wav_i16(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut out = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut out, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }
    out.into_inner()
}

#[test]
fn decodes_int16_at_native_rate() {
    let bytes = wav_i16(&[0, 16_384, -32_768, 32_767], 22_050, 1);
    let buf = decode_wav(&bytes).unwrap();
    assert_eq!(buf.sample_rate(), 22_050);
    assert_eq!(buf.channels(), 1);
    assert_eq!(buf.frames(), 4);
    assert!((buf.samples()[1] - 0.5).abs() < 1e-6);
    assert!((buf.samples()[2] + 1.0).abs() < 1e-6);
}

#[test]
fn decodes_float_stereo() {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 48_000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut out = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut out, spec).unwrap();
        for s in [0.25f32, -0.25, 0.5, -0.5] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }
    let buf = decode_wav(&out.into_inner()).unwrap();
    assert_eq!(buf.frames(), 2);
    assert_eq!(buf.samples(), &[0.25, -0.25, 0.5, -0.5]);
}

#[test]
fn garbage_is_decode_failure() {
    let err = decode_wav(b"definitely not a riff file").unwrap_err();
    assert!(matches!(err, ReelError::DecodeFailure(_)));
}

#[test]
fn empty_wav_is_decode_failure() {
    let bytes = wav_i16(&[], 16_000, 1);
    let err = decode_wav(&bytes).unwrap_err();
    assert!(matches!(err, ReelError::DecodeFailure(_)));
}
