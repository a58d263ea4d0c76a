use crate::audio::buffer::AudioBuffer;
use crate::foundation::error::{ReelError, ReelResult};

/// Decode WAV bytes into an [`AudioBuffer`] at the file's native rate and channel count.
///
/// Integer PCM of 8 to 32 bits and 32-bit float are accepted. A file with no sample frames is a
/// decode failure.
pub fn decode_wav(bytes: &[u8]) -> ReelResult<AudioBuffer> {
    let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes))
        .map_err(|e| ReelError::decode(format!("invalid wav header: {e}")))?;
    let spec = reader.spec();
    if spec.channels == 0 || spec.sample_rate == 0 {
        return Err(ReelError::decode("wav declares zero channels or sample rate"));
    }

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| ReelError::decode(format!("wav sample read failed: {e}")))?,
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(ReelError::decode(format!(
                    "unsupported wav bit depth {}",
                    spec.bits_per_sample
                )));
            }
            let scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v as f32 / scale).clamp(-1.0, 1.0)))
                .collect::<Result<_, _>>()
                .map_err(|e| ReelError::decode(format!("wav sample read failed: {e}")))?
        }
    };

    let buffer = AudioBuffer::new(samples, spec.sample_rate, spec.channels);
    if buffer.frames() == 0 {
        return Err(ReelError::decode("wav contains no audio frames"));
    }
    Ok(buffer)
}

#[cfg(test)]
#[path = "../../tests/unit/speech/wav.rs"]
mod tests;
