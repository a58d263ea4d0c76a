use std::path::{Path, PathBuf};

use crate::audio::buffer::AudioBuffer;
use crate::audio::monitor::MonitorOutput;
use crate::caption::timing::PAD_SECS;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::fs::{TempFileGuard, unique_temp_path};

/// Fixed playback gain applied to the narration.
pub const CAPTURE_GAIN: f32 = 1.1;

/// Raw PCM audio input handed to an encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` PCM data.
    pub path: PathBuf,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// Apply gain and clamp to `[-1, 1]`, then append `pad_secs` of silence.
pub(crate) fn gain_and_pad(buffer: &AudioBuffer, gain: f32, pad_secs: f64) -> Vec<f32> {
    let channels = usize::from(buffer.channels());
    let pad_frames = (pad_secs.max(0.0) * f64::from(buffer.sample_rate())).round() as usize;
    let mut out = Vec::with_capacity(buffer.samples().len() + pad_frames * channels);
    out.extend(
        buffer
            .samples()
            .iter()
            .map(|s| (s * gain).clamp(-1.0, 1.0)),
    );
    out.resize(out.len() + pad_frames * channels, 0.0);
    out
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub(crate) fn write_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> ReelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReelError::evaluation(format!(
                "failed to create audio mix directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        ReelError::evaluation(format!(
            "failed to write audio mix '{}': {e}",
            out_path.display()
        ))
    })
}

/// Per-run audio graph: buffer source, fixed gain, a capturable mix destination and the live
/// monitor route.
///
/// The capture destination is a temp `f32le` file holding the gained narration followed by the
/// trailing pad, so playback of the mix ends exactly when the caption timeline does. The file
/// is removed when the graph is closed or dropped.
pub struct AudioGraph {
    mix: Vec<f32>,
    sample_rate: u32,
    channels: u16,
    capture: TempFileGuard,
}

impl AudioGraph {
    /// Open a graph at the buffer's native sample rate.
    #[tracing::instrument(skip(buffer), fields(rate = buffer.sample_rate(), channels = buffer.channels()))]
    pub fn open(buffer: &AudioBuffer, work_dir: &Path) -> ReelResult<Self> {
        if buffer.sample_rate() == 0 {
            return Err(ReelError::validation("audio sample rate must be non-zero"));
        }
        let mix = gain_and_pad(buffer, CAPTURE_GAIN, PAD_SECS);
        let path = unique_temp_path(work_dir, "reelsmith_mix", "f32le");
        let capture = TempFileGuard(Some(path.clone()));
        write_f32le_file(&mix, &path)?;
        tracing::debug!(path = %path.display(), samples = mix.len(), "audio graph opened");
        Ok(Self {
            mix,
            sample_rate: buffer.sample_rate(),
            channels: buffer.channels(),
            capture,
        })
    }

    /// Gained and padded interleaved mix.
    pub fn mix(&self) -> &[f32] {
        &self.mix
    }

    /// Mix sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Mix channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Length of mix playback in seconds.
    pub fn playback_secs(&self) -> f64 {
        let frames = self.mix.len() / usize::from(self.channels.max(1));
        frames as f64 / f64::from(self.sample_rate)
    }

    /// Capture destination for the encoder.
    pub fn capture_input(&self) -> ReelResult<AudioInputConfig> {
        let path = self
            .capture
            .path()
            .ok_or_else(|| ReelError::evaluation("audio graph already closed"))?;
        Ok(AudioInputConfig {
            path: path.to_path_buf(),
            sample_rate: self.sample_rate,
            channels: self.channels,
        })
    }

    /// Route the mix to a live monitor and start playback.
    pub fn start_monitor(&self, monitor: &mut dyn MonitorOutput) -> ReelResult<()> {
        monitor.play(&self.mix, self.sample_rate, self.channels)
    }

    /// Release the capture destination.
    pub fn close(self) {
        drop(self);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/graph.rs"]
mod tests;
