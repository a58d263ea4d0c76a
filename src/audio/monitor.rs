use std::time::{Duration, Instant};

use crate::foundation::error::ReelResult;

/// Live listening output for the narration mix.
///
/// The capture driver owns the monitor on its own thread and polls it; in realtime capture the
/// end of monitor playback is what stops the encoder.
pub trait MonitorOutput {
    /// Acquire the output device ahead of playback.
    ///
    /// Outputs without a device succeed trivially. A later `play` reuses what `open` acquired.
    fn open(&mut self) -> ReelResult<()> {
        Ok(())
    }
    /// Start playing interleaved samples.
    fn play(&mut self, samples: &[f32], sample_rate: u32, channels: u16) -> ReelResult<()>;
    /// Whether queued audio is still playing.
    fn is_playing(&self) -> bool;
    /// Stop playback early.
    fn stop(&mut self);
}

/// Monitor that plays nothing but keeps wall-clock time for the mix length.
#[derive(Debug, Default)]
pub struct SilentMonitor {
    until: Option<Instant>,
}

impl SilentMonitor {
    /// Create an idle monitor.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MonitorOutput for SilentMonitor {
    fn play(&mut self, samples: &[f32], sample_rate: u32, channels: u16) -> ReelResult<()> {
        let frames = samples.len() / usize::from(channels.max(1));
        let secs = if sample_rate == 0 {
            0.0
        } else {
            frames as f64 / f64::from(sample_rate)
        };
        self.until = Some(Instant::now() + Duration::from_secs_f64(secs));
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.until.is_some_and(|t| Instant::now() < t)
    }

    fn stop(&mut self) {
        self.until = None;
    }
}

/// Default output device via `rodio`.
#[cfg(feature = "monitor")]
#[derive(Default)]
pub struct SpeakerMonitor {
    stream: Option<rodio::OutputStream>,
    sink: Option<rodio::Sink>,
}

#[cfg(feature = "monitor")]
impl SpeakerMonitor {
    /// Create a monitor; the device opens on `open` or the first `play`.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "monitor")]
impl MonitorOutput for SpeakerMonitor {
    fn open(&mut self) -> ReelResult<()> {
        if self.stream.is_none() {
            let stream = rodio::OutputStreamBuilder::open_default_stream().map_err(|e| {
                crate::foundation::error::ReelError::capture_unsupported(format!(
                    "audio output device unavailable: {e}"
                ))
            })?;
            self.stream = Some(stream);
        }
        Ok(())
    }

    fn play(&mut self, samples: &[f32], sample_rate: u32, channels: u16) -> ReelResult<()> {
        self.open()?;
        let Some(stream) = self.stream.as_ref() else {
            return Err(crate::foundation::error::ReelError::capture_unsupported(
                "audio output device unavailable",
            ));
        };
        let sink = rodio::Sink::connect_new(stream.mixer());
        sink.append(rodio::buffer::SamplesBuffer::new(
            channels,
            sample_rate,
            samples.to_vec(),
        ));
        self.sink = Some(sink);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.stream = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/monitor.rs"]
mod tests;
