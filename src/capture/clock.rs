use std::time::{Duration, Instant};

use crate::foundation::core::Fps;

/// How capture time advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    /// Virtual clock: tick `k` is at `k / fps` seconds and frames render as fast as possible.
    /// Playback completes when the virtual clock reaches the mix length. The live monitor is
    /// optional here: a missing device only costs monitoring, and any playback still running is
    /// stopped once encoding finishes.
    #[default]
    Offline,
    /// Wall clock: frames are paced in real time and playback completion comes from the live
    /// monitor.
    Realtime,
}

/// Source of elapsed time for the draw task.
#[derive(Debug)]
pub(crate) enum DrawClock {
    Virtual { fps: Fps, tick: u64 },
    Wall { fps: Fps, tick: u64, start: Instant },
}

impl DrawClock {
    pub(crate) fn new(mode: CaptureMode, fps: Fps, start: Instant) -> Self {
        match mode {
            CaptureMode::Offline => Self::Virtual { fps, tick: 0 },
            CaptureMode::Realtime => Self::Wall {
                fps,
                tick: 0,
                start,
            },
        }
    }

    /// Elapsed seconds since playback start for the next tick.
    ///
    /// The wall clock sleeps until the tick's due time, then reports the actual elapsed time.
    pub(crate) fn next_elapsed(&mut self) -> f64 {
        match self {
            Self::Virtual { fps, tick } => {
                let e = fps.frames_to_secs(*tick);
                *tick += 1;
                e
            }
            Self::Wall { fps, tick, start } => {
                let due = *start + Duration::from_secs_f64(fps.frames_to_secs(*tick));
                let now = Instant::now();
                if due > now {
                    std::thread::sleep(due - now);
                }
                *tick += 1;
                start.elapsed().as_secs_f64()
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/clock.rs"]
mod tests;
