/// Fixed trailing pad appended to the narration audio, in seconds.
pub const PAD_SECS: f64 = 0.6;

/// Elapsed-time domain of one generation run.
///
/// `T = D + PAD_SECS` where `D` is the narration audio duration; each of the `N` caption
/// segments gets an equal share `S = T / N`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeline {
    audio_secs: f64,
    segment_count: usize,
}

/// Active caption segment and overall progress at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelinePosition {
    /// 0-based active segment index, always `< segment_count`.
    pub index: usize,
    /// Progress ratio in `0.0..=1.0`.
    pub progress: f64,
}

impl Timeline {
    /// Build a timeline. Negative or non-finite durations count as zero and a segment count of
    /// zero counts as one.
    pub fn new(audio_secs: f64, segment_count: usize) -> Self {
        let audio_secs = if audio_secs.is_finite() {
            audio_secs.max(0.0)
        } else {
            0.0
        };
        Self {
            audio_secs,
            segment_count: segment_count.max(1),
        }
    }

    /// Narration audio duration `D`.
    pub fn audio_secs(&self) -> f64 {
        self.audio_secs
    }

    /// Number of caption segments `N`.
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Total timeline duration `T`.
    pub fn total_secs(&self) -> f64 {
        self.audio_secs + PAD_SECS
    }

    /// Per-segment share `S`.
    pub fn segment_secs(&self) -> f64 {
        self.total_secs() / self.segment_count as f64
    }

    /// Resolve the active segment and progress at `elapsed` seconds.
    pub fn position(&self, elapsed: f64) -> TimelinePosition {
        let e = if elapsed.is_finite() {
            elapsed.max(0.0)
        } else if elapsed == f64::INFINITY {
            f64::MAX
        } else {
            0.0
        };
        let last = self.segment_count - 1;
        let raw = (e / self.segment_secs()).floor();
        let index = if raw >= last as f64 { last } else { raw as usize };
        TimelinePosition {
            index,
            progress: (e / self.total_secs()).clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/timing.rs"]
mod tests;
