use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::capture::clock::CaptureMode;
use crate::foundation::error::{ReelError, ReelResult};

/// Runtime configuration of a [`Composer`](crate::session::composer::Composer).
///
/// Output format constants (surface size, frame rate, bitrate, flush interval, gain, pad) are
/// fixed and not configurable.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposerConfig {
    /// `ffmpeg` executable.
    pub ffmpeg_bin: PathBuf,
    /// `espeak-ng` executable.
    pub espeak_bin: PathBuf,
    /// Caption font file. Without one captions are laid out but not drawn.
    pub font_path: Option<PathBuf>,
    /// Capture clock mode.
    pub capture_mode: CaptureMode,
    /// Minimum trimmed narration length accepted by `generate`.
    pub min_narration_chars: usize,
    /// Bounded channel capacity between the draw task and the capture driver.
    pub channel_capacity: usize,
    /// Scratch directory for synthesized audio and the capture mix.
    pub work_dir: PathBuf,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: PathBuf::from("ffmpeg"),
            espeak_bin: PathBuf::from("espeak-ng"),
            font_path: None,
            capture_mode: CaptureMode::Offline,
            min_narration_chars: 30,
            channel_capacity: 4,
            work_dir: std::env::temp_dir(),
        }
    }
}

impl ComposerConfig {
    /// Parse a config from a JSON reader. Missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ReelError::validation(format!("parse composer config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::validation(format!("open composer config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Apply `REELSMITH_FFMPEG`, `REELSMITH_ESPEAK` and `REELSMITH_FONT` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var_os(key))
    }

    pub(crate) fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<std::ffi::OsString>,
    ) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(v) = non_empty("REELSMITH_FFMPEG") {
            self.ffmpeg_bin = PathBuf::from(v);
        }
        if let Some(v) = non_empty("REELSMITH_ESPEAK") {
            self.espeak_bin = PathBuf::from(v);
        }
        if let Some(v) = non_empty("REELSMITH_FONT") {
            self.font_path = Some(PathBuf::from(v));
        }
        self
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
