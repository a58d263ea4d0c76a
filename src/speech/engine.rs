use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::fs::{TempFileGuard, tool_responds, unique_temp_path};
use crate::script::presets::VoiceSettings;

/// Text-to-speech backend.
///
/// `initialize` may be expensive; callers go through
/// [`NarrationSynthesizer`](crate::speech::synth::NarrationSynthesizer), which runs it at most
/// once per successful init.
pub trait SpeechEngine: Send + Sync {
    /// Load voices and check that the engine can run.
    fn initialize(&self) -> ReelResult<()>;

    /// Synthesize `text` into WAV bytes. `Ok(None)` means the engine produced no audio.
    fn speak(&self, text: &str, settings: &VoiceSettings) -> ReelResult<Option<Vec<u8>>>;

    /// Short engine name for logs.
    fn name(&self) -> &str;
}

/// `espeak-ng` subprocess engine writing WAV output.
#[derive(Clone, Debug)]
pub struct EspeakEngine {
    bin: PathBuf,
    work_dir: PathBuf,
}

impl EspeakEngine {
    /// Engine invoking `bin`, with scratch WAV files under `work_dir`.
    pub fn new(bin: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Executable this engine runs.
    pub fn bin(&self) -> &Path {
        &self.bin
    }

    /// `espeak-ng` argument list for one utterance written to `wav_path`.
    pub fn args(settings: &VoiceSettings, wav_path: &Path) -> Vec<String> {
        let voice = match settings.variant() {
            Some(variant) => format!("{}+{}", settings.voice(), variant),
            None => settings.voice().to_string(),
        };
        vec![
            "-v".to_string(),
            voice,
            "-p".to_string(),
            settings.pitch().to_string(),
            "-s".to_string(),
            settings.speed().to_string(),
            "-a".to_string(),
            settings.amplitude().to_string(),
            "-w".to_string(),
            wav_path.display().to_string(),
            "--stdin".to_string(),
        ]
    }
}

impl SpeechEngine for EspeakEngine {
    fn initialize(&self) -> ReelResult<()> {
        if !tool_responds(&self.bin, "--version") {
            return Err(ReelError::engine_unavailable(format!(
                "'{}' is required for narration, but could not be run",
                self.bin.display()
            )));
        }
        std::fs::create_dir_all(&self.work_dir).map_err(|e| {
            ReelError::engine_unavailable(format!(
                "failed to create speech work dir '{}': {e}",
                self.work_dir.display()
            ))
        })?;
        Ok(())
    }

    fn speak(&self, text: &str, settings: &VoiceSettings) -> ReelResult<Option<Vec<u8>>> {
        let wav = TempFileGuard(Some(unique_temp_path(
            &self.work_dir,
            "reelsmith_narration",
            "wav",
        )));
        let wav_path = wav
            .path()
            .ok_or_else(|| ReelError::synthesis("missing scratch wav path"))?;

        let mut child = Command::new(&self.bin)
            .args(Self::args(settings, wav_path))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ReelError::synthesis(format!("failed to spawn '{}': {e}", self.bin.display()))
            })?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| ReelError::synthesis("failed to open espeak-ng stdin"))?;
            stdin.write_all(text.as_bytes()).map_err(|e| {
                ReelError::synthesis(format!("failed to write narration to espeak-ng: {e}"))
            })?;
        }

        let out = child
            .wait_with_output()
            .map_err(|e| ReelError::synthesis(format!("failed to wait for espeak-ng: {e}")))?;
        if !out.status.success() {
            return Err(ReelError::synthesis(format!(
                "espeak-ng exited with status {}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        match std::fs::read(wav_path) {
            Ok(bytes) if !bytes.is_empty() => Ok(Some(bytes)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ReelError::synthesis(format!(
                "failed to read synthesized audio '{}': {e}",
                wav_path.display()
            ))),
        }
    }

    fn name(&self) -> &str {
        "espeak-ng"
    }
}

#[cfg(test)]
#[path = "../../tests/unit/speech/engine.rs"]
mod tests;
