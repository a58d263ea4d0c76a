use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use crate::foundation::error::{ErrorKind, ReelError, ReelResult};
use crate::script::presets::VoiceSettings;
use crate::speech::engine::{EspeakEngine, SpeechEngine};

/// A speech engine behind a lazy, once-only init gate.
///
/// The first `synthesize` call initializes the engine. Concurrent callers block on the gate, so
/// `initialize` never runs twice at once. A failed init is not remembered: the next call retries.
pub struct NarrationSynthesizer {
    engine: Arc<dyn SpeechEngine>,
    ready: Mutex<bool>,
}

impl NarrationSynthesizer {
    /// Gate a fresh engine.
    pub fn new(engine: Arc<dyn SpeechEngine>) -> Self {
        Self {
            engine,
            ready: Mutex::new(false),
        }
    }

    /// Process-wide synthesizer for the `espeak-ng` binary at `bin`.
    ///
    /// Every caller asking for the same binary shares one gate, so the engine initializes once
    /// per process.
    pub fn shared_espeak(bin: &Path, work_dir: &Path) -> Arc<NarrationSynthesizer> {
        static SHARED: OnceLock<Mutex<HashMap<PathBuf, Arc<NarrationSynthesizer>>>> =
            OnceLock::new();
        let map = SHARED.get_or_init(|| Mutex::new(HashMap::new()));
        let mut map = match map.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.entry(bin.to_path_buf())
            .or_insert_with(|| {
                Arc::new(NarrationSynthesizer::new(Arc::new(EspeakEngine::new(
                    bin, work_dir,
                ))))
            })
            .clone()
    }

    /// Whether the engine has initialized successfully.
    pub fn is_ready(&self) -> bool {
        self.ready.lock().map(|r| *r).unwrap_or(false)
    }

    /// Initialize the engine if it is not ready yet.
    #[tracing::instrument(skip(self), fields(engine = self.engine.name()))]
    pub fn ensure_ready(&self) -> ReelResult<()> {
        let mut ready = self
            .ready
            .lock()
            .map_err(|_| ReelError::engine_unavailable("speech init gate poisoned"))?;
        if *ready {
            return Ok(());
        }
        self.engine.initialize().map_err(|e| match e.kind() {
            ErrorKind::EngineUnavailable => e,
            _ => ReelError::engine_unavailable(e.to_string()),
        })?;
        *ready = true;
        tracing::debug!("speech engine ready");
        Ok(())
    }

    /// Synthesize narration into WAV bytes.
    ///
    /// Voice parameters pass through as given.
    #[tracing::instrument(skip(self, text, settings), fields(chars = text.chars().count(), voice = settings.key().as_str()))]
    pub fn synthesize(&self, text: &str, settings: &VoiceSettings) -> ReelResult<Vec<u8>> {
        self.ensure_ready()?;
        match self.engine.speak(text, settings) {
            Ok(Some(bytes)) if !bytes.is_empty() => {
                tracing::debug!(bytes = bytes.len(), "narration synthesized");
                Ok(bytes)
            }
            Ok(_) => Err(ReelError::synthesis("speech engine produced no audio")),
            Err(e) if e.kind() == ErrorKind::SynthesisFailure => Err(e),
            Err(e) => Err(ReelError::synthesis(e.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/speech/synth.rs"]
mod tests;
