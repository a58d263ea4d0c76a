use std::sync::{Arc, mpsc};

use crate::audio::monitor::MonitorOutput;
use crate::caption::segment::{CaptionSegment, segment_narration};
use crate::capture::pipeline::{CaptureOptions, CapturePipeline};
use crate::config::ComposerConfig;
use crate::encode::ffmpeg::FfmpegWebmEncoder;
use crate::encode::sink::MediaEncoder;
use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::surface::{CaptionFont, FrameSurface};
use crate::script::model::Script;
use crate::script::presets::{PaletteId, VoiceKey, VoiceSettings};
use crate::session::artifact::{ArtifactStore, RenderResult};
use crate::session::log::{PipelineLog, PipelineStep, StepStatus};
use crate::session::state::{GenerationEvent, GenerationState};
use crate::speech::synth::NarrationSynthesizer;
use crate::speech::wav::decode_wav;

/// Pacing floor, in seconds, for the words-per-minute estimate.
const MIN_PACING_SECS: u32 = 30;

/// Point-in-time copy of the observable session state.
#[derive(Clone, Debug, PartialEq)]
pub struct ComposerSnapshot {
    /// Current generation state.
    pub state: GenerationState,
    /// Progress log.
    pub log: PipelineLog,
    /// Last failure message.
    pub error: Option<String>,
    /// Id of the live artifact.
    pub artifact_id: Option<String>,
    /// Duration of the live artifact.
    pub duration_secs: Option<f64>,
}

/// Derived narration metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NarrationStats {
    /// Caption segment count.
    pub segments: usize,
    /// Whitespace-separated word count.
    pub words: usize,
    /// Estimated pacing against the script's target duration.
    pub words_per_minute: u32,
}

/// One narration-to-video session.
///
/// Holds the editing inputs (script, narration text, voice, palette), the generation state and
/// log, and at most one live artifact. `generate` takes `&mut self`, so only one run can be in
/// flight.
pub struct Composer {
    config: ComposerConfig,
    synthesizer: Arc<NarrationSynthesizer>,
    encoder: Box<dyn MediaEncoder>,
    monitor: Box<dyn MonitorOutput>,
    surface: FrameSurface,

    script: Option<Script>,
    text: String,
    voice: VoiceSettings,
    palette: PaletteId,

    state: GenerationState,
    log: PipelineLog,
    error: Option<String>,
    result: Option<RenderResult>,
    artifacts: ArtifactStore,
    subscribers: Vec<mpsc::Sender<ComposerSnapshot>>,
}

impl Composer {
    /// Session backed by `espeak-ng`, `ffmpeg` and the default monitor output.
    ///
    /// Fails when the configured caption font cannot be loaded.
    pub fn new(config: ComposerConfig) -> ReelResult<Self> {
        let synthesizer = NarrationSynthesizer::shared_espeak(&config.espeak_bin, &config.work_dir);
        let encoder = Box::new(FfmpegWebmEncoder::new(config.ffmpeg_bin.clone()));
        let mut surface = FrameSurface::portrait()?;
        if let Some(path) = config.font_path.as_ref() {
            surface = surface.with_font(CaptionFont::load(path)?);
        }
        Ok(Self::with_backends(
            config,
            synthesizer,
            encoder,
            default_monitor(),
            surface,
        ))
    }

    /// Session with explicit backends.
    pub fn with_backends(
        config: ComposerConfig,
        synthesizer: Arc<NarrationSynthesizer>,
        encoder: Box<dyn MediaEncoder>,
        monitor: Box<dyn MonitorOutput>,
        surface: FrameSurface,
    ) -> Self {
        Self {
            config,
            synthesizer,
            encoder,
            monitor,
            surface,
            script: None,
            text: String::new(),
            voice: VoiceSettings::default(),
            palette: PaletteId::default(),
            state: GenerationState::Idle,
            log: PipelineLog::new(),
            error: None,
            result: None,
            artifacts: ArtifactStore::new(),
            subscribers: Vec::new(),
        }
    }

    /// Select a script and reset the session around it.
    ///
    /// Narration becomes the script's narration, the voice returns to the default preset, and
    /// state, log, error and artifact are cleared.
    pub fn select_script(&mut self, script: Script) {
        self.text = script.narration_text.clone();
        self.script = Some(script);
        self.voice = VoiceSettings::default();
        self.state = GenerationState::Idle;
        self.log.clear();
        self.error = None;
        self.result = None;
        self.publish();
    }

    /// Replace the narration text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Switch to a voice preset, copying its voice, variant, pitch and speed.
    pub fn select_voice(&mut self, key: VoiceKey) {
        self.voice = VoiceSettings::from_profile(key.profile());
    }

    /// Fine-tune pitch, clamped to the preset range.
    pub fn set_pitch(&mut self, pitch: u16) {
        self.voice.set_pitch(pitch);
    }

    /// Fine-tune speed, clamped to the preset range.
    pub fn set_speed(&mut self, speed: u16) {
        self.voice.set_speed(speed);
    }

    /// Choose the backdrop palette.
    pub fn select_palette(&mut self, palette: PaletteId) {
        self.palette = palette;
    }

    /// Selected script.
    pub fn script(&self) -> Option<&Script> {
        self.script.as_ref()
    }

    /// Current narration text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Working voice settings.
    pub fn voice(&self) -> &VoiceSettings {
        &self.voice
    }

    /// Selected palette.
    pub fn palette(&self) -> PaletteId {
        self.palette
    }

    /// Caption segments of the current narration.
    pub fn segments(&self) -> Vec<CaptionSegment> {
        segment_narration(&self.text)
    }

    /// Segment count, word count and words-per-minute pacing of the current narration.
    pub fn stats(&self) -> NarrationStats {
        let words = self.text.split_whitespace().count();
        let target = self
            .script
            .as_ref()
            .map(|s| s.duration_seconds)
            .unwrap_or(MIN_PACING_SECS)
            .max(MIN_PACING_SECS);
        NarrationStats {
            segments: self.segments().len(),
            words,
            words_per_minute: (words as f64 / f64::from(target) * 60.0).round() as u32,
        }
    }

    /// Whether `generate` would start a run.
    pub fn can_generate(&self) -> bool {
        self.script.is_some()
            && self.text.trim().chars().count() >= self.config.min_narration_chars
            && !self.state.is_busy()
    }

    /// Current generation state.
    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// Progress log of the last run.
    pub fn log(&self) -> &PipelineLog {
        &self.log
    }

    /// Failure message of the last run.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Output of the last successful run.
    pub fn result(&self) -> Option<&RenderResult> {
        self.result.as_ref()
    }

    /// Artifacts issued by this session that are still alive.
    pub fn live_artifacts(&self) -> usize {
        self.artifacts.live_count()
    }

    /// Copy of the observable state.
    pub fn snapshot(&self) -> ComposerSnapshot {
        ComposerSnapshot {
            state: self.state,
            log: self.log.clone(),
            error: self.error.clone(),
            artifact_id: self.result.as_ref().map(|r| r.artifact.id().to_string()),
            duration_secs: self.result.as_ref().map(|r| r.duration_secs),
        }
    }

    /// Receive a snapshot now and after every state or log change.
    pub fn subscribe(&mut self) -> mpsc::Receiver<ComposerSnapshot> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(self.snapshot());
        self.subscribers.push(tx);
        rx
    }

    /// Run the pipeline for the current inputs.
    ///
    /// Returns `Ok(None)` without doing anything when [`can_generate`](Self::can_generate) is
    /// false, otherwise the final state (`Complete` or `Error`). Step failures do not surface as
    /// `Err`: they are recorded in the log, the error message and the state.
    #[tracing::instrument(skip(self), fields(palette = self.palette.as_str(), voice = self.voice.key().as_str()))]
    pub fn generate(&mut self) -> ReelResult<Option<GenerationState>> {
        if !self.can_generate() {
            tracing::debug!(state = %self.state, "generate request ignored");
            return Ok(None);
        }

        self.log.clear();
        self.error = None;
        self.result = None;
        self.transition(GenerationEvent::Begin)?;

        let text = self.text.trim().to_string();
        let segments = segment_narration(&text);
        let file_name = self
            .script
            .as_ref()
            .map(Script::suggested_file_name)
            .unwrap_or_else(|| "untitled-short.webm".to_string());

        if self
            .step(PipelineStep::LoadEngine, |c| c.synthesizer.ensure_ready())?
            .is_none()
        {
            return Ok(Some(self.state));
        }

        let voice = self.voice.clone();
        let Some(wav) = self.step(PipelineStep::Synthesize, |c| {
            c.synthesizer.synthesize(&text, &voice)
        })?
        else {
            return Ok(Some(self.state));
        };
        self.transition(GenerationEvent::Synthesized)?;

        let palette = self.palette.palette();
        let opts = CaptureOptions {
            mode: self.config.capture_mode,
            fps: Fps::CAPTURE,
            channel_capacity: self.config.channel_capacity,
            work_dir: self.config.work_dir.clone(),
        };
        let rendered = self.step(PipelineStep::Render, |c| {
            let buffer = decode_wav(&wav)?;
            CapturePipeline::new(c.encoder.as_mut(), c.monitor.as_mut(), opts)
                .run(&buffer, segments, palette, &mut c.surface)
        })?;
        let Some(output) = rendered else {
            return Ok(Some(self.state));
        };

        let artifact = self.artifacts.create(output.media, file_name);
        tracing::info!(
            artifact = artifact.id(),
            bytes = artifact.len(),
            duration_secs = output.duration_secs,
            "generation complete"
        );
        self.result = Some(RenderResult {
            artifact,
            duration_secs: output.duration_secs,
        });
        self.transition(GenerationEvent::Rendered)?;
        Ok(Some(self.state))
    }

    /// Run one step with log bookkeeping. `Ok(None)` means the step failed and the session is
    /// now in `Error`.
    fn step<T>(
        &mut self,
        step: PipelineStep,
        f: impl FnOnce(&mut Self) -> ReelResult<T>,
    ) -> ReelResult<Option<T>> {
        self.log.mark(step, StepStatus::Pending);
        self.publish();
        tracing::debug!(step = step.label(), "step started");

        match f(self) {
            Ok(v) => {
                self.log.mark(step, StepStatus::Done);
                self.publish();
                Ok(Some(v))
            }
            Err(e) => {
                tracing::warn!(step = step.label(), kind = ?e.kind(), error = %e, "step failed");
                self.log.mark(step, StepStatus::Error);
                self.error = Some(e.to_string());
                self.transition(GenerationEvent::Failed)?;
                Ok(None)
            }
        }
    }

    fn transition(&mut self, event: GenerationEvent) -> ReelResult<()> {
        let next = self.state.next(event).ok_or_else(|| {
            ReelError::evaluation(format!(
                "invalid generation transition: {} on {event:?}",
                self.state
            ))
        })?;
        tracing::debug!(from = %self.state, to = %next, "state transition");
        self.state = next;
        self.publish();
        Ok(())
    }

    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        self.subscribers
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

#[cfg(feature = "monitor")]
fn default_monitor() -> Box<dyn MonitorOutput> {
    Box::new(crate::audio::monitor::SpeakerMonitor::new())
}

#[cfg(not(feature = "monitor"))]
fn default_monitor() -> Box<dyn MonitorOutput> {
    Box::new(crate::audio::monitor::SilentMonitor::new())
}

#[cfg(test)]
#[path = "../../tests/unit/session/composer.rs"]
mod tests;
