//! Reelsmith turns a short narration script into a captioned portrait video.
//!
//! A run goes through three steps:
//!
//! - synthesize the narration with a speech engine (`espeak-ng` by default)
//! - draw animated caption frames for every instant of the narration on the CPU
//! - capture frames and narration audio together into WebM (VP9 or VP8 video, Opus audio)
//!
//! [`Composer`] is the entry point: select a [`Script`], adjust voice and palette, then call
//! [`Composer::generate`] and collect the [`RenderResult`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Narration audio buffers, the audio graph and monitor outputs.
pub mod audio;
/// Caption segmentation, timing and wrapping.
pub mod caption;
/// Frame and audio capture into an encoder.
pub mod capture;
/// Composer configuration.
pub mod config;
/// Encoder contract and the ffmpeg WebM encoder.
pub mod encode;
/// CPU frame rendering.
pub mod render;
/// Script records and presets.
pub mod script;
/// Session state, progress log and artifacts.
pub mod session;
/// Speech engines and narration synthesis.
pub mod speech;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgba8, Rgba8Premul};
pub use crate::foundation::error::{ErrorKind, ReelError, ReelResult};

pub use crate::audio::buffer::AudioBuffer;
pub use crate::audio::monitor::{MonitorOutput, SilentMonitor};
#[cfg(feature = "monitor")]
pub use crate::audio::monitor::SpeakerMonitor;
pub use crate::caption::segment::{CaptionSegment, segment_narration};
pub use crate::capture::clock::CaptureMode;
pub use crate::capture::pipeline::{CaptureOptions, CaptureOutput, CapturePipeline};
pub use crate::config::ComposerConfig;
pub use crate::encode::ffmpeg::{FfmpegWebmEncoder, is_ffmpeg_available};
pub use crate::encode::sink::{CodecPair, EncodeConfig, EncodedMedia, InMemoryEncoder, MediaEncoder};
pub use crate::render::compositor::FrameCompositor;
pub use crate::render::surface::{CaptionFont, FrameRGBA, FrameSurface};
pub use crate::script::model::Script;
pub use crate::script::presets::{Palette, PaletteId, VoiceKey, VoiceProfile, VoiceSettings};
pub use crate::session::artifact::{ArtifactHandle, ArtifactStore, RenderResult};
pub use crate::session::composer::{Composer, ComposerSnapshot, NarrationStats};
pub use crate::session::log::{PipelineLog, PipelineStep, StepStatus};
pub use crate::session::state::GenerationState;
pub use crate::speech::engine::{EspeakEngine, SpeechEngine};
pub use crate::speech::synth::NarrationSynthesizer;
