use std::time::Duration;

use crate::audio::graph::AudioInputConfig;
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::surface::FrameRGBA;

/// Output video bitrate in bits per second.
pub const VIDEO_BITRATE: u32 = 4_000_000;
/// Upper bound on media time between emitted output chunks.
pub const FLUSH_INTERVAL: Duration = Duration::from_millis(180);

/// Muxed codec pair of the WebM output, in preference order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecPair {
    /// VP9 video with Opus audio.
    Vp9Opus,
    /// VP8 video with Opus audio.
    Vp8Opus,
}

impl CodecPair {
    /// Preferred first.
    pub const PREFERENCE: [CodecPair; 2] = [CodecPair::Vp9Opus, CodecPair::Vp8Opus];

    /// Container MIME type with codec parameters.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Vp9Opus => "video/webm;codecs=vp9,opus",
            Self::Vp8Opus => "video/webm;codecs=vp8,opus",
        }
    }

    /// Human readable format label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Vp9Opus => "WebM (VP9 + Opus)",
            Self::Vp8Opus => "WebM (VP8 + Opus)",
        }
    }

    /// ffmpeg video encoder name.
    pub fn ffmpeg_video_codec(self) -> &'static str {
        match self {
            Self::Vp9Opus => "libvpx-vp9",
            Self::Vp8Opus => "libvpx",
        }
    }

    /// First supported pair in preference order.
    pub fn select(mut supported: impl FnMut(CodecPair) -> bool) -> Option<CodecPair> {
        Self::PREFERENCE.into_iter().find(|c| supported(*c))
    }
}

/// Configuration provided to a [`MediaEncoder`] when a capture starts.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    /// Frame size.
    pub canvas: Canvas,
    /// Constant video frame rate.
    pub fps: Fps,
    /// Negotiated codec pair.
    pub codec: CodecPair,
    /// Video bitrate in bits per second.
    pub video_bitrate: u32,
    /// Maximum media time between output chunks.
    pub flush_interval: Duration,
    /// Captured audio mix, if any.
    pub audio: Option<AudioInputConfig>,
}

impl EncodeConfig {
    /// Fixed short-video settings for `canvas` and `codec`.
    pub fn short_video(canvas: Canvas, fps: Fps, codec: CodecPair) -> Self {
        Self {
            canvas,
            fps,
            codec,
            video_bitrate: VIDEO_BITRATE,
            flush_interval: FLUSH_INTERVAL,
            audio: None,
        }
    }

    /// Frames per output chunk so that chunks never span more than `flush_interval`.
    pub fn frames_per_chunk(&self) -> u64 {
        self.fps
            .secs_to_frames_floor(self.flush_interval.as_secs_f64())
            .max(1)
    }
}

/// Encoded container bytes as emitted, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedMedia {
    /// Codec pair the media was encoded with.
    pub codec: CodecPair,
    /// Output chunks in emission order.
    pub chunks: Vec<Vec<u8>>,
}

impl EncodedMedia {
    /// Total byte length.
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Whether no bytes were produced.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenate all chunks into one media blob.
    pub fn assemble(self) -> Vec<u8> {
        self.chunks.concat()
    }
}

/// Encoder contract for one capture.
///
/// Ordering contract: `probe_codecs` may be called before `begin`; `push_frame` is called in
/// strictly increasing `FrameIndex` order; `end` finalizes and returns all output, `abort`
/// discards it.
pub trait MediaEncoder: Send {
    /// Negotiate a codec pair, failing with `CaptureUnsupported` when none is available.
    fn probe_codecs(&mut self) -> ReelResult<CodecPair>;
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: EncodeConfig) -> ReelResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()>;
    /// Finalize the stream.
    fn end(&mut self) -> ReelResult<EncodedMedia>;
    /// Stop without producing output.
    fn abort(&mut self);
}

const MEM_MAGIC: &[u8; 8] = b"RSMEM001";

/// In-memory encoder for tests and debugging.
///
/// Output is a header chunk followed by chunks of little-endian frame fingerprints, one chunk per
/// [`EncodeConfig::frames_per_chunk`] frames.
#[derive(Debug)]
pub struct InMemoryEncoder {
    supported: Vec<CodecPair>,
    cfg: Option<EncodeConfig>,
    last_idx: Option<FrameIndex>,
    pending: Vec<u8>,
    pending_frames: u64,
    chunks: Vec<Vec<u8>>,
}

impl Default for InMemoryEncoder {
    fn default() -> Self {
        Self::with_supported(&CodecPair::PREFERENCE)
    }
}

impl InMemoryEncoder {
    /// Encoder supporting every codec pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoder that only reports `supported` as available.
    pub fn with_supported(supported: &[CodecPair]) -> Self {
        Self {
            supported: supported.to_vec(),
            cfg: None,
            last_idx: None,
            pending: Vec::new(),
            pending_frames: 0,
            chunks: Vec::new(),
        }
    }

    /// Parse assembled output back into `(width, height, frame fingerprints)`.
    pub fn parse(media: &[u8]) -> Option<(u32, u32, Vec<u64>)> {
        let rest = media.strip_prefix(MEM_MAGIC.as_slice())?;
        if rest.len() < 8 || (rest.len() - 8) % 8 != 0 {
            return None;
        }
        let width = u32::from_le_bytes(rest[0..4].try_into().ok()?);
        let height = u32::from_le_bytes(rest[4..8].try_into().ok()?);
        let fingerprints = rest[8..]
            .chunks_exact(8)
            .map(|c| c.try_into().map(u64::from_le_bytes))
            .collect::<Result<Vec<_>, _>>()
            .ok()?;
        Some((width, height, fingerprints))
    }

    fn flush_pending(&mut self) {
        if !self.pending.is_empty() {
            self.chunks.push(std::mem::take(&mut self.pending));
        }
        self.pending_frames = 0;
    }
}

impl MediaEncoder for InMemoryEncoder {
    fn probe_codecs(&mut self) -> ReelResult<CodecPair> {
        CodecPair::select(|c| self.supported.contains(&c)).ok_or_else(|| {
            ReelError::capture_unsupported("no supported WebM codec pair (VP9/VP8 + Opus)")
        })
    }

    fn begin(&mut self, cfg: EncodeConfig) -> ReelResult<()> {
        let mut header = MEM_MAGIC.to_vec();
        header.extend_from_slice(&cfg.canvas.width.to_le_bytes());
        header.extend_from_slice(&cfg.canvas.height.to_le_bytes());
        self.chunks = vec![header];
        self.pending.clear();
        self.pending_frames = 0;
        self.last_idx = None;
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::evaluation("in-memory encoder not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(ReelError::evaluation(
                "in-memory encoder received out-of-order frame index",
            ));
        }
        if frame.width != cfg.canvas.width || frame.height != cfg.canvas.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.canvas.width, cfg.canvas.height
            )));
        }
        let per_chunk = cfg.frames_per_chunk();
        self.last_idx = Some(idx);

        self.pending
            .extend_from_slice(&frame.fingerprint().to_le_bytes());
        self.pending_frames += 1;
        if self.pending_frames >= per_chunk {
            self.flush_pending();
        }
        Ok(())
    }

    fn end(&mut self) -> ReelResult<EncodedMedia> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| ReelError::evaluation("in-memory encoder not started"))?;
        self.flush_pending();
        Ok(EncodedMedia {
            codec: cfg.codec,
            chunks: std::mem::take(&mut self.chunks),
        })
    }

    fn abort(&mut self) {
        self.cfg = None;
        self.pending.clear();
        self.pending_frames = 0;
        self.chunks.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
