use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{CodecPair, EncodeConfig, EncodedMedia, MediaEncoder};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::surface::FrameRGBA;

const STDOUT_CHUNK_BYTES: usize = 64 * 1024;

/// Opus only accepts a handful of rates; the mix is resampled to this one.
const OPUS_SAMPLE_RATE: u32 = 48_000;

/// Encoder that spawns `ffmpeg`, streams raw frames to stdin and collects WebM from stdout.
///
/// Audio comes from the capture destination in [`EncodeConfig::audio`]. Output is muxed with
/// `-cluster_time_limit` set to the flush interval and drained in chunks while encoding runs.
pub struct FfmpegWebmEncoder {
    bin: PathBuf,
    bg_rgba: [u8; 4],

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<Vec<u8>>>>>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<EncodeConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegWebmEncoder {
    /// Create an encoder running `bin`.
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            bg_rgba: [0, 0, 0, 255],
            child: None,
            stdin: None,
            stdout_drain: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }

    /// Argument list for one encode session.
    pub fn args(cfg: &EncodeConfig) -> Vec<String> {
        let mut args: Vec<String> = [
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        args.push(format!("{}x{}", cfg.canvas.width, cfg.canvas.height));
        push_input_fps(&mut args, cfg.fps);
        args.extend(["-i".to_string(), "pipe:0".to_string()]);

        if let Some(audio) = cfg.audio.as_ref() {
            args.extend([
                "-f".to_string(),
                "f32le".to_string(),
                "-ar".to_string(),
                audio.sample_rate.to_string(),
                "-ac".to_string(),
                audio.channels.to_string(),
                "-i".to_string(),
                audio.path.display().to_string(),
            ]);
        }

        args.extend([
            "-c:v".to_string(),
            cfg.codec.ffmpeg_video_codec().to_string(),
            "-b:v".to_string(),
            cfg.video_bitrate.to_string(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
            "-deadline".to_string(),
            "realtime".to_string(),
            "-cpu-used".to_string(),
            "8".to_string(),
        ]);
        if cfg.audio.is_some() {
            args.extend([
                "-c:a".to_string(),
                "libopus".to_string(),
                "-ar".to_string(),
                OPUS_SAMPLE_RATE.to_string(),
            ]);
        } else {
            args.push("-an".to_string());
        }
        args.extend([
            "-cluster_time_limit".to_string(),
            cfg.flush_interval.as_millis().to_string(),
            "-f".to_string(),
            "webm".to_string(),
            "pipe:1".to_string(),
        ]);
        args
    }

    fn list_encoders(&self) -> ReelResult<String> {
        let out = Command::new(&self.bin)
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| {
                ReelError::capture_unsupported(format!(
                    "'{}' is required for capture, but could not be run: {e}",
                    self.bin.display()
                ))
            })?;
        if !out.status.success() {
            return Err(ReelError::capture_unsupported(format!(
                "'{} -encoders' exited with status {}",
                self.bin.display(),
                out.status
            )));
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }

    fn reap(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(h) = self.stdout_drain.take() {
            let _ = h.join();
        }
        if let Some(h) = self.stderr_drain.take() {
            let _ = h.join();
        }
    }
}

/// Whether an `ffmpeg -encoders` listing names `encoder`.
pub(crate) fn encoder_listed(listing: &str, encoder: &str) -> bool {
    listing
        .lines()
        .any(|line| line.split_whitespace().nth(1) == Some(encoder))
}

impl MediaEncoder for FfmpegWebmEncoder {
    fn probe_codecs(&mut self) -> ReelResult<CodecPair> {
        let listing = self.list_encoders()?;
        if !encoder_listed(&listing, "libopus") {
            return Err(ReelError::capture_unsupported(
                "ffmpeg lacks the libopus encoder",
            ));
        }
        let codec = CodecPair::select(|c| encoder_listed(&listing, c.ffmpeg_video_codec()))
            .ok_or_else(|| {
                ReelError::capture_unsupported("ffmpeg lacks both libvpx-vp9 and libvpx encoders")
            })?;
        tracing::info!(codec = codec.label(), "codec pair selected");
        Ok(codec)
    }

    fn begin(&mut self, cfg: EncodeConfig) -> ReelResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(ReelError::validation("fps must be non-zero"));
        }
        if cfg.canvas.width == 0 || cfg.canvas.height == 0 {
            return Err(ReelError::validation(
                "encoder width/height must be non-zero",
            ));
        }
        if !cfg.canvas.width.is_multiple_of(2) || !cfg.canvas.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "encoder width/height must be even (required for yuv420p output)",
            ));
        }
        if let Some(audio) = cfg.audio.as_ref()
            && (audio.sample_rate == 0 || audio.channels == 0)
        {
            return Err(ReelError::validation(
                "audio sample_rate and channels must be non-zero",
            ));
        }

        let mut child = Command::new(&self.bin)
            .args(Self::args(&cfg))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ReelError::evaluation(format!(
                    "failed to spawn '{}': {e}",
                    self.bin.display()
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::evaluation("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| ReelError::evaluation("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::evaluation("failed to open ffmpeg stderr (unexpected)"))?;

        let stdout_drain = std::thread::spawn(move || {
            let mut chunks = Vec::new();
            let mut buf = vec![0u8; STDOUT_CHUNK_BYTES];
            loop {
                let n = stdout.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                chunks.push(buf[..n].to_vec());
            }
            Ok(chunks)
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(codec = cfg.codec.label(), "ffmpeg encoder started");
        self.scratch = vec![0u8; (cfg.canvas.width * cfg.canvas.height * 4) as usize];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stdout_drain = Some(stdout_drain);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::evaluation("ffmpeg encoder not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(ReelError::evaluation(
                "ffmpeg encoder received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.canvas.width || frame.height != cfg.canvas.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.canvas.width, cfg.canvas.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(ReelError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.bg_rgba)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::evaluation("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            ReelError::evaluation(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> ReelResult<EncodedMedia> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ReelError::evaluation("ffmpeg encoder not started"))?;
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| ReelError::evaluation("ffmpeg encoder not started"))?;

        let status = child.wait().map_err(|e| {
            ReelError::evaluation(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let chunks = match self.stdout_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ReelError::evaluation("ffmpeg stdout drain thread panicked"))?
                .map_err(|e| ReelError::evaluation(format!("ffmpeg stdout read failed: {e}")))?,
            None => Vec::new(),
        };
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ReelError::evaluation("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ReelError::evaluation(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ReelError::evaluation(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        let media = EncodedMedia {
            codec: cfg.codec,
            chunks,
        };
        tracing::debug!(bytes = media.len(), chunks = media.chunks.len(), "ffmpeg encoder finished");
        Ok(media)
    }

    fn abort(&mut self) {
        self.cfg = None;
        self.reap();
    }
}

impl Drop for FfmpegWebmEncoder {
    fn drop(&mut self) {
        self.reap();
    }
}

fn push_input_fps(args: &mut Vec<String>, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate.
    args.extend(["-r".to_string(), format!("{}/{}", fps.num, fps.den)]);
}

pub(crate) fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> ReelResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::validation(
            "flatten expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255u16 - a;
        for c in 0..3 {
            d[c] = (u16::from(s[c]) + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }

    Ok(())
}

/// Return `true` when `bin -version` runs.
pub fn is_ffmpeg_available(bin: &std::path::Path) -> bool {
    crate::foundation::fs::tool_responds(bin, "-version")
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
