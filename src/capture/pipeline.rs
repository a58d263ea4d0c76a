use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::time::{Duration, Instant};

use crate::audio::buffer::AudioBuffer;
use crate::audio::graph::AudioGraph;
use crate::audio::monitor::MonitorOutput;
use crate::caption::segment::CaptionSegment;
use crate::capture::clock::{CaptureMode, DrawClock};
use crate::encode::sink::{EncodeConfig, EncodedMedia, MediaEncoder};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::compositor::FrameCompositor;
use crate::render::surface::{FrameRGBA, FrameSurface};
use crate::script::presets::Palette;

const MONITOR_POLL: Duration = Duration::from_millis(10);
const FRAME_EPSILON_SECS: f64 = 1e-6;

/// Options controlling one capture.
#[derive(Clone, Debug)]
pub struct CaptureOptions {
    /// Clock mode.
    pub mode: CaptureMode,
    /// Constant output frame rate.
    pub fps: Fps,
    /// Bounded channel capacity between the draw task and the capture driver.
    pub channel_capacity: usize,
    /// Directory for the audio capture destination.
    pub work_dir: PathBuf,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            mode: CaptureMode::Offline,
            fps: Fps::CAPTURE,
            channel_capacity: 4,
            work_dir: std::env::temp_dir(),
        }
    }
}

/// Result of a completed capture.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureOutput {
    /// Encoded container.
    pub media: EncodedMedia,
    /// Timeline duration `T` in seconds.
    pub duration_secs: f64,
    /// Video frames written.
    pub frames: u64,
}

enum DrawMsg {
    Frame { elapsed: f64, frame: FrameRGBA },
    Finished,
    Failed(ReelError),
}

/// Maps elapsed-time frames onto the constant-rate frame grid.
///
/// A frame lands on index `floor(e * fps)`; skipped indices repeat the previous frame and frames
/// landing on an index already written are dropped.
pub(crate) struct FramePlacer {
    fps: Fps,
    total_frames: u64,
    next: u64,
    last: Option<FrameRGBA>,
}

impl FramePlacer {
    pub(crate) fn new(fps: Fps, total_frames: u64) -> Self {
        Self {
            fps,
            total_frames,
            next: 0,
            last: None,
        }
    }

    pub(crate) fn written(&self) -> u64 {
        self.next
    }

    pub(crate) fn place(
        &mut self,
        elapsed: f64,
        frame: FrameRGBA,
        encoder: &mut dyn MediaEncoder,
    ) -> ReelResult<()> {
        // Virtual ticks are exact multiples of the frame duration; absorb the float error.
        let idx = self.fps.secs_to_frames_floor(elapsed + FRAME_EPSILON_SECS);
        let end = idx.min(self.total_frames);
        while self.next < end {
            let fill = self.last.as_ref().unwrap_or(&frame);
            encoder.push_frame(FrameIndex(self.next), fill)?;
            self.next += 1;
        }
        if idx < self.total_frames && idx == self.next {
            encoder.push_frame(FrameIndex(idx), &frame)?;
            self.next += 1;
        }
        self.last = Some(frame);
        Ok(())
    }

    /// Repeat the last frame up to the grid length.
    pub(crate) fn finish(&mut self, encoder: &mut dyn MediaEncoder) -> ReelResult<()> {
        let last = self
            .last
            .as_ref()
            .ok_or_else(|| ReelError::evaluation("capture produced no frames"))?;
        while self.next < self.total_frames {
            encoder.push_frame(FrameIndex(self.next), last)?;
            self.next += 1;
        }
        Ok(())
    }
}

/// Drives one audio+video capture: audio graph, draw task, encoder session.
pub struct CapturePipeline<'a> {
    encoder: &'a mut dyn MediaEncoder,
    monitor: &'a mut dyn MonitorOutput,
    opts: CaptureOptions,
}

impl<'a> CapturePipeline<'a> {
    /// Bind a pipeline to an encoder and a live monitor.
    pub fn new(
        encoder: &'a mut dyn MediaEncoder,
        monitor: &'a mut dyn MonitorOutput,
        opts: CaptureOptions,
    ) -> Self {
        Self {
            encoder,
            monitor,
            opts,
        }
    }

    /// Capture the caption scene over the narration and return the encoded media.
    ///
    /// Codec support is probed before any audio or video resource is allocated. Realtime capture
    /// also opens the monitor at that point, since its playback paces the run; offline capture
    /// proceeds without monitoring when the device is unavailable. On failure the encoder is
    /// aborted and partial output discarded. The monitor is stopped and the audio graph released
    /// on every path.
    #[tracing::instrument(skip_all, fields(mode = ?self.opts.mode, segments = segments.len()))]
    pub fn run(
        &mut self,
        buffer: &AudioBuffer,
        segments: Vec<CaptionSegment>,
        palette: &'static Palette,
        surface: &mut FrameSurface,
    ) -> ReelResult<CaptureOutput> {
        let codec = self.encoder.probe_codecs()?;
        let monitoring = match self.opts.mode {
            CaptureMode::Realtime => {
                self.monitor.open()?;
                true
            }
            CaptureMode::Offline => match self.monitor.open() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "monitor unavailable; capturing without it");
                    false
                }
            },
        };

        let compositor = FrameCompositor::new(palette, segments, buffer.duration_secs())?;
        let timeline = compositor.timeline();
        let graph = AudioGraph::open(buffer, &self.opts.work_dir)?;

        let fps = self.opts.fps;
        let mut cfg = EncodeConfig::short_video(surface.canvas(), fps, codec);
        cfg.audio = Some(graph.capture_input()?);
        let playback_secs = graph.playback_secs();
        let total_frames = fps
            .secs_to_frames_ceil(playback_secs - FRAME_EPSILON_SECS)
            .max(1);

        self.encoder.begin(cfg)?;
        tracing::info!(
            total_secs = timeline.total_secs(),
            total_frames,
            codec = codec.label(),
            "capture started"
        );

        let captured = self.capture(
            &graph,
            compositor,
            surface,
            playback_secs,
            total_frames,
            monitoring,
        );
        let frames = match captured {
            Ok(frames) => frames,
            Err(e) => {
                tracing::warn!(error = %e, "capture aborted");
                self.encoder.abort();
                self.monitor.stop();
                graph.close();
                return Err(e);
            }
        };

        let media = self.encoder.end();
        self.monitor.stop();
        graph.close();
        let media = media?;
        tracing::info!(bytes = media.len(), frames, "capture finished");
        Ok(CaptureOutput {
            media,
            duration_secs: timeline.total_secs(),
            frames,
        })
    }

    fn capture(
        &mut self,
        graph: &AudioGraph,
        mut compositor: FrameCompositor,
        surface: &mut FrameSurface,
        playback_secs: f64,
        total_frames: u64,
        monitoring: bool,
    ) -> ReelResult<u64> {
        let mode = self.opts.mode;
        let fps = self.opts.fps;
        let cap = self.opts.channel_capacity.max(1);
        let total_secs = compositor.timeline().total_secs();
        let encoder: &mut dyn MediaEncoder = &mut *self.encoder;
        let monitor: &mut dyn MonitorOutput = &mut *self.monitor;

        match mode {
            CaptureMode::Realtime => graph.start_monitor(monitor)?,
            CaptureMode::Offline if monitoring => {
                if let Err(e) = graph.start_monitor(monitor) {
                    tracing::warn!(error = %e, "monitor playback failed; capturing without it");
                }
            }
            CaptureMode::Offline => {}
        }
        let start = Instant::now();

        std::thread::scope(|scope| -> ReelResult<u64> {
            let (tx, rx) = mpsc::sync_channel::<DrawMsg>(cap);
            let (stop_tx, stop_rx) = mpsc::channel::<()>();

            let draw = scope.spawn(move || {
                let clock = DrawClock::new(mode, fps, start);
                draw_loop(&mut compositor, surface, clock, total_secs, &tx, &stop_rx);
            });

            let mut placer = FramePlacer::new(fps, total_frames);
            let driven = match mode {
                CaptureMode::Offline => drive_offline(&rx, &mut placer, encoder, playback_secs),
                CaptureMode::Realtime => drive_realtime(&rx, &mut placer, encoder, monitor),
            };

            let _ = stop_tx.send(());
            drop(rx);
            draw.join()
                .map_err(|_| ReelError::evaluation("draw task panicked"))?;

            driven?;
            placer.finish(encoder)?;
            Ok(placer.written())
        })
    }
}

fn draw_loop(
    compositor: &mut FrameCompositor,
    surface: &mut FrameSurface,
    mut clock: DrawClock,
    total_secs: f64,
    tx: &SyncSender<DrawMsg>,
    stop: &Receiver<()>,
) {
    loop {
        match stop.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => return,
            Err(TryRecvError::Empty) => {}
        }

        let elapsed = clock.next_elapsed();
        let msg = match compositor.compose(surface, elapsed) {
            Ok(frame) => DrawMsg::Frame { elapsed, frame },
            Err(e) => {
                let _ = tx.send(DrawMsg::Failed(e));
                return;
            }
        };
        if tx.send(msg).is_err() {
            return;
        }
        if elapsed >= total_secs {
            let _ = tx.send(DrawMsg::Finished);
            return;
        }
    }
}

fn drive_offline(
    rx: &Receiver<DrawMsg>,
    placer: &mut FramePlacer,
    encoder: &mut dyn MediaEncoder,
    playback_secs: f64,
) -> ReelResult<()> {
    loop {
        match rx.recv() {
            Ok(DrawMsg::Frame { elapsed, frame }) => {
                placer.place(elapsed, frame, encoder)?;
                if elapsed >= playback_secs {
                    tracing::debug!(elapsed, "virtual playback ended");
                    return Ok(());
                }
            }
            Ok(DrawMsg::Finished) => return Ok(()),
            Ok(DrawMsg::Failed(e)) => return Err(e),
            Err(_) => return Err(ReelError::evaluation("draw task ended unexpectedly")),
        }
    }
}

fn drive_realtime(
    rx: &Receiver<DrawMsg>,
    placer: &mut FramePlacer,
    encoder: &mut dyn MediaEncoder,
    monitor: &mut dyn MonitorOutput,
) -> ReelResult<()> {
    let mut draw_done = false;
    loop {
        if !monitor.is_playing() {
            tracing::debug!("monitor playback ended");
            return Ok(());
        }
        if draw_done {
            std::thread::sleep(MONITOR_POLL);
            continue;
        }
        match rx.recv_timeout(MONITOR_POLL) {
            Ok(DrawMsg::Frame { elapsed, frame }) => placer.place(elapsed, frame, encoder)?,
            Ok(DrawMsg::Finished) => draw_done = true,
            Ok(DrawMsg::Failed(e)) => return Err(e),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                return Err(ReelError::evaluation("draw task ended unexpectedly"));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/pipeline.rs"]
mod tests;
