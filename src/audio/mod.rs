//! Narration audio: decoded buffers, the per-run audio graph and monitor outputs.

/// Decoded PCM buffers.
pub mod buffer;
/// Gain, padding and capture routing.
pub mod graph;
/// Live monitor outputs.
pub mod monitor;
