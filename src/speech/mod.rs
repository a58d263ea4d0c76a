//! Narration synthesis: speech engines, the init gate and WAV decoding.

/// Speech engine trait and the `espeak-ng` backend.
pub mod engine;
/// Gated narration synthesizer.
pub mod synth;
/// WAV decoding.
pub mod wav;
