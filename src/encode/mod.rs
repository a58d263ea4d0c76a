//! Media encoding: the encoder contract, codec negotiation and the ffmpeg WebM backend.

/// `ffmpeg` WebM encoder.
pub mod ffmpeg;
/// Encoder contract, configuration and the in-memory encoder.
pub mod sink;
