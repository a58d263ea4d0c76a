//! Audio+video capture: clock modes, the draw task and the encoder driver.

/// Capture clock modes.
pub mod clock;
/// Capture pipeline.
pub mod pipeline;
