//! Composer session: generation state, the progress log, artifact ownership and the composer
//! that drives a run end to end.

/// Downloadable artifacts and run results.
pub mod artifact;
/// The narration-to-video composer.
pub mod composer;
/// Pipeline progress log.
pub mod log;
/// Generation state machine.
pub mod state;
