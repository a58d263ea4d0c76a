//! Caption derivation: sentence segmentation, timeline scheduling and word wrapping.

/// Narration text -> ordered caption segments.
pub mod segment;
/// Timeline scheduling of caption segments.
pub mod timing;
/// Greedy caption word wrap.
pub mod wrap;
