//! Script records and the fixed voice/palette preset tables.

/// Script input records.
pub mod model;
/// Voice and palette presets keyed by closed enums.
pub mod presets;
