use std::fmt;

/// Lifecycle of one generation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    /// No run has started.
    #[default]
    Idle,
    /// Engine init and synthesis in progress.
    Loading,
    /// Decoding and capture in progress.
    Rendering,
    /// The last run produced an artifact.
    Complete,
    /// The last run failed.
    Error,
}

/// Inputs that drive [`GenerationState::next`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenerationEvent {
    /// A generate request was accepted.
    Begin,
    /// Narration audio is ready.
    Synthesized,
    /// The artifact is ready.
    Rendered,
    /// A step failed.
    Failed,
}

impl GenerationState {
    /// Pure transition function. `None` means the event is not valid in this state.
    pub fn next(self, event: GenerationEvent) -> Option<GenerationState> {
        use GenerationEvent as E;
        use GenerationState as S;
        match (self, event) {
            (S::Idle | S::Complete | S::Error, E::Begin) => Some(S::Loading),
            (S::Loading, E::Synthesized) => Some(S::Rendering),
            (S::Rendering, E::Rendered) => Some(S::Complete),
            (S::Loading | S::Rendering, E::Failed) => Some(S::Error),
            _ => None,
        }
    }

    /// Whether a run is in flight.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Loading | Self::Rendering)
    }

    /// Lowercase state name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Rendering => "rendering",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
