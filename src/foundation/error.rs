/// Convenience result type used across reelsmith.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by composer APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid user-provided data (script records, configuration, encoder settings).
    #[error("validation error: {0}")]
    Validation(String),

    /// The speech engine could not be initialized.
    #[error("speech engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The speech engine returned no usable audio for valid input.
    #[error("speech synthesis failed: {0}")]
    SynthesisFailure(String),

    /// Synthesized bytes were rejected by the audio decoder.
    #[error("audio decode failed: {0}")]
    DecodeFailure(String),

    /// The platform lacks the stream capture or recording capability.
    #[error("capture unsupported: {0}")]
    CaptureUnsupported(String),

    /// Runtime failures while rendering, mixing or encoding a run.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Closed classification of failures as reported to composer callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ReelError::EngineUnavailable`].
    EngineUnavailable,
    /// See [`ReelError::SynthesisFailure`].
    SynthesisFailure,
    /// See [`ReelError::DecodeFailure`].
    DecodeFailure,
    /// See [`ReelError::CaptureUnsupported`].
    CaptureUnsupported,
    /// Anything uncategorized.
    Unknown,
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::EngineUnavailable`] value.
    pub fn engine_unavailable(msg: impl Into<String>) -> Self {
        Self::EngineUnavailable(msg.into())
    }

    /// Build a [`ReelError::SynthesisFailure`] value.
    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::SynthesisFailure(msg.into())
    }

    /// Build a [`ReelError::DecodeFailure`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeFailure(msg.into())
    }

    /// Build a [`ReelError::CaptureUnsupported`] value.
    pub fn capture_unsupported(msg: impl Into<String>) -> Self {
        Self::CaptureUnsupported(msg.into())
    }

    /// Build a [`ReelError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Classify this error into the closed [`ErrorKind`] set.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EngineUnavailable(_) => ErrorKind::EngineUnavailable,
            Self::SynthesisFailure(_) => ErrorKind::SynthesisFailure,
            Self::DecodeFailure(_) => ErrorKind::DecodeFailure,
            Self::CaptureUnsupported(_) => ErrorKind::CaptureUnsupported,
            Self::Validation(_) | Self::Evaluation(_) | Self::Serde(_) | Self::Other(_) => {
                ErrorKind::Unknown
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
