/// Convenience result type used across the sequencer.
pub type SequencerResult<T> = Result<T, SequencerError>;

/// Top-level error taxonomy used by sequencer APIs.
///
/// Decorative failures (a missing sprite, a lost render context) never surface through this type
/// at frame time; they degrade to "nothing drawn". Errors are reserved for construction-time
/// problems such as invalid configuration.
#[derive(thiserror::Error, Debug)]
pub enum SequencerError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid animation parameters or schedules.
    #[error("animation error: {0}")]
    Animation(String),

    /// Failure while loading or preparing a graphic resource.
    #[error("asset error: {0}")]
    Asset(String),

    /// Failure while composing or reading back a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SequencerError {
    /// Build a [`SequencerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SequencerError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`SequencerError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`SequencerError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SequencerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
