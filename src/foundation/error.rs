/// Convenience result type used across fractal-sweep.
pub type SweepResult<T> = Result<T, SweepError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum SweepError {
    /// Structural misuse: empty timelines, duplicate key times, bad indices, invalid settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A value outside the domain of the quantity it animates (e.g. a non-positive radius).
    #[error("domain error: {0}")]
    Domain(String),

    /// Errors while driving the sequencer, the renderer or an encoder.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing project data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SweepError {
    /// Build a [`SweepError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`SweepError::Domain`] value.
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    /// Build a [`SweepError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`SweepError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
