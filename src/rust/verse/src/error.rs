// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

/// Input that the transformation refuses to process.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Waveform has {columns} column(s), expected at least 4 (phase, amplitude, duration, gradient)")]
    MissingGradientChannel { columns: usize },

    #[error(
        "Modulation function of shape {rows}x{columns} does not match the waveform sample count {samples} in either orientation"
    )]
    ModulationLengthMismatch {
        samples: usize,
        rows: usize,
        columns: usize,
    },

    #[error("VERSE rescaling produced a negative duration {value} at sample {index}")]
    NegativeDuration { index: usize, value: f64 },

    #[error("VERSE rescaling produced a non-finite duration at sample {index}")]
    NonFiniteDuration { index: usize },

    #[error("Waveform has no samples")]
    EmptyWaveform,

    #[error("Waveform row {row} has {found} column(s), expected {expected}")]
    RaggedWaveform {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Waveform channel '{channel}' has {found} sample(s), expected {expected}")]
    ChannelLengthMismatch {
        channel: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Modulation function has {values} value(s), which does not fit the shape {rows}x{columns}")]
    ModulationShape {
        rows: usize,
        columns: usize,
        values: usize,
    },

    #[error("Invalid pulse type: {0}")]
    InvalidPulseType(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    pub fn new(msg: &str) -> Self {
        Error::Anyhow(anyhow::anyhow!(msg.to_string()))
    }

    /// The validation failure behind this error, if any.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(e) => Some(e),
            Error::Anyhow(e) => e.downcast_ref::<ValidationError>(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn test_validation_message() {
        let err = Error::from(ValidationError::ModulationLengthMismatch {
            samples: 4,
            rows: 5,
            columns: 1,
        });
        assert_eq!(
            err.to_string(),
            "Modulation function of shape 5x1 does not match the waveform sample count 4 in either orientation"
        );
    }

    #[test]
    fn test_validation_through_context() {
        let res: anyhow::Result<()> = Err(ValidationError::EmptyWaveform).context("outer");
        let err = Error::from(res.unwrap_err());
        assert_eq!(err.validation(), Some(&ValidationError::EmptyWaveform));
        assert!(Error::new("plain").validation().is_none());
    }
}
