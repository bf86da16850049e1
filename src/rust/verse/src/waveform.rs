// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Sampled RF pulse waveforms and the VERSE modulation function.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of channels a waveform must carry: phase, amplitude, duration, gradient.
pub const WAVEFORM_CHANNELS: usize = 4;

/// One time step of an RF pulse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformSample {
    /// Phase in degrees.
    pub phase: f64,
    pub amplitude: f64,
    /// Relative length of the time step.
    pub duration: f64,
    pub gradient: f64,
}

impl WaveformSample {
    pub fn new(phase: f64, amplitude: f64, duration: f64, gradient: f64) -> Self {
        WaveformSample {
            phase,
            amplitude,
            duration,
            gradient,
        }
    }
}

/// Ordered samples of an RF pulse with a gradient channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<WaveformSample>", into = "Vec<WaveformSample>")]
pub struct Waveform {
    samples: Vec<WaveformSample>,
}

impl Waveform {
    pub fn new(samples: Vec<WaveformSample>) -> Result<Self, ValidationError> {
        if samples.is_empty() {
            return Err(ValidationError::EmptyWaveform);
        }
        Ok(Waveform { samples })
    }

    /// Build a waveform from a row-major matrix, one row per sample.
    ///
    /// Columns are phase (degrees), amplitude, duration and gradient. Columns
    /// past the fourth are ignored.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, ValidationError> {
        let Some(first) = rows.first() else {
            return Err(ValidationError::EmptyWaveform);
        };
        let columns = first.as_ref().len();
        if columns < WAVEFORM_CHANNELS {
            return Err(ValidationError::MissingGradientChannel { columns });
        }
        if columns > WAVEFORM_CHANNELS {
            verse_log::warn!(
                "Waveform has {} columns, ignoring all but the first {}",
                columns,
                WAVEFORM_CHANNELS
            );
        }
        let samples = rows
            .iter()
            .enumerate()
            .map(|(row, values)| {
                let values = values.as_ref();
                if values.len() != columns {
                    return Err(ValidationError::RaggedWaveform {
                        row,
                        expected: columns,
                        found: values.len(),
                    });
                }
                Ok(WaveformSample::new(values[0], values[1], values[2], values[3]))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Waveform { samples })
    }

    /// Build a waveform from column channels in the order phase, amplitude,
    /// duration, gradient.
    pub fn from_channels<C: AsRef<[f64]>>(channels: &[C]) -> Result<Self, ValidationError> {
        if channels.len() < WAVEFORM_CHANNELS {
            return Err(ValidationError::MissingGradientChannel {
                columns: channels.len(),
            });
        }
        let [phase, amplitude, duration, gradient] = [0, 1, 2, 3].map(|i| channels[i].as_ref());
        Self::from_parts(phase, amplitude, duration, gradient)
    }

    pub fn from_parts(
        phase: &[f64],
        amplitude: &[f64],
        duration: &[f64],
        gradient: &[f64],
    ) -> Result<Self, ValidationError> {
        let expected = phase.len();
        for (channel, values) in [
            ("amplitude", amplitude),
            ("duration", duration),
            ("gradient", gradient),
        ] {
            if values.len() != expected {
                return Err(ValidationError::ChannelLengthMismatch {
                    channel,
                    expected,
                    found: values.len(),
                });
            }
        }
        let samples = (0..expected)
            .map(|i| WaveformSample::new(phase[i], amplitude[i], duration[i], gradient[i]))
            .collect();
        Self::new(samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[WaveformSample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &WaveformSample> {
        self.samples.iter()
    }

    pub fn phases(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.phase).collect()
    }

    pub fn amplitudes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.amplitude).collect()
    }

    pub fn durations(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.duration).collect()
    }

    pub fn gradients(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.gradient).collect()
    }

    /// Row-major matrix with one `[phase, amplitude, duration, gradient]` row per sample.
    pub fn to_rows(&self) -> Vec<[f64; WAVEFORM_CHANNELS]> {
        self.samples
            .iter()
            .map(|s| [s.phase, s.amplitude, s.duration, s.gradient])
            .collect()
    }
}

impl TryFrom<Vec<WaveformSample>> for Waveform {
    type Error = ValidationError;

    fn try_from(samples: Vec<WaveformSample>) -> Result<Self, Self::Error> {
        Self::new(samples)
    }
}

impl From<Waveform> for Vec<WaveformSample> {
    fn from(waveform: Waveform) -> Self {
        waveform.samples
    }
}

/// The unitless VERSE modulation function `alpha`.
///
/// Stored together with its matrix shape so that both a `1 x N` row and an
/// `N x 1` column are accepted for an `N`-sample waveform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModulationMatrix")]
pub struct ModulationFunction {
    values: Vec<f64>,
    rows: usize,
    columns: usize,
}

/// Unchecked serialized form of [`ModulationFunction`].
#[derive(Deserialize)]
struct ModulationMatrix {
    values: Vec<f64>,
    rows: usize,
    columns: usize,
}

impl TryFrom<ModulationMatrix> for ModulationFunction {
    type Error = ValidationError;

    fn try_from(matrix: ModulationMatrix) -> Result<Self, Self::Error> {
        Self::with_shape(matrix.rows, matrix.columns, matrix.values)
    }
}

impl ModulationFunction {
    pub fn column(values: Vec<f64>) -> Self {
        let rows = values.len();
        ModulationFunction {
            values,
            rows,
            columns: 1,
        }
    }

    pub fn row(values: Vec<f64>) -> Self {
        let columns = values.len();
        ModulationFunction {
            values,
            rows: 1,
            columns,
        }
    }

    /// Modulation function from a row-major matrix of the given shape.
    pub fn with_shape(
        rows: usize,
        columns: usize,
        values: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        if rows.checked_mul(columns) != Some(values.len()) {
            return Err(ValidationError::ModulationShape {
                rows,
                columns,
                values: values.len(),
            });
        }
        Ok(ModulationFunction {
            values,
            rows,
            columns,
        })
    }

    /// All ones, i.e. the identity transformation for `samples` samples.
    pub fn identity(samples: usize) -> Self {
        Self::column(vec![1.0; samples])
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The modulation values for a waveform of `samples` samples, accepting
    /// either orientation.
    pub fn oriented(&self, samples: usize) -> Result<&[f64], ValidationError> {
        let as_column = self.rows == samples && self.columns == 1;
        let as_row = self.rows == 1 && self.columns == samples;
        if (as_column || as_row) && self.values.len() == samples {
            Ok(&self.values)
        } else {
            Err(ValidationError::ModulationLengthMismatch {
                samples,
                rows: self.rows,
                columns: self.columns,
            })
        }
    }
}

impl From<Vec<f64>> for ModulationFunction {
    fn from(values: Vec<f64>) -> Self {
        Self::column(values)
    }
}
