// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use verse_units::frequency::{Frequency, Kilohertz};

use crate::bloch::{B1Sweep, BlochSimulator, PeakB1Source, RotatingFrameSimulator};
use crate::error::ValidationError;
use crate::phase::{classify_modulation, remove_phase_wraps, signed_mean_amplitude};
use crate::pulse::{ModulationKind, PulseDescriptor, PulseType};
use crate::resample::{cumulative_time, interpolate_linear, linspace};
use crate::settings::VerseSettings;
use crate::time_b1::{amplitude_modulated_peak_b1, time_b1_product};
use crate::waveform::{ModulationFunction, Waveform, WaveformSample};
use crate::{Error, Result};

/// The VERSE transformation of RF pulses.
///
/// Scales amplitude and gradient by the modulation function while stretching
/// the time steps by its inverse, which keeps the RF and gradient areas of
/// every sample. The result is resampled to uniform time steps and annotated
/// with its time-B1 product.
///
/// Phase-modulated pulses need a simulated B1 calibration; the `simulator`
/// produces the magnetization curve and the `peak_b1` source chooses the
/// operating point on it.
pub struct VerseTransform<P, S = RotatingFrameSimulator> {
    settings: VerseSettings,
    peak_b1: P,
    simulator: S,
}

impl<P: PeakB1Source> VerseTransform<P> {
    pub fn new(settings: VerseSettings, peak_b1: P) -> Self {
        VerseTransform {
            settings,
            peak_b1,
            simulator: RotatingFrameSimulator,
        }
    }
}

impl<P: PeakB1Source, S: BlochSimulator> VerseTransform<P, S> {
    pub fn with_simulator<T: BlochSimulator>(self, simulator: T) -> VerseTransform<P, T> {
        VerseTransform {
            settings: self.settings,
            peak_b1: self.peak_b1,
            simulator,
        }
    }

    pub fn settings(&self) -> &VerseSettings {
        &self.settings
    }

    /// Apply the modulation function `alpha` to `pulse`.
    ///
    /// Returns a new pulse with uniformly sampled phase, amplitude (peak
    /// normalized to 1), unit durations and gradient, together with its
    /// time-B1 product and modulation class.
    pub fn transform(
        &self,
        pulse: &PulseDescriptor,
        alpha: &ModulationFunction,
    ) -> Result<PulseDescriptor> {
        self.settings.validate()?;
        let samples = pulse.waveform.len();
        let alpha = alpha.oriented(samples)?;
        let rescaled = rescale(&pulse.waveform, alpha)?;
        let resampled = resample_uniform(&rescaled);

        let modulation = classify_modulation(&resampled.phase);
        let phase = remove_phase_wraps(&resampled.phase, self.settings.phase_wrap_window);
        let amplitude = normalize_peak(resampled.amplitude);
        let durations = vec![1.0; samples];
        let waveform = Waveform::from_parts(&phase, &amplitude, &durations, &resampled.gradient)?;

        let time_b1_product = match modulation {
            ModulationKind::AmplitudeModulated => {
                let mean = signed_mean_amplitude(
                    &phase,
                    &amplitude,
                    self.settings.negative_phase_threshold,
                );
                let peak_b1 = amplitude_modulated_peak_b1(
                    pulse.pulse_type.flip_cycles(),
                    mean,
                    self.settings.reference_duration,
                );
                verse_log::diagnostic!(
                    "Signed mean amplitude {}, peak B1 {} at {}",
                    mean,
                    peak_b1,
                    self.settings.reference_duration
                );
                time_b1_product(self.settings.reference_duration, peak_b1)
            }
            ModulationKind::PhaseModulated => {
                let peak_b1 = self
                    .calibrate_peak_b1(&waveform, pulse.pulse_type)
                    .context("Failed to determine the peak B1 of a phase-modulated pulse")?;
                time_b1_product(self.settings.reference_duration, peak_b1)
            }
        };
        verse_log::debug!(
            "VERSE transformed {} samples ({:?}, {}), time-B1 product {}",
            samples,
            modulation,
            pulse.pulse_type,
            time_b1_product
        );

        Ok(PulseDescriptor {
            waveform,
            pulse_type: pulse.pulse_type,
            time_b1_product: Some(time_b1_product),
            modulation: Some(modulation),
        })
    }

    fn calibrate_peak_b1(
        &self,
        waveform: &Waveform,
        pulse_type: PulseType,
    ) -> Result<Frequency<Kilohertz>> {
        let points = self
            .simulator
            .simulate(
                waveform,
                self.settings.reference_duration,
                self.settings.reference_frequency,
                &self.settings.b1_sweep,
            )
            .context("Bloch simulation failed")?;
        let sweep = B1Sweep {
            target_flip_angle: pulse_type.flip_angle_degrees(),
            points,
        };
        let peak_b1 = self.peak_b1.peak_b1(&sweep)?;
        if !peak_b1.value().is_finite() {
            return Err(Error::new(&format!(
                "Peak B1 must be a finite frequency, got {peak_b1}"
            )));
        }
        Ok(peak_b1)
    }
}

/// Apply `alpha` to every sample, keeping RF and gradient area per sample.
fn rescale(waveform: &Waveform, alpha: &[f64]) -> Result<Vec<WaveformSample>, ValidationError> {
    let rescaled: Vec<_> = waveform
        .iter()
        .zip(alpha)
        .map(|(sample, &a)| {
            WaveformSample::new(
                sample.phase,
                sample.amplitude * a,
                sample.duration / a,
                sample.gradient * a,
            )
        })
        .collect();
    if let Some(index) = rescaled.iter().position(|s| !s.duration.is_finite()) {
        return Err(ValidationError::NonFiniteDuration { index });
    }
    let shortest = rescaled
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.duration.total_cmp(&b.duration));
    if let Some((index, sample)) = shortest.filter(|(_, s)| s.duration < 0.0) {
        return Err(ValidationError::NegativeDuration {
            index,
            value: sample.duration,
        });
    }
    Ok(rescaled)
}

/// Channels resampled onto a uniform time grid.
struct UniformChannels {
    phase: Vec<f64>,
    amplitude: Vec<f64>,
    gradient: Vec<f64>,
}

/// Resample from the time axis given by the sample durations onto a uniform
/// axis with the same end points and number of samples.
fn resample_uniform(samples: &[WaveformSample]) -> UniformChannels {
    let durations: Vec<f64> = samples.iter().map(|s| s.duration).collect();
    let axis = cumulative_time(&durations);
    let (start, stop) = match (axis.first(), axis.last()) {
        (Some(&start), Some(&stop)) => (start, stop),
        _ => (0.0, 0.0),
    };
    verse_log::diagnostic!(
        "Resampling {} samples onto a uniform axis from {} to {}",
        samples.len(),
        start,
        stop
    );
    let uniform = linspace(start, stop, samples.len());
    let channel = |f: fn(&WaveformSample) -> f64| {
        let values: Vec<f64> = samples.iter().map(f).collect();
        interpolate_linear(&axis, &values, &uniform)
    };
    UniformChannels {
        phase: channel(|s| s.phase),
        amplitude: channel(|s| s.amplitude),
        gradient: channel(|s| s.gradient),
    }
}

/// Scale so that the largest value is 1.
fn normalize_peak(values: Vec<f64>) -> Vec<f64> {
    let peak = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(peak.is_finite() && peak > 0.0) {
        verse_log::warn!(
            "Amplitude peak is {}, leaving the amplitude unnormalized",
            peak
        );
        return values;
    }
    values.into_iter().map(|v| v / peak).collect()
}

/// VERSE-transform `pulse` with default settings and simulator.
pub fn transform<P: PeakB1Source>(
    pulse: &PulseDescriptor,
    alpha: &ModulationFunction,
    peak_b1: P,
) -> Result<PulseDescriptor> {
    VerseTransform::new(VerseSettings::default(), peak_b1).transform(pulse, alpha)
}
