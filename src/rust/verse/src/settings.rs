// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Module for defining settings for the VERSE transformation.

use verse_units::duration::{Duration, Millisecond, milliseconds};
use verse_units::frequency::{Frequency, Hertz, Kilohertz, hertz, kilohertz};

use crate::error::ValidationError;
use crate::phase::{NEGATIVE_PHASE_THRESHOLD, PHASE_WRAP_WINDOW};

/// Pulse duration the time-B1 product is referred to.
pub const REFERENCE_PULSE_DURATION: Duration<Millisecond> = milliseconds(5.0);

/// Upper bound on the number of peak B1 values in one sweep.
pub const MAX_SWEEP_POINTS: usize = 1_000_000;

/// Candidate peak B1 values swept by the Bloch simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct B1SweepParameters {
    pub start: Frequency<Kilohertz>,
    pub stop: Frequency<Kilohertz>,
    pub step: Frequency<Kilohertz>,
}

impl B1SweepParameters {
    /// Number of swept values, or `None` if the sweep is empty, not finite
    /// or longer than [`MAX_SWEEP_POINTS`].
    pub fn point_count(&self) -> Option<usize> {
        let (start, stop, step) = (self.start.value(), self.stop.value(), self.step.value());
        if !(start.is_finite() && stop.is_finite() && step > 0.0) || stop < start {
            return None;
        }
        // Tolerate rounding in (stop - start) / step.
        let intervals = ((stop - start) / step + 1e-9).floor();
        if intervals >= MAX_SWEEP_POINTS as f64 {
            return None;
        }
        (intervals as usize).checked_add(1)
    }

    /// The swept peak B1 values, from `start` up to and including `stop`.
    pub fn values(&self) -> Vec<Frequency<Kilohertz>> {
        let (start, step) = (self.start.value(), self.step.value());
        (0..self.point_count().unwrap_or(0))
            .map(|i| kilohertz(start + step * i as f64))
            .collect()
    }
}

impl Default for B1SweepParameters {
    fn default() -> Self {
        B1SweepParameters {
            start: kilohertz(0.01),
            stop: kilohertz(10.0),
            step: kilohertz(0.01),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerseSettings {
    pub reference_duration: Duration<Millisecond>,
    pub phase_wrap_window: (f64, f64),
    pub negative_phase_threshold: f64,
    /// Off-resonance frequency of the Bloch simulation.
    pub reference_frequency: Frequency<Hertz>,
    pub b1_sweep: B1SweepParameters,
}

impl Default for VerseSettings {
    fn default() -> Self {
        VerseSettings {
            reference_duration: REFERENCE_PULSE_DURATION,
            phase_wrap_window: PHASE_WRAP_WINDOW,
            negative_phase_threshold: NEGATIVE_PHASE_THRESHOLD,
            reference_frequency: hertz(0.0),
            b1_sweep: B1SweepParameters::default(),
        }
    }
}

impl VerseSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |msg: String| Err(ValidationError::InvalidSettings(msg));
        let duration = self.reference_duration.value();
        if !(duration.is_finite() && duration > 0.0) {
            return invalid(format!(
                "reference duration must be positive, got {}",
                self.reference_duration
            ));
        }
        let (low, high) = self.phase_wrap_window;
        if !(low.is_finite() && high.is_finite() && 0.0 <= low && low < high) {
            return invalid(format!(
                "phase wrap window must satisfy 0 <= low < high, got ({low}, {high})"
            ));
        }
        if !self.negative_phase_threshold.is_finite() {
            return invalid("negative phase threshold must be finite".to_string());
        }
        if !self.reference_frequency.value().is_finite() {
            return invalid("reference frequency must be finite".to_string());
        }
        let sweep = &self.b1_sweep;
        if !(sweep.step.value().is_finite() && sweep.step.value() > 0.0) {
            return invalid(format!("B1 sweep step must be positive, got {}", sweep.step));
        }
        if !(sweep.start.value().is_finite()
            && sweep.stop.value().is_finite()
            && sweep.start.value() <= sweep.stop.value())
        {
            return invalid(format!(
                "B1 sweep must run upwards, got {} to {}",
                sweep.start, sweep.stop
            ));
        }
        if sweep.point_count().is_none() {
            return invalid(format!(
                "B1 sweep from {} to {} kHz in steps of {} kHz exceeds {MAX_SWEEP_POINTS} points",
                sweep.start.value(),
                sweep.stop.value(),
                sweep.step.value()
            ));
        }
        Ok(())
    }
}
