// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Peak B1 calibration of phase-modulated pulses.
//!
//! The time-B1 product of a phase-modulated pulse cannot be read off the
//! waveform. Instead the pulse is simulated for a range of peak B1 values and
//! a [`PeakB1Source`] picks the value that produces the intended flip angle.

use std::f64::consts::TAU;

use verse_units::duration::{Duration, Millisecond};
use verse_units::frequency::{Frequency, Hertz, Kilohertz};

use crate::Result;
use crate::settings::B1SweepParameters;
use crate::waveform::Waveform;

/// Magnetization at the end of the pulse for one peak B1 value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct B1SweepPoint {
    pub peak_b1: Frequency<Kilohertz>,
    pub mx: f64,
    pub my: f64,
    pub mz: f64,
}

impl B1SweepPoint {
    pub fn transverse(&self) -> f64 {
        self.mx.hypot(self.my)
    }
}

/// Magnetization versus peak B1 curve of a pulse.
#[derive(Debug, Clone, PartialEq)]
pub struct B1Sweep {
    /// Flip angle the pulse is meant to produce.
    pub target_flip_angle: f64,
    pub points: Vec<B1SweepPoint>,
}

/// Simulates a pulse over a range of peak B1 values.
pub trait BlochSimulator {
    fn simulate(
        &self,
        waveform: &Waveform,
        pulse_duration: Duration<Millisecond>,
        reference_frequency: Frequency<Hertz>,
        sweep: &B1SweepParameters,
    ) -> Result<Vec<B1SweepPoint>>;
}

/// Chooses the peak B1 of a 5 ms reference pulse from a simulated sweep.
///
/// Implemented for closures, so that callers can plug in an operator prompt
/// or a fixed value.
pub trait PeakB1Source {
    fn peak_b1(&self, sweep: &B1Sweep) -> Result<Frequency<Kilohertz>>;
}

impl<F> PeakB1Source for F
where
    F: Fn(&B1Sweep) -> Result<Frequency<Kilohertz>>,
{
    fn peak_b1(&self, sweep: &B1Sweep) -> Result<Frequency<Kilohertz>> {
        self(sweep)
    }
}

/// Rotating-frame Bloch simulator without relaxation.
///
/// Every waveform sample is applied as a hard rotation of length
/// `pulse_duration / N` about the effective field
/// `(b1 * amplitude * cos(phase), b1 * amplitude * sin(phase), reference_frequency)`,
/// starting from equilibrium magnetization along z. The gradient channel is
/// ignored, i.e. the spin sits at the gradient isocentre.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotatingFrameSimulator;

impl RotatingFrameSimulator {
    fn final_magnetization(
        waveform: &Waveform,
        dt: f64,
        peak_b1_hz: f64,
        off_resonance_hz: f64,
    ) -> [f64; 3] {
        waveform.iter().fold([0.0, 0.0, 1.0], |m, sample| {
            let (sin_phi, cos_phi) = sample.phase.to_radians().sin_cos();
            let b1 = peak_b1_hz * sample.amplitude;
            let field = [b1 * cos_phi, b1 * sin_phi, off_resonance_hz];
            rotate(m, field, dt)
        })
    }
}

/// Rotate `m` about `field` (Hz) for `dt` seconds, using Rodrigues' formula.
fn rotate(m: [f64; 3], field: [f64; 3], dt: f64) -> [f64; 3] {
    let magnitude = (field[0] * field[0] + field[1] * field[1] + field[2] * field[2]).sqrt();
    if magnitude == 0.0 {
        return m;
    }
    let axis = field.map(|f| f / magnitude);
    // Left-handed precession, as for nuclei with positive gyromagnetic ratio.
    let theta = -TAU * magnitude * dt;
    let (sin_t, cos_t) = theta.sin_cos();
    let dot = axis[0] * m[0] + axis[1] * m[1] + axis[2] * m[2];
    let cross = [
        axis[1] * m[2] - axis[2] * m[1],
        axis[2] * m[0] - axis[0] * m[2],
        axis[0] * m[1] - axis[1] * m[0],
    ];
    [0, 1, 2].map(|i| m[i] * cos_t + cross[i] * sin_t + axis[i] * dot * (1.0 - cos_t))
}

impl BlochSimulator for RotatingFrameSimulator {
    fn simulate(
        &self,
        waveform: &Waveform,
        pulse_duration: Duration<Millisecond>,
        reference_frequency: Frequency<Hertz>,
        sweep: &B1SweepParameters,
    ) -> Result<Vec<B1SweepPoint>> {
        let dt = pulse_duration.to_seconds().value() / waveform.len() as f64;
        let points = sweep
            .values()
            .into_iter()
            .map(|peak_b1| {
                let [mx, my, mz] = Self::final_magnetization(
                    waveform,
                    dt,
                    peak_b1.to_hertz().value(),
                    reference_frequency.value(),
                );
                B1SweepPoint {
                    peak_b1,
                    mx,
                    my,
                    mz,
                }
            })
            .collect();
        Ok(points)
    }
}

/// Picks the lowest swept peak B1 reaching the target flip angle.
///
/// A point reaches the target when its `mz` is within `tolerance` of
/// `cos(target)`. Without such a point, the point closest to the target is
/// used.
#[derive(Debug, Clone, Copy)]
pub struct TargetFlipAngle {
    pub tolerance: f64,
}

impl Default for TargetFlipAngle {
    fn default() -> Self {
        TargetFlipAngle { tolerance: 0.01 }
    }
}

impl PeakB1Source for TargetFlipAngle {
    fn peak_b1(&self, sweep: &B1Sweep) -> Result<Frequency<Kilohertz>> {
        let target_mz = sweep.target_flip_angle.to_radians().cos();
        let distance = |point: &B1SweepPoint| (point.mz - target_mz).abs();
        if let Some(point) = sweep
            .points
            .iter()
            .find(|point| distance(point) <= self.tolerance)
        {
            return Ok(point.peak_b1);
        }
        sweep
            .points
            .iter()
            .min_by(|a, b| distance(a).total_cmp(&distance(b)))
            .map(|point| point.peak_b1)
            .ok_or_else(|| anyhow::anyhow!("B1 sweep has no points").into())
    }
}
