// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Phase channel analysis: modulation class and 360° wrap removal.

use crate::pulse::ModulationKind;

/// Open interval of adjacent-sample phase jumps (degrees) treated as a 360° wrap.
pub const PHASE_WRAP_WINDOW: (f64, f64) = (355.0, 365.0);

/// Rounded phases (degrees) above this count as a negative RF amplitude.
pub const NEGATIVE_PHASE_THRESHOLD: f64 = 179.0;

/// Classify a phase track in degrees.
///
/// Amplitude-modulated pulses only use 0° and 180°, anything else makes the
/// pulse phase-modulated.
pub fn classify_modulation(phases: &[f64]) -> ModulationKind {
    let phase_modulated = phases.iter().any(|phase| {
        let rounded = phase.round();
        rounded != 0.0 && rounded != 180.0
    });
    if phase_modulated {
        ModulationKind::PhaseModulated
    } else {
        ModulationKind::AmplitudeModulated
    }
}

/// Remove spurious full-turn discontinuities from a phase track in degrees.
///
/// Each adjacent jump whose magnitude lies strictly inside `window` is taken
/// as an exact 360° wrap and cancelled for all following samples. Jumps are
/// measured on the input track.
pub fn remove_phase_wraps(phases: &[f64], window: (f64, f64)) -> Vec<f64> {
    let (low, high) = window;
    let Some(&first) = phases.first() else {
        return vec![];
    };
    let (_, corrected) = phases.windows(2).fold(
        (0.0, vec![first]),
        |(offset, mut corrected), pair| {
            let jump = pair[1] - pair[0];
            let offset = if jump.abs() > low && jump.abs() < high {
                verse_log::diagnostic!(
                    "Removing {:+} deg phase wrap before sample {}",
                    jump,
                    corrected.len()
                );
                offset + 360.0 * jump.signum()
            } else {
                offset
            };
            corrected.push(pair[1] - offset);
            (offset, corrected)
        },
    );
    corrected
}

/// Signed mean RF amplitude, with samples phased past the negative-phase
/// threshold counting as negative.
pub fn signed_mean_amplitude(phases: &[f64], amplitudes: &[f64], threshold: f64) -> f64 {
    if amplitudes.is_empty() {
        return 0.0;
    }
    let sum: f64 = phases
        .iter()
        .zip(amplitudes)
        .map(|(phase, amplitude)| {
            if phase.round() > threshold {
                -amplitude
            } else {
                *amplitude
            }
        })
        .sum();
    sum / amplitudes.len() as f64
}
