// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! End-to-end properties of the transformation.

use proptest::prelude::*;
use verse_units::frequency::{Frequency, Kilohertz, kilohertz};

use crate::bloch::B1Sweep;
use crate::phase::{PHASE_WRAP_WINDOW, remove_phase_wraps};
use crate::{
    ModulationFunction, ModulationKind, PulseDescriptor, PulseType, ValidationError, Waveform,
    transform,
};

fn fixed_peak_b1(_: &B1Sweep) -> crate::Result<Frequency<Kilohertz>> {
    Ok(kilohertz(1.0))
}

/// Amplitude-modulated pulses with phases 0 or 180 and positive time steps.
fn am_pulse() -> impl Strategy<Value = PulseDescriptor> {
    prop::collection::vec(
        (any::<bool>(), 0.01f64..1.0, 0.1f64..2.0, -1.0f64..1.0),
        2..64,
    )
    .prop_map(|samples| {
        let rows: Vec<[f64; 4]> = samples
            .into_iter()
            .map(|(negative, amplitude, duration, gradient)| {
                let phase = if negative { 180.0 } else { 0.0 };
                [phase, amplitude, duration, gradient]
            })
            .collect();
        PulseDescriptor::new(Waveform::from_rows(&rows).unwrap(), PulseType::Excitation)
    })
}

/// Amplitude-modulated pulses with one common time step.
fn uniform_am_pulse() -> impl Strategy<Value = PulseDescriptor> {
    (
        prop::collection::vec((any::<bool>(), 0.01f64..1.0, -1.0f64..1.0), 2..64),
        0.1f64..2.0,
    )
        .prop_map(|(samples, duration)| {
            let rows: Vec<[f64; 4]> = samples
                .into_iter()
                .map(|(negative, amplitude, gradient)| {
                    let phase = if negative { 180.0 } else { 0.0 };
                    [phase, amplitude, duration, gradient]
                })
                .collect();
            PulseDescriptor::new(Waveform::from_rows(&rows).unwrap(), PulseType::Excitation)
        })
}

fn pulse_and_alpha() -> impl Strategy<Value = (PulseDescriptor, Vec<f64>)> {
    am_pulse().prop_flat_map(|pulse| {
        let n = pulse.waveform.len();
        (Just(pulse), prop::collection::vec(0.2f64..3.0, n))
    })
}

proptest! {
    #[test]
    fn output_shape_is_preserved((pulse, alpha) in pulse_and_alpha()) {
        let out = transform(&pulse, &ModulationFunction::column(alpha), fixed_peak_b1).unwrap();
        prop_assert_eq!(out.waveform.len(), pulse.waveform.len());
        prop_assert!(out.waveform.durations().iter().all(|&d| d == 1.0));
        let peak = out.waveform.amplitudes().into_iter().fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(peak, 1.0);
        prop_assert!(out.time_b1_product.is_some());
        prop_assert_eq!(out.pulse_type, PulseType::Excitation);
    }

    #[test]
    fn orientation_does_not_matter((pulse, alpha) in pulse_and_alpha()) {
        let column = transform(&pulse, &ModulationFunction::column(alpha.clone()), fixed_peak_b1).unwrap();
        let row = transform(&pulse, &ModulationFunction::row(alpha), fixed_peak_b1).unwrap();
        prop_assert_eq!(column, row);
    }

    #[test]
    fn identity_modulation_is_near_identity(pulse in uniform_am_pulse()) {
        let n = pulse.waveform.len();
        let out = transform(&pulse, &ModulationFunction::identity(n), fixed_peak_b1).unwrap();
        let amplitudes = pulse.waveform.amplitudes();
        let peak = amplitudes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for (before, after) in amplitudes.iter().zip(out.waveform.amplitudes()) {
            prop_assert!((before / peak - after).abs() < 1e-9);
        }
        for (before, after) in pulse.waveform.gradients().iter().zip(out.waveform.gradients()) {
            prop_assert!((before - after).abs() < 1e-9);
        }
        prop_assert_eq!(out.modulation, Some(ModulationKind::AmplitudeModulated));
    }

    #[test]
    fn length_mismatch_is_rejected((pulse, mut alpha) in pulse_and_alpha()) {
        alpha.push(1.0);
        for modulation in [ModulationFunction::column(alpha.clone()), ModulationFunction::row(alpha)] {
            let err = transform(&pulse, &modulation, fixed_peak_b1).unwrap_err();
            let is_mismatch = matches!(
                err.validation(),
                Some(ValidationError::ModulationLengthMismatch { .. })
            );
            prop_assert!(is_mismatch);
        }
    }

    #[test]
    fn single_wrap_shifts_tail(
        steps in prop::collection::vec(-4.0f64..4.0, 3..32),
        at in any::<prop::sample::Index>(),
    ) {
        // A slowly varying track, so only the injected jump is a wrap.
        let track: Vec<f64> = steps
            .iter()
            .scan(0.0, |phase, step| {
                *phase += step;
                Some(*phase)
            })
            .collect();
        let k = 1 + at.index(track.len() - 1);
        let naive: Vec<f64> = track
            .iter()
            .enumerate()
            .map(|(i, &p)| if i >= k { p + 360.0 } else { p })
            .collect();
        let corrected = remove_phase_wraps(&naive, PHASE_WRAP_WINDOW);
        for i in 0..naive.len() {
            let expected = if i >= k { -360.0 } else { 0.0 };
            prop_assert!((corrected[i] - naive[i] - expected).abs() < 1e-9);
        }
    }
}

#[test]
fn missing_gradient_channel() {
    let rows = [[0.0, 1.0, 1.0], [0.0, 1.0, 1.0]];
    assert_eq!(
        Waveform::from_rows(&rows).unwrap_err(),
        ValidationError::MissingGradientChannel { columns: 3 }
    );
}

#[test]
fn sign_inverting_modulation_is_rejected() {
    let rows = [
        [0.0, 0.2, 1.0, 1.0],
        [0.0, 1.0, 1.0, 1.0],
        [0.0, 0.2, 1.0, 1.0],
    ];
    let pulse = PulseDescriptor::new(Waveform::from_rows(&rows).unwrap(), PulseType::Refocusing);
    let alpha = ModulationFunction::row(vec![1.0, -1.0, 1.0]);
    let err = transform(&pulse, &alpha, fixed_peak_b1).unwrap_err();
    assert_eq!(
        err.validation(),
        Some(&ValidationError::NegativeDuration {
            index: 1,
            value: -1.0
        })
    );
}

#[test]
fn excitation_end_to_end() {
    let rows: Vec<[f64; 4]> = [0.1, 0.4, 0.8, 1.0, 0.8, 0.4, 0.1, 0.2, 0.1]
        .iter()
        .enumerate()
        .map(|(i, &amplitude)| {
            let phase = if i >= 7 { 180.0 } else { 0.0 };
            [phase, amplitude, 1.0, 0.3]
        })
        .collect();
    let pulse = PulseDescriptor::new(Waveform::from_rows(&rows).unwrap(), PulseType::Excitation);
    let out = transform(&pulse, &ModulationFunction::identity(rows.len()), fixed_peak_b1).unwrap();

    assert_eq!(out.modulation, Some(ModulationKind::AmplitudeModulated));
    // Signed mean amplitude: (0.1 + 0.4 + 0.8 + 1.0 + 0.8 + 0.4 + 0.1 - 0.2 - 0.1) / 9 = 3.3 / 9
    let signed_mean = 3.3 / 9.0;
    let reference_duration = 5e-3;
    let w1max = 0.25 / (signed_mean * reference_duration);
    let expected = reference_duration * w1max;
    let product = out.time_b1_product.unwrap();
    assert!(product > 0.0);
    assert!((product - expected).abs() < 1e-9);
    assert_eq!(out.waveform.phases(), pulse.waveform.phases());
}

#[test]
fn phase_modulated_pulse_uses_injected_value() {
    let rows: Vec<[f64; 4]> = (0..150)
        .map(|i| [(i as f64 * 3.0) % 360.0, 1.0, 1.0, 0.0])
        .collect();
    let pulse = PulseDescriptor::new(Waveform::from_rows(&rows).unwrap(), PulseType::Inversion);
    let peak_b1 = |_: &B1Sweep| -> crate::Result<Frequency<Kilohertz>> { Ok(kilohertz(0.25)) };
    let out = transform(&pulse, &ModulationFunction::identity(150), peak_b1).unwrap();
    assert_eq!(out.modulation, Some(ModulationKind::PhaseModulated));
    assert!((out.time_b1_product.unwrap() - 1.25).abs() < 1e-12);
    // The wrap from 357 to 0 degrees is removed, leaving a linear phase ramp.
    let phases = out.waveform.phases();
    assert!(phases.windows(2).all(|w| (w[1] - w[0] - 3.0).abs() < 1e-9));
    assert_eq!(phases[149], 447.0);
}
