// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Time-B1 product of a pulse, referred to a fixed pulse duration.

use verse_units::duration::{Duration, Millisecond};
use verse_units::frequency::{Frequency, FrequencyUnit, Hertz, hertz};

/// Peak B1 of an amplitude-modulated pulse of `pulse_duration`.
///
/// `signed_mean_amplitude` is the mean of the normalized amplitude, negated
/// where the phase is 180°. A pulse with no net area has no defined peak B1
/// and yields zero.
pub fn amplitude_modulated_peak_b1(
    flip_cycles: f64,
    signed_mean_amplitude: f64,
    pulse_duration: Duration<Millisecond>,
) -> Frequency<Hertz> {
    if signed_mean_amplitude == 0.0 {
        return hertz(0.0);
    }
    hertz(flip_cycles / (signed_mean_amplitude * pulse_duration.to_seconds().value()))
}

/// Time-B1 product of a pulse of `pulse_duration` played at `peak_b1`.
pub fn time_b1_product<U: FrequencyUnit>(
    pulse_duration: Duration<Millisecond>,
    peak_b1: Frequency<U>,
) -> f64 {
    pulse_duration * peak_b1
}
