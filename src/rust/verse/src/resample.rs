// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Piecewise-linear resampling of channels from a non-uniform time axis.

/// Running sum of the time steps, i.e. the end time of each sample.
pub fn cumulative_time(durations: &[f64]) -> Vec<f64> {
    durations
        .iter()
        .scan(0.0, |t, dt| {
            *t += dt;
            Some(*t)
        })
        .collect()
}

/// `count` evenly spaced points from `start` to `stop`, both included.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => vec![],
        1 => vec![stop],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        stop
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// Linearly interpolate `values` sampled at the non-decreasing `axis` onto `at`.
///
/// Points outside the axis are clamped to the first or last value. Where the
/// axis repeats a time point the later sample wins.
pub fn interpolate_linear(axis: &[f64], values: &[f64], at: &[f64]) -> Vec<f64> {
    debug_assert_eq!(axis.len(), values.len());
    let (Some(&first), Some(&last)) = (axis.first(), axis.last()) else {
        return vec![];
    };
    at.iter()
        .map(|&t| {
            if t <= first {
                return values[0];
            }
            if t >= last {
                return values[values.len() - 1];
            }
            // First index whose time point is past `t`; in 1..len by the checks above.
            let hi = axis.partition_point(|&x| x <= t);
            let lo = hi - 1;
            let span = axis[hi] - axis[lo];
            if span <= 0.0 {
                return values[hi];
            }
            let fraction = (t - axis[lo]) / span;
            values[lo] + fraction * (values[hi] - values[lo])
        })
        .collect()
}
