// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use verse::bloch::B1Sweep;
use verse::{ModulationFunction, PulseDescriptor, PulseType, Waveform, transform};
use verse_units::frequency::{Frequency, Kilohertz, kilohertz};

fn sinc_pulse(n: usize) -> PulseDescriptor {
    let rows: Vec<[f64; 4]> = (0..n)
        .map(|i| {
            let x = 6.0 * (i as f64 / (n - 1) as f64 - 0.5);
            let sinc = if x == 0.0 {
                1.0
            } else {
                (std::f64::consts::PI * x).sin() / (std::f64::consts::PI * x)
            };
            let phase = if sinc < 0.0 { 180.0 } else { 0.0 };
            [phase, sinc.abs(), 1.0, 1.0]
        })
        .collect();
    PulseDescriptor::new(
        Waveform::from_rows(&rows).expect("valid waveform"),
        PulseType::Refocusing,
    )
}

/// Gaussian pulse with phase 0 throughout, which stays amplitude-modulated
/// under any positive modulation function.
fn gaussian_pulse(n: usize) -> PulseDescriptor {
    let rows: Vec<[f64; 4]> = (0..n)
        .map(|i| {
            let x = 6.0 * (i as f64 / (n - 1) as f64 - 0.5);
            [0.0, (-x * x / 2.0).exp(), 1.0, 1.0]
        })
        .collect();
    PulseDescriptor::new(
        Waveform::from_rows(&rows).expect("valid waveform"),
        PulseType::Excitation,
    )
}

/// Lower the peak amplitude by stretching the centre of the pulse.
fn centre_stretch(n: usize) -> ModulationFunction {
    ModulationFunction::column(
        (0..n)
            .map(|i| {
                let x = i as f64 / (n - 1) as f64 - 0.5;
                1.0 - 0.5 * (-(x * x) / 0.02).exp()
            })
            .collect(),
    )
}

fn peak_b1(_: &B1Sweep) -> verse::Result<Frequency<Kilohertz>> {
    Ok(kilohertz(1.0))
}

fn bench_transform(c: &mut Criterion) {
    let sizes = [256, 1024, 4096];

    let mut group = c.benchmark_group("verse_transform");

    for &size in &sizes {
        let alpha = centre_stretch(size);

        // Resampling and the closed-form time-B1 product only.
        let pulse = gaussian_pulse(size);
        group.bench_with_input(
            BenchmarkId::new("amplitude_modulated", size),
            &size,
            |b, _| {
                b.iter(|| black_box(transform(&pulse, &alpha, peak_b1)));
            },
        );

        // Stretching blends the 0/180 degree lobes of the sinc into
        // intermediate phases, so this case is dominated by the Bloch sweep.
        let pulse = sinc_pulse(size);
        group.bench_with_input(
            BenchmarkId::new("phase_modulated_bloch_sweep", size),
            &size,
            |b, _| {
                b.iter(|| black_box(transform(&pulse, &alpha, peak_b1)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
