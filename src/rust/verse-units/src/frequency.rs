// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter, Result as FormatterResult};
use std::ops::Mul;

use crate::duration::{Duration, TimeUnit};
use crate::unit::quantity;

quantity!(Frequency);

/// A unit of frequency, defined by its value in hertz.
pub trait FrequencyUnit: Copy + Default {
    const HERTZ: f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hertz;

impl Display for Hertz {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatterResult {
        write!(f, "Hz")
    }
}

impl FrequencyUnit for Hertz {
    const HERTZ: f64 = 1.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Kilohertz;

impl Display for Kilohertz {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatterResult {
        write!(f, "kHz")
    }
}

impl FrequencyUnit for Kilohertz {
    const HERTZ: f64 = 1e3;
}

impl<U: FrequencyUnit> Frequency<U, f64> {
    /// Express the frequency in another frequency unit.
    pub fn convert<V: FrequencyUnit>(self) -> Frequency<V, f64> {
        Frequency {
            value: self.value * U::HERTZ / V::HERTZ,
            unit: V::default(),
        }
    }

    pub fn to_hertz(self) -> Frequency<Hertz, f64> {
        self.convert()
    }
}

/// Duration times frequency is a plain number of cycles.
impl<U: TimeUnit, V: FrequencyUnit> Mul<Frequency<V, f64>> for Duration<U, f64> {
    type Output = f64;

    fn mul(self, rhs: Frequency<V, f64>) -> f64 {
        self.value * U::SECONDS * rhs.value * V::HERTZ
    }
}

pub const fn hertz<T>(value: T) -> Frequency<Hertz, T> {
    Frequency { value, unit: Hertz }
}

pub const fn kilohertz<T>(value: T) -> Frequency<Kilohertz, T> {
    Frequency {
        value,
        unit: Kilohertz,
    }
}
