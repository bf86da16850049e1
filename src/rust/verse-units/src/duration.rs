// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter, Result as FormatterResult};

use crate::unit::quantity;

quantity!(Duration);

/// A unit of time, defined by its length in seconds.
pub trait TimeUnit: Copy + Default {
    const SECONDS: f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Second;

impl Display for Second {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatterResult {
        write!(f, "s")
    }
}

impl TimeUnit for Second {
    const SECONDS: f64 = 1.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Millisecond;

impl Display for Millisecond {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatterResult {
        write!(f, "ms")
    }
}

impl TimeUnit for Millisecond {
    const SECONDS: f64 = 1e-3;
}

impl<U: TimeUnit> Duration<U, f64> {
    /// Express the duration in another time unit.
    pub fn convert<V: TimeUnit>(self) -> Duration<V, f64> {
        Duration {
            value: self.value * U::SECONDS / V::SECONDS,
            unit: V::default(),
        }
    }

    pub fn to_seconds(self) -> Duration<Second, f64> {
        self.convert()
    }
}

pub const fn seconds<T>(value: T) -> Duration<Second, T> {
    Duration {
        value,
        unit: Second,
    }
}

pub const fn milliseconds<T>(value: T) -> Duration<Millisecond, T> {
    Duration {
        value,
        unit: Millisecond,
    }
}
