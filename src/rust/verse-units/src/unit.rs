// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

pub(crate) fn round_to_significant_digits(x: f64, n: u32) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let order = x.abs().log10().floor();
    let scale = 10f64.powf((n as f64) - 1.0 - order);
    if !scale.is_finite() {
        return x;
    }
    (x * scale).round() / scale
}

/// Defines a physical quantity generic over its unit marker `U` and value type `T`.
///
/// Arithmetic between quantities is defined per quantity, where it has a
/// physical meaning (e.g. duration times frequency).
macro_rules! quantity {
    ($ident:ident) => {
        /// A value tagged with its unit.
        ///
        /// `U` is a zero-sized unit marker, `T` the underlying number.
        #[derive(Clone, Copy, Default, Debug)]
        pub struct $ident<U, T = f64> {
            pub(crate) value: T,
            pub(crate) unit: U,
        }

        impl<U, T> $ident<U, T> {
            pub fn value(self) -> T {
                self.value
            }
        }

        /// Signed zeros compare equal.
        impl<T: num_traits::Zero + PartialEq, U> PartialEq for $ident<U, T> {
            fn eq(&self, other: &Self) -> bool {
                (self.value.is_zero() && other.value.is_zero()) || self.value == other.value
            }
        }

        /// Prints the value rounded just below floating point precision,
        /// followed by the unit. The alternate form prints the exact value.
        impl<U, T> std::fmt::Display for $ident<U, T>
        where
            T: std::fmt::Display + num_traits::AsPrimitive<f64> + num_traits::Float,
            U: std::fmt::Display,
        {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if f.alternate() {
                    std::fmt::Display::fmt(&self.value, f)?;
                } else {
                    let digits = (-T::epsilon().log10() - T::one()).as_() as u32;
                    let value =
                        $crate::unit::round_to_significant_digits(self.value.as_(), digits);
                    std::fmt::Debug::fmt(&value, f)?;
                }
                write!(f, " {}", self.unit)
            }
        }
    };
}

pub(crate) use quantity;
