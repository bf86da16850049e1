// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! VERSE (variable-rate selective excitation) transformation of RF pulses.
//!
//! ```rust
//! use verse::{ModulationFunction, PulseDescriptor, PulseType, Waveform, transform};
//! use verse::bloch::B1Sweep;
//! use verse_units::frequency::{Frequency, Kilohertz, kilohertz};
//!
//! let rows = [
//!     [0.0, 0.5, 1.0, 1.0],
//!     [0.0, 1.0, 1.0, 1.0],
//!     [0.0, 0.5, 1.0, 1.0],
//! ];
//! let pulse = PulseDescriptor::new(Waveform::from_rows(&rows)?, PulseType::Excitation);
//! let alpha = ModulationFunction::row(vec![1.0, 0.5, 1.0]);
//! let peak_b1 = |_: &B1Sweep| -> verse::Result<Frequency<Kilohertz>> { Ok(kilohertz(1.0)) };
//!
//! let verse = transform(&pulse, &alpha, peak_b1)?;
//! assert_eq!(verse.waveform.durations(), vec![1.0; 3]);
//! assert!(verse.time_b1_product.unwrap() > 0.0);
//! # Ok::<(), verse::Error>(())
//! ```

pub mod bloch;
mod error;
pub mod phase;
#[cfg(test)]
mod properties;
pub mod pulse;
pub mod resample;
pub mod settings;
pub mod time_b1;
mod transform;
pub mod waveform;

pub use error::{Error, Result, ValidationError};
pub use pulse::{ModulationKind, PulseDescriptor, PulseType};
pub use settings::VerseSettings;
pub use transform::{VerseTransform, transform};
pub use waveform::{ModulationFunction, Waveform, WaveformSample};
