// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Typed physical quantities used in RF pulse design.
//!
//! # Examples
//! ```rust
//! use verse_units::duration::milliseconds;
//! use verse_units::frequency::kilohertz;
//!
//! // A 5 ms pulse at 1 kHz peak B1 covers 5 cycles.
//! let cycles = milliseconds(5.0) * kilohertz(1.0);
//! assert!((cycles - 5.0).abs() < 1e-12);
//! ```

pub mod duration;
pub mod frequency;
mod unit;
