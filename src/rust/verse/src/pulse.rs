// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::waveform::Waveform;

/// The purpose of an RF pulse, which fixes its nominal flip angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseType {
    Excitation,
    Refocusing,
    Inversion,
    FlipAngleDegrees(f64),
}

impl PulseType {
    /// Construct from an explicit flip angle in degrees.
    pub fn flip_angle(degrees: f64) -> Result<Self, ValidationError> {
        if !degrees.is_finite() {
            return Err(ValidationError::InvalidPulseType(format!(
                "flip angle must be finite, got {degrees}"
            )));
        }
        Ok(PulseType::FlipAngleDegrees(degrees))
    }

    /// Fraction of a full rotation the pulse is designed for.
    pub fn flip_cycles(&self) -> f64 {
        match self {
            PulseType::Excitation => 0.25,
            PulseType::Refocusing => 0.5,
            PulseType::Inversion => 0.5,
            PulseType::FlipAngleDegrees(degrees) => degrees / 360.0,
        }
    }

    pub fn flip_angle_degrees(&self) -> f64 {
        self.flip_cycles() * 360.0
    }
}

impl FromStr for PulseType {
    type Err = ValidationError;

    /// Parse a pulse type name or a numeric flip angle in degrees.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excitation" => Ok(PulseType::Excitation),
            "refocusing" => Ok(PulseType::Refocusing),
            "inversion" => Ok(PulseType::Inversion),
            other => match other.parse::<f64>() {
                Ok(degrees) => PulseType::flip_angle(degrees),
                Err(_) => Err(ValidationError::InvalidPulseType(format!(
                    "expected 'excitation', 'refocusing', 'inversion' or a flip angle in degrees, got '{s}'"
                ))),
            },
        }
    }
}

impl fmt::Display for PulseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PulseType::Excitation => write!(f, "excitation"),
            PulseType::Refocusing => write!(f, "refocusing"),
            PulseType::Inversion => write!(f, "inversion"),
            PulseType::FlipAngleDegrees(degrees) => write!(f, "{degrees} deg"),
        }
    }
}

/// How the phase channel of a pulse behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModulationKind {
    /// Phase restricted to 0° and 180°, i.e. the sign of the RF amplitude.
    AmplitudeModulated,
    /// Continuously varying phase, e.g. adiabatic pulses.
    PhaseModulated,
}

/// An RF pulse together with its type.
///
/// Pulses produced by the VERSE transformation additionally carry the
/// time-B1 product and the modulation class derived during the transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseDescriptor {
    pub waveform: Waveform,
    pub pulse_type: PulseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_b1_product: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modulation: Option<ModulationKind>,
}

impl PulseDescriptor {
    pub fn new(waveform: Waveform, pulse_type: PulseType) -> Self {
        PulseDescriptor {
            waveform,
            pulse_type,
            time_b1_product: None,
            modulation: None,
        }
    }

    pub fn is_phase_modulated(&self) -> Option<bool> {
        self.modulation
            .map(|kind| kind == ModulationKind::PhaseModulated)
    }
}
