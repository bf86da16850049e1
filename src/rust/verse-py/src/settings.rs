// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Python bindings for VerseSettings

use pyo3::{prelude::*, types::PyDict};

use verse::VerseSettings;
use verse_units::duration::milliseconds;
use verse_units::frequency::{hertz, kilohertz};

fn get_setting<'py, T: FromPyObject<'py>>(
    settings_py: &Bound<'py, PyDict>,
    key: &str,
) -> PyResult<Option<T>> {
    settings_py
        .get_item(key)?
        .map(|value| value.extract::<T>())
        .transpose()
}

/// Creates VERSE settings from a Python dictionary.
///
/// Keys missing from the dictionary keep their default value.
pub(crate) fn verse_settings_from_dict(ob: &Bound<'_, PyDict>) -> PyResult<VerseSettings> {
    let mut settings = VerseSettings::default();
    if let Some(value) = get_setting::<f64>(ob, "REFERENCE_DURATION_MS")? {
        settings.reference_duration = milliseconds(value);
    }
    if let Some(value) = get_setting::<(f64, f64)>(ob, "PHASE_WRAP_WINDOW_DEG")? {
        settings.phase_wrap_window = value;
    }
    if let Some(value) = get_setting::<f64>(ob, "NEGATIVE_PHASE_THRESHOLD_DEG")? {
        settings.negative_phase_threshold = value;
    }
    if let Some(value) = get_setting::<f64>(ob, "REFERENCE_FREQUENCY_HZ")? {
        settings.reference_frequency = hertz(value);
    }
    if let Some(value) = get_setting::<f64>(ob, "B1_SWEEP_START_KHZ")? {
        settings.b1_sweep.start = kilohertz(value);
    }
    if let Some(value) = get_setting::<f64>(ob, "B1_SWEEP_STOP_KHZ")? {
        settings.b1_sweep.stop = kilohertz(value);
    }
    if let Some(value) = get_setting::<f64>(ob, "B1_SWEEP_STEP_KHZ")? {
        settings.b1_sweep.step = kilohertz(value);
    }
    Ok(settings)
}
