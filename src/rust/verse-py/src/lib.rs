// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Python extension module `_verse`.

use pyo3::prelude::*;
use pyo3::types::PyDict;

use verse::{PulseDescriptor, VerseTransform};
use verse::phase::classify_modulation;
use verse_log::debug;

mod error;
mod logging;
mod peak_b1;
mod py_conversions;
mod settings;

use crate::peak_b1::PeakB1Py;
use crate::py_conversions::{
    modulation_from_py, modulation_kind_to_str, phases_from_py, pulse_to_py, pulse_type_from_py,
    waveform_from_py,
};
use crate::settings::verse_settings_from_dict;

/// Apply the VERSE transformation to a pulse.
///
/// # Arguments
///
/// * waveform - `N x 4` array-like of `[phase, amplitude, duration, gradient]` rows
/// * pulse_type - `'excitation'`, `'refocusing'`, `'inversion'` or a flip angle in degrees
/// * alpha - Modulation function with `N` values, as a row, a column or a 1-dimensional array
/// * peak_b1 - Callable choosing the peak B1 (kHz) of a phase-modulated pulse from the
///   simulated sweep. Defaults to the lowest value reaching the nominal flip angle.
/// * settings - Dictionary of settings overrides
///
/// # Returns
///
/// A dictionary with the transformed `waveform`, `pulse_type`, `time_b1_product`
/// and `modulation`.
#[pyfunction(signature = (waveform, pulse_type, alpha, peak_b1 = None, settings = None))]
fn verse_transform<'py>(
    py: Python<'py>,
    waveform: &Bound<'py, PyAny>,
    pulse_type: &Bound<'py, PyAny>,
    alpha: &Bound<'py, PyAny>,
    peak_b1: Option<Py<PyAny>>,
    settings: Option<&Bound<'py, PyDict>>,
) -> PyResult<Bound<'py, PyDict>> {
    let pulse = PulseDescriptor::new(
        waveform_from_py(waveform)?,
        pulse_type_from_py(pulse_type)?,
    );
    let alpha = modulation_from_py(alpha)?;
    let settings = settings
        .map(verse_settings_from_dict)
        .transpose()?
        .unwrap_or_default();
    debug!("Transforming {} pulse from Python", pulse.pulse_type);
    let out = VerseTransform::new(settings, PeakB1Py::new(peak_b1))
        .transform(&pulse, &alpha)
        .map_err(error::Error::from)?;
    pulse_to_py(py, &out)
}

/// Whether a phase channel (degrees) is `'amplitude_modulated'` or `'phase_modulated'`.
#[pyfunction]
fn classify_phase(phases: &Bound<'_, PyAny>) -> PyResult<&'static str> {
    let phases = phases_from_py(phases)?;
    Ok(modulation_kind_to_str(classify_modulation(&phases)))
}

#[pymodule]
mod _verse {
    use super::*;

    #[pymodule_export]
    use super::verse_transform;

    #[pymodule_export]
    use super::classify_phase;

    #[pymodule_export]
    use crate::logging::init_logging_py;

    #[pymodule_init]
    fn init(m: &Bound<'_, PyModule>) -> PyResult<()> {
        let py = m.py();
        pyo3_log::init();
        m.add("VerseError", py.get_type::<error::VerseError>())?;
        m.add(
            "VerseValidationError",
            py.get_type::<error::VerseValidationError>(),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pyo3::ffi::c_str;

    use super::*;

    fn run(code: &std::ffi::CStr) {
        Python::with_gil(|py| {
            let module = PyModule::new(py, "_verse").unwrap();
            module
                .add_function(wrap_pyfunction!(verse_transform, &module).unwrap())
                .unwrap();
            module
                .add_function(wrap_pyfunction!(classify_phase, &module).unwrap())
                .unwrap();
            let globals = PyDict::new(py);
            globals.set_item("_verse", module).unwrap();
            py.run(code, Some(&globals), None).unwrap();
        })
    }

    #[test]
    fn test_amplitude_modulated_pulse() {
        run(c_str!(
            r#"
import numpy as np
waveform = [[0, 0.5, 1, 1], [0, 1, 1, 1], [0, 0.5, 1, 1]]
out = _verse.verse_transform(waveform, "excitation", [1.0, 0.5, 1.0])
assert out["waveform"].shape == (3, 4)
assert np.all(out["waveform"][:, 2] == 1.0)
assert out["waveform"][:, 1].max() == 1.0
assert out["modulation"] == "amplitude_modulated"
assert out["pulse_type"] == "excitation"
assert out["time_b1_product"] > 0
"#
        ));
    }

    #[test]
    fn test_phase_modulated_pulse_with_callback() {
        run(c_str!(
            r#"
import numpy as np
seen = {}
def choose(sweep):
    seen["points"] = len(sweep["mz"])
    return 0.25
waveform = np.array([[i * 3.0 % 360, 1, 1, 0] for i in range(150)])
out = _verse.verse_transform(
    waveform,
    180,
    np.ones((1, 150)),
    peak_b1=choose,
    settings={"B1_SWEEP_STOP_KHZ": 0.1},
)
assert seen["points"] == 10
assert out["modulation"] == "phase_modulated"
assert out["pulse_type"] == 180.0
assert abs(out["time_b1_product"] - 1.25) < 1e-12
"#
        ));
    }

    #[test]
    fn test_errors() {
        run(c_str!(
            r#"
try:
    _verse.verse_transform([[0, 1, 1, 1], [0, 1, 1, 1]], "excitation", [1.0, 1.0, 1.0])
except Exception as e:
    assert "VerseValidationError" in type(e).__name__
else:
    raise AssertionError("expected a length mismatch")

def cancel(sweep):
    raise RuntimeError("cancelled")
try:
    _verse.verse_transform([[0, 1, 1, 1], [90, 1, 1, 1]], "excitation", [1.0, 1.0], peak_b1=cancel)
except Exception as e:
    assert type(e).__name__ == "VerseError"
    assert isinstance(e.__cause__, RuntimeError)
else:
    raise AssertionError("expected the callback error")

try:
    _verse.verse_transform(
        [[0, 1, 1, 1], [0, 1, 1, 1]],
        "excitation",
        [1.0, 1.0],
        settings={"B1_SWEEP_STEP_KHZ": 1e-320},
    )
except Exception as e:
    assert type(e).__name__ == "VerseValidationError"
    assert "exceeds" in str(e)
else:
    raise AssertionError("expected an oversized sweep to be rejected")
"#
        ));
    }

    #[test]
    fn test_classify_phase() {
        run(c_str!(
            r#"
assert _verse.classify_phase([0, 180, 180.2, 0]) == "amplitude_modulated"
assert _verse.classify_phase([0, 90]) == "phase_modulated"
"#
        ));
    }
}
