// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Conversions between Python objects and the VERSE data model.
use numpy::{PyArray2, PyArrayDyn, PyArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyString};

use verse::{ModulationFunction, ModulationKind, PulseDescriptor, PulseType, Waveform};

use crate::error::Error;

/// Shape and row-major values of an array-like Python object.
///
/// Lists, nested lists and arrays of any numeric type are converted with
/// `numpy.asarray(..., dtype="float64")`.
fn extract_float_array(ob: &Bound<'_, PyAny>) -> PyResult<(Vec<usize>, Vec<f64>)> {
    let py = ob.py();
    let numpy = PyModule::import(py, "numpy")?;
    let kwargs = PyDict::new(py);
    kwargs.set_item("dtype", "float64")?;
    let arr = numpy.getattr("asarray")?.call((ob,), Some(&kwargs))?;
    let arr = arr.downcast::<PyArrayDyn<f64>>()?;
    let readonly = arr.try_readonly()?;
    let view = readonly.as_array();
    Ok((view.shape().to_vec(), view.iter().copied().collect()))
}

/// Convert an `N x 4` array-like of `[phase, amplitude, duration, gradient]`
/// rows into a `Waveform`.
pub(crate) fn waveform_from_py(ob: &Bound<'_, PyAny>) -> PyResult<Waveform> {
    let (shape, values) = extract_float_array(ob)?;
    let [_, columns] = shape[..] else {
        return Err(PyValueError::new_err(format!(
            "Expected a 2-dimensional waveform, got an array of shape {shape:?}"
        )));
    };
    if columns == 0 {
        return Err(Error::from(verse::ValidationError::EmptyWaveform).into());
    }
    let rows = values.chunks(columns).collect::<Vec<_>>();
    Waveform::from_rows(&rows).map_err(|e| Error::from(e).into())
}

/// Convert a scalar, a 1-dimensional or a 2-dimensional array-like into a
/// `ModulationFunction`.
///
/// A 1-dimensional array carries no orientation and is treated as a column.
pub(crate) fn modulation_from_py(ob: &Bound<'_, PyAny>) -> PyResult<ModulationFunction> {
    let (shape, values) = extract_float_array(ob)?;
    match shape[..] {
        [] | [_] => Ok(ModulationFunction::column(values)),
        [rows, columns] => ModulationFunction::with_shape(rows, columns, values)
            .map_err(|e| Error::from(e).into()),
        _ => Err(PyValueError::new_err(format!(
            "Expected a 1- or 2-dimensional modulation function, got an array of shape {shape:?}"
        ))),
    }
}

/// A 1-dimensional array-like of phases in degrees.
pub(crate) fn phases_from_py(ob: &Bound<'_, PyAny>) -> PyResult<Vec<f64>> {
    match extract_float_array(ob)? {
        (shape, values) if shape.len() == 1 => Ok(values),
        (shape, _) => Err(PyValueError::new_err(format!(
            "Expected a 1-dimensional array of phases, got an array of shape {shape:?}"
        ))),
    }
}

/// Pulse type from its name or a flip angle in degrees.
pub(crate) fn pulse_type_from_py(ob: &Bound<'_, PyAny>) -> PyResult<PulseType> {
    let pulse_type = if let Ok(name) = ob.downcast::<PyString>() {
        name.to_cow()?.parse::<PulseType>()
    } else {
        PulseType::flip_angle(ob.extract::<f64>()?)
    };
    pulse_type.map_err(|e| Error::from(e).into())
}

pub(crate) fn pulse_type_to_py<'py>(
    py: Python<'py>,
    pulse_type: &PulseType,
) -> PyResult<Bound<'py, PyAny>> {
    use pyo3::IntoPyObjectExt;

    match pulse_type {
        PulseType::FlipAngleDegrees(degrees) => degrees.into_bound_py_any(py),
        named => named.to_string().into_bound_py_any(py),
    }
}

pub(crate) fn modulation_kind_to_str(kind: ModulationKind) -> &'static str {
    match kind {
        ModulationKind::AmplitudeModulated => "amplitude_modulated",
        ModulationKind::PhaseModulated => "phase_modulated",
    }
}

/// Convert a transformed pulse into a dictionary with the keys `waveform`
/// (an `N x 4` `numpy.ndarray`), `pulse_type`, `time_b1_product` and
/// `modulation`.
pub(crate) fn pulse_to_py<'py>(
    py: Python<'py>,
    pulse: &PulseDescriptor,
) -> PyResult<Bound<'py, PyDict>> {
    let rows = pulse
        .waveform
        .to_rows()
        .iter()
        .map(|row| row.to_vec())
        .collect::<Vec<_>>();
    let out = PyDict::new(py);
    out.set_item("waveform", PyArray2::from_vec2(py, &rows)?)?;
    out.set_item("pulse_type", pulse_type_to_py(py, &pulse.pulse_type)?)?;
    out.set_item("time_b1_product", pulse.time_b1_product)?;
    out.set_item("modulation", pulse.modulation.map(modulation_kind_to_str))?;
    Ok(out)
}
