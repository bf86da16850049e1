// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use numpy::PyArray1;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use verse::bloch::{B1Sweep, B1SweepPoint, PeakB1Source, TargetFlipAngle};
use verse_units::frequency::{Frequency, Kilohertz, kilohertz};

/// PeakB1SourcePy is a wrapper around a Python callable choosing the peak B1.
///
/// The callable receives the simulated sweep as a dictionary with the keys
/// `target_flip_angle` (degrees) and `peak_b1_khz`, `mx`, `my`, `mz`
/// (`numpy` arrays), and returns the peak B1 in kHz.
pub struct PeakB1SourcePy {
    callback: Py<PyAny>,
}

impl PeakB1SourcePy {
    pub fn new(callback: Py<PyAny>) -> Self {
        PeakB1SourcePy { callback }
    }
}

fn sweep_to_py<'py>(py: Python<'py>, sweep: &B1Sweep) -> PyResult<Bound<'py, PyDict>> {
    let column = |f: fn(&B1SweepPoint) -> f64| {
        PyArray1::from_vec(py, sweep.points.iter().map(f).collect())
    };
    let out = PyDict::new(py);
    out.set_item("target_flip_angle", sweep.target_flip_angle)?;
    out.set_item("peak_b1_khz", column(|p| p.peak_b1.value()))?;
    out.set_item("mx", column(|p| p.mx))?;
    out.set_item("my", column(|p| p.my))?;
    out.set_item("mz", column(|p| p.mz))?;
    Ok(out)
}

impl PeakB1Source for PeakB1SourcePy {
    fn peak_b1(&self, sweep: &B1Sweep) -> verse::Result<Frequency<Kilohertz>> {
        Python::with_gil(|py| -> PyResult<f64> {
            let sweep_py = sweep_to_py(py, sweep)?;
            self.callback.bind(py).call1((sweep_py,))?.extract::<f64>()
        })
        .map(kilohertz)
        .map_err(|e| verse::Error::Anyhow(e.into()))
    }
}

/// Peak B1 supplier of a transform called from Python.
///
/// Without a callable, the peak B1 reaching the nominal flip angle is picked
/// from the sweep.
pub enum PeakB1Py {
    Callback(PeakB1SourcePy),
    TargetFlipAngle(TargetFlipAngle),
}

impl PeakB1Py {
    pub fn new(callback: Option<Py<PyAny>>) -> Self {
        match callback {
            Some(callback) => PeakB1Py::Callback(PeakB1SourcePy::new(callback)),
            None => PeakB1Py::TargetFlipAngle(TargetFlipAngle::default()),
        }
    }
}

impl PeakB1Source for PeakB1Py {
    fn peak_b1(&self, sweep: &B1Sweep) -> verse::Result<Frequency<Kilohertz>> {
        match self {
            PeakB1Py::Callback(source) => source.peak_b1(sweep),
            PeakB1Py::TargetFlipAngle(source) => source.peak_b1(sweep),
        }
    }
}
