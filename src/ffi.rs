//! Python FFI bindings via PyO3.
//!
//! Exposes the angle pipeline, core entropy and the neighbor graph to Python.
//! Every input-validation failure is raised as `ValueError`.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from kneading_core import Angle, core_entropy, neighbor_graph
//!
//! theta = Angle(1, 6)
//! print(theta.kneading_sequence())   # "110"
//! print(theta.itinerary())           # "+-++--"
//! print(theta.polynomial("**"))      # "(+x**0-x**1)*(1-x**4) +(...)"
//! print(theta.associated_root())     # (0.25+0.6614378277661477j)
//!
//! core_entropy(1, 4)                 # 1.6956...
//! neighbor_graph(0.5 + 0j, 6)        # {'h+': {'h+': 'pm'}, 'id': {'h+': 'mp'}}
//! ```

use std::collections::BTreeMap;

use num_complex::Complex64;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::angle::Angle as RustAngle;
use crate::error::DynamicsError;
use crate::polynomial::PowerNotation;

impl From<DynamicsError> for PyErr {
    fn from(e: DynamicsError) -> Self {
        PyValueError::new_err(e.to_string())
    }
}

fn notation_from_symbol(symbol: &str) -> PyResult<PowerNotation> {
    match symbol {
        "^" => Ok(PowerNotation::Caret),
        "**" => Ok(PowerNotation::DoubleStar),
        other => Err(PyValueError::new_err(format!(
            "power symbol must be '^' or '**', got {other:?}"
        ))),
    }
}

// ── Angle ────────────────────────────────────────────────────────────────────

/// A rational angle `num/den` with cached invariants.
#[pyclass(name = "Angle")]
#[derive(Clone)]
pub struct PyAngle {
    inner: RustAngle,
}

#[pymethods]
impl PyAngle {
    /// Create `Angle(num, den)`. Raises `ValueError` unless `0 ≤ num ≤ den`, `den > 0`.
    #[new]
    pub fn new(num: i64, den: i64) -> PyResult<Self> {
        Ok(Self {
            inner: RustAngle::from_fraction(num, den)?,
        })
    }

    /// Parse an angle string such as `"3/4"`.
    #[staticmethod]
    pub fn from_string(th: &str) -> PyResult<Self> {
        Ok(Self {
            inner: RustAngle::from_string(th)?,
        })
    }

    /// Numerator as supplied.
    #[getter]
    pub fn num(&self) -> i64 {
        self.inner.numerator()
    }

    /// Denominator as supplied.
    #[getter]
    pub fn den(&self) -> i64 {
        self.inner.denominator()
    }

    /// Orbit under doubling as `(num, den)` tuples, final repeat included.
    pub fn orbit(&self) -> Vec<(i64, i64)> {
        self.inner
            .orbit()
            .points()
            .iter()
            .map(|r| (*r.numer(), *r.denom()))
            .collect()
    }

    /// `(period_length, start_index)`.
    pub fn period(&self) -> (usize, usize) {
        let p = self.inner.period();
        (p.length, p.start_index)
    }

    /// Binary expansion as `<preperiod>p<period>`.
    pub fn binary_expansion(&self) -> String {
        self.inner.binary_expansion().to_string()
    }

    /// Kneading sequence over `0`, `1`, `*`.
    pub fn kneading_sequence(&self) -> String {
        self.inner.kneading_sequence().to_string()
    }

    /// Itinerary over `+`, `-`.
    pub fn itinerary(&self) -> String {
        self.inner.itinerary().to_string()
    }

    /// Itinerary period length.
    pub fn itinerary_period_length(&self) -> usize {
        self.inner.itinerary_period_length()
    }

    /// Factored numerator; `power_symbol` is `"^"` (default) or `"**"`.
    #[pyo3(signature = (power_symbol="^"))]
    pub fn polynomial(&self, power_symbol: &str) -> PyResult<String> {
        Ok(self.inner.polynomial().render(notation_from_symbol(power_symbol)?))
    }

    /// Root inside `|x| ≤ 2^(-1/2)`, or `None`.
    pub fn associated_root(&self) -> Option<Complex64> {
        self.inner.associated_root().to_option()
    }

    /// Core entropy growth rate.
    pub fn core_entropy(&self) -> f64 {
        self.inner.core_entropy()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!("{:?}", self.inner)
    }

    /// Python str.
    pub fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

// ── Module functions ─────────────────────────────────────────────────────────

/// Core entropy of `num/den`.
#[pyfunction]
#[pyo3(name = "core_entropy")]
pub fn py_core_entropy(num: i64, den: i64) -> PyResult<f64> {
    Ok(crate::entropy::core_entropy_from_fraction(num, den)?)
}

/// Neighbor graph of `param` as `{vertex: {child: label}}`.
#[pyfunction]
#[pyo3(name = "neighbor_graph")]
pub fn py_neighbor_graph(
    param: Complex64,
    max_depth: i64,
) -> PyResult<BTreeMap<String, BTreeMap<String, String>>> {
    let depth = u32::try_from(max_depth).map_err(|_| DynamicsError::MalformedDepth {
        input: max_depth.to_string(),
    })?;
    let graph = crate::neighbor::neighbor_graph(param, depth)?;
    Ok(graph
        .to_labeled_map()
        .into_iter()
        .map(|(vertex, row)| {
            let row = row
                .into_iter()
                .map(|(child, t)| (child, t.label().to_string()))
                .collect();
            (vertex, row)
        })
        .collect())
}

/// Python module definition.
#[pymodule]
pub fn kneading_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAngle>()?;
    m.add_function(wrap_pyfunction!(py_core_entropy, m)?)?;
    m.add_function(wrap_pyfunction!(py_neighbor_graph, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
