use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use yaml_mend::types::{ParseError, RepairAction, RepairOptions, RepairResult};

fn options_from_dict(d: Option<&Bound<'_, PyDict>>) -> PyResult<RepairOptions> {
    let mut opt = RepairOptions::default();
    let Some(d) = d else { return Ok(opt) };

    macro_rules! set_opt {
        ($key:literal, $field:ident, $ty:ty) => {
            if let Some(v) = d.get_item($key)? {
                if !v.is_none() {
                    opt.$field = v.extract::<$ty>()?;
                }
            }
        };
    }

    set_opt!("entry_key", entry_key, String);
    set_opt!("content_key", content_key, String);
    set_opt!("known_fields", known_fields, Vec<String>);
    set_opt!("strict_fast_path", strict_fast_path, bool);

    Ok(opt)
}

fn repair_action_to_pydict<'py>(py: Python<'py>, a: &RepairAction) -> PyResult<Bound<'py, PyDict>> {
    let d = PyDict::new_bound(py);
    d.set_item("op", a.op.clone())?;
    d.set_item("line", a.line)?;
    d.set_item("span", a.span)?;
    d.set_item("note", a.note.clone())?;
    Ok(d)
}

fn parse_error_to_pydict<'py>(py: Python<'py>, e: &ParseError) -> PyResult<Bound<'py, PyDict>> {
    let d = PyDict::new_bound(py);
    d.set_item("kind", e.kind.clone())?;
    d.set_item("line", e.line)?;
    d.set_item("message", e.message.clone())?;
    Ok(d)
}

fn result_to_pydict<'py>(py: Python<'py>, r: &RepairResult) -> PyResult<Bound<'py, PyDict>> {
    let d = PyDict::new_bound(py);
    d.set_item("status", r.status.clone())?;
    d.set_item("output", r.output.clone())?;

    let records = PyList::empty_bound(py);
    for rec in &r.records {
        let rd = PyDict::new_bound(py);
        rd.set_item("type", rec.type_name.clone())?;
        let content = PyDict::new_bound(py);
        for (k, v) in &rec.content {
            content.set_item(k, v)?;
        }
        rd.set_item("content", content)?;
        records.append(rd)?;
    }
    d.set_item("records", records)?;

    let repairs = PyList::empty_bound(py);
    for a in &r.repairs {
        repairs.append(repair_action_to_pydict(py, a)?)?;
    }
    d.set_item("repairs", repairs)?;

    let errors = PyList::empty_bound(py);
    for e in &r.errors {
        errors.append(parse_error_to_pydict(py, e)?)?;
    }
    d.set_item("errors", errors)?;

    let stats = PyDict::new_bound(py);
    stats.set_item("input_lines", r.stats.input_lines)?;
    stats.set_item("entries", r.stats.entries)?;
    stats.set_item("dropped_prefix_lines", r.stats.dropped_prefix_lines)?;
    stats.set_item("dropped_noise_lines", r.stats.dropped_noise_lines)?;
    d.set_item("stats", stats)?;

    Ok(d)
}

#[pyfunction]
#[pyo3(signature = (text, options=None))]
fn repair_py(py: Python<'_>, text: &str, options: Option<&Bound<'_, PyDict>>) -> PyResult<PyObject> {
    let opt = options_from_dict(options)?;
    let result = yaml_mend::repair(text, &opt)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
    Ok(result_to_pydict(py, &result)?.into_py(py))
}

/// Drop-in for the upstream Python helper: near-YAML in, valid YAML out.
#[pyfunction]
fn clean_yaml_string(text: &str) -> PyResult<String> {
    let result = yaml_mend::repair_default(text)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
    Ok(result.output)
}

#[pymodule]
fn mendyaml_rust(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(repair_py, m)?)?;
    m.add_function(wrap_pyfunction!(clean_yaml_string, m)?)?;
    Ok(())
}
