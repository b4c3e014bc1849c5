use crate::config::EditorConfig;
use crate::editor::{Editor, PointerDown};
use crate::error::EditorError;
use crate::geometry::Point;
use crate::math;
use crate::persist::{decode_snapshot, encode_snapshot, FileStore, Store};
use crate::scene::Shape;
use crate::vector::{format_values, parse_values};
use ndarray::Array1;
use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use std::path::PathBuf;
use std::time::Instant;

impl From<EditorError> for PyErr {
    fn from(err: EditorError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[pyclass(unsendable)]
pub struct ProbabilityEditor {
    inner: Editor,
    store: Option<FileStore>,
}

#[pymethods]
impl ProbabilityEditor {
    #[new]
    #[pyo3(signature = (config=None, state_dir=None))]
    fn new(config: Option<&Bound<'_, PyDict>>, state_dir: Option<PathBuf>) -> Self {
        let mut cfg = EditorConfig::default();
        if let Some(d) = config {
            cfg.canvas_width = dict_f64(d, "EDITOR_CANVAS_WIDTH", cfg.canvas_width);
            cfg.canvas_height = dict_f64(d, "EDITOR_CANVAS_HEIGHT", cfg.canvas_height);
            cfg.box_width = dict_f64(d, "EDITOR_WIDTH", cfg.box_width);
            cfg.box_height = dict_f64(d, "EDITOR_HEIGHT", cfg.box_height);
            cfg.pixel_ratio = dict_f64(d, "EDITOR_PIXEL_RATIO", cfg.pixel_ratio);
            cfg.label_size = dict_f64(d, "EDITOR_LABEL_SIZE", cfg.label_size);
            cfg.storage_key = dict_string(d, "EDITOR_STORAGE_KEY", cfg.storage_key);
            cfg.persist_debounce_ms =
                dict_u64(d, "EDITOR_PERSIST_DEBOUNCE_MS", cfg.persist_debounce_ms);
        }

        match state_dir {
            Some(dir) => {
                let store = FileStore::new(dir);
                Self {
                    inner: Editor::load(cfg, &store),
                    store: Some(store),
                }
            }
            None => Self {
                inner: Editor::new(cfg),
                store: None,
            },
        }
    }

    #[getter]
    fn probabilities(&self) -> Vec<f64> {
        self.inner.probabilities().to_vec()
    }

    #[getter]
    fn removing(&self) -> bool {
        self.inner.is_removing()
    }

    #[getter]
    fn remove_label(&self) -> &'static str {
        self.inner.remove_label()
    }

    fn add_probability(&mut self) -> usize {
        self.inner.add_probability()
    }

    fn toggle_remove_probability(&mut self) -> bool {
        self.inner.toggle_remove()
    }

    fn mouse_down(&mut self, x: f64, y: f64) -> (&'static str, Option<usize>) {
        match self.inner.pointer_down(Point::new(x, y)) {
            PointerDown::Drag(i) => ("drag", Some(i)),
            PointerDown::Removed(i) => ("removed", Some(i)),
            PointerDown::RemoveRefused => ("refused", None),
        }
    }

    fn mouse_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.pointer_move(Point::new(x, y))
    }

    fn mouse_up(&mut self) {
        self.inner.pointer_up();
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.inner.resize(width, height);
    }

    fn import_text(&mut self, text: &str) -> PyResult<()> {
        Ok(self.inner.import_text(text)?)
    }

    fn export_text(&self) -> String {
        self.inner.export_text()
    }

    fn scene(&self, py: Python<'_>) -> PyResult<Py<PyList>> {
        let out = PyList::empty_bound(py);
        for shape in self.inner.scene().shapes {
            out.append(shape_to_dict(py, &shape)?)?;
        }
        Ok(out.unbind())
    }

    /// Persists pending edits once their debounce window has passed.
    fn tick(&mut self) -> bool {
        match self.store.as_mut() {
            Some(store) => self.inner.tick(store, Instant::now()),
            None => false,
        }
    }

    fn flush(&mut self) -> PyResult<bool> {
        match self.store.as_mut() {
            Some(store) => Ok(self.inner.flush(store as &mut dyn Store)?),
            None => Ok(false),
        }
    }
}

fn shape_to_dict(py: Python<'_>, shape: &Shape) -> PyResult<Py<PyDict>> {
    let d = PyDict::new_bound(py);
    match shape {
        Shape::Rect {
            center,
            width,
            height,
            color,
        } => {
            d.set_item("kind", "rect")?;
            d.set_item("center", (center.x, center.y))?;
            d.set_item("width", *width)?;
            d.set_item("height", *height)?;
            d.set_item("color", color.to_hex())?;
        }
        Shape::Line {
            from,
            to,
            thickness,
            color,
        } => {
            d.set_item("kind", "line")?;
            d.set_item("from", (from.x, from.y))?;
            d.set_item("to", (to.x, to.y))?;
            d.set_item("thickness", *thickness)?;
            d.set_item("color", color.to_hex())?;
        }
        Shape::Circle {
            center,
            radius,
            color,
        } => {
            d.set_item("kind", "circle")?;
            d.set_item("center", (center.x, center.y))?;
            d.set_item("radius", *radius)?;
            d.set_item("color", color.to_hex())?;
        }
        Shape::Text {
            pos,
            text,
            size,
            color,
        } => {
            d.set_item("kind", "text")?;
            d.set_item("pos", (pos.x, pos.y))?;
            d.set_item("text", text.as_str())?;
            d.set_item("size", *size)?;
            d.set_item("color", color.to_hex())?;
        }
    }
    Ok(d.unbind())
}

#[pyfunction]
#[pyo3(signature = (values, pinned=None))]
fn redistribute<'py>(
    py: Python<'py>,
    values: PyReadonlyArray1<'py, f64>,
    pinned: Option<usize>,
) -> Py<PyArray1<f64>> {
    let input: Vec<f64> = values.as_array().iter().copied().collect();
    let out = math::redistribute(&input, pinned);
    Array1::from_vec(out).into_pyarray_bound(py).unbind()
}

#[pyfunction]
fn parse_probabilities(text: &str) -> PyResult<Vec<f64>> {
    Ok(parse_values(text)?)
}

#[pyfunction]
fn format_probabilities(values: Vec<f64>) -> String {
    format_values(&values)
}

#[pyfunction]
fn serialize_for_snapshot(editor: &ProbabilityEditor) -> PyResult<String> {
    Ok(encode_snapshot(editor.inner.probabilities())?)
}

#[pyfunction]
fn restore_from_snapshot(editor: &mut ProbabilityEditor, snapshot: &str) -> PyResult<()> {
    editor.inner.replace(decode_snapshot(snapshot)?);
    Ok(())
}

#[pymodule]
fn prob_editor(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ProbabilityEditor>()?;

    m.add_function(wrap_pyfunction!(redistribute, m)?)?;
    m.add_function(wrap_pyfunction!(parse_probabilities, m)?)?;
    m.add_function(wrap_pyfunction!(format_probabilities, m)?)?;
    m.add_function(wrap_pyfunction!(serialize_for_snapshot, m)?)?;
    m.add_function(wrap_pyfunction!(restore_from_snapshot, m)?)?;

    Ok(())
}

fn dict_f64(d: &Bound<'_, PyDict>, key: &str, default: f64) -> f64 {
    match d.get_item(key) {
        Ok(Some(v)) => v.extract::<f64>().unwrap_or(default),
        _ => default,
    }
}

fn dict_u64(d: &Bound<'_, PyDict>, key: &str, default: u64) -> u64 {
    match d.get_item(key) {
        Ok(Some(v)) => v.extract::<u64>().unwrap_or(default),
        _ => default,
    }
}

fn dict_string(d: &Bound<'_, PyDict>, key: &str, default: String) -> String {
    match d.get_item(key) {
        Ok(Some(v)) => v.extract::<String>().unwrap_or(default),
        _ => default,
    }
}
