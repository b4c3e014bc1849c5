use crate::config::EditorConfig;
use crate::error::Result;
use crate::geometry::{dragged_value, Layout, Point};
use crate::persist::{load_or_default, DebouncedWriter, Store};
use crate::scene::{Scene, Surface};
use crate::vector::ProbabilityVector;
use std::time::Instant;

pub const REMOVE_LABEL: &str = "Remove probability";
pub const CANCEL_REMOVE_LABEL: &str = "Cancel remove probability";

/// Receives the remove button's caption whenever remove mode flips.
pub trait LabelTarget {
    fn set_label(&mut self, text: &str);
}

/// Receives exported text.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerDown {
    Drag(usize),
    Removed(usize),
    RemoveRefused,
}

/// Editor state and event handlers. Owned by the host, which forwards
/// pointer, button and resize events and calls [`Editor::tick`] once a frame.
pub struct Editor {
    cfg: EditorConfig,
    layout: Layout,
    vector: ProbabilityVector,
    dragging: Option<usize>,
    prev: Point,
    removing: bool,
    dirty: bool,
    writer: DebouncedWriter,
    label: Option<Box<dyn LabelTarget>>,
}

impl Editor {
    pub fn new(cfg: EditorConfig) -> Self {
        Self::with_vector(cfg, ProbabilityVector::default())
    }

    /// Starts from whatever the store holds under the configured key.
    pub fn load(cfg: EditorConfig, store: &dyn Store) -> Self {
        let vector = load_or_default(store, &cfg.storage_key);
        Self::with_vector(cfg, vector)
    }

    pub fn with_vector(cfg: EditorConfig, vector: ProbabilityVector) -> Self {
        let cfg = cfg.sanitized();
        Self {
            layout: Layout::from_config(&cfg),
            writer: DebouncedWriter::new(cfg.storage_key.clone(), cfg.persist_debounce()),
            cfg,
            vector,
            dragging: None,
            prev: Point::default(),
            removing: false,
            dirty: false,
            label: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.cfg
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn probabilities(&self) -> &ProbabilityVector {
        &self.vector
    }

    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    pub fn is_removing(&self) -> bool {
        self.removing
    }

    pub fn remove_label(&self) -> &'static str {
        if self.removing {
            CANCEL_REMOVE_LABEL
        } else {
            REMOVE_LABEL
        }
    }

    pub fn attach_label(&mut self, target: Box<dyn LabelTarget>) {
        self.label = Some(target);
        self.refresh_label();
    }

    pub fn add_probability(&mut self) -> usize {
        let index = self.vector.push_zero();
        tracing::debug!(index, "probability added");
        self.dirty = true;
        index
    }

    pub fn toggle_remove(&mut self) -> bool {
        self.removing = !self.removing;
        self.refresh_label();
        self.removing
    }

    /// `offset` is in CSS pixels relative to the canvas.
    pub fn pointer_down(&mut self, offset: Point) -> PointerDown {
        let p = offset.scale(self.layout.ratio);
        let index = self.layout.nearest(self.vector.as_slice(), p).unwrap_or(0);
        self.prev = offset;

        if !self.removing {
            self.dragging = Some(index);
            return PointerDown::Drag(index);
        }

        self.removing = false;
        self.refresh_label();
        match self.vector.remove(index) {
            Ok(_) => {
                tracing::debug!(index, remaining = self.vector.len(), "probability removed");
                self.dirty = true;
                PointerDown::Removed(index)
            }
            Err(e) => {
                tracing::debug!(index, error = %e, "remove refused");
                PointerDown::RemoveRefused
            }
        }
    }

    /// Returns true when the move changed a value.
    pub fn pointer_move(&mut self, offset: Point) -> bool {
        let dy = offset.y - self.prev.y;
        self.prev = offset;

        let Some(index) = self.dragging else {
            return false;
        };
        let old = self.vector.get(index).unwrap_or(0.0);
        let value = dragged_value(old, dy, &self.layout);
        match self.vector.set(index, value) {
            Ok(()) => {
                self.dirty = true;
                true
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "drag target vanished");
                self.dragging = None;
                false
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.dragging = None;
    }

    pub fn resize(&mut self, canvas_width: f64, canvas_height: f64) {
        self.layout.resize(canvas_width, canvas_height);
        self.cfg.canvas_width = canvas_width;
        self.cfg.canvas_height = canvas_height;
    }

    /// Replaces the vector with parsed text. On error nothing changes.
    pub fn import_text(&mut self, text: &str) -> Result<()> {
        let vector: ProbabilityVector = text.parse()?;
        tracing::info!(len = vector.len(), "probabilities imported");
        self.replace(vector);
        Ok(())
    }

    pub fn replace(&mut self, vector: ProbabilityVector) {
        self.vector = vector;
        self.dragging = None;
        self.dirty = true;
    }

    pub fn export_text(&self) -> String {
        self.vector.to_text()
    }

    pub fn copy_export(&self, clipboard: Option<&mut dyn Clipboard>) -> Result<bool> {
        let Some(clipboard) = clipboard else {
            return Ok(false);
        };
        clipboard.write_text(&self.export_text())?;
        Ok(true)
    }

    pub fn scene(&self) -> Scene {
        Scene::build(
            &self.layout,
            self.vector.as_slice(),
            self.removing,
            self.cfg.label_size,
        )
    }

    pub fn render(&self, surface: Option<&mut dyn Surface>) {
        self.scene().paint(surface);
    }

    /// Schedules a snapshot for any edit since the last tick and writes it
    /// once the debounce window has passed. Storage failures are logged only.
    pub fn tick(&mut self, store: &mut dyn Store, now: Instant) -> bool {
        if self.dirty {
            if let Err(e) = self.writer.schedule(&self.vector, now) {
                tracing::warn!(error = %e, "failed to encode snapshot");
            }
            self.dirty = false;
        }
        match self.writer.poll(store, now) {
            Ok(written) => written,
            Err(e) => {
                tracing::warn!(key = self.writer.key(), error = %e, "failed to persist probabilities");
                false
            }
        }
    }

    /// Writes any outstanding edit immediately.
    pub fn flush(&mut self, store: &mut dyn Store) -> Result<bool> {
        if self.dirty {
            self.writer.schedule(&self.vector, Instant::now())?;
            self.dirty = false;
        }
        self.writer.flush(store)
    }

    fn refresh_label(&mut self) {
        let text = self.remove_label();
        if let Some(label) = self.label.as_mut() {
            label.set_label(text);
        }
    }
}
