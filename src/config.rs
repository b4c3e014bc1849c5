use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_STORAGE_KEY: &str = "probabilities";

/// Editor layout and persistence settings.
///
/// `canvas_*` is the drawing surface in device pixels; `box_*` is the editing
/// area centred inside it. Missing JSON fields fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub box_width: f64,
    pub box_height: f64,
    pub pixel_ratio: f64,
    pub label_size: f64,
    pub storage_key: String,
    pub persist_debounce_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            canvas_height: 800.0,
            box_width: 1200.0,
            box_height: 800.0,
            pixel_ratio: 1.0,
            label_size: 20.0,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            persist_debounce_ms: 250,
        }
    }
}

impl EditorConfig {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        Ok(cfg.sanitized())
    }

    /// Forces every dimension to a usable value.
    pub fn sanitized(mut self) -> Self {
        self.box_width = positive_or(self.box_width, 1.0);
        self.box_height = positive_or(self.box_height, 1.0);
        self.canvas_width = positive_or(self.canvas_width, self.box_width);
        self.canvas_height = positive_or(self.canvas_height, self.box_height);
        self.pixel_ratio = positive_or(self.pixel_ratio, 1.0);
        self.label_size = self.label_size.max(0.0);
        if self.storage_key.trim().is_empty() {
            self.storage_key = DEFAULT_STORAGE_KEY.to_string();
        }
        self
    }

    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
