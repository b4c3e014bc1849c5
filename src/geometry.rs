use crate::config::EditorConfig;
use crate::math::clamp_unit;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Placement of the editing box on the canvas, in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub box_width: f64,
    pub box_height: f64,
    pub ratio: f64,
}

impl Layout {
    pub fn from_config(cfg: &EditorConfig) -> Self {
        Self {
            canvas_width: cfg.canvas_width,
            canvas_height: cfg.canvas_height,
            box_width: cfg.box_width,
            box_height: cfg.box_height,
            ratio: cfg.pixel_ratio,
        }
    }

    /// Keeps the box centred on a canvas of a new size.
    pub fn resize(&mut self, canvas_width: f64, canvas_height: f64) {
        self.canvas_width = canvas_width;
        self.canvas_height = canvas_height;
    }

    pub fn center(&self) -> Point {
        Point::new(self.canvas_width / 2.0, self.canvas_height / 2.0)
    }

    pub fn left(&self) -> f64 {
        self.canvas_width / 2.0 - self.box_width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.canvas_width / 2.0 + self.box_width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.canvas_height / 2.0 - self.box_height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.canvas_height / 2.0 + self.box_height / 2.0
    }

    /// Box height in CSS pixels, the unit pointer moves arrive in.
    pub fn display_height(&self) -> f64 {
        self.box_height / self.ratio
    }

    /// Screen position of entry `index` out of `total` holding `value`.
    pub fn anchor(&self, total: usize, index: usize, value: f64) -> Point {
        let step = self.box_width / (total as f64 + 1.0);
        Point::new(
            step * (index as f64 + 1.0) + self.left(),
            (1.0 - value) * self.box_height + self.top(),
        )
    }

    /// Index of the anchor closest to `p`; the lowest index wins ties.
    pub fn nearest(&self, values: &[f64], p: Point) -> Option<usize> {
        let total = values.len();
        let mut best: Option<(usize, f64)> = None;
        for (i, v) in values.iter().enumerate() {
            let dist = p.distance(self.anchor(total, i, *v));
            let closer = match best {
                None => true,
                Some((_, d)) => dist < d,
            };
            if closer {
                best = Some((i, dist));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Converts a vertical pointer move (CSS pixels, down positive) into a
    /// probability change.
    pub fn drag_delta(&self, pointer_dy: f64) -> f64 {
        -pointer_dy / self.display_height()
    }
}

/// Applies a drag delta to a single value.
pub fn dragged_value(old: f64, pointer_dy: f64, layout: &Layout) -> f64 {
    clamp_unit(old + layout.drag_delta(pointer_dy))
}
