use crate::geometry::{Layout, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rect {
        center: Point,
        width: f64,
        height: f64,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        thickness: f64,
        color: Color,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Color,
    },
    Text {
        pos: Point,
        text: String,
        size: f64,
        color: Color,
    },
}

/// Anything that can paint shapes: a canvas, an SVG writer, a test recorder.
pub trait Surface {
    fn draw(&mut self, shape: &Shape);
}

impl Surface for Vec<Shape> {
    fn draw(&mut self, shape: &Shape) {
        self.push(shape.clone());
    }
}

/// One frame's display list, in paint order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn build(layout: &Layout, values: &[f64], removing: bool, label_size: f64) -> Self {
        let mut shapes = frame_shapes(layout, label_size);
        shapes.extend(curve_shapes(layout, values, removing));
        Self { shapes }
    }

    /// Paints every shape; a missing surface is a no-op.
    pub fn paint(&self, surface: Option<&mut dyn Surface>) {
        let Some(surface) = surface else {
            return;
        };
        for shape in &self.shapes {
            surface.draw(shape);
        }
    }

    pub fn markers(&self) -> impl Iterator<Item = (Point, f64, Color)> + '_ {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Circle {
                center,
                radius,
                color,
            } => Some((*center, *radius, *color)),
            _ => None,
        })
    }
}

fn frame_shapes(layout: &Layout, label_size: f64) -> Vec<Shape> {
    let ratio = layout.ratio;
    let center = layout.center();
    vec![
        Shape::Rect {
            center,
            width: layout.box_width + 2.0 * ratio,
            height: layout.box_height + 2.0 * ratio,
            color: Color::BLACK,
        },
        Shape::Rect {
            center,
            width: layout.box_width,
            height: layout.box_height,
            color: Color::WHITE,
        },
        Shape::Text {
            pos: Point::new(layout.left() - 15.0 * ratio, layout.top() + 10.0 * ratio),
            text: "1".to_string(),
            size: label_size * ratio,
            color: Color::BLACK,
        },
        Shape::Text {
            pos: Point::new(layout.left() - 15.0 * ratio, layout.bottom() + 5.0 * ratio),
            text: "0".to_string(),
            size: label_size * ratio,
            color: Color::BLACK,
        },
    ]
}

fn curve_shapes(layout: &Layout, values: &[f64], removing: bool) -> Vec<Shape> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let ratio = layout.ratio;
    let marker_color = if removing { Color::RED } else { Color::BLACK };
    let marker_radius = (if removing { 4.0 } else { 2.0 }) * ratio;
    let line = |from: Point, to: Point| Shape::Line {
        from,
        to,
        thickness: ratio,
        color: Color::BLACK,
    };
    let marker = |center: Point| Shape::Circle {
        center,
        radius: marker_radius,
        color: marker_color,
    };

    let anchors: Vec<Point> = values
        .iter()
        .enumerate()
        .map(|(i, v)| layout.anchor(n, i, *v))
        .collect();

    let mut out = Vec::with_capacity(2 * n + 1);
    out.push(line(Point::new(layout.left(), layout.bottom()), anchors[0]));
    for pair in anchors.windows(2) {
        out.push(line(pair[0], pair[1]));
        out.push(marker(pair[0]));
    }
    let last = anchors[n - 1];
    out.push(line(last, Point::new(layout.right(), layout.bottom())));
    out.push(marker(last));
    out
}
