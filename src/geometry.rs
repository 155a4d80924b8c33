// Axis-aligned geometry shared by the placement engine and the SVG collaborators.
// Coordinates follow SVG: x grows rightward, y grows downward.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Gap between two rectangles; zero when they touch or overlap.
pub fn rect_distance(a: &Rect, b: &Rect) -> f32 {
    let dx = (b.x - a.right()).max(a.x - b.right()).max(0.0);
    let dy = (b.y - a.bottom()).max(a.y - b.bottom()).max(0.0);
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    dx.hypot(dy)
}

/// Distance from `point` to the nearest point on or inside `rect`.
pub fn point_rect_distance(point: Point, rect: &Rect) -> f32 {
    let cx = point.x.max(rect.x).min(rect.right());
    let cy = point.y.max(rect.y).min(rect.bottom());
    (point.x - cx).hypot(point.y - cy)
}
