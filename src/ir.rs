use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Which side of a node a reference label sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub bounds: Rect,
}

impl Node {
    pub fn new(id: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            bounds: Rect::new(x, y, width, height),
        }
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    /// Reference numeral for the node: its id without the `id` prefix Mermaid adds.
    pub fn reference(&self) -> &str {
        self.id.strip_prefix("id").unwrap_or(&self.id)
    }
}

/// Sort nodes top-to-bottom, then left-to-right, by center.
pub fn sort_reading_order(nodes: &mut [Node]) {
    nodes.sort_by(|a, b| {
        let (ca, cb) = (a.center(), b.center());
        ca.y.total_cmp(&cb.y).then(ca.x.total_cmp(&cb.x))
    });
}
