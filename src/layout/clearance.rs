// Clearance checks against nodes and labels placed so far.

use crate::geometry::{Point, Rect, point_rect_distance, rect_distance};
use crate::ir::Node;

#[derive(Debug, Clone, PartialEq)]
pub enum ObstacleKind {
    Node,
    Label,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Node id for node obstacles, label text for label obstacles.
    pub id: String,
    pub kind: ObstacleKind,
    pub bounds: Rect,
}

impl Obstacle {
    fn excluded_by(&self, exclude: &[&str]) -> bool {
        self.kind == ObstacleKind::Node && exclude.contains(&self.id.as_str())
    }
}

/// Append-only obstacle set for one placement run.
#[derive(Debug, Clone, Default)]
pub struct ObstacleRegistry {
    obstacles: Vec<Obstacle>,
}

impl ObstacleRegistry {
    pub fn from_nodes(nodes: &[Node]) -> Self {
        Self {
            obstacles: nodes
                .iter()
                .map(|node| Obstacle {
                    id: node.id.clone(),
                    kind: ObstacleKind::Node,
                    bounds: node.bounds,
                })
                .collect(),
        }
    }

    pub fn push_label(&mut self, text: &str, bounds: Rect) {
        self.obstacles.push(Obstacle {
            id: text.to_string(),
            kind: ObstacleKind::Label,
            bounds,
        });
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

pub fn is_rect_clear(rect: &Rect, obstacles: &[Obstacle], min_clearance: f32, exclude: &[&str]) -> bool {
    obstacles
        .iter()
        .filter(|obstacle| !obstacle.excluded_by(exclude))
        .all(|obstacle| rect_distance(rect, &obstacle.bounds) >= min_clearance)
}

pub fn is_point_clear(point: Point, obstacles: &[Obstacle], min_clearance: f32, exclude: &[&str]) -> bool {
    obstacles
        .iter()
        .filter(|obstacle| !obstacle.excluded_by(exclude))
        .all(|obstacle| point_rect_distance(point, &obstacle.bounds) >= min_clearance)
}
