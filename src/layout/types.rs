use crate::geometry::{Point, Rect};
use crate::ir::Side;
use serde::Serialize;

/// Cubic S-curve from a label to the node it annotates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeaderCurve {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

impl LeaderCurve {
    /// Straight-line distance between the endpoints, not the arc length.
    pub fn chord_length(&self) -> f32 {
        self.start.distance_to(self.end)
    }

    /// Horizontal run of the leader.
    pub fn width(&self) -> f32 {
        (self.end.x - self.start.x).abs()
    }

    pub fn to_path_data(&self) -> String {
        format!(
            "M {:.1} {:.1} C {:.1} {:.1} {:.1} {:.1} {:.1} {:.1}",
            self.start.x,
            self.start.y,
            self.c1.x,
            self.c1.y,
            self.c2.x,
            self.c2.y,
            self.end.x,
            self.end.y
        )
    }
}

/// A successful search result for one side of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub side: Side,
    pub label_box: Rect,
    pub leader: LeaderCurve,
    pub length: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementKind {
    /// Found by the clearance search.
    Searched,
    /// Fixed leader length from an override; clearance not checked.
    Fixed,
    /// Both sides exhausted; placed at base padding without clearance.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLabel {
    pub node_id: String,
    pub text: String,
    pub side: Side,
    pub kind: PlacementKind,
    pub label_box: Rect,
    /// Text origin: left x and baseline y.
    pub text_origin: Point,
    pub anchor: TextAnchor,
    pub leader: LeaderCurve,
}

impl PlacedLabel {
    pub fn leader_length(&self) -> f32 {
        self.leader.chord_length()
    }

    pub fn leader_width(&self) -> f32 {
        self.leader.width()
    }
}
