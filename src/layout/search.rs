// Outward stepping search for one side of one node.
//
// Each stage walks outward in fixed steps until its clearance test passes or
// the per-node search distance runs out, so every loop is bounded by
// `max_extra / search_step` iterations.

use super::clearance::{ObstacleRegistry, is_point_clear, is_rect_clear};
use super::leader::s_curve;
use super::Candidate;
use crate::config::PlacementConfig;
use crate::geometry::{Point, Rect};
use crate::ir::{Node, Side};

#[derive(Debug, Clone)]
pub struct SearchRequest<'a> {
    pub node: &'a Node,
    pub side: Side,
    pub label_width: f32,
    /// Base gap between the node edge and the near edge of the label.
    pub pad: f32,
    pub max_extra: f32,
}

/// Stage at which a search ran out of room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    LabelBox,
    LeaderEnd,
    LeaderStart,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Accepted(Candidate),
    Exhausted(SearchStage),
}

impl SearchOutcome {
    pub fn accepted(self) -> Option<Candidate> {
        match self {
            Self::Accepted(candidate) => Some(candidate),
            Self::Exhausted(_) => None,
        }
    }
}

/// Label box whose near edge is `distance` away from the node on `side`,
/// top edge on the node's center line.
pub(crate) fn label_box(node: &Node, side: Side, width: f32, distance: f32, config: &PlacementConfig) -> Rect {
    let x = match side {
        Side::Left => node.bounds.x - distance - width,
        Side::Right => node.bounds.right() + distance,
    };
    Rect::new(x, node.center().y, width, config.label_height)
}

/// Label corner the leader leaves from: the edge facing the node, vertically centered.
pub(crate) fn leader_start(label_box: &Rect, side: Side) -> Point {
    let y = label_box.y + label_box.height / 2.0;
    match side {
        Side::Left => Point::new(label_box.right(), y),
        Side::Right => Point::new(label_box.x, y),
    }
}

pub(crate) fn leader_end(node: &Node, side: Side, extra: f32, config: &PlacementConfig) -> Point {
    let y = node.center().y;
    match side {
        Side::Left => Point::new(node.bounds.x - config.leader_gap - extra, y),
        Side::Right => Point::new(node.bounds.right() + config.leader_gap + extra, y),
    }
}

/// First offset in `first, first + step, …` up to `max` that `accept` takes.
fn step_outward(first: f32, max: f32, step: f32, mut accept: impl FnMut(f32) -> bool) -> Option<f32> {
    let mut i = 0u32;
    loop {
        let offset = first + step * i as f32;
        if offset > max {
            return None;
        }
        if accept(offset) {
            return Some(offset);
        }
        i += 1;
    }
}

pub fn search_side(
    request: &SearchRequest<'_>,
    registry: &ObstacleRegistry,
    config: &PlacementConfig,
) -> SearchOutcome {
    let SearchRequest {
        node,
        side,
        label_width,
        pad,
        max_extra,
    } = *request;
    let obstacles = registry.obstacles();
    let exclude = [node.id.as_str()];
    let step = config.search_step;
    let box_at = |extra: f32| label_box(node, side, label_width, pad + extra, config);
    let box_clear = |rect: &Rect| is_rect_clear(rect, obstacles, config.clearance, &exclude);
    let point_clear = |point: Point| is_point_clear(point, obstacles, config.clearance, &exclude);

    let Some(mut extra) = step_outward(0.0, max_extra, step, |extra| box_clear(&box_at(extra))) else {
        return SearchOutcome::Exhausted(SearchStage::LabelBox);
    };

    let Some(end_extra) = step_outward(0.0, max_extra, step, |ex| {
        point_clear(leader_end(node, side, ex, config))
    }) else {
        return SearchOutcome::Exhausted(SearchStage::LeaderEnd);
    };
    let end = leader_end(node, side, end_extra, config);

    // A clear box does not by itself vouch for the corner the leader leaves from.
    if !point_clear(leader_start(&box_at(extra), side)) {
        let accepted = extra;
        let bump = step_outward(step, max_extra, step, |bump| {
            let rect = box_at(accepted + bump);
            box_clear(&rect) && point_clear(leader_start(&rect, side))
        });
        match bump {
            Some(bump) => extra = accepted + bump,
            None => return SearchOutcome::Exhausted(SearchStage::LeaderStart),
        }
    }

    let label_box = box_at(extra);
    let leader = s_curve(leader_start(&label_box, side), end, config.curve_offset);
    SearchOutcome::Accepted(Candidate {
        side,
        label_box,
        length: leader.chord_length(),
        leader,
    })
}
