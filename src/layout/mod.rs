pub mod clearance;
pub mod leader;
pub mod search;
mod types;

pub use clearance::{Obstacle, ObstacleKind, ObstacleRegistry, is_point_clear, is_rect_clear};
pub use leader::s_curve;
pub use search::{SearchOutcome, SearchRequest, SearchStage, search_side};
pub use types::{Candidate, LeaderCurve, PlacedLabel, PlacementKind, TextAnchor};

use crate::config::PlacementConfig;
use crate::error::ValidationError;
use crate::geometry::{Point, Rect};
use crate::ir::{Node, Side, sort_reading_order};
use crate::overrides::{Overrides, ResolvedOverride, validate_overrides};
use std::collections::HashSet;

/// Place one reference label per node.
///
/// Nodes are processed top-to-bottom, then left-to-right; every label placed
/// becomes an obstacle for the nodes after it, so earlier labels never move
/// to make room for later ones. The output follows that processing order and
/// always holds exactly one label per input node.
pub fn compute_placements(
    nodes: &[Node],
    overrides: &Overrides,
    config: &PlacementConfig,
) -> Result<Vec<PlacedLabel>, ValidationError> {
    config.validate()?;
    validate_nodes(nodes)?;
    validate_overrides(overrides)?;

    let mut ordered = nodes.to_vec();
    sort_reading_order(&mut ordered);
    let flow_mid = horizontal_midpoint(&ordered);

    let mut registry = ObstacleRegistry::from_nodes(&ordered);
    let mut placed = Vec::with_capacity(ordered.len());
    for node in &ordered {
        let resolved = ResolvedOverride::resolve(node.reference(), overrides.get(node.reference()), config);
        let label = place_node(node, &resolved, flow_mid, &registry, config);
        registry.push_label(&label.text, label.label_box);
        placed.push(label);
    }
    Ok(placed)
}

pub fn validate_nodes(nodes: &[Node]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for node in nodes {
        let b = &node.bounds;
        for (field, value) in [("x", b.x), ("y", b.y), ("width", b.width), ("height", b.height)] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteGeometry {
                    id: node.id.clone(),
                    field,
                    value,
                });
            }
        }
        for (field, value) in [("width", b.width), ("height", b.height)] {
            if value < 0.0 {
                return Err(ValidationError::NegativeDimension {
                    id: node.id.clone(),
                    field,
                    value,
                });
            }
        }
        if !seen.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateNode(node.id.clone()));
        }
    }
    Ok(())
}

/// Midpoint of the nodes' horizontal extent, which splits left from right labels.
fn horizontal_midpoint(nodes: &[Node]) -> f32 {
    let min_x = nodes.iter().map(|n| n.bounds.x).fold(f32::INFINITY, f32::min);
    let max_x = nodes.iter().map(|n| n.bounds.right()).fold(f32::NEG_INFINITY, f32::max);
    if min_x.is_finite() && max_x.is_finite() {
        (min_x + max_x) / 2.0
    } else {
        0.0
    }
}

fn default_side(node: &Node, flow_mid: f32) -> Side {
    if node.center().x < flow_mid {
        Side::Left
    } else {
        Side::Right
    }
}

fn place_node(
    node: &Node,
    resolved: &ResolvedOverride,
    flow_mid: f32,
    registry: &ObstacleRegistry,
    config: &PlacementConfig,
) -> PlacedLabel {
    let label_width = config.label_width(&resolved.label);
    let preferred = resolved.force_side.unwrap_or_else(|| default_side(node, flow_mid));

    if let Some(length) = resolved.fixed_length {
        tracing::debug!(node = %node.id, side = preferred.as_str(), length, "fixed leader length");
        return fixed_placement(node, resolved, preferred, label_width, length, config);
    }

    let search = |side: Side| {
        let request = SearchRequest {
            node,
            side,
            label_width,
            pad: resolved.pad(side),
            max_extra: resolved.max_extra,
        };
        let outcome = search_side(&request, registry, config);
        if let SearchOutcome::Exhausted(stage) = &outcome {
            tracing::debug!(node = %node.id, side = side.as_str(), ?stage, "search exhausted");
        }
        outcome.accepted()
    };

    let preferred_candidate = search(preferred);
    let alternative = if resolved.force_side.is_none() {
        search(preferred.opposite())
    } else {
        None
    };

    match choose_candidate(preferred_candidate, alternative, config.side_tolerance) {
        Some(candidate) => {
            tracing::debug!(
                node = %node.id,
                side = candidate.side.as_str(),
                length = candidate.length,
                "placed label"
            );
            PlacedLabel::new(
                node,
                &resolved.label,
                PlacementKind::Searched,
                candidate.side,
                candidate.label_box,
                candidate.leader,
            )
        }
        None => {
            tracing::warn!(
                node = %node.id,
                side = preferred.as_str(),
                "no clearance-respecting placement; using fallback"
            );
            fallback_placement(node, resolved, preferred, label_width, config)
        }
    }
}

/// Pick between the preferred side and its alternative.
///
/// The alternative only wins when its leader is shorter by at least
/// `tolerance`, so near-ties keep the preferred side.
pub fn choose_candidate(
    preferred: Option<Candidate>,
    alternative: Option<Candidate>,
    tolerance: f32,
) -> Option<Candidate> {
    match (preferred, alternative) {
        (Some(preferred), Some(alternative)) => {
            if alternative.length + tolerance <= preferred.length {
                Some(alternative)
            } else {
                Some(preferred)
            }
        }
        (Some(candidate), None) | (None, Some(candidate)) => Some(candidate),
        (None, None) => None,
    }
}

fn fixed_placement(
    node: &Node,
    resolved: &ResolvedOverride,
    side: Side,
    label_width: f32,
    length: f32,
    config: &PlacementConfig,
) -> PlacedLabel {
    // The label sits flush outside the leader start.
    let distance = config.leader_gap + length;
    let label_box = search::label_box(node, side, label_width, distance, config);
    let end = search::leader_end(node, side, 0.0, config);
    let leader = s_curve(search::leader_start(&label_box, side), end, config.curve_offset);
    PlacedLabel::new(node, &resolved.label, PlacementKind::Fixed, side, label_box, leader)
}

fn fallback_placement(
    node: &Node,
    resolved: &ResolvedOverride,
    side: Side,
    label_width: f32,
    config: &PlacementConfig,
) -> PlacedLabel {
    let label_box = search::label_box(node, side, label_width, resolved.pad(side), config);
    let end = search::leader_end(node, side, 0.0, config);
    let leader = s_curve(search::leader_start(&label_box, side), end, config.curve_offset);
    PlacedLabel::new(node, &resolved.label, PlacementKind::Fallback, side, label_box, leader)
}

impl PlacedLabel {
    fn new(
        node: &Node,
        text: &str,
        kind: PlacementKind,
        side: Side,
        label_box: Rect,
        leader: LeaderCurve,
    ) -> Self {
        Self {
            node_id: node.id.clone(),
            text: text.to_string(),
            side,
            kind,
            label_box,
            text_origin: Point::new(label_box.x, label_box.bottom()),
            anchor: TextAnchor::Start,
            leader,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{point_rect_distance, rect_distance};
    use crate::overrides::Override;

    fn candidate(side: Side, length: f32) -> Candidate {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(length, 0.0);
        Candidate {
            side,
            label_box: Rect::new(0.0, 0.0, 10.0, 11.0),
            leader: s_curve(start, end, 15.0),
            length,
        }
    }

    fn by_id<'a>(labels: &'a [PlacedLabel], id: &str) -> &'a PlacedLabel {
        labels.iter().find(|l| l.node_id == id).unwrap()
    }

    #[test]
    fn near_tie_keeps_preferred_side() {
        let chosen = choose_candidate(
            Some(candidate(Side::Left, 50.0)),
            Some(candidate(Side::Right, 49.95)),
            0.1,
        )
        .unwrap();
        assert_eq!(chosen.side, Side::Left);
    }

    #[test]
    fn clearly_shorter_alternative_wins() {
        let chosen = choose_candidate(
            Some(candidate(Side::Left, 50.0)),
            Some(candidate(Side::Right, 49.75)),
            0.1,
        )
        .unwrap();
        assert_eq!(chosen.side, Side::Right);
    }

    #[test]
    fn longer_alternative_loses() {
        let chosen = choose_candidate(
            Some(candidate(Side::Left, 50.0)),
            Some(candidate(Side::Right, 80.0)),
            0.1,
        )
        .unwrap();
        assert_eq!(chosen.side, Side::Left);
    }

    #[test]
    fn single_valid_candidate_is_used() {
        let only_alt = choose_candidate(None, Some(candidate(Side::Right, 90.0)), 0.1).unwrap();
        assert_eq!(only_alt.side, Side::Right);
        let only_pref = choose_candidate(Some(candidate(Side::Left, 90.0)), None, 0.1).unwrap();
        assert_eq!(only_pref.side, Side::Left);
        assert!(choose_candidate(None, None, 0.1).is_none());
    }

    #[test]
    fn two_nodes_take_their_default_sides() {
        let nodes = vec![
            Node::new("id1", 0.0, 0.0, 50.0, 50.0),
            Node::new("id2", 200.0, 0.0, 50.0, 50.0),
        ];
        let config = PlacementConfig::default();
        let labels = compute_placements(&nodes, &Overrides::new(), &config).unwrap();
        assert_eq!(labels.len(), 2);

        let first = by_id(&labels, "id1");
        let second = by_id(&labels, "id2");
        assert_eq!(first.text, "1");
        assert_eq!(first.side, Side::Left);
        assert_eq!(second.side, Side::Right);
        assert_eq!(first.kind, PlacementKind::Searched);
        assert_eq!(second.kind, PlacementKind::Searched);
        assert!(rect_distance(&first.label_box, &second.label_box) >= config.clearance);
        for label in &labels {
            assert!(label.leader_length() < config.base_pad_left);
            assert!(label.leader_length() > config.base_pad_left - 20.0);
        }
    }

    #[test]
    fn forced_fixed_length_ignores_obstacles() {
        let nodes = vec![
            Node::new("id209", 0.0, 0.0, 50.0, 50.0),
            // Sits right where the label lands.
            Node::new("id300", 120.0, 20.0, 40.0, 40.0),
        ];
        let mut overrides = Overrides::new();
        overrides.insert(
            "209".to_string(),
            Override {
                force_side: Some(Side::Right),
                curve_width: Some(80.0),
                ..Default::default()
            },
        );
        let labels = compute_placements(&nodes, &overrides, &PlacementConfig::default()).unwrap();
        let label = by_id(&labels, "id209");
        assert_eq!(label.kind, PlacementKind::Fixed);
        assert_eq!(label.side, Side::Right);
        assert_eq!(label.leader.end, Point::new(52.0, 25.0));
        assert_eq!(label.leader.start, Point::new(132.0, 30.5));
        assert_eq!(label.leader_width(), 80.0);
        assert_eq!(label.label_box.x, 132.0);
    }

    #[test]
    fn fixed_length_uses_default_side_without_force() {
        let nodes = vec![
            Node::new("id1", 0.0, 0.0, 50.0, 50.0),
            Node::new("id2", 300.0, 0.0, 50.0, 50.0),
        ];
        let mut overrides = Overrides::new();
        overrides.insert(
            "1".to_string(),
            Override {
                curve_width: Some(30.0),
                ..Default::default()
            },
        );
        let labels = compute_placements(&nodes, &overrides, &PlacementConfig::default()).unwrap();
        let label = by_id(&labels, "id1");
        assert_eq!(label.side, Side::Left);
        assert_eq!(label.leader.end.x, -2.0);
        assert_eq!(label.leader.start.x, -32.0);
        assert_eq!(label.label_box.right(), -32.0);
    }

    #[test]
    fn boxed_in_node_still_gets_a_fallback_label() {
        let nodes = vec![
            Node::new("id1", 200.0, 0.0, 50.0, 50.0),
            Node::new("id2", 0.0, -100.0, 180.0, 300.0),
            Node::new("id3", 270.0, -100.0, 180.0, 300.0),
        ];
        let mut overrides = Overrides::new();
        overrides.insert(
            "1".to_string(),
            Override {
                max_extra: Some(20.0),
                ..Default::default()
            },
        );
        let config = PlacementConfig::default();
        let labels = compute_placements(&nodes, &overrides, &config).unwrap();
        assert_eq!(labels.len(), 3);

        let boxed = by_id(&labels, "id1");
        assert_eq!(boxed.kind, PlacementKind::Fallback);
        assert_eq!(boxed.side, Side::Right);
        assert_eq!(boxed.label_box.x, 250.0 + config.base_pad_right);
    }

    #[test]
    fn walled_leader_end_moves_label_to_other_side() {
        let nodes = vec![
            Node::new("id1", 200.0, 0.0, 50.0, 50.0),
            Node::new("id2", 190.0, -100.0, 2.0, 300.0),
            // Pulls the flow midpoint right so id1 defaults to the left.
            Node::new("id3", 600.0, 400.0, 50.0, 50.0),
        ];

        let free = compute_placements(&nodes, &Overrides::new(), &PlacementConfig::default()).unwrap();
        let label = by_id(&free, "id1");
        assert_eq!(label.side, Side::Left);
        assert_eq!(label.leader.end, Point::new(173.0, 25.0));

        let mut overrides = Overrides::new();
        overrides.insert(
            "1".to_string(),
            Override {
                max_extra: Some(10.0),
                ..Default::default()
            },
        );
        let labels = compute_placements(&nodes, &overrides, &PlacementConfig::default()).unwrap();
        let label = by_id(&labels, "id1");
        assert_eq!(label.kind, PlacementKind::Searched);
        assert_eq!(label.side, Side::Right);
        assert_eq!(label.label_box.x, 310.0);
        assert_eq!(label.leader.end, Point::new(252.0, 25.0));
    }

    #[test]
    fn forced_side_suppresses_shorter_alternative() {
        // The right side is blocked, the left is free, but the override insists on right.
        let nodes = vec![
            Node::new("id1", 0.0, 0.0, 50.0, 50.0),
            Node::new("id2", 110.0, 0.0, 50.0, 50.0),
            Node::new("id3", 400.0, 0.0, 50.0, 50.0),
        ];
        let mut overrides = Overrides::new();
        overrides.insert(
            "1".to_string(),
            Override {
                force_side: Some(Side::Right),
                ..Default::default()
            },
        );
        let labels = compute_placements(&nodes, &overrides, &PlacementConfig::default()).unwrap();
        let label = by_id(&labels, "id1");
        assert_eq!(label.side, Side::Right);
        assert_eq!(label.kind, PlacementKind::Searched);
        assert!(label.label_box.x > 160.0);
    }

    #[test]
    fn blocked_default_side_switches_to_alternative() {
        let nodes = vec![
            Node::new("id1", 100.0, 0.0, 50.0, 50.0),
            Node::new("id2", 0.0, -200.0, 90.0, 500.0),
            Node::new("id3", 600.0, 0.0, 50.0, 50.0),
        ];
        let mut overrides = Overrides::new();
        overrides.insert(
            "1".to_string(),
            Override {
                max_extra: Some(30.0),
                ..Default::default()
            },
        );
        let labels = compute_placements(&nodes, &overrides, &PlacementConfig::default()).unwrap();
        let label = by_id(&labels, "id1");
        assert_eq!(label.kind, PlacementKind::Searched);
        assert_eq!(label.side, Side::Right);
    }

    #[test]
    fn output_follows_reading_order() {
        let nodes = vec![
            Node::new("id4", 300.0, 200.0, 40.0, 40.0),
            Node::new("id2", 300.0, 0.0, 40.0, 40.0),
            Node::new("id3", 0.0, 200.0, 40.0, 40.0),
            Node::new("id1", 0.0, 0.0, 40.0, 40.0),
        ];
        let labels = compute_placements(&nodes, &Overrides::new(), &PlacementConfig::default()).unwrap();
        let ids: Vec<&str> = labels.iter().map(|l| l.node_id.as_str()).collect();
        assert_eq!(ids, ["id1", "id2", "id3", "id4"]);
    }

    #[test]
    fn later_labels_yield_to_earlier_ones() {
        // Two stacked nodes whose base-padding label boxes would collide.
        let nodes = vec![
            Node::new("id1", 100.0, 0.0, 50.0, 10.0),
            Node::new("id2", 100.0, 12.0, 50.0, 10.0),
            Node::new("id3", 400.0, 0.0, 50.0, 10.0),
        ];
        let config = PlacementConfig::default();
        let labels = compute_placements(&nodes, &Overrides::new(), &config).unwrap();
        let first = by_id(&labels, "id1");
        let second = by_id(&labels, "id2");
        assert_eq!(first.label_box.x, 30.0);
        assert_eq!(second.kind, PlacementKind::Searched);
        assert!(rect_distance(&first.label_box, &second.label_box) >= config.clearance);
    }

    #[test]
    fn searched_labels_respect_clearance() {
        let mut nodes = Vec::new();
        for row in 0..5 {
            for col in 0..3 {
                let id = format!("id{}{}", row + 1, col);
                let x = col as f32 * 170.0 + (row % 2) as f32 * 25.0;
                let y = row as f32 * 70.0;
                nodes.push(Node::new(id, x, y, 60.0 + row as f32 * 5.0, 36.0));
            }
        }
        let config = PlacementConfig::default();
        let labels = compute_placements(&nodes, &Overrides::new(), &config).unwrap();
        assert_eq!(labels.len(), nodes.len());

        let eps = 1e-3;
        for (idx, label) in labels.iter().enumerate() {
            if label.kind != PlacementKind::Searched {
                continue;
            }
            for node in nodes.iter().filter(|n| n.id != label.node_id) {
                assert!(rect_distance(&label.label_box, &node.bounds) + eps >= config.clearance);
                assert!(point_rect_distance(label.leader.end, &node.bounds) + eps >= config.clearance);
            }
            for earlier in &labels[..idx] {
                assert!(rect_distance(&label.label_box, &earlier.label_box) + eps >= config.clearance);
                assert!(point_rect_distance(label.leader.end, &earlier.label_box) + eps >= config.clearance);
            }
        }
    }

    #[test]
    fn placement_is_idempotent() {
        let nodes = vec![
            Node::new("id1", 0.0, 0.0, 80.0, 40.0),
            Node::new("id2", 120.0, 30.0, 80.0, 40.0),
            Node::new("id3", 60.0, 90.0, 80.0, 40.0),
            Node::new("id4", 200.0, 100.0, 30.0, 30.0),
        ];
        let config = PlacementConfig::default();
        let first = compute_placements(&nodes, &Overrides::new(), &config).unwrap();
        let second = compute_placements(&nodes, &Overrides::new(), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn label_text_override_sizes_the_box() {
        let nodes = vec![Node::new("id7", 0.0, 0.0, 50.0, 50.0)];
        let mut overrides = Overrides::new();
        overrides.insert(
            "7".to_string(),
            Override {
                label_text: Some("700a".to_string()),
                ..Default::default()
            },
        );
        let labels = compute_placements(&nodes, &overrides, &PlacementConfig::default()).unwrap();
        assert_eq!(labels[0].text, "700a");
        assert_eq!(labels[0].label_box.width, 26.0);
    }

    #[test]
    fn malformed_nodes_are_rejected() {
        let config = PlacementConfig::default();
        let negative = vec![Node::new("id1", 0.0, 0.0, -5.0, 10.0)];
        assert!(matches!(
            compute_placements(&negative, &Overrides::new(), &config),
            Err(ValidationError::NegativeDimension { field: "width", .. })
        ));
        let nan = vec![Node::new("id1", f32::NAN, 0.0, 5.0, 10.0)];
        assert!(matches!(
            compute_placements(&nan, &Overrides::new(), &config),
            Err(ValidationError::NonFiniteGeometry { field: "x", .. })
        ));
        let dup = vec![
            Node::new("id1", 0.0, 0.0, 5.0, 10.0),
            Node::new("id1", 50.0, 0.0, 5.0, 10.0),
        ];
        assert_eq!(
            compute_placements(&dup, &Overrides::new(), &config),
            Err(ValidationError::DuplicateNode("id1".to_string()))
        );
    }

    #[test]
    fn empty_input_places_nothing() {
        let labels = compute_placements(&[], &Overrides::new(), &PlacementConfig::default()).unwrap();
        assert!(labels.is_empty());
    }
}
