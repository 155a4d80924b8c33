use crate::geometry::Point;
use crate::ir::Node;
use crate::layout::{PlacedLabel, PlacementKind};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct PlacementDump {
    pub nodes: Vec<NodeDump>,
    pub labels: Vec<LabelDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub cx: f32,
    pub cy: f32,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub node_id: String,
    pub text: String,
    pub side: String,
    pub kind: PlacementKind,
    pub label_box: [f32; 4],
    pub start: Point,
    pub end: Point,
    pub width: f32,
    pub length: f32,
}

impl PlacementDump {
    pub fn from_placements(nodes: &[Node], labels: &[PlacedLabel]) -> Self {
        let nodes = nodes
            .iter()
            .map(|node| {
                let center = node.center();
                NodeDump {
                    id: node.id.clone(),
                    x: node.bounds.x,
                    y: node.bounds.y,
                    width: node.bounds.width,
                    height: node.bounds.height,
                    cx: center.x,
                    cy: center.y,
                }
            })
            .collect();
        let labels = labels
            .iter()
            .map(|label| LabelDump {
                node_id: label.node_id.clone(),
                text: label.text.clone(),
                side: label.side.as_str().to_string(),
                kind: label.kind,
                label_box: [
                    label.label_box.x,
                    label.label_box.y,
                    label.label_box.width,
                    label.label_box.height,
                ],
                start: label.leader.start,
                end: label.leader.end,
                width: label.leader_width(),
                length: label.leader_length(),
            })
            .collect();
        Self { nodes, labels }
    }
}

pub fn write_placement_dump(path: &Path, nodes: &[Node], labels: &[PlacedLabel]) -> anyhow::Result<()> {
    let dump = PlacementDump::from_placements(nodes, labels);
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
