use crate::geometry::Rect;
use crate::ir::Node;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static GROUP_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<g(?:\s[^>]*)?>").unwrap());
static ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"([\w:-]+)\s*=\s*"([^"]*)""#).unwrap());
static NODE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^id\d+[a-z]*$").unwrap());
static TRANSLATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"translate\(\s*([^,\s)]+)(?:[\s,]+([^\s)]+))?\s*\)").unwrap()
});
static RECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<rect\b[^>]*>").unwrap());
static CIRCLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<circle\b[^>]*>").unwrap());
static POLYGON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<polygon\b[^>]*>").unwrap());

static ANNOTATION_GROUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)\s*<g[^>]*\bid="annotations"[^>]*>.*?</g>\s*"#).unwrap());
static STYLED_REFERENCE_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<text[^>]*font-family="Arial[^>]*>(?:id)?\d+[a-z]*</text>"#).unwrap()
});
static REFERENCE_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<text[^>]*>(?:id)?\d+</text>").unwrap());
static LEADER_WIDTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<path[^>]*stroke-width="0\.8"[^>]*>"#).unwrap());
static LEADER_STROKE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<path[^>]*fill="none"[^>]*stroke="black"[^>]*>"#).unwrap());

fn attributes(tag: &str) -> HashMap<&str, &str> {
    ATTR_RE
        .captures_iter(tag)
        .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .collect()
}

fn translation(attrs: &HashMap<&str, &str>) -> (f32, f32) {
    let Some(caps) = attrs.get("transform").and_then(|t| TRANSLATE_RE.captures(t)) else {
        return (0.0, 0.0);
    };
    let tx = caps.get(1).and_then(|m| m.as_str().parse().ok()).unwrap_or(0.0);
    let ty = caps.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0.0);
    (tx, ty)
}

fn number(attrs: &HashMap<&str, &str>, name: &str, shape: &str) -> Result<Option<f32>> {
    match attrs.get(name) {
        Some(raw) => {
            let value = raw
                .trim()
                .parse::<f32>()
                .with_context(|| format!("invalid {shape} {name} \"{raw}\""))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Body of the group whose opening tag ends at `start`, up to its matching `</g>`.
fn group_body(content: &str, start: usize) -> Option<&str> {
    let bytes = content.as_bytes();
    let mut depth = 1usize;
    let mut pos = start;
    while pos < bytes.len() {
        let rest = &bytes[pos..];
        if rest.starts_with(b"</g>") {
            depth -= 1;
            if depth == 0 {
                return Some(&content[start..pos]);
            }
            pos += 4;
            continue;
        }
        if rest.starts_with(b"<g") && matches!(rest.get(2), Some(b' ' | b'>' | b'/' | b'\t' | b'\n' | b'\r')) {
            let self_closing = content[pos..]
                .find('>')
                .is_some_and(|end| content[pos..pos + end].ends_with('/'));
            if !self_closing {
                depth += 1;
            }
        }
        pos += 1;
    }
    None
}

fn shape_bounds(body: &str, id: &str) -> Result<Option<Rect>> {
    if let Some(tag) = RECT_RE.find(body) {
        let attrs = attributes(tag.as_str());
        let (tx, ty) = translation(&attrs);
        let x = number(&attrs, "x", "rect")?.unwrap_or(0.0);
        let y = number(&attrs, "y", "rect")?.unwrap_or(0.0);
        let width = number(&attrs, "width", "rect")?;
        let height = number(&attrs, "height", "rect")?;
        if let (Some(width), Some(height)) = (width, height) {
            return Ok(Some(Rect::new(x + tx, y + ty, width, height)));
        }
    }

    if let Some(tag) = CIRCLE_RE.find(body) {
        let attrs = attributes(tag.as_str());
        let (tx, ty) = translation(&attrs);
        let cx = number(&attrs, "cx", "circle")?.unwrap_or(0.0);
        let cy = number(&attrs, "cy", "circle")?.unwrap_or(0.0);
        if let Some(r) = number(&attrs, "r", "circle")? {
            return Ok(Some(Rect::new(cx + tx - r, cy + ty - r, 2.0 * r, 2.0 * r)));
        }
    }

    if let Some(tag) = POLYGON_RE.find(body) {
        let attrs = attributes(tag.as_str());
        let (tx, ty) = translation(&attrs);
        let Some(points) = attrs.get("points") else {
            return Ok(None);
        };
        let coords = points
            .replace(',', " ")
            .split_whitespace()
            .map(|raw| raw.parse::<f32>())
            .collect::<Result<Vec<f32>, _>>()
            .with_context(|| format!("invalid polygon points in node {id}"))?;
        let mut min = (f32::INFINITY, f32::INFINITY);
        let mut max = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for pair in coords.chunks_exact(2) {
            let (px, py) = (pair[0] + tx, pair[1] + ty);
            min = (min.0.min(px), min.1.min(py));
            max = (max.0.max(px), max.1.max(py));
        }
        if min.0.is_finite() && min.1.is_finite() {
            return Ok(Some(Rect::new(min.0, min.1, max.0 - min.0, max.1 - min.1)));
        }
    }

    Ok(None)
}

/// Extract flowchart nodes from Mermaid SVG markup.
///
/// A node is a `<g>` carrying `data-et="node"` and a `data-id` like `id203`
/// or `id512b`. Its bounds come from the first rect, circle or polygon inside
/// the group, shifted by the group's and the shape's own `translate(...)`.
pub fn extract_nodes(content: &str) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    for open in GROUP_OPEN_RE.find_iter(content) {
        if open.as_str().ends_with("/>") {
            continue;
        }
        let attrs = attributes(open.as_str());
        if attrs.get("data-et") != Some(&"node") {
            continue;
        }
        let Some(id) = attrs.get("data-id").filter(|id| NODE_ID_RE.is_match(id)) else {
            continue;
        };
        let Some(body) = group_body(content, open.end()) else {
            tracing::debug!(node = %id, "unterminated node group");
            continue;
        };
        let (gx, gy) = translation(&attrs);
        match shape_bounds(body, id)? {
            Some(bounds) => nodes.push(Node::new(
                *id,
                bounds.x + gx,
                bounds.y + gy,
                bounds.width,
                bounds.height,
            )),
            None => tracing::debug!(node = %id, "no rect, circle or polygon in node group"),
        }
    }
    Ok(nodes)
}

/// Remove annotations left by an earlier run so re-annotating is stable.
///
/// Loose `<text>` holding a bare numeral is treated as a stray label; suffixed
/// numerals like `512b` only when they carry the annotation font, so captions
/// such as `3rd` survive.
pub fn strip_annotations(content: &str) -> String {
    let content = ANNOTATION_GROUP_RE.replace_all(content, "");
    let content = STYLED_REFERENCE_TEXT_RE.replace_all(&content, "");
    let content = REFERENCE_TEXT_RE.replace_all(&content, "");
    let content = LEADER_WIDTH_RE.replace_all(&content, "");
    LEADER_STROKE_RE.replace_all(&content, "").into_owned()
}
