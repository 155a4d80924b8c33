use crate::layout::PlacedLabel;
use crate::theme::AnnotationTheme;
use anyhow::{Context, Result};
use std::path::Path;

/// Markup for one label: the numeral followed by its leader line.
pub fn label_svg(label: &PlacedLabel, theme: &AnnotationTheme) -> String {
    let text = format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"{}\">{}</text>",
        label.text_origin.x,
        label.text_origin.y,
        escape_xml(&theme.font_family),
        theme.font_size,
        escape_xml(&theme.text_color),
        label.anchor.as_str(),
        escape_xml(&label.text)
    );
    let line = format!(
        "<path d=\"{}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"none\"/>",
        label.leader.to_path_data(),
        escape_xml(&theme.line_color),
        theme.line_width
    );
    format!("{text}\n    {line}")
}

pub fn render_annotations(labels: &[PlacedLabel], theme: &AnnotationTheme) -> String {
    let items: Vec<String> = labels.iter().map(|label| label_svg(label, theme)).collect();
    format!(
        "\n  <g id=\"annotations\" data-et=\"annotation\">\n    {}\n  </g>\n",
        items.join("\n    ")
    )
}

/// Splice the annotation group in front of the document's closing tags.
pub fn insert_annotations(content: &str, labels: &[PlacedLabel], theme: &AnnotationTheme) -> String {
    let group = render_annotations(labels, theme);
    let at = content
        .rfind("</g></svg>")
        .or_else(|| content.rfind("</svg>"))
        .unwrap_or(content.len());
    let mut out = String::with_capacity(content.len() + group.len());
    out.push_str(&content[..at]);
    out.push_str(&group);
    out.push_str(&content[at..]);
    out
}

pub fn write_output_svg(svg: &str, output: &Path) -> Result<()> {
    std::fs::write(output, svg)
        .with_context(|| format!("failed to write {}", output.display()))?;
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &crate::config::RenderConfig,
    theme: &AnnotationTheme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    if let Some(family) = theme.font_family.split(',').next() {
        opt.font_family = family.trim().to_string();
    }
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some(color) = parse_hex_color(&render_cfg.background) {
        pixmap.fill(color);
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(feature = "png")]
fn parse_hex_color(value: &str) -> Option<resvg::tiny_skia::Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(resvg::tiny_skia::Color::from_rgba8(channel(0)?, channel(2)?, channel(4)?, 255))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
