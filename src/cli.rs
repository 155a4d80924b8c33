use crate::config::{Config, load_config};
use crate::layout::compute_placements;
use crate::layout_dump::write_placement_dump;
use crate::overrides::load_overrides;
use crate::parser::{extract_nodes, strip_annotations};
use crate::render::{insert_annotations, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "patent-refs",
    version,
    about = "Add numbered reference labels to patent drawing SVG files",
    after_help = "Examples:\n  patent-refs input.svg\n  patent-refs input.svg -o output.svg\n  patent-refs input.svg --overrides custom_overrides.json"
)]
pub struct Args {
    /// Input SVG file path
    pub input: PathBuf,

    /// Output file path (default: <input>_annotated.svg, or .png for PNG output)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// JSON/JSON5 file with per-node placement overrides
    #[arg(long = "overrides")]
    pub overrides: Option<PathBuf>,

    /// Config JSON/JSON5 file (placement, theme and render settings)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Write the computed placements as JSON
    #[arg(long = "dump")]
    pub dump: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let overrides = load_overrides(args.overrides.as_deref())?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input, args.output_format));

    tracing::info!(input = %args.input.display(), output = %output.display(), "annotating");

    let content = std::fs::read_to_string(&args.input)?;
    let content = strip_annotations(&content);
    let nodes = extract_nodes(&content)?;
    if nodes.is_empty() {
        tracing::warn!("no flowchart nodes found; check the SVG structure");
        return Ok(());
    }

    tracing::info!(count = nodes.len(), "found flowchart nodes");
    for node in &nodes {
        let center = node.center();
        tracing::info!(
            "  {}: center=({:.0}, {:.0}), size={:.0}x{:.0}",
            node.id,
            center.x,
            center.y,
            node.bounds.width,
            node.bounds.height
        );
    }

    let labels = compute_placements(&nodes, &overrides, &config.placement)?;
    let annotated = insert_annotations(&content, &labels, &config.theme);

    match args.output_format {
        OutputFormat::Svg => write_output_svg(&annotated, &output)?,
        OutputFormat::Png => write_png(&annotated, &output, &config)?,
    }
    if let Some(path) = args.dump.as_deref() {
        write_placement_dump(path, &nodes, &labels)?;
    }

    tracing::info!(count = labels.len(), output = %output.display(), "wrote annotations");
    for label in &labels {
        tracing::info!(
            "  {}: width={:.1}, start=({:.1},{:.1})",
            label.text,
            label.leader_width(),
            label.leader.start.x,
            label.leader.start.y
        );
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let ext = match format {
        OutputFormat::Svg => "svg",
        OutputFormat::Png => "png",
    };
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("diagram");
    input.with_file_name(format!("{stem}_annotated.{ext}"))
}
