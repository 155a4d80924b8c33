use crate::error::ValidationError;
use crate::theme::AnnotationTheme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Minimum gap between a label (or leader endpoint) and any other node or label.
    pub clearance: f32,
    /// Outward increment used by every stepping search.
    pub search_step: f32,
    pub base_pad_left: f32,
    pub base_pad_right: f32,
    /// Default bound on the outward search; overrides may change it per node.
    pub max_extra: f32,
    /// Approximate average glyph width at the annotation font size.
    pub char_width: f32,
    pub label_height: f32,
    pub min_label_width: f32,
    /// Leader length advantage the alternative side needs before it wins.
    pub side_tolerance: f32,
    /// Gap between a node edge and its leader endpoint.
    pub leader_gap: f32,
    /// Perpendicular displacement of the S-curve control points.
    pub curve_offset: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            clearance: 15.0,
            search_step: 5.0,
            base_pad_left: 60.0,
            base_pad_right: 60.0,
            max_extra: 300.0,
            char_width: 6.5,
            label_height: 11.0,
            min_label_width: 10.0,
            side_tolerance: 0.1,
            leader_gap: 2.0,
            curve_offset: 15.0,
        }
    }
}

impl PlacementConfig {
    pub fn label_width(&self, text: &str) -> f32 {
        (self.char_width * text.chars().count() as f32).max(self.min_label_width)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let non_negative = [
            ("clearance", self.clearance),
            ("base_pad_left", self.base_pad_left),
            ("base_pad_right", self.base_pad_right),
            ("max_extra", self.max_extra),
            ("char_width", self.char_width),
            ("label_height", self.label_height),
            ("min_label_width", self.min_label_width),
            ("side_tolerance", self.side_tolerance),
            ("leader_gap", self.leader_gap),
            ("curve_offset", self.curve_offset),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidConfig { field, value });
            }
        }
        if !self.search_step.is_finite() || self.search_step <= 0.0 {
            return Err(ValidationError::InvalidConfig {
                field: "search_step",
                value: self.search_step,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub placement: PlacementConfig,
    pub theme: AnnotationTheme,
    pub render: RenderConfig,
}

/// Load a JSON/JSON5 config file; any omitted key keeps its default.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = json5::from_str(contents)?;
    config.placement.validate()?;
    Ok(config)
}
