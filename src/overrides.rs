//! Per-node placement overrides.
//!
//! Overrides are keyed by node reference (the node id without its `id`
//! prefix) and read from a JSON or JSON5 object such as:
//!
//! ```json
//! { "209": { "force_side": "right", "curve_width": 80 } }
//! ```

use crate::config::PlacementConfig;
use crate::error::ValidationError;
use crate::ir::Side;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Override {
    #[serde(default)]
    pub force_side: Option<Side>,
    /// Fixed horizontal leader length; disables the clearance search.
    #[serde(default, alias = "length", alias = "fixed_length")]
    pub curve_width: Option<f32>,
    #[serde(default)]
    pub label_text: Option<String>,
    #[serde(default)]
    pub base_pad_left: Option<f32>,
    #[serde(default)]
    pub base_pad_right: Option<f32>,
    #[serde(default)]
    pub max_extra: Option<f32>,
}

impl Override {
    pub fn validate(&self, reference: &str) -> Result<(), ValidationError> {
        let fields = [
            ("curve_width", self.curve_width),
            ("base_pad_left", self.base_pad_left),
            ("base_pad_right", self.base_pad_right),
            ("max_extra", self.max_extra),
        ];
        for (field, value) in fields {
            let Some(value) = value else { continue };
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidOverride {
                    reference: reference.to_string(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

pub type Overrides = BTreeMap<String, Override>;

/// Placement parameters for one node after applying its override to the global config.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOverride {
    pub label: String,
    pub force_side: Option<Side>,
    pub fixed_length: Option<f32>,
    pub pad_left: f32,
    pub pad_right: f32,
    pub max_extra: f32,
}

impl ResolvedOverride {
    pub fn resolve(reference: &str, ov: Option<&Override>, config: &PlacementConfig) -> Self {
        let ov = ov.cloned().unwrap_or_default();
        Self {
            label: ov.label_text.unwrap_or_else(|| reference.to_string()),
            force_side: ov.force_side,
            fixed_length: ov.curve_width,
            pad_left: ov.base_pad_left.unwrap_or(config.base_pad_left),
            pad_right: ov.base_pad_right.unwrap_or(config.base_pad_right),
            max_extra: ov.max_extra.unwrap_or(config.max_extra),
        }
    }

    pub fn pad(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.pad_left,
            Side::Right => self.pad_right,
        }
    }
}

pub fn validate_overrides(overrides: &Overrides) -> Result<(), ValidationError> {
    for (reference, ov) in overrides {
        ov.validate(reference)?;
    }
    Ok(())
}

pub fn load_overrides(path: Option<&Path>) -> anyhow::Result<Overrides> {
    let Some(path) = path else {
        return Ok(Overrides::new());
    };
    let contents = std::fs::read_to_string(path)?;
    let overrides = parse_overrides(&contents)?;
    tracing::info!(
        path = %path.display(),
        count = overrides.len(),
        "loaded placement overrides"
    );
    Ok(overrides)
}

pub fn parse_overrides(contents: &str) -> anyhow::Result<Overrides> {
    let overrides: Overrides = json5::from_str(contents)?;
    validate_overrides(&overrides)?;
    Ok(overrides)
}
