use serde::{Deserialize, Serialize};

/// Styling for the emitted reference numerals and leader lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationTheme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub line_color: String,
    pub line_width: f32,
}

impl AnnotationTheme {
    /// Black-on-white styling used for patent drawings.
    pub fn patent() -> Self {
        Self {
            font_family: "Arial, sans-serif".to_string(),
            font_size: 11.0,
            text_color: "black".to_string(),
            line_color: "black".to_string(),
            line_width: 0.8,
        }
    }
}

impl Default for AnnotationTheme {
    fn default() -> Self {
        Self::patent()
    }
}
