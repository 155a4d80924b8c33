use thiserror::Error;

/// Malformed input rejected before any placement runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("node `{id}` has a non-finite {field} ({value})")]
    NonFiniteGeometry {
        id: String,
        field: &'static str,
        value: f32,
    },

    #[error("node `{id}` has a negative {field} ({value})")]
    NegativeDimension {
        id: String,
        field: &'static str,
        value: f32,
    },

    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),

    #[error("override for `{reference}` has an invalid {field} ({value})")]
    InvalidOverride {
        reference: String,
        field: &'static str,
        value: f32,
    },

    #[error("invalid placement setting {field} ({value})")]
    InvalidConfig { field: &'static str, value: f32 },
}
