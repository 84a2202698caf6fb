use thiserror::Error;

use crate::layout::ItemId;

/// Unified result type for the cascade layout crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced by the cascade layout engine.
///
/// Inside a layout pass, `InvalidInput` and `DegenerateGeometry` never abort
/// the pass: the engine clamps or substitutes a zero-height item, keeps going,
/// and records the condition in its diagnostics.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid input in section {section}: {reason}")]
    InvalidInput { section: usize, reason: String },
    #[error("container width {0} clamped to 0")]
    InvalidWidth(f64),
    #[error("degenerate intrinsic size {width}x{height} for item {item}")]
    DegenerateGeometry { item: ItemId, width: f64, height: f64 },
    #[error("layout has not been prepared")]
    NotPrepared,
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LayoutError {
    pub fn invalid_input(section: usize, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            section,
            reason: reason.into(),
        }
    }

    /// Short machine-friendly label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } | Self::InvalidWidth(_) => "invalid_input",
            Self::DegenerateGeometry { .. } => "degenerate_geometry",
            Self::NotPrepared => "not_prepared",
            Self::Json(_) => "json",
            Self::Io(_) => "io",
        }
    }
}
