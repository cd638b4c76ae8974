//! Staging configuration.
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a usable config.

use crate::catalog::Category;
use crate::error::{Result, StageError};
use crate::transform::Position;
use serde::Deserialize;

/// Pixel size of the staging canvas the photo is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl CanvasSize {
    /// Convert canvas pixels to photo percentages. Degenerate canvases map
    /// everything to the origin.
    pub fn to_percent(&self, px: f32, py: f32) -> Position {
        let pct = |v: f32, extent: f32| if extent > 0.0 { v / extent * 100.0 } else { 0.0 };
        Position::new(pct(px, self.width), pct(py, self.height))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    pub canvas: CanvasSize,
    /// Where a catalog item lands when added by click rather than dropped.
    pub drop_position: Position,
    /// Arrow-key nudge in percent.
    pub nudge_step: f32,
    /// Shift+arrow nudge in percent.
    pub nudge_step_large: f32,
    /// Degrees per rotate shortcut.
    pub rotate_step: f32,
    /// Multiplicative factor per scale shortcut.
    pub scale_step: f32,
    /// Percent offset on both axes for duplicates.
    pub duplicate_offset: f32,
    pub default_category: Category,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            drop_position: Position::CENTER,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            rotate_step: 15.0,
            scale_step: 1.1,
            duplicate_offset: 5.0,
            default_category: Category::Living,
        }
    }
}

impl StagingConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(StageError::MalformedConfig)
    }
}
