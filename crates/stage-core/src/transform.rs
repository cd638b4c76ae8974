//! Transform normalization.
//!
//! Every write to an instance's transform goes through these functions.
//! Magnitudes are saturated or wrapped, never rejected: rotation wraps into
//! `[0, 360)`, scale saturates into `[0.1, 5]`, each position axis
//! saturates into `[0, 100]`. Only non-finite input is an error.

use crate::error::{Result, StageError};
use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 5.0;
pub const MIN_COORD: f32 = 0.0;
pub const MAX_COORD: f32 = 100.0;

/// Position on the photo in percentage units, `[0, 100]` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The centre of the photo.
    pub const CENTER: Position = Position::new(50.0, 50.0);

    /// Clamp both axes into `[0, 100]`.
    pub fn normalized(self) -> Result<Self> {
        Ok(Self {
            x: finite("position.x", self.x)?.clamp(MIN_COORD, MAX_COORD),
            y: finite("position.y", self.y)?.clamp(MIN_COORD, MAX_COORD),
        })
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Partial transform update. `None` fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformPatch {
    pub position: Option<Position>,
    pub rotation: Option<f32>,
    pub scale: Option<f32>,
}

impl TransformPatch {
    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn rotation(degrees: f32) -> Self {
        Self {
            rotation: Some(degrees),
            ..Default::default()
        }
    }

    pub fn scale(scale: f32) -> Self {
        Self {
            scale: Some(scale),
            ..Default::default()
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.rotation.is_none() && self.scale.is_none()
    }

    /// Normalize every provided field. Fails if any of them is non-finite,
    /// so a bad patch is never partially applied.
    pub fn normalized(self) -> Result<Self> {
        Ok(Self {
            position: self.position.map(Position::normalized).transpose()?,
            rotation: self.rotation.map(normalize_rotation).transpose()?,
            scale: self.scale.map(normalize_scale).transpose()?,
        })
    }
}

/// Wrap degrees into `[0, 360)`: `400 → 40`, `-10 → 350`.
pub fn normalize_rotation(degrees: f32) -> Result<f32> {
    let wrapped = finite("rotation", degrees)?.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360.0
    Ok(if wrapped >= 360.0 { 0.0 } else { wrapped })
}

/// Saturate into `[0.1, 5]`.
pub fn normalize_scale(scale: f32) -> Result<f32> {
    Ok(finite("scale", scale)?.clamp(MIN_SCALE, MAX_SCALE))
}

fn finite(field: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        log::warn!("rejected non-finite {field}: {value}");
        Err(StageError::validation(field, format!("{value} is not a finite number")))
    }
}
