//! Error taxonomy for staging operations.

use crate::id::{InstanceId, ItemId};
use thiserror::Error;

/// Errors returned by catalog, scene, and session operations.
///
/// Out-of-range numbers are never errors: positions, rotations and scales
/// are normalized instead. Only non-finite input is rejected.
#[derive(Debug, Error)]
pub enum StageError {
    /// The referenced instance is not in the scene.
    #[error("instance '{0}' not found in scene")]
    InstanceNotFound(InstanceId),

    /// The referenced furniture item is not in the catalog.
    #[error("catalog item '{0}' not found")]
    CatalogItemNotFound(ItemId),

    /// Malformed input shape.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A scene operation was issued while no photo is open.
    #[error("no photo is open for staging")]
    NoActiveScene,

    #[error("malformed catalog data: {0}")]
    MalformedCatalog(#[source] serde_json::Error),

    #[error("malformed staging config: {0}")]
    MalformedConfig(#[source] serde_json::Error),

    #[error("failed to encode scene snapshot: {0}")]
    SnapshotEncode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode scene snapshot: {0}")]
    SnapshotDecode(#[from] rmp_serde::decode::Error),
}

impl StageError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// True for both instance and catalog lookups that missed.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::InstanceNotFound(_) | Self::CatalogItemNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StageError>;
